//! Sync job runner.
//!
//! Drives one synchronization pass: working set -> chunk plan -> bulk fetch
//! per chunk (strictly sequential, sharing the client's rate window) ->
//! per-id upsert. Failures are isolated per chunk and per id and collected
//! into a `JobResult`. All entry points share one `RunGuard`.

mod guard;
mod result;

use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::chunker;
use crate::client::RateLimitedClient;
use crate::error::SyncError;
use crate::provider::VideoId;
use crate::store::PersistenceSink;

pub use guard::{RunGuard, RunGuardHandle};
pub use result::{CleanupResult, JobResult, SuccessPolicy};
use result::RunTally;

/// Per-run batching parameters. Snapshotted when a run starts.
/// Retries are governed by the client's own `RetryPolicy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchConfig {
    /// Ids per provider call (clamped to the provider cap).
    pub max_per_batch: usize,
    /// Pause between consecutive chunks.
    pub inter_batch_delay: Duration,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_per_batch: 50,
            inter_batch_delay: Duration::from_millis(1000),
        }
    }
}

pub struct SyncJobRunner {
    client: Arc<RateLimitedClient>,
    sink: Arc<dyn PersistenceSink>,
    batch: RwLock<BatchConfig>,
    guard: RunGuard,
}

impl SyncJobRunner {
    pub fn new(
        client: Arc<RateLimitedClient>,
        sink: Arc<dyn PersistenceSink>,
        batch: BatchConfig,
    ) -> Self {
        Self {
            client,
            sink,
            batch: RwLock::new(batch),
            guard: RunGuard::new(),
        }
    }

    pub fn client(&self) -> &Arc<RateLimitedClient> {
        &self.client
    }

    pub fn batch_config(&self) -> BatchConfig {
        *self.batch.read().unwrap_or_else(|e| e.into_inner())
    }

    /// Takes effect from the next run; a run in progress keeps its snapshot.
    pub fn set_batch_config(&self, batch: BatchConfig) {
        *self.batch.write().unwrap_or_else(|e| e.into_inner()) = batch;
    }

    /// True while any sync run holds the guard.
    pub fn is_running(&self) -> bool {
        self.guard.is_held()
    }

    /// Sync every id referenced by an active link.
    ///
    /// Fails with `AlreadyRunning` before doing any work if another run is
    /// active. Success uses the majority policy.
    pub async fn run_full_sync(&self) -> Result<JobResult, SyncError> {
        let _running = self.guard.try_acquire().ok_or(SyncError::AlreadyRunning)?;
        let batch = self.batch_config();
        tracing::info!("full sync started");

        let ids = match self.sink.find_active_ids().await {
            Ok(ids) => ids,
            Err(e) => {
                tracing::error!(error = %format!("{e:#}"), "active id lookup failed");
                return Ok(RunTally::new(0).critical(&e));
            }
        };
        if ids.is_empty() {
            tracing::info!("no active videos to sync");
            return Ok(JobResult::empty());
        }

        let mut tally = RunTally::new(ids.len());
        self.process_batches(&ids, &batch, &mut tally).await;
        let result = tally.finish(SuccessPolicy::Majority);
        log_result("full", &result);
        Ok(result)
    }

    /// Sync an explicit id list. Duplicates and blank ids are dropped; empty
    /// input returns a trivial success without touching the guard.
    pub async fn run_specific_sync(&self, ids: &[VideoId]) -> Result<JobResult, SyncError> {
        let ids = chunker::dedup_ids(ids);
        if ids.is_empty() {
            return Ok(JobResult::empty());
        }

        let _running = self.guard.try_acquire().ok_or(SyncError::AlreadyRunning)?;
        let batch = self.batch_config();
        tracing::info!(count = ids.len(), "specific sync started");

        let mut tally = RunTally::new(ids.len());
        self.process_batches(&ids, &batch, &mut tally).await;
        let result = tally.finish(SuccessPolicy::Strict);
        log_result("specific", &result);
        Ok(result)
    }

    /// Delete stats no active link references. Not guarded; may overlap a sync.
    pub async fn cleanup_stale(&self) -> Result<CleanupResult, SyncError> {
        let deleted_count = self
            .sink
            .delete_unused()
            .await
            .map_err(|e| SyncError::Store(format!("{e:#}")))?;
        tracing::info!(deleted_count, "stale video stats removed");
        Ok(CleanupResult { deleted_count })
    }

    async fn process_batches(&self, ids: &[VideoId], batch: &BatchConfig, tally: &mut RunTally) {
        let total = chunker::chunk_count(ids.len(), batch.max_per_batch);
        tracing::debug!(ids = ids.len(), batches = total, "batch plan");
        let chunks = chunker::plan_chunks(ids, batch.max_per_batch);

        for (index, chunk) in chunks.iter().enumerate() {
            tracing::debug!(batch = index + 1, total, size = chunk.len(), "fetching batch");

            match self.client.bulk_fetch_view_counts(chunk).await {
                Ok(counts) => {
                    for id in chunk.iter() {
                        let Some(&count) = counts.get(id) else {
                            tally.error(format!("No data received for {id}"));
                            continue;
                        };
                        match self.sink.upsert(id, count).await {
                            Ok(_) => tally.updated += 1,
                            Err(e) => tally.error(format!("Failed to update {id}: {e:#}")),
                        }
                    }
                }
                Err(e) => tally.error(format!("Batch {}/{} failed: {}", index + 1, total, e)),
            }

            if index + 1 < total && !batch.inter_batch_delay.is_zero() {
                tokio::time::sleep(batch.inter_batch_delay).await;
            }
        }
    }
}

fn log_result(kind: &str, result: &JobResult) {
    tracing::info!(
        kind,
        success = result.success,
        updated = result.updated_count,
        errors = result.errors.len(),
        "sync run finished"
    );
}
