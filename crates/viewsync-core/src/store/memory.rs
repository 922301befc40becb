//! In-memory persistence sink for tests and dry runs.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use super::db::unix_timestamp;
use super::types::VideoStat;
use super::PersistenceSink;
use crate::provider::VideoId;

#[derive(Default)]
struct MemoryState {
    active: Vec<VideoId>,
    stats: BTreeMap<VideoId, VideoStat>,
    failing_upserts: HashSet<VideoId>,
    lookup_failure: Option<String>,
    upsert_calls: usize,
}

/// `PersistenceSink` over plain maps, with injectable failures.
#[derive(Default)]
pub struct MemorySink {
    state: Mutex<MemoryState>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_active<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<VideoId>,
    {
        let sink = Self::default();
        sink.set_active(ids);
        sink
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn set_active<I, S>(&self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<VideoId>,
    {
        self.lock().active = ids.into_iter().map(Into::into).collect();
    }

    /// Make every upsert for `id` fail.
    pub fn fail_upsert_for(&self, id: impl Into<VideoId>) {
        self.lock().failing_upserts.insert(id.into());
    }

    /// Make `find_active_ids` fail with `message`.
    pub fn fail_lookup(&self, message: impl Into<String>) {
        self.lock().lookup_failure = Some(message.into());
    }

    pub fn view_count(&self, id: &str) -> Option<u64> {
        self.lock().stats.get(id).map(|s| s.view_count)
    }

    pub fn stats(&self) -> Vec<VideoStat> {
        self.lock().stats.values().cloned().collect()
    }

    pub fn upsert_calls(&self) -> usize {
        self.lock().upsert_calls
    }
}

#[async_trait]
impl PersistenceSink for MemorySink {
    async fn find_active_ids(&self) -> Result<Vec<VideoId>> {
        let state = self.lock();
        match &state.lookup_failure {
            Some(msg) => Err(anyhow!("{msg}")),
            None => Ok(state.active.clone()),
        }
    }

    async fn upsert(&self, id: &str, view_count: u64) -> Result<VideoStat> {
        let mut state = self.lock();
        state.upsert_calls += 1;
        if state.failing_upserts.contains(id) {
            return Err(anyhow!("write rejected for {id}"));
        }
        let stat = VideoStat {
            video_id: id.to_string(),
            view_count,
            updated_at: unix_timestamp(),
        };
        state.stats.insert(id.to_string(), stat.clone());
        Ok(stat)
    }

    async fn delete_unused(&self) -> Result<u64> {
        let mut state = self.lock();
        let active: HashSet<VideoId> = state.active.iter().cloned().collect();
        let before = state.stats.len();
        state.stats.retain(|id, _| active.contains(id));
        Ok((before - state.stats.len()) as u64)
    }
}
