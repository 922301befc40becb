//! Schedule service: owns the calendar trigger, the live `[sync]` options
//! and the manual trigger surface. All entry points funnel into one
//! `SyncJobRunner` and therefore share its run guard.

mod trigger;

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{Mutex, RwLock};

use crate::config::SyncOptions;
use crate::error::SyncError;
use crate::provider::VideoId;
use crate::quota::QuotaSnapshot;
use crate::runner::{CleanupResult, JobResult, SyncJobRunner};

pub use trigger::{normalize_cron, parse_timezone, validate, CronTrigger};

/// Snapshot returned by `SyncService::get_status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncStatus {
    pub enabled: bool,
    /// A sync run currently holds the run guard.
    pub running: bool,
    /// A calendar trigger is registered.
    pub attached: bool,
    pub schedule: String,
    pub timezone: String,
    pub quota: QuotaSnapshot,
}

pub struct SyncService {
    runner: Arc<SyncJobRunner>,
    options: RwLock<SyncOptions>,
    trigger: Mutex<Option<CronTrigger>>,
}

impl SyncService {
    /// Applies the batch fields of `options` to `runner`; does not attach.
    pub fn new(runner: Arc<SyncJobRunner>, options: SyncOptions) -> Self {
        runner.set_batch_config(options.batch_config());
        Self {
            runner,
            options: RwLock::new(options),
            trigger: Mutex::new(None),
        }
    }

    pub fn runner(&self) -> &Arc<SyncJobRunner> {
        &self.runner
    }

    pub async fn options(&self) -> SyncOptions {
        self.options.read().await.clone()
    }

    /// Attach the calendar trigger. No-op when disabled or already attached.
    pub async fn start(&self) -> Result<(), SyncError> {
        let mut trigger = self.trigger.lock().await;
        if trigger.is_some() {
            tracing::info!("sync trigger already attached");
            return Ok(());
        }

        let options = self.options().await;
        if !options.enabled {
            tracing::info!("scheduled sync is disabled, not attaching");
            return Ok(());
        }

        let attached =
            CronTrigger::attach(Arc::clone(&self.runner), &options.schedule, &options.timezone)
                .await?;
        *trigger = Some(attached);
        Ok(())
    }

    /// Detach the calendar trigger. An in-flight run is not interrupted.
    pub async fn stop(&self) {
        let detached = self.trigger.lock().await.take();
        match detached {
            Some(t) => t.detach().await,
            None => tracing::debug!("sync trigger not attached"),
        }
    }

    /// Replace the `[sync]` options.
    ///
    /// The new schedule is validated before anything changes. Disabling
    /// detaches; a schedule or timezone change while attached reattaches; a
    /// disabled-to-enabled toggle attaches.
    pub async fn update_config(&self, new_options: SyncOptions) -> Result<(), SyncError> {
        if new_options.enabled {
            trigger::validate(&new_options.schedule, &new_options.timezone)?;
        }

        let mut trigger = self.trigger.lock().await;
        let old = {
            let mut options = self.options.write().await;
            std::mem::replace(&mut *options, new_options.clone())
        };

        self.runner.set_batch_config(new_options.batch_config());

        let schedule_changed =
            old.schedule != new_options.schedule || old.timezone != new_options.timezone;
        let reattach = new_options.enabled
            && ((trigger.is_some() && schedule_changed) || (!old.enabled && trigger.is_none()));

        if !new_options.enabled || reattach {
            if let Some(t) = trigger.take() {
                t.detach().await;
            }
        }
        if reattach {
            let attached = CronTrigger::attach(
                Arc::clone(&self.runner),
                &new_options.schedule,
                &new_options.timezone,
            )
            .await?;
            *trigger = Some(attached);
        }

        tracing::info!(
            enabled = new_options.enabled,
            schedule = %new_options.schedule,
            timezone = %new_options.timezone,
            attached = trigger.is_some(),
            "sync options updated"
        );
        Ok(())
    }

    pub async fn get_status(&self) -> SyncStatus {
        let options = self.options().await;
        let attached = self.trigger.lock().await.is_some();
        SyncStatus {
            enabled: options.enabled,
            running: self.runner.is_running(),
            attached,
            schedule: options.schedule,
            timezone: options.timezone,
            quota: self.runner.client().quota_status(),
        }
    }

    pub async fn trigger_full_sync(&self) -> Result<JobResult, SyncError> {
        tracing::info!("manual full sync requested");
        self.runner.run_full_sync().await
    }

    pub async fn trigger_specific_sync(&self, ids: &[VideoId]) -> Result<JobResult, SyncError> {
        tracing::info!(count = ids.len(), "manual specific sync requested");
        self.runner.run_specific_sync(ids).await
    }

    pub async fn trigger_cleanup(&self) -> Result<CleanupResult, SyncError> {
        tracing::info!("manual cleanup requested");
        self.runner.cleanup_stale().await
    }
}
