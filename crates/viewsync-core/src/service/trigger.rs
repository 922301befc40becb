//! Calendar trigger: a `tokio-cron-scheduler` job that fires `run_full_sync`.

use std::sync::Arc;

use chrono_tz::Tz;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::error::SyncError;
use crate::runner::SyncJobRunner;

/// Expand a 5-field (minute-first) expression to the 6-field form the
/// scheduler expects by prepending a zero seconds field.
pub fn normalize_cron(expr: &str) -> Result<String, SyncError> {
    let fields: Vec<&str> = expr.split_whitespace().collect();
    match fields.len() {
        5 => Ok(format!("0 {}", fields.join(" "))),
        6 | 7 => Ok(fields.join(" ")),
        n => Err(SyncError::Schedule(format!(
            "cron expression {expr:?} has {n} fields, expected 5 or 6"
        ))),
    }
}

pub fn parse_timezone(name: &str) -> Result<Tz, SyncError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|e| SyncError::Schedule(format!("unknown timezone {name:?}: {e}")))
}

fn schedule_error(expr: &str, e: impl std::fmt::Debug) -> SyncError {
    SyncError::Schedule(format!("invalid cron expression {expr:?}: {e:?}"))
}

/// Check that `schedule`/`timezone` would produce a job, without attaching it.
pub fn validate(schedule: &str, timezone: &str) -> Result<(), SyncError> {
    let tz = parse_timezone(timezone)?;
    let expr = normalize_cron(schedule)?;
    Job::new_async_tz(expr.as_str(), tz, |_id, _sched| Box::pin(async {}))
        .map_err(|e| schedule_error(&expr, e))?;
    Ok(())
}

/// One attached schedule. Dropping it without `detach` leaves the
/// scheduler's background task running until the runtime shuts down.
pub struct CronTrigger {
    scheduler: JobScheduler,
    schedule: String,
    timezone: Tz,
}

impl CronTrigger {
    pub async fn attach(
        runner: Arc<SyncJobRunner>,
        schedule: &str,
        timezone: &str,
    ) -> Result<Self, SyncError> {
        let tz = parse_timezone(timezone)?;
        let expr = normalize_cron(schedule)?;

        let job = Job::new_async_tz(expr.as_str(), tz, move |_id, _sched| {
            let runner = Arc::clone(&runner);
            Box::pin(async move {
                run_scheduled(&runner).await;
            })
        })
        .map_err(|e| schedule_error(&expr, e))?;

        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| SyncError::Schedule(format!("create scheduler: {e:?}")))?;
        scheduler
            .add(job)
            .await
            .map_err(|e| SyncError::Schedule(format!("add job: {e:?}")))?;
        scheduler
            .start()
            .await
            .map_err(|e| SyncError::Schedule(format!("start scheduler: {e:?}")))?;

        tracing::info!(schedule = %expr, timezone = %tz, "sync trigger attached");
        Ok(Self {
            scheduler,
            schedule: expr,
            timezone: tz,
        })
    }

    /// Stop firing. A run the trigger already started keeps going.
    pub async fn detach(mut self) {
        if let Err(e) = self.scheduler.shutdown().await {
            tracing::warn!(error = ?e, "sync trigger shutdown failed");
        }
        tracing::info!(schedule = %self.schedule, timezone = %self.timezone, "sync trigger detached");
    }
}

/// Body of one scheduled firing. Overlap with a manual run is logged and skipped.
pub(crate) async fn run_scheduled(runner: &SyncJobRunner) {
    match runner.run_full_sync().await {
        Ok(result) if result.success => {
            tracing::info!(updated = result.updated_count, "scheduled sync completed");
        }
        Ok(result) => {
            tracing::warn!(
                updated = result.updated_count,
                errors = result.errors.len(),
                "scheduled sync completed with errors"
            );
        }
        Err(SyncError::AlreadyRunning) => {
            tracing::warn!("scheduled sync skipped: a sync run is already in progress");
        }
        Err(e) => tracing::error!(error = %e, "scheduled sync failed"),
    }
}
