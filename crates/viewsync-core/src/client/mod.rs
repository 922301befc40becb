//! Rate-limited, retrying wrapper around a `VideoProvider`.
//!
//! Every attempt first takes a slot from the shared `QuotaTracker` (failing
//! fast with `RateLimited` when the window is full), then calls the provider.
//! Failures are classified by the `retry` module: quota exhaustion and
//! not-found short-circuit, everything else is retried with linear backoff.

mod error;

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::provider::{
    ProviderError, VideoId, VideoMetadata, VideoProvider, MAX_IDS_PER_CALL, QUOTA_RETRY_AFTER_SECS,
};
use crate::quota::{QuotaLimits, QuotaSnapshot, QuotaTracker};
use crate::retry::{self, ErrorKind, RetryDecision, RetryPolicy};

pub use error::ClientError;

/// Well-known public video used by `health_check`.
pub const HEALTH_CHECK_VIDEO_ID: &str = "dQw4w9WgXcQ";

pub struct RateLimitedClient {
    provider: Arc<dyn VideoProvider>,
    quota: QuotaTracker,
    policy: RetryPolicy,
    health_check_id: String,
}

impl RateLimitedClient {
    pub fn new(provider: Arc<dyn VideoProvider>, limits: QuotaLimits, policy: RetryPolicy) -> Self {
        Self {
            provider,
            quota: QuotaTracker::new(limits),
            policy,
            health_check_id: HEALTH_CHECK_VIDEO_ID.to_string(),
        }
    }

    /// Probe a different known-good id in `health_check`.
    pub fn with_health_check_id(mut self, id: impl Into<String>) -> Self {
        self.health_check_id = id.into();
        self
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.policy
    }

    pub fn quota_status(&self) -> QuotaSnapshot {
        self.quota.snapshot()
    }

    /// View counts for `ids` using the client's retry policy.
    ///
    /// Only ids the provider reported are present in the result.
    pub async fn bulk_fetch_view_counts(
        &self,
        ids: &[VideoId],
    ) -> Result<HashMap<VideoId, u64>, ClientError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        if ids.len() > MAX_IDS_PER_CALL {
            return Err(ClientError::BatchTooLarge {
                len: ids.len(),
                max: MAX_IDS_PER_CALL,
            });
        }
        self.call("bulk_fetch", &self.policy, || self.provider.bulk_fetch(ids)).await
    }

    pub async fn fetch_metadata(&self, id: &str) -> Result<VideoMetadata, ClientError> {
        self.call("fetch_one", &self.policy, || self.provider.fetch_one(id)).await
    }

    /// One lightweight call against a known-good id. Errors are logged, not returned.
    pub async fn health_check(&self) -> bool {
        let single = RetryPolicy {
            max_attempts: 1,
            ..self.policy
        };
        let id = self.health_check_id.as_str();
        match self
            .call("health_check", &single, || self.provider.fetch_one(id))
            .await
        {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(error = %e, "provider health check failed");
                false
            }
        }
    }

    async fn call<T, F, Fut>(
        &self,
        op: &'static str,
        policy: &RetryPolicy,
        mut f: F,
    ) -> Result<T, ClientError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ProviderError>>,
    {
        let mut attempt = 1u32;
        loop {
            self.quota
                .try_acquire()
                .map_err(|denial| ClientError::from_denial(denial, &self.quota.limits()))?;

            let err = match f().await {
                Ok(v) => return Ok(v),
                Err(e) => e,
            };

            let kind = retry::classify(&err);
            if kind == ErrorKind::Quota {
                let retry_after_secs = match err {
                    ProviderError::QuotaExceeded { retry_after_secs } => retry_after_secs,
                    _ => QUOTA_RETRY_AFTER_SECS,
                };
                self.quota.mark_exhausted(Duration::from_secs(retry_after_secs));
                tracing::error!(op, attempt, error = %err, "provider quota exhausted");
                return Err(ClientError::QuotaExceeded { retry_after_secs });
            }

            match policy.decide(attempt, kind) {
                RetryDecision::NoRetry => return Err(err.into()),
                RetryDecision::RetryAfter(delay) => {
                    tracing::warn!(
                        op,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "provider call failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
