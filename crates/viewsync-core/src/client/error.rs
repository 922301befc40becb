use std::time::Duration;
use thiserror::Error;

use crate::provider::ProviderError;
use crate::quota::{QuotaDenial, QuotaLimits};

/// Error surfaced by `RateLimitedClient`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Local rolling window is full; no request was sent.
    #[error("rate limited: {limit} requests per {window_secs}s already used")]
    RateLimited { limit: u32, window_secs: u64 },
    /// Daily quota is spent. Never retried.
    #[error("API quota exceeded, retry after {retry_after_secs}s")]
    QuotaExceeded { retry_after_secs: u64 },
    #[error("video not found: {0}")]
    NotFound(String),
    /// Caller passed more ids than one provider call accepts.
    #[error("batch of {len} ids exceeds provider limit of {max}")]
    BatchTooLarge { len: usize, max: usize },
    /// Last provider error after retries were exhausted.
    #[error(transparent)]
    Provider(ProviderError),
}

impl From<ProviderError> for ClientError {
    fn from(e: ProviderError) -> Self {
        match e {
            ProviderError::QuotaExceeded { retry_after_secs } => {
                ClientError::QuotaExceeded { retry_after_secs }
            }
            ProviderError::NotFound(id) => ClientError::NotFound(id),
            other => ClientError::Provider(other),
        }
    }
}

impl ClientError {
    pub(crate) fn from_denial(denial: QuotaDenial, limits: &QuotaLimits) -> Self {
        match denial {
            QuotaDenial::RateLimited => ClientError::RateLimited {
                limit: limits.window_limit,
                window_secs: limits.window.as_secs(),
            },
            QuotaDenial::QuotaExhausted { retry_after } => ClientError::QuotaExceeded {
                retry_after_secs: round_up_secs(retry_after),
            },
        }
    }
}

fn round_up_secs(d: Duration) -> u64 {
    d.as_secs() + u64::from(d.subsec_nanos() > 0)
}
