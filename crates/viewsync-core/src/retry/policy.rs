use std::time::Duration;

/// High-level classification of an error for retry purposes.
///
/// Callers map provider errors (HTTP status, curl failures, decode errors)
/// into these kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Operation timed out (connect/read).
    Timeout,
    /// Server asked us to slow down (429).
    Throttled,
    /// Network-level failure (connection reset, DNS, etc.).
    Connection,
    /// Server-side failure (5xx).
    Http5xx(u16),
    /// Any other failure (unexpected 4xx, undecodable body). Still retried.
    Other,
    /// Provider quota is spent for the day. Never retried.
    Quota,
    /// Provider has no such resource. Never retried.
    NotFound,
}

impl ErrorKind {
    /// True for kinds that no amount of waiting within a run will fix.
    pub fn is_fatal(self) -> bool {
        matches!(self, ErrorKind::Quota | ErrorKind::NotFound)
    }
}

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Do not retry this error.
    NoRetry,
    /// Retry after the given delay.
    RetryAfter(Duration),
}

/// Linear backoff policy: the wait after attempt `n` is `base_delay * n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    /// Base delay for backoff.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    /// Decide what to do after attempt `attempt` failed with `kind`.
    ///
    /// `attempt` is 1-based (1 = first attempt).
    pub fn decide(&self, attempt: u32, kind: ErrorKind) -> RetryDecision {
        if kind.is_fatal() || attempt >= self.max_attempts {
            return RetryDecision::NoRetry;
        }
        RetryDecision::RetryAfter(self.base_delay.saturating_mul(attempt))
    }
}
