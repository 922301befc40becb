//! Provider error type, kept separate so the retry classifier can inspect it
//! before it is converted into a client error.

use thiserror::Error;

/// Error returned by a single provider call.
///
/// Payloads are plain strings so a fake provider can replay the same failure
/// several times.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// Provider refused the call because the daily quota is spent (HTTP 403).
    #[error("quota exceeded, retry after {retry_after_secs}s")]
    QuotaExceeded { retry_after_secs: u64 },
    /// Provider returned an empty result set for the requested id.
    #[error("video not found: {0}")]
    NotFound(String),
    /// Non-2xx response other than quota exhaustion.
    #[error("HTTP {status}: {message}")]
    Http { status: u32, message: String },
    /// Connect or read timed out.
    #[error("timeout: {0}")]
    Timeout(String),
    /// Connection-level failure (DNS, reset, TLS).
    #[error("transport: {0}")]
    Transport(String),
    /// Response body could not be decoded.
    #[error("invalid response: {0}")]
    Decode(String),
}

impl From<curl::Error> for ProviderError {
    fn from(e: curl::Error) -> Self {
        if e.is_operation_timedout() {
            ProviderError::Timeout(e.to_string())
        } else {
            ProviderError::Transport(e.to_string())
        }
    }
}
