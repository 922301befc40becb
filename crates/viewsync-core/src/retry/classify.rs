//! Classify provider errors into retry policy error kinds.

use crate::provider::ProviderError;
use crate::retry::policy::ErrorKind;

/// Classify an HTTP status code for retry decisions.
pub fn classify_http_status(code: u32) -> ErrorKind {
    match code {
        403 => ErrorKind::Quota,
        429 => ErrorKind::Throttled,
        500..=599 => ErrorKind::Http5xx(code as u16),
        _ => ErrorKind::Other,
    }
}

/// Classify a provider error into an ErrorKind.
pub fn classify(e: &ProviderError) -> ErrorKind {
    match e {
        ProviderError::QuotaExceeded { .. } => ErrorKind::Quota,
        ProviderError::NotFound(_) => ErrorKind::NotFound,
        ProviderError::Http { status, .. } => classify_http_status(*status),
        ProviderError::Timeout(_) => ErrorKind::Timeout,
        ProviderError::Transport(_) => ErrorKind::Connection,
        ProviderError::Decode(_) => ErrorKind::Other,
    }
}
