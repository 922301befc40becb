//! Retry and backoff policy.
//!
//! This module encapsulates error classification (timeouts, throttling,
//! connection failures, quota exhaustion) and linear backoff decisions so
//! that the rate-limited client applies one consistent policy to every
//! provider call.

mod classify;
mod policy;

pub use classify::{classify, classify_http_status};
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
