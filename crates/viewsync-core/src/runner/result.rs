//! Run outcome aggregation.

use serde::Serialize;

/// Outcome of one sync run. Partial success is reported, not hidden.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobResult {
    pub success: bool,
    pub updated_count: usize,
    pub errors: Vec<String>,
}

impl JobResult {
    /// Trivial success for an empty working set.
    pub fn empty() -> Self {
        Self {
            success: true,
            updated_count: 0,
            errors: Vec::new(),
        }
    }
}

/// Result of a cleanup pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CleanupResult {
    pub deleted_count: u64,
}

/// How `success` is computed from the error list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuccessPolicy {
    /// Fewer errors than half the requested ids (scheduled/full sync).
    Majority,
    /// No errors at all (explicit id lists).
    Strict,
}

/// Running totals while batches are processed.
#[derive(Debug, Default)]
pub(crate) struct RunTally {
    pub(crate) requested: usize,
    pub(crate) updated: usize,
    pub(crate) errors: Vec<String>,
}

impl RunTally {
    pub(crate) fn new(requested: usize) -> Self {
        Self {
            requested,
            ..Self::default()
        }
    }

    pub(crate) fn error(&mut self, msg: String) {
        tracing::warn!(error = %msg, "sync error recorded");
        self.errors.push(msg);
    }

    pub(crate) fn finish(self, policy: SuccessPolicy) -> JobResult {
        let success = match policy {
            // errors < requested / 2 without rounding
            SuccessPolicy::Majority => self.errors.len() * 2 < self.requested,
            SuccessPolicy::Strict => self.errors.is_empty(),
        };
        JobResult {
            success,
            updated_count: self.updated,
            errors: self.errors,
        }
    }

    /// Abort path: keep what succeeded, add one critical entry.
    pub(crate) fn critical(mut self, err: &anyhow::Error) -> JobResult {
        self.errors.push(format!("Critical error: {err:#}"));
        JobResult {
            success: false,
            updated_count: self.updated,
            errors: self.errors,
        }
    }
}
