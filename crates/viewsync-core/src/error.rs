//! Errors returned by the sync entry points.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// Another run holds the run guard. The only error that stops a run from starting.
    #[error("a sync run is already in progress")]
    AlreadyRunning,
    /// Persistence pass-through (cleanup) failed.
    #[error("store: {0}")]
    Store(String),
    /// Schedule trigger could not be built or attached.
    #[error("schedule: {0}")]
    Schedule(String),
}
