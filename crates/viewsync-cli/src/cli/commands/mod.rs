//! CLI command handlers, one file per concern.

mod cleanup;
mod health;
mod links;
mod run;
mod status;
mod sync;

pub use cleanup::run_cleanup;
pub use health::{run_health, run_metadata};
pub use links::{run_track, run_untrack};
pub use run::run_daemon;
pub use status::run_status;
#[cfg(test)]
pub(crate) use status::status_lines;
pub use sync::{run_full_sync, run_specific_sync};
