//! Persistence sink for synchronized view counts.
//!
//! `PersistenceSink` is the contract the sync runner depends on.
//! `SqliteStore` implements it over SQLite (sqlx); `MemorySink` is an
//! in-memory implementation with injectable failures.

mod db;
mod links;
mod memory;
mod types;

use anyhow::Result;
use async_trait::async_trait;

use crate::provider::VideoId;

pub use db::SqliteStore;
pub use memory::MemorySink;
pub use types::{LinkId, VideoStat};

#[async_trait]
pub trait PersistenceSink: Send + Sync {
    /// Distinct video ids referenced by active campaign links.
    async fn find_active_ids(&self) -> Result<Vec<VideoId>>;

    /// Store the latest count for `id`. Idempotent: one row per id.
    async fn upsert(&self, id: &str, view_count: u64) -> Result<VideoStat>;

    /// Delete stored stats no active link references. Returns rows removed.
    async fn delete_unused(&self) -> Result<u64>;
}
