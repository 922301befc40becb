//! External video-data provider.
//!
//! `VideoProvider` is the seam between the sync engine and the third-party
//! API. `YouTubeProvider` talks to the real service over libcurl;
//! `FakeProvider` is an in-memory stand-in with scripted failures.

mod error;
mod fake;
mod youtube;

use async_trait::async_trait;
use std::collections::HashMap;

pub use error::ProviderError;
pub use fake::{FakeCall, FakeProvider};
pub use youtube::{YouTubeProvider, DEFAULT_API_BASE};

/// Opaque provider-side video identifier. Format validation is the caller's job.
pub type VideoId = String;

/// Hard cap on identifiers per bulk call imposed by the provider.
pub const MAX_IDS_PER_CALL: usize = 50;

/// Retry-after attached to `QuotaExceeded`: the provider quota resets daily.
pub const QUOTA_RETRY_AFTER_SECS: u64 = 86_400;

/// Descriptive record for a single video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoMetadata {
    pub title: String,
    pub thumbnail_url: Option<String>,
    pub view_count: u64,
    pub channel_title: String,
    /// RFC 3339 timestamp as reported by the provider.
    pub published_at: String,
}

/// One raw call against the provider. Implementations perform exactly one
/// network attempt per invocation; retries and rate limiting live in
/// `RateLimitedClient`.
#[async_trait]
pub trait VideoProvider: Send + Sync {
    /// View counts for up to `MAX_IDS_PER_CALL` ids. Ids the provider did not
    /// report are absent from the map (not zero).
    async fn bulk_fetch(&self, ids: &[VideoId]) -> Result<HashMap<VideoId, u64>, ProviderError>;

    /// Metadata for one id; `ProviderError::NotFound` when the result set is empty.
    async fn fetch_one(&self, id: &str) -> Result<VideoMetadata, ProviderError>;
}
