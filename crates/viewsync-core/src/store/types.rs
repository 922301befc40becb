//! Types used by the persistence layer.

use serde::Serialize;

use crate::provider::VideoId;

/// Campaign link row identifier.
pub type LinkId = i64;

/// Stored view count for one video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoStat {
    pub video_id: VideoId,
    pub view_count: u64,
    /// Unix seconds of the last upsert.
    pub updated_at: i64,
}
