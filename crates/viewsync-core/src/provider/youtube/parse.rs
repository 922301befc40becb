//! Decode `videos.list` responses and classify HTTP status codes.

use serde::Deserialize;
use std::collections::HashMap;

use crate::provider::{ProviderError, VideoId, VideoMetadata, QUOTA_RETRY_AFTER_SECS};

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    id: String,
    #[serde(default)]
    snippet: Option<Snippet>,
    #[serde(default)]
    statistics: Option<Statistics>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    #[serde(default)]
    title: String,
    #[serde(default)]
    channel_title: String,
    #[serde(default)]
    published_at: String,
    #[serde(default)]
    thumbnails: Thumbnails,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnails {
    high: Option<Thumbnail>,
    medium: Option<Thumbnail>,
    #[serde(rename = "default")]
    fallback: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Statistics {
    view_count: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// Map a response status to an error. 403 is the provider's quota signal.
pub(crate) fn check_status(status: u32, body: &[u8]) -> Result<(), ProviderError> {
    match status {
        200..=299 => Ok(()),
        403 => Err(ProviderError::QuotaExceeded {
            retry_after_secs: QUOTA_RETRY_AFTER_SECS,
        }),
        _ => Err(ProviderError::Http {
            status,
            message: error_message(body),
        }),
    }
}

fn error_message(body: &[u8]) -> String {
    match serde_json::from_slice::<ErrorResponse>(body) {
        Ok(r) if !r.error.message.is_empty() => r.error.message,
        _ => String::from_utf8_lossy(body).chars().take(200).collect(),
    }
}

fn decode(body: &[u8]) -> Result<VideoListResponse, ProviderError> {
    serde_json::from_slice(body).map_err(|e| ProviderError::Decode(e.to_string()))
}

/// Extract id -> view count. Items without a parseable count are left out so
/// the caller sees them as "not returned".
pub(crate) fn parse_view_counts(body: &[u8]) -> Result<HashMap<VideoId, u64>, ProviderError> {
    let resp = decode(body)?;
    let mut out = HashMap::with_capacity(resp.items.len());
    for item in resp.items {
        let Some(raw) = item.statistics.and_then(|s| s.view_count) else {
            continue;
        };
        match raw.parse::<u64>() {
            Ok(n) => {
                out.insert(item.id, n);
            }
            Err(_) => tracing::warn!(video_id = %item.id, raw = %raw, "unparseable viewCount"),
        }
    }
    Ok(out)
}

pub(crate) fn parse_metadata(id: &str, body: &[u8]) -> Result<VideoMetadata, ProviderError> {
    let resp = decode(body)?;
    let item = resp
        .items
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::NotFound(id.to_string()))?;

    let view_count = item
        .statistics
        .and_then(|s| s.view_count)
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);
    let snippet = item
        .snippet
        .ok_or_else(|| ProviderError::Decode(format!("missing snippet for {}", item.id)))?;
    let thumbs = snippet.thumbnails;
    let thumbnail_url = thumbs
        .high
        .or(thumbs.medium)
        .or(thumbs.fallback)
        .map(|t| t.url);

    Ok(VideoMetadata {
        title: snippet.title,
        thumbnail_url,
        view_count,
        channel_title: snippet.channel_title,
        published_at: snippet.published_at,
    })
}
