//! YouTube Data API provider.
//!
//! Uses the curl crate (libcurl) for `videos.list` calls. Each call runs on
//! tokio's blocking pool; status classification and body decoding live in
//! `parse`.

mod parse;

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

use super::{ProviderError, VideoId, VideoMetadata, VideoProvider};

/// Default base URL for the YouTube Data API v3.
pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/youtube/v3";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

/// Provider backed by the real YouTube Data API.
#[derive(Debug, Clone)]
pub struct YouTubeProvider {
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl YouTubeProvider {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            timeout,
        }
    }

    fn videos_url(&self, part: &str, ids: &[VideoId]) -> Result<String, ProviderError> {
        let base = format!("{}/videos", self.base_url.trim_end_matches('/'));
        let mut url = url::Url::parse(&base)
            .map_err(|e| ProviderError::Transport(format!("invalid API base URL {base}: {e}")))?;
        url.query_pairs_mut()
            .append_pair("part", part)
            .append_pair("id", &ids.join(","))
            .append_pair("key", &self.api_key);
        Ok(url.into())
    }

    /// GET `url` on the blocking pool and return the body of a 2xx response.
    async fn get(&self, url: String) -> Result<Vec<u8>, ProviderError> {
        let timeout = self.timeout;
        let (status, body) = tokio::task::spawn_blocking(move || get_blocking(&url, timeout))
            .await
            .map_err(|e| ProviderError::Transport(format!("request task: {e}")))??;
        parse::check_status(status, &body)?;
        Ok(body)
    }
}

/// Performs one GET request and returns the status code and body.
/// Runs in the current thread; call from `spawn_blocking` if used from async code.
fn get_blocking(url: &str, timeout: Duration) -> Result<(u32, Vec<u8>), ProviderError> {
    let mut body = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.get(true)?;
    easy.follow_location(true)?;
    easy.connect_timeout(CONNECT_TIMEOUT.min(timeout))?;
    easy.timeout(timeout)?;
    easy.useragent(concat!("viewsync/", env!("CARGO_PKG_VERSION")))?;

    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()?;
    }

    let code = easy.response_code()?;
    Ok((code, body))
}

#[async_trait]
impl VideoProvider for YouTubeProvider {
    async fn bulk_fetch(&self, ids: &[VideoId]) -> Result<HashMap<VideoId, u64>, ProviderError> {
        let url = self.videos_url("statistics", ids)?;
        let body = self.get(url).await?;
        parse::parse_view_counts(&body)
    }

    async fn fetch_one(&self, id: &str) -> Result<VideoMetadata, ProviderError> {
        let url = self.videos_url("snippet,statistics", &[id.to_string()])?;
        let body = self.get(url).await?;
        parse::parse_metadata(id, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn videos_url_joins_ids_and_encodes_key() {
        let p = YouTubeProvider::new("k y", "https://api.example.com/v3/", Duration::from_secs(5));
        let url = p
            .videos_url("statistics", &["abc".to_string(), "d-_e".to_string()])
            .unwrap();
        assert!(url.starts_with("https://api.example.com/v3/videos?"));
        assert!(url.contains("part=statistics"));
        assert!(url.contains("id=abc%2Cd-_e"));
        assert!(url.contains("key=k+y"));
    }

    #[test]
    fn videos_url_rejects_bad_base() {
        let p = YouTubeProvider::new("k", "not a url", Duration::from_secs(5));
        let err = p.videos_url("statistics", &["a".to_string()]).unwrap_err();
        assert!(matches!(err, ProviderError::Transport(_)));
    }
}
