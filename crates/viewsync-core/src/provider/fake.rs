//! In-memory provider for tests and dry runs.
//!
//! Serves canned view counts and metadata, records every call, and can be
//! scripted to fail: queued failures are consumed one per call, a sticky
//! failure applies to every call until cleared.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use super::{ProviderError, VideoId, VideoMetadata, VideoProvider};

/// A call observed by `FakeProvider`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FakeCall {
    Bulk(Vec<VideoId>),
    One(VideoId),
}

#[derive(Default)]
struct FakeState {
    view_counts: HashMap<VideoId, u64>,
    metadata: HashMap<VideoId, VideoMetadata>,
    queued_failures: VecDeque<ProviderError>,
    sticky_failure: Option<ProviderError>,
    calls: Vec<FakeCall>,
}

impl FakeState {
    fn next_failure(&mut self) -> Option<ProviderError> {
        self.queued_failures
            .pop_front()
            .or_else(|| self.sticky_failure.clone())
    }
}

#[derive(Default)]
pub struct FakeProvider {
    state: Mutex<FakeState>,
    latency: Duration,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Every call sleeps for `latency` before answering (a suspension point).
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn set_view_count(&self, id: impl Into<VideoId>, count: u64) {
        self.lock().view_counts.insert(id.into(), count);
    }

    pub fn set_metadata(&self, id: impl Into<VideoId>, meta: VideoMetadata) {
        self.lock().metadata.insert(id.into(), meta);
    }

    /// Fail the next call with `err`. Multiple pushes fail successive calls.
    pub fn push_failure(&self, err: ProviderError) {
        self.lock().queued_failures.push_back(err);
    }

    /// Fail every call with `err` until `clear_failures` is called.
    pub fn fail_always(&self, err: ProviderError) {
        self.lock().sticky_failure = Some(err);
    }

    pub fn clear_failures(&self) {
        let mut state = self.lock();
        state.queued_failures.clear();
        state.sticky_failure = None;
    }

    pub fn calls(&self) -> Vec<FakeCall> {
        self.lock().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.lock().calls.len()
    }

    /// Sizes of the bulk calls made so far, in call order.
    pub fn bulk_call_sizes(&self) -> Vec<usize> {
        self.lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                FakeCall::Bulk(ids) => Some(ids.len()),
                FakeCall::One(_) => None,
            })
            .collect()
    }

    async fn pause(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[async_trait]
impl VideoProvider for FakeProvider {
    async fn bulk_fetch(&self, ids: &[VideoId]) -> Result<HashMap<VideoId, u64>, ProviderError> {
        let failure = {
            let mut state = self.lock();
            state.calls.push(FakeCall::Bulk(ids.to_vec()));
            state.next_failure()
        };
        self.pause().await;
        if let Some(err) = failure {
            return Err(err);
        }

        let state = self.lock();
        Ok(ids
            .iter()
            .filter_map(|id| state.view_counts.get(id).map(|n| (id.clone(), *n)))
            .collect())
    }

    async fn fetch_one(&self, id: &str) -> Result<VideoMetadata, ProviderError> {
        let failure = {
            let mut state = self.lock();
            state.calls.push(FakeCall::One(id.to_string()));
            state.next_failure()
        };
        self.pause().await;
        if let Some(err) = failure {
            return Err(err);
        }

        self.lock()
            .metadata
            .get(id)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn bulk_returns_only_known_ids() {
        let fake = FakeProvider::new();
        fake.set_view_count("a", 10);
        fake.set_view_count("b", 0);
        let ids = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let got = fake.bulk_fetch(&ids).await.unwrap();
        assert_eq!(got.len(), 2);
        assert_eq!(got["b"], 0);
        assert!(!got.contains_key("c"));
        assert_eq!(fake.calls(), vec![FakeCall::Bulk(ids)]);
    }

    #[tokio::test]
    async fn queued_failures_then_sticky() {
        let fake = FakeProvider::new();
        fake.set_view_count("a", 1);
        fake.push_failure(ProviderError::Timeout("slow".into()));
        let ids = vec!["a".to_string()];
        assert!(fake.bulk_fetch(&ids).await.is_err());
        assert!(fake.bulk_fetch(&ids).await.is_ok());

        fake.fail_always(ProviderError::Transport("down".into()));
        assert!(fake.bulk_fetch(&ids).await.is_err());
        assert!(fake.bulk_fetch(&ids).await.is_err());
        fake.clear_failures();
        assert!(fake.bulk_fetch(&ids).await.is_ok());
        assert_eq!(fake.bulk_call_sizes(), vec![1, 1, 1, 1, 1]);
    }

    #[tokio::test]
    async fn fetch_one_unknown_is_not_found() {
        let fake = FakeProvider::new();
        assert_eq!(
            fake.fetch_one("zzz").await,
            Err(ProviderError::NotFound("zzz".to_string()))
        );
    }
}
