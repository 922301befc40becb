//! End-to-end: fake provider -> client -> runner -> on-disk SQLite store.

use std::sync::Arc;
use std::time::Duration;

use viewsync_core::client::RateLimitedClient;
use viewsync_core::config::SyncOptions;
use viewsync_core::provider::{FakeProvider, ProviderError, VideoProvider};
use viewsync_core::quota::QuotaLimits;
use viewsync_core::retry::RetryPolicy;
use viewsync_core::runner::{BatchConfig, SyncJobRunner};
use viewsync_core::service::SyncService;
use viewsync_core::store::{PersistenceSink, SqliteStore};

struct Pipeline {
    _dir: tempfile::TempDir,
    fake: Arc<FakeProvider>,
    store: Arc<SqliteStore>,
    service: SyncService,
}

async fn pipeline(max_per_batch: usize) -> Pipeline {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(
        SqliteStore::open_at(dir.path().join("viewsync.db"))
            .await
            .unwrap(),
    );
    let fake = Arc::new(FakeProvider::new());

    let provider: Arc<dyn VideoProvider> = fake.clone();
    let retry = RetryPolicy {
        max_attempts: 2,
        base_delay: Duration::from_millis(1),
    };
    let client = Arc::new(RateLimitedClient::new(provider, QuotaLimits::default(), retry));
    let sink: Arc<dyn PersistenceSink> = store.clone();
    let runner = Arc::new(SyncJobRunner::new(client, sink, BatchConfig::default()));
    let options = SyncOptions {
        enabled: false,
        max_videos_per_batch: max_per_batch,
        batch_delay_millis: 0,
        ..SyncOptions::default()
    };
    let service = SyncService::new(runner, options);

    Pipeline {
        _dir: dir,
        fake,
        store,
        service,
    }
}

#[tokio::test]
async fn full_sync_writes_every_active_video() {
    let p = pipeline(2).await;
    for (id, views) in [("a", 10), ("b", 20), ("c", 30)] {
        p.store.track_link("spring", id).await.unwrap();
        p.fake.set_view_count(id, views);
    }
    // a second campaign linking the same video must not duplicate work
    p.store.track_link("summer", "a").await.unwrap();

    let result = p.service.trigger_full_sync().await.unwrap();
    assert!(result.success);
    assert_eq!(result.updated_count, 3);
    assert_eq!(p.fake.bulk_call_sizes(), vec![2, 1]);

    let stats = p.store.list_stats().await.unwrap();
    let counts: Vec<(String, u64)> = stats
        .into_iter()
        .map(|s| (s.video_id, s.view_count))
        .collect();
    assert_eq!(
        counts,
        vec![
            ("a".to_string(), 10),
            ("b".to_string(), 20),
            ("c".to_string(), 30)
        ]
    );
}

#[tokio::test]
async fn resync_overwrites_and_keeps_failed_ids() {
    let p = pipeline(50).await;
    p.store.track_link("c1", "a").await.unwrap();
    p.store.track_link("c1", "b").await.unwrap();
    p.fake.set_view_count("a", 1);
    p.fake.set_view_count("b", 2);
    assert!(p.service.trigger_full_sync().await.unwrap().success);

    // every attempt of the second run fails; stored counts survive
    p.fake.fail_always(ProviderError::Transport("connection refused".into()));
    let calls_before = p.fake.call_count();
    let started = std::time::Instant::now();
    let failed = p.service.trigger_full_sync().await.unwrap();
    assert!(!failed.success);
    assert_eq!(failed.updated_count, 0);
    assert_eq!(failed.errors.len(), 1);
    // the client's two-attempt, 1ms policy governs batch fetches
    assert_eq!(p.fake.call_count() - calls_before, 2);
    assert!(started.elapsed() < Duration::from_millis(500));
    assert_eq!(p.store.get_stat("a").await.unwrap().unwrap().view_count, 1);

    p.fake.clear_failures();
    p.fake.set_view_count("a", 100);
    let result = p
        .service
        .trigger_specific_sync(&["a".to_string()])
        .await
        .unwrap();
    assert!(result.success);
    assert_eq!(p.store.get_stat("a").await.unwrap().unwrap().view_count, 100);
    assert_eq!(p.store.get_stat("b").await.unwrap().unwrap().view_count, 2);
}

#[tokio::test]
async fn cleanup_removes_untracked_stats() {
    let p = pipeline(50).await;
    p.store.track_link("c1", "keep").await.unwrap();
    p.store.track_link("c1", "drop").await.unwrap();
    p.fake.set_view_count("keep", 5);
    p.fake.set_view_count("drop", 6);
    assert!(p.service.trigger_full_sync().await.unwrap().success);

    assert_eq!(p.store.set_video_active("drop", false).await.unwrap(), 1);
    let cleaned = p.service.trigger_cleanup().await.unwrap();
    assert_eq!(cleaned.deleted_count, 1);

    assert!(p.store.get_stat("drop").await.unwrap().is_none());
    assert!(p.store.get_stat("keep").await.unwrap().is_some());

    // the next full sync only asks for the still-active video
    p.fake.set_view_count("keep", 7);
    let result = p.service.trigger_full_sync().await.unwrap();
    assert_eq!(result.updated_count, 1);
    assert_eq!(p.fake.bulk_call_sizes().last(), Some(&1));
}

#[tokio::test]
async fn status_counts_quota_across_runs() {
    let p = pipeline(1).await;
    for id in ["a", "b", "c"] {
        p.store.track_link("c1", id).await.unwrap();
        p.fake.set_view_count(id, 1);
    }
    p.service.trigger_full_sync().await.unwrap();

    let status = p.service.get_status().await;
    assert!(!status.running);
    assert!(!status.attached);
    assert_eq!(status.quota.window_count, 3);
    assert_eq!(status.quota.daily_used, 3);
}
