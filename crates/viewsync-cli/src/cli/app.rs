//! Composition root: builds the provider, client, store, runner and
//! schedule service from config. Everything is passed explicitly.

use anyhow::{bail, Result};
use std::sync::Arc;
use viewsync_core::client::RateLimitedClient;
use viewsync_core::config::{ViewsyncConfig, API_KEY_ENV};
use viewsync_core::provider::{VideoProvider, YouTubeProvider};
use viewsync_core::runner::SyncJobRunner;
use viewsync_core::service::SyncService;
use viewsync_core::store::{PersistenceSink, SqliteStore};

pub struct App {
    pub store: Arc<SqliteStore>,
    pub service: SyncService,
    has_api_key: bool,
}

impl App {
    pub async fn open(cfg: ViewsyncConfig) -> Result<Self> {
        let store = match &cfg.database_path {
            Some(path) => SqliteStore::open_at(path).await?,
            None => SqliteStore::open_default().await?,
        };
        let store = Arc::new(store);

        let api_key = cfg.resolve_api_key();
        let has_api_key = api_key.is_some();
        let provider: Arc<dyn VideoProvider> = Arc::new(YouTubeProvider::new(
            api_key.unwrap_or_default(),
            cfg.api_base_url.clone(),
            cfg.request_timeout(),
        ));
        let client = Arc::new(RateLimitedClient::new(
            provider,
            cfg.quota_limits(),
            cfg.retry_policy(),
        ));
        let sink: Arc<dyn PersistenceSink> = store.clone();
        let runner = Arc::new(SyncJobRunner::new(client, sink, cfg.batch_config()));
        let service = SyncService::new(runner, cfg.sync.clone());

        Ok(Self {
            store,
            service,
            has_api_key,
        })
    }

    /// Fail early for commands that talk to the provider.
    pub fn require_api_key(&self) -> Result<()> {
        if !self.has_api_key {
            bail!("no API key configured: set {API_KEY_ENV} or api_key in config.toml");
        }
        Ok(())
    }

    pub fn client(&self) -> &RateLimitedClient {
        self.service.runner().client()
    }
}
