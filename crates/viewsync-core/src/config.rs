use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::provider::DEFAULT_API_BASE;
use crate::quota::QuotaLimits;
use crate::retry::RetryPolicy;
use crate::runner::BatchConfig;

/// Environment variable that overrides `api_key` from the config file.
pub const API_KEY_ENV: &str = "VIEWSYNC_API_KEY";

/// Scheduled sync options (the `[sync]` table). Can be changed at runtime
/// through `SyncService::update_config`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncOptions {
    /// Whether the calendar trigger is attached.
    pub enabled: bool,
    /// Cron expression, 5-field (minute first) or 6-field (seconds first).
    pub schedule: String,
    /// IANA time zone the schedule is evaluated in.
    pub timezone: String,
    /// Ids per provider call; clamped to the provider cap of 50.
    pub max_videos_per_batch: usize,
    /// Pause between consecutive batches.
    pub batch_delay_millis: u64,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            schedule: "0 2 * * *".to_string(),
            timezone: "UTC".to_string(),
            max_videos_per_batch: 50,
            batch_delay_millis: 1000,
        }
    }
}

impl SyncOptions {
    pub fn batch_config(&self) -> BatchConfig {
        BatchConfig {
            max_per_batch: self.max_videos_per_batch,
            inter_batch_delay: Duration::from_millis(self.batch_delay_millis),
        }
    }
}

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per provider call (including the first).
    pub max_attempts: u32,
    /// Backoff unit; the wait after attempt n is n * base.
    pub base_delay_millis: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_millis: 1000,
        }
    }
}

/// Local rate limiting (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Requests allowed per rolling window.
    pub window_limit: u32,
    /// Rolling window length in seconds.
    pub window_secs: u64,
    /// Requests allowed per day.
    pub daily_limit: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_limit: 100,
            window_secs: 100,
            daily_limit: 10_000,
        }
    }
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Global configuration loaded from `~/.config/viewsync/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewsyncConfig {
    /// SQLite database file; defaults to the XDG state dir.
    #[serde(default)]
    pub database_path: Option<PathBuf>,
    /// Provider API key. `VIEWSYNC_API_KEY` takes precedence.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_api_base")]
    pub api_base_url: String,
    /// Whole-request timeout for provider calls.
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub sync: SyncOptions,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
    /// Optional local rate limits; if missing, built-in defaults are used.
    #[serde(default)]
    pub rate_limit: Option<RateLimitConfig>,
}

impl Default for ViewsyncConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            api_key: None,
            api_base_url: default_api_base(),
            request_timeout_secs: default_timeout_secs(),
            sync: SyncOptions::default(),
            retry: None,
            rate_limit: None,
        }
    }
}

impl ViewsyncConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        let r = self.retry.clone().unwrap_or_default();
        RetryPolicy {
            max_attempts: r.max_attempts.max(1),
            base_delay: Duration::from_millis(r.base_delay_millis),
        }
    }

    pub fn quota_limits(&self) -> QuotaLimits {
        let r = self.rate_limit.clone().unwrap_or_default();
        QuotaLimits {
            window_limit: r.window_limit.max(1),
            window: Duration::from_secs(r.window_secs.max(1)),
            daily_limit: r.daily_limit.max(1),
        }
    }

    pub fn batch_config(&self) -> BatchConfig {
        self.sync.batch_config()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// API key from the environment, else from the file.
    pub fn resolve_api_key(&self) -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.api_key.clone().filter(|k| !k.trim().is_empty()))
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("viewsync")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ViewsyncConfig> {
    load_or_init_at(&config_path()?)
}

/// Same as `load_or_init` for an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<ViewsyncConfig> {
    if !path.exists() {
        let default_cfg = ViewsyncConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path)?;
    let cfg: ViewsyncConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}
