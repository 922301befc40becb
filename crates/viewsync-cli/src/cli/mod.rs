//! CLI for the viewsync view-count synchronizer.

mod app;
mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use viewsync_core::config;

use app::App;
use commands::{
    run_cleanup, run_daemon, run_full_sync, run_health, run_metadata, run_specific_sync,
    run_status, run_track, run_untrack,
};

/// Top-level CLI for viewsync.
#[derive(Debug, Parser)]
#[command(name = "viewsync")]
#[command(about = "viewsync: scheduled, quota-aware video view-count sync", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Attach the scheduled sync trigger and wait for Ctrl-C.
    Run,

    /// Sync every actively tracked video now.
    Sync,

    /// Sync the given video ids now.
    SyncIds {
        /// Video identifiers (duplicates are ignored).
        #[arg(required = true, value_name = "ID")]
        ids: Vec<String>,
    },

    /// Delete stored stats for videos no active link references.
    Cleanup,

    /// Show schedule, quota and stored view counts.
    Status,

    /// Check that the provider API is reachable with the configured key.
    Health,

    /// Fetch full metadata for one video.
    Metadata {
        /// Video identifier.
        id: String,
    },

    /// Track a video under a campaign.
    Track {
        /// Video identifier.
        id: String,

        /// Campaign the link belongs to.
        #[arg(long, default_value = "default")]
        campaign: String,
    },

    /// Deactivate every link to a video.
    Untrack {
        /// Video identifier.
        id: String,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg.sync);
        let app = App::open(cfg).await?;

        match cli.command {
            CliCommand::Run => run_daemon(&app).await?,
            CliCommand::Sync => run_full_sync(&app).await?,
            CliCommand::SyncIds { ids } => run_specific_sync(&app, &ids).await?,
            CliCommand::Cleanup => run_cleanup(&app).await?,
            CliCommand::Status => run_status(&app).await?,
            CliCommand::Health => run_health(&app).await?,
            CliCommand::Metadata { id } => run_metadata(&app, &id).await?,
            CliCommand::Track { id, campaign } => run_track(&app, &campaign, &id).await?,
            CliCommand::Untrack { id } => run_untrack(&app, &id).await?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
