//! `viewsync cleanup` – delete stats for untracked videos.

use anyhow::Result;

use crate::cli::app::App;

pub async fn run_cleanup(app: &App) -> Result<()> {
    let result = app.service.trigger_cleanup().await?;
    println!("Removed {} stale video stat(s).", result.deleted_count);
    Ok(())
}
