//! `viewsync health` and `viewsync metadata <id>` – single provider calls.

use anyhow::{bail, Result};

use crate::cli::app::App;

pub async fn run_health(app: &App) -> Result<()> {
    app.require_api_key()?;
    if app.client().health_check().await {
        println!("Provider API: healthy");
        Ok(())
    } else {
        bail!("provider API health check failed (see log for details)")
    }
}

pub async fn run_metadata(app: &App, id: &str) -> Result<()> {
    app.require_api_key()?;
    let meta = app.client().fetch_metadata(id).await?;
    println!("Title:     {}", meta.title);
    println!("Channel:   {}", meta.channel_title);
    println!("Published: {}", meta.published_at);
    println!("Views:     {}", meta.view_count);
    println!("Thumbnail: {}", meta.thumbnail_url.as_deref().unwrap_or("-"));
    Ok(())
}
