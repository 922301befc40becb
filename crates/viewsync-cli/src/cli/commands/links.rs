//! `viewsync track` / `viewsync untrack` – manage campaign links.

use anyhow::Result;

use crate::cli::app::App;

pub async fn run_track(app: &App, campaign: &str, id: &str) -> Result<()> {
    let link = app.store.track_link(campaign, id).await?;
    println!("Tracking {id} in campaign {campaign} (link {link})");
    Ok(())
}

pub async fn run_untrack(app: &App, id: &str) -> Result<()> {
    let changed = app.store.set_video_active(id, false).await?;
    if changed == 0 {
        println!("No active links for {id}.");
    } else {
        println!("Deactivated {changed} link(s) for {id}.");
    }
    Ok(())
}
