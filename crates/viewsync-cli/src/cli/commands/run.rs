//! `viewsync run` – attach the scheduled trigger and wait for Ctrl-C.

use anyhow::{Context, Result};

use crate::cli::app::App;

pub async fn run_daemon(app: &App) -> Result<()> {
    app.require_api_key()?;
    let options = app.service.options().await;
    if !options.enabled {
        println!("Scheduled sync is disabled in config ([sync] enabled = false).");
        return Ok(());
    }

    app.service.start().await?;
    println!(
        "Scheduled sync attached: \"{}\" ({}). Press Ctrl-C to stop.",
        options.schedule, options.timezone
    );

    tokio::signal::ctrl_c().await.context("wait for Ctrl-C")?;

    app.service.stop().await;
    if app.service.get_status().await.running {
        println!("Waiting for the current sync run to finish...");
        while app.service.get_status().await.running {
            tokio::time::sleep(std::time::Duration::from_millis(200)).await;
        }
    }
    println!("Stopped.");
    Ok(())
}
