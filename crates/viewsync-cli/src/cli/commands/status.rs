//! `viewsync status` – schedule, run state, quota and stored view counts.

use anyhow::Result;
use viewsync_core::service::SyncStatus;

use crate::cli::app::App;

pub async fn run_status(app: &App) -> Result<()> {
    let status = app.service.get_status().await;
    for line in status_lines(&status) {
        println!("{line}");
    }

    let stats = app.store.list_stats().await?;
    if stats.is_empty() {
        println!("No video stats stored.");
    } else {
        println!("{:<16} {:>14} {}", "VIDEO", "VIEWS", "UPDATED");
        for s in stats {
            println!("{:<16} {:>14} {}", s.video_id, s.view_count, s.updated_at);
        }
    }
    Ok(())
}

pub(crate) fn status_lines(status: &SyncStatus) -> Vec<String> {
    let yes_no = |b: bool| if b { "yes" } else { "no" };
    let mut lines = vec![
        format!(
            "Schedule:  {} \"{}\" ({})",
            if status.enabled { "enabled" } else { "disabled" },
            status.schedule,
            status.timezone
        ),
        format!("Attached:  {}", yes_no(status.attached)),
        format!("Running:   {}", yes_no(status.running)),
        format!(
            "Quota:     {}/{} per {}s, {}/{} today",
            status.quota.window_count,
            status.quota.window_limit,
            status.quota.window_secs,
            status.quota.daily_used,
            status.quota.daily_limit
        ),
    ];
    if let Some(secs) = status.quota.exhausted_for_secs {
        lines.push(format!("Exhausted: provider quota, retry in {secs}s"));
    }
    lines
}
