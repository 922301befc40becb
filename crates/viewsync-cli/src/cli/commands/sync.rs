//! `viewsync sync` and `viewsync sync-ids` – manual runs.

use anyhow::Result;
use viewsync_core::runner::JobResult;

use crate::cli::app::App;

pub async fn run_full_sync(app: &App) -> Result<()> {
    app.require_api_key()?;
    let result = app.service.trigger_full_sync().await?;
    print_job_result(&result);
    Ok(())
}

pub async fn run_specific_sync(app: &App, ids: &[String]) -> Result<()> {
    app.require_api_key()?;
    let result = app.service.trigger_specific_sync(ids).await?;
    print_job_result(&result);
    Ok(())
}

fn print_job_result(result: &JobResult) {
    let outcome = if result.success { "ok" } else { "FAILED" };
    println!(
        "Sync {outcome}: {} updated, {} error(s)",
        result.updated_count,
        result.errors.len()
    );
    for err in &result.errors {
        println!("  - {err}");
    }
}
