//! Tests for the status report lines.

use crate::cli::commands::status_lines;
use viewsync_core::quota::QuotaSnapshot;
use viewsync_core::service::SyncStatus;

fn status(running: bool, attached: bool) -> SyncStatus {
    SyncStatus {
        enabled: true,
        running,
        attached,
        schedule: "0 2 * * *".to_string(),
        timezone: "UTC".to_string(),
        quota: QuotaSnapshot {
            window_count: 3,
            window_limit: 100,
            window_secs: 100,
            daily_used: 12,
            daily_limit: 10_000,
            exhausted_for_secs: None,
        },
    }
}

#[test]
fn status_shows_run_state_and_trigger() {
    let lines = status_lines(&status(true, false));
    assert!(lines.contains(&"Running:   yes".to_string()));
    assert!(lines.contains(&"Attached:  no".to_string()));
    assert_eq!(lines[0], "Schedule:  enabled \"0 2 * * *\" (UTC)");
    assert!(lines.contains(&"Quota:     3/100 per 100s, 12/10000 today".to_string()));
}

#[test]
fn status_idle_attached() {
    let lines = status_lines(&status(false, true));
    assert!(lines.contains(&"Running:   no".to_string()));
    assert!(lines.contains(&"Attached:  yes".to_string()));
    assert_eq!(lines.len(), 4);
}

#[test]
fn status_reports_quota_exhaustion() {
    let mut s = status(false, true);
    s.quota.exhausted_for_secs = Some(3600);
    let lines = status_lines(&s);
    assert_eq!(
        lines.last().map(String::as_str),
        Some("Exhausted: provider quota, retry in 3600s")
    );
}
