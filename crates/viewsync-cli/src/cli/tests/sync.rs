//! Tests for run, sync and sync-ids subcommands.

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::Parser;

#[test]
fn cli_parse_run() {
    assert!(matches!(parse(&["viewsync", "run"]), CliCommand::Run));
}

#[test]
fn cli_parse_sync() {
    assert!(matches!(parse(&["viewsync", "sync"]), CliCommand::Sync));
}

#[test]
fn cli_parse_sync_ids() {
    match parse(&["viewsync", "sync-ids", "abc", "def", "abc"]) {
        CliCommand::SyncIds { ids } => assert_eq!(ids, vec!["abc", "def", "abc"]),
        _ => panic!("expected SyncIds"),
    }
}

#[test]
fn cli_parse_sync_ids_requires_an_id() {
    assert!(Cli::try_parse_from(["viewsync", "sync-ids"]).is_err());
}

#[test]
fn cli_parse_cleanup_status_health() {
    assert!(matches!(parse(&["viewsync", "cleanup"]), CliCommand::Cleanup));
    assert!(matches!(parse(&["viewsync", "status"]), CliCommand::Status));
    assert!(matches!(parse(&["viewsync", "health"]), CliCommand::Health));
}

#[test]
fn cli_rejects_unknown_subcommand() {
    assert!(Cli::try_parse_from(["viewsync", "download"]).is_err());
    assert!(Cli::try_parse_from(["viewsync"]).is_err());
}
