//! Tests for track, untrack and metadata subcommands.

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::Parser;

#[test]
fn cli_parse_track_default_campaign() {
    match parse(&["viewsync", "track", "dQw4w9WgXcQ"]) {
        CliCommand::Track { id, campaign } => {
            assert_eq!(id, "dQw4w9WgXcQ");
            assert_eq!(campaign, "default");
        }
        _ => panic!("expected Track"),
    }
}

#[test]
fn cli_parse_track_campaign() {
    match parse(&["viewsync", "track", "v1", "--campaign", "spring"]) {
        CliCommand::Track { id, campaign } => {
            assert_eq!(id, "v1");
            assert_eq!(campaign, "spring");
        }
        _ => panic!("expected Track with --campaign"),
    }
}

#[test]
fn cli_parse_untrack() {
    match parse(&["viewsync", "untrack", "v1"]) {
        CliCommand::Untrack { id } => assert_eq!(id, "v1"),
        _ => panic!("expected Untrack"),
    }
}

#[test]
fn cli_parse_metadata() {
    match parse(&["viewsync", "metadata", "v9"]) {
        CliCommand::Metadata { id } => assert_eq!(id, "v9"),
        _ => panic!("expected Metadata"),
    }
}

#[test]
fn cli_parse_metadata_requires_id() {
    assert!(Cli::try_parse_from(["viewsync", "metadata"]).is_err());
}
