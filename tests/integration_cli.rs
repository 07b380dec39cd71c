// treesync: Remote Tree Synchronization Engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for CLI parsing.
//!
//! Tests the CLI module with realistic command-line argument patterns and
//! their effect on the loaded configuration.

use clap::Parser;
use std::path::PathBuf;
use treesync::cli::sync::SyncArgs;
use treesync::cli::{Cli, Command};
use treesync::config::loader::ConfigLoader;

// =============================================================================
// Version Command
// =============================================================================

#[test]
fn cli_version_alias() {
    let cli = Cli::try_parse_from(["treesync", "-v"]).unwrap();
    assert!(matches!(cli.command, Some(Command::Version)));
}

#[test]
fn cli_no_command() {
    let cli = Cli::try_parse_from(["treesync"]).unwrap();
    assert!(cli.command.is_none());
}

// =============================================================================
// Sync / Plan
// =============================================================================

#[test]
fn cli_sync_target_only() {
    let cli = Cli::try_parse_from(["treesync", "sync", "--target", "site"]).unwrap();
    let Some(Command::Sync(args)) = cli.command else {
        panic!("expected sync");
    };
    assert_eq!(args.target.as_deref(), Some("site"));
    assert!(args.paths.is_empty());
    assert!(!args.progress);
}

#[test]
fn cli_plan_matches_sync_arguments() {
    let argv = |cmd: &'static str| {
        [
            "treesync", cmd, "-b", "gh-pages", "-m", "msg", "-x", "*.map", "-x", "*.tmp", "dist",
        ]
    };
    let Some(Command::Sync(sync)) = Cli::try_parse_from(argv("sync")).unwrap().command else {
        panic!("expected sync");
    };
    let Some(Command::Plan(plan)) = Cli::try_parse_from(argv("plan")).unwrap().command else {
        panic!("expected plan");
    };

    let summary = |a: &SyncArgs| (a.branch.clone(), a.exclude.clone(), a.paths.clone());
    assert_eq!(summary(&sync), summary(&plan));
    assert_eq!(plan.exclude, ["*.map", "*.tmp"]);
    assert_eq!(plan.paths, [PathBuf::from("dist")]);
}

#[test]
fn cli_unknown_command_fails() {
    assert!(Cli::try_parse_from(["treesync", "build"]).is_err());
}

#[test]
fn cli_bad_repo_slug_fails() {
    let err = Cli::try_parse_from(["treesync", "--repo", "acme", "options"]).unwrap_err();
    assert!(err.to_string().contains("OWNER/NAME"), "got {err}");
}

// =============================================================================
// Flags -> configuration
// =============================================================================

#[test]
fn cli_flags_override_config() {
    let cli = Cli::try_parse_from([
        "treesync",
        "--set",
        "sync/upload_concurrency=9",
        "--set",
        "github/owner=from-set",
        "--repo",
        "acme/reports",
        "--file-log-level",
        "2",
        "--dry",
        "options",
    ])
    .unwrap();

    let config = ConfigLoader::new()
        .add_toml_str("[github]\nowner = \"from-file\"\n")
        .apply_overrides(cli.global.to_config_overrides().as_slice())
        .unwrap()
        .build()
        .unwrap();

    assert!(config.global.dry);
    assert_eq!(config.global.file_log_level.as_u8(), 2);
    assert_eq!(config.sync.upload_concurrency, 9);
    // --repo is applied after --set
    assert_eq!(config.github.owner, "acme");
    assert_eq!(config.github.repo, "reports");
}
