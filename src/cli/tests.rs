// treesync: Remote Tree Synchronization Engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::cli::global::parse_repo_slug;
use crate::cli::{Cli, Command};
use clap::Parser;
use std::path::PathBuf;

#[test]
fn test_parse_version() {
    let cli = Cli::try_parse_from(["treesync", "version"]).unwrap();
    assert!(matches!(cli.command, Some(Command::Version)));
}

#[test]
fn test_parse_global_options() {
    let cli = Cli::try_parse_from([
        "treesync",
        "-l",
        "5",
        "-c",
        "a.toml",
        "--config",
        "b.toml",
        "--dry",
        "-r",
        "acme/reports",
        "plan",
        "-t",
        "site",
    ])
    .unwrap();

    assert_eq!(cli.global.log_level, Some(5));
    assert_eq!(
        cli.global.configs,
        [PathBuf::from("a.toml"), PathBuf::from("b.toml")]
    );
    assert!(cli.global.dry);
    assert_eq!(
        cli.global.repo,
        Some(("acme".to_string(), "reports".to_string()))
    );
    let Some(Command::Plan(args)) = cli.command else {
        panic!("expected plan");
    };
    assert_eq!(args.target.as_deref(), Some("site"));
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from(["treesync", "sync", "-t", "site", "--dry", "-l", "2"]).unwrap();
    assert!(cli.global.dry);
    assert_eq!(cli.global.log_level, Some(2));
}

#[test]
fn test_log_level_range() {
    assert!(Cli::try_parse_from(["treesync", "-l", "7", "version"]).is_err());
}

#[test]
fn test_parse_sync_adhoc() {
    let cli = Cli::try_parse_from([
        "treesync",
        "sync",
        "-b",
        "gh-pages",
        "-m",
        "Publish",
        "--base-dir",
        "out",
        "-x",
        "**/*.map",
        "--progress",
        "site",
        "index.html",
    ])
    .unwrap();

    let Some(Command::Sync(args)) = cli.command else {
        panic!("expected sync");
    };
    assert_eq!(args.target, None);
    assert_eq!(args.branch.as_deref(), Some("gh-pages"));
    assert_eq!(args.message.as_deref(), Some("Publish"));
    assert_eq!(args.base_dir, Some(PathBuf::from("out")));
    assert_eq!(args.exclude, ["**/*.map"]);
    assert!(args.progress);
    assert_eq!(
        args.paths,
        [PathBuf::from("site"), PathBuf::from("index.html")]
    );
}

#[test]
fn test_parse_hash_object_requires_file() {
    assert!(Cli::try_parse_from(["treesync", "hash-object"]).is_err());
    let cli = Cli::try_parse_from(["treesync", "hash-object", "a.txt"]).unwrap();
    assert!(matches!(cli.command, Some(Command::HashObject(ref args)) if args.files.len() == 1));
}

#[test]
fn test_config_overrides() {
    let cli = Cli::try_parse_from([
        "treesync",
        "-s",
        "sync/verify_tip=true",
        "-l",
        "4",
        "--dry",
        "--repo",
        "acme/reports",
        "--token",
        "ghp_x",
        "options",
    ])
    .unwrap();

    insta::assert_debug_snapshot!(cli.global.to_config_overrides(), @r#"
    [
        "sync/verify_tip=true",
        "global/output_log_level=4",
        "global/file_log_level=4",
        "global/dry=true",
        "github/owner=acme",
        "github/repo=reports",
        "github/token=ghp_x",
    ]
    "#);
}

#[test]
fn test_debug_hides_token() {
    let cli = Cli::try_parse_from(["treesync", "--token", "ghp_secret", "options"]).unwrap();
    let debug = format!("{cli:?}");
    assert!(!debug.contains("ghp_secret"));
    assert!(debug.contains("[hidden]"));
}

#[test]
fn test_parse_repo_slug() {
    assert_eq!(
        parse_repo_slug("acme/reports").unwrap(),
        ("acme".to_string(), "reports".to_string())
    );
    assert!(parse_repo_slug("acme").is_err());
    assert!(parse_repo_slug("/reports").is_err());
    assert!(parse_repo_slug("acme/").is_err());
    assert!(parse_repo_slug("a/b/c").is_err());
}
