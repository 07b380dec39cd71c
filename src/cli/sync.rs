// treesync: Remote Tree Synchronization Engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `sync` / `plan` command arguments.
//!
//! ```text
//! treesync sync --target site                  ← everything from [targets.site]
//! treesync sync -t site -m "Nightly"           ← target with message override
//! treesync sync -b gh-pages -m "Publish" site/ ← ad-hoc, no target needed
//! ```

use clap::Args;
use std::path::PathBuf;

/// Arguments shared by `sync` and `plan`.
#[derive(Debug, Clone, Default, Args)]
pub struct SyncArgs {
    /// Named target from `[targets.<name>]` in the configuration.
    #[arg(short = 't', long, value_name = "NAME")]
    pub target: Option<String>,

    /// Branch to publish to (overrides the target's branch).
    #[arg(short = 'b', long, value_name = "BRANCH")]
    pub branch: Option<String>,

    /// Commit message (overrides the target's message).
    #[arg(short = 'm', long, value_name = "MESSAGE")]
    pub message: Option<String>,

    /// Directory repository paths are relative to (overrides sync.base_dir).
    #[arg(long = "base-dir", value_name = "DIR")]
    pub base_dir: Option<PathBuf>,

    /// Glob of base-relative paths to leave out. Can be repeated.
    #[arg(short = 'x', long = "exclude", value_name = "GLOB", action = clap::ArgAction::Append)]
    pub exclude: Vec<String>,

    /// Show a progress bar while uploading blobs.
    #[arg(long)]
    pub progress: bool,

    /// Files or directories to publish (replace the target's paths).
    #[arg(value_name = "PATH")]
    pub paths: Vec<PathBuf>,
}

/// Arguments for `hash-object`.
#[derive(Debug, Clone, Default, Args)]
pub struct HashObjectArgs {
    /// Files to hash.
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,
}
