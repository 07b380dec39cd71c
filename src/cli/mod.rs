// treesync: Remote Tree Synchronization Engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for treesync using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! treesync [global options] <command>
//! sync [--target NAME] [-b BRANCH] [-m MESSAGE] [PATH...]
//! plan  (same arguments, read-only)
//! hash-object FILE...
//! options
//! configs
//! version
//! ```

pub mod global;
pub mod sync;

#[cfg(test)]
mod tests;

use crate::cli::global::GlobalOptions;
use crate::cli::sync::{HashObjectArgs, SyncArgs};
use clap::{Parser, Subcommand};

/// Publish files to a GitHub branch without a working tree.
#[derive(Debug, Parser)]
#[command(
    name = "treesync",
    author,
    version,
    about = "Publish files to a GitHub branch as a single minimal commit",
    long_about = "treesync Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Makes a remote branch contain exactly a set of local files.\n\
                  Unchanged files are not uploaded, files missing locally are\n\
                  deleted, and nothing is committed when the branch already\n\
                  matches. See `treesync <command> --help` for details.",
    after_help = "CONFIG FILES:\n\n\
                  treesync reads `treesync.toml` from the current directory when\n\
                  it exists, then every --config file in order. TREESYNC_* environment\n\
                  variables (TREESYNC_GITHUB__OWNER, TREESYNC_SYNC__VERIFY_TIP, ...)\n\
                  override files, and --set / dedicated flags override everything."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows the version.
    #[command(visible_alias = "-v")]
    Version,

    /// Lists all options and their values.
    Options,

    /// Lists the configuration files in load order.
    Configs,

    /// Makes a branch contain exactly the given files, in at most one commit.
    Sync(SyncArgs),

    /// Shows what `sync` would do without writing anything.
    Plan(SyncArgs),

    /// Prints git blob ids for local files, as the remote would compute them.
    #[command(name = "hash-object")]
    HashObject(HashObjectArgs),
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Parses command-line arguments from an iterator.
pub fn parse_from<I, T>(iter: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::parse_from(iter)
}

/// Tries to parse command-line arguments, returning an error on failure.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version information
/// was requested.
pub fn try_parse() -> Result<Cli, clap::Error> {
    Cli::try_parse()
}
