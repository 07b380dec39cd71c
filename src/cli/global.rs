// treesync: Remote Tree Synchronization Engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Global CLI options available for all commands.
//!
//! # Option Precedence
//!
//! ```text
//! --config FILE     ← Additional config files (can repeat)
//! --dry             ← Plan only, never write to the remote
//! --log-level N     ← Console verbosity (0-6)
//! --file-log-level  ← File verbosity (overrides --log-level)
//! --repo OWNER/NAME ← github.owner / github.repo override
//! --token TOKEN     ← github.token override (or GITHUB_TOKEN)
//! --set KEY=VAL     ← Direct config override
//!
//! Precedence: CLI flags > --set > env > --config > treesync.toml > defaults
//! ```

use clap::Args;
use std::fmt;
use std::path::PathBuf;

/// Global options available for all commands.
#[derive(Clone, Default, Args)]
pub struct GlobalOptions {
    /// Path to additional TOML configuration file(s).
    /// Can be specified multiple times; later files win.
    #[arg(short = 'c', long = "config", value_name = "FILE", action = clap::ArgAction::Append, global = true)]
    pub configs: Vec<PathBuf>,

    /// Do not load treesync.toml from the current directory.
    #[arg(long = "no-default-config", global = true)]
    pub no_default_config: bool,

    /// Reconcile and print the actions, but never write to the remote.
    #[arg(long, global = true)]
    pub dry: bool,

    /// Console log level (0=silent, 1=errors, 2=warnings, 3=info, 4=debug, 5=trace, 6=dump).
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", global = true,
          value_parser = clap::value_parser!(u8).range(0..=6)
    )]
    pub log_level: Option<u8>,

    /// File log level, overrides --log-level for the log file.
    #[arg(long = "file-log-level", value_name = "LEVEL", global = true,
          value_parser = clap::value_parser!(u8).range(0..=6)
    )]
    pub file_log_level: Option<u8>,

    /// Path to log file.
    #[arg(long = "log-file", value_name = "FILE", global = true)]
    pub log_file: Option<PathBuf>,

    /// Repository as OWNER/NAME.
    #[arg(short = 'r', long = "repo", value_name = "OWNER/NAME", global = true,
          value_parser = parse_repo_slug
    )]
    pub repo: Option<(String, String)>,

    /// GitHub token with contents write access.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,

    /// Sets an option, such as 'sync/upload_concurrency=8'.
    /// Can be specified multiple times.
    #[arg(short = 's', long = "set", value_name = "OPTION", action = clap::ArgAction::Append, global = true)]
    pub options: Vec<String>,
}

// Hand-written so the token never reaches logs or snapshots.
impl fmt::Debug for GlobalOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlobalOptions")
            .field("configs", &self.configs)
            .field("no_default_config", &self.no_default_config)
            .field("dry", &self.dry)
            .field("log_level", &self.log_level)
            .field("file_log_level", &self.file_log_level)
            .field("log_file", &self.log_file)
            .field("repo", &self.repo)
            .field("token", &self.token.as_ref().map(|_| "[hidden]"))
            .field("options", &self.options)
            .finish()
    }
}

impl GlobalOptions {
    /// Converts command-line options to configuration overrides.
    ///
    /// `--set` entries come first so dedicated flags win over them.
    #[must_use]
    pub fn to_config_overrides(&self) -> Vec<String> {
        let mut overrides = self.options.clone();

        if let Some(level) = self.log_level {
            overrides.push(format!("global/output_log_level={level}"));
        }

        // file_log_level falls back to log_level if not specified
        if let Some(level) = self.file_log_level.or(self.log_level) {
            overrides.push(format!("global/file_log_level={level}"));
        }

        if let Some(ref path) = self.log_file {
            overrides.push(format!("global/log_file={}", path.display()));
        }

        if self.dry {
            overrides.push("global/dry=true".to_string());
        }

        if let Some((ref owner, ref repo)) = self.repo {
            overrides.push(format!("github/owner={owner}"));
            overrides.push(format!("github/repo={repo}"));
        }

        if let Some(ref token) = self.token
            && !token.is_empty()
        {
            overrides.push(format!("github/token={token}"));
        }

        overrides
    }
}

/// Parses `owner/name` into its two halves.
///
/// # Errors
///
/// Returns a message if either half is missing or extra slashes are present.
pub fn parse_repo_slug(value: &str) -> Result<(String, String), String> {
    match value.split_once('/') {
        Some((owner, repo))
            if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') =>
        {
            Ok((owner.to_string(), repo.to_string()))
        }
        _ => Err(format!("expected OWNER/NAME, got '{value}'")),
    }
}
