// treesync: Remote Tree Synchronization Engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration types for treesync.
//!
//! # Config Structure
//!
//! ```text
//! Config: GlobalConfig, GithubConfig, SyncConfig
//! Targets: name -> TargetConfig { branch, message, paths, exclude }
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::engine::DEFAULT_COMMIT_MARKER;
use crate::engine::publish::DEFAULT_UPLOAD_CONCURRENCY;
use crate::error::ConfigError;
use crate::logging::LogLevel;

/// Public GitHub REST endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Global configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    /// Plan only; never write to the remote.
    pub dry: bool,
    /// Log level for console (stderr) output (0-6).
    pub output_log_level: LogLevel,
    /// Log level for file output (0-6).
    pub file_log_level: LogLevel,
    /// JSON-lines log file, appended across runs; empty disables it.
    pub log_file: PathBuf,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            dry: false,
            output_log_level: LogLevel::INFO,
            file_log_level: LogLevel::TRACE,
            log_file: PathBuf::from("treesync.log"),
        }
    }
}

/// GitHub connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GithubConfig {
    /// REST API base URL (GitHub Enterprise uses `https://host/api/v3`).
    pub api_url: String,
    /// Repository owner (user or organization).
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Access token with contents write permission.
    #[serde(skip_serializing)]
    pub token: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// `User-Agent` header value.
    pub user_agent: String,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            owner: String::new(),
            repo: String::new(),
            token: String::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: format!("treesync/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl GithubConfig {
    /// `owner/repo`.
    #[must_use]
    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    /// Ensures the repository is named.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingKey`] if `owner` or `repo` is empty.
    pub fn require_repo(&self) -> Result<(), ConfigError> {
        for (key, value) in [("owner", &self.owner), ("repo", &self.repo)] {
            if value.is_empty() {
                return Err(ConfigError::MissingKey {
                    section: "github".to_string(),
                    key: key.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Ensures a token is available for write operations.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingKey`] if `token` is empty.
    pub fn require_token(&self) -> Result<(), ConfigError> {
        if self.token.is_empty() {
            return Err(ConfigError::MissingKey {
                section: "github".to_string(),
                key: "token".to_string(),
            });
        }
        Ok(())
    }
}

/// Engine settings shared by all targets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyncConfig {
    /// Directory that repository paths are relative to.
    pub base_dir: PathBuf,
    /// Maximum concurrent blob uploads.
    pub upload_concurrency: usize,
    /// Fail instead of moving a branch that changed since it was read.
    pub verify_tip: bool,
    /// Appended to engine commit messages; empty disables it.
    pub commit_marker: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            upload_concurrency: DEFAULT_UPLOAD_CONCURRENCY,
            verify_tip: false,
            commit_marker: DEFAULT_COMMIT_MARKER.to_string(),
        }
    }
}

/// A named sync target.
///
/// ```toml
/// [targets.reports]
/// branch = "staging"
/// message = "Publish compiled reports"
/// paths = ["report.md", "build"]
/// exclude = ["**/*.map"]
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TargetConfig {
    /// Branch whose tree is replaced.
    pub branch: String,
    /// Commit message.
    pub message: String,
    /// Files or directories relative to `sync.base_dir`.
    pub paths: Vec<PathBuf>,
    /// Glob patterns (relative to `sync.base_dir`) dropped from the file set.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,
}
