// treesync: Remote Tree Synchronization Engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for treesync.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. treesync.toml (cwd)
//! 3. --config FILE (repeatable)
//! 4. TREESYNC_* env vars
//! 5. --set KEY=VALUE and CLI flags
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! TREESYNC_GLOBAL__DRY=true              → global.dry = true
//! TREESYNC_GITHUB__OWNER=acme            → github.owner = "acme"
//! TREESYNC_SYNC__UPLOAD_CONCURRENCY=8    → sync.upload_concurrency = 8
//! ```
//!
//! # Targets
//!
//! ```toml
//! [sync]
//! base_dir = "out"
//!
//! [targets.site]
//! branch = "gh-pages"
//! message = "Publish site"
//! paths = ["site"]
//! ```

pub mod loader;
pub mod types;


use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{ConfigError, Result};

use loader::ConfigLoader;
use types::{GithubConfig, GlobalConfig, SyncConfig, TargetConfig};

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "TREESYNC";

/// Config file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "treesync.toml";

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Global options.
    pub global: GlobalConfig,
    /// GitHub connection.
    pub github: GithubConfig,
    /// Engine settings.
    pub sync: SyncConfig,
    /// Named sync targets.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub targets: BTreeMap<String, TargetConfig>,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use treesync::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file_optional("treesync.toml")
    ///     .with_env_prefix("TREESYNC")
    ///     .build()?;
    /// # Ok::<(), treesync::error::ConfigError>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a single TOML file (simple API).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// does not match the `Config` structure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::builder().add_toml_file(path).build()?)
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match the
    /// `Config` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Ok(Self::builder().add_toml_str(content).build()?)
    }

    /// Looks up a named target.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownTarget`] if no `[targets.<name>]` exists.
    pub fn target(&self, name: &str) -> std::result::Result<&TargetConfig, ConfigError> {
        self.targets
            .get(name)
            .ok_or_else(|| ConfigError::UnknownTarget(name.to_string()))
    }

    /// Checks values that deserialization cannot.
    ///
    /// Repository and token presence are checked by the commands that need
    /// them, so `options` works on an incomplete configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] or [`ConfigError::MissingKey`].
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.sync.upload_concurrency == 0 {
            return Err(ConfigError::InvalidValue {
                section: "sync".to_string(),
                key: "upload_concurrency".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        if self.github.api_url.is_empty() {
            return Err(ConfigError::MissingKey {
                section: "github".to_string(),
                key: "api_url".to_string(),
            });
        }

        for (name, target) in &self.targets {
            let section = format!("targets.{name}");
            if target.branch.trim().is_empty() {
                return Err(ConfigError::MissingKey {
                    section,
                    key: "branch".to_string(),
                });
            }
            if target.message.trim().is_empty() {
                return Err(ConfigError::MissingKey {
                    section,
                    key: "message".to_string(),
                });
            }
            for pattern in &target.exclude {
                if let Err(e) = wax::Glob::new(pattern) {
                    return Err(ConfigError::InvalidValue {
                        section,
                        key: "exclude".to_string(),
                        message: format!("invalid glob '{pattern}': {e}"),
                    });
                }
            }
        }

        Ok(())
    }

    /// Format configuration options for display.
    ///
    /// Returns a vector of formatted strings representing all configuration options.
    /// The token is hidden with a `[hidden]` marker.
    /// Output is deterministically ordered using `BTreeMap`.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();
        self.format_global_options(&mut options);
        self.format_github_options(&mut options);
        self.format_sync_options(&mut options);
        self.format_target_options(&mut options);

        let max_key_len = options.keys().map(String::len).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }

    fn format_global_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("global.dry".into(), self.global.dry.to_string());
        options.insert(
            "global.output_log_level".into(),
            self.global.output_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.file_log_level".into(),
            self.global.file_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.log_file".into(),
            self.global.log_file.display().to_string(),
        );
    }

    fn format_github_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("github.api_url".into(), self.github.api_url.clone());
        options.insert("github.owner".into(), self.github.owner.clone());
        options.insert("github.repo".into(), self.github.repo.clone());
        if !self.github.token.is_empty() {
            options.insert("github.token".into(), "[hidden]".into());
        }
        options.insert(
            "github.timeout_secs".into(),
            self.github.timeout_secs.to_string(),
        );
        options.insert("github.user_agent".into(), self.github.user_agent.clone());
    }

    fn format_sync_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert(
            "sync.base_dir".into(),
            self.sync.base_dir.display().to_string(),
        );
        options.insert(
            "sync.upload_concurrency".into(),
            self.sync.upload_concurrency.to_string(),
        );
        options.insert("sync.verify_tip".into(), self.sync.verify_tip.to_string());
        options.insert(
            "sync.commit_marker".into(),
            self.sync.commit_marker.clone(),
        );
    }

    fn format_target_options(&self, options: &mut BTreeMap<String, String>) {
        for (name, target) in &self.targets {
            options.insert(format!("targets.{name}.branch"), target.branch.clone());
            options.insert(format!("targets.{name}.message"), target.message.clone());
            let paths: Vec<String> = target
                .paths
                .iter()
                .map(|p| p.display().to_string())
                .collect();
            options.insert(format!("targets.{name}.paths"), paths.join(", "));
            if !target.exclude.is_empty() {
                options.insert(
                    format!("targets.{name}.exclude"),
                    target.exclude.join(", "),
                );
            }
        }
    }
}
