// treesync: Remote Tree Synchronization Engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Config --> Logging --> Command Dispatch
//!   Sync | Plan | HashObject | Options | Configs | Version
//! ```

use std::process::ExitCode;

use treesync::cli::global::GlobalOptions;
use treesync::cli::{self, Command};
use treesync::cmd::config::{run_configs_command, run_options_command};
use treesync::cmd::hash::run_hash_object_command;
use treesync::cmd::sync::{run_plan_command, run_sync_command};
use treesync::config::loader::ConfigLoader;
use treesync::config::{Config, DEFAULT_CONFIG_FILE, ENV_PREFIX};
use treesync::logging::{LogConfig, LogGuard, init_logging};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse();

    // Version and hash-object need neither config nor logging
    match &cli.command {
        Some(Command::Version) => {
            handle_version_command();
            return ExitCode::SUCCESS;
        }
        Some(Command::HashObject(args)) => {
            return exit_code(run_hash_object_command(args).await);
        }
        _ => {}
    }

    let config = match load_config(&cli.global) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let _log_guard = match init_logging_from(&config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    dispatch_command(&cli, &config).await
}

fn init_logging_from(config: &Config) -> treesync::error::Result<LogGuard> {
    let log_config = LogConfig::builder()
        .with_console_level(config.global.output_log_level)
        .with_file_level(config.global.file_log_level)
        .maybe_with_log_file(
            (!config.global.log_file.as_os_str().is_empty())
                .then(|| config.global.log_file.clone()),
        )
        .build();
    init_logging(&log_config)
}

async fn dispatch_command(cli: &cli::Cli, config: &Config) -> ExitCode {
    let result = match &cli.command {
        Some(Command::Options) => {
            run_options_command(config);
            Ok(())
        }
        Some(Command::Configs) => {
            run_configs_command(&build_config_loader(&cli.global).format_loaded_files());
            Ok(())
        }
        Some(Command::Sync(args)) => run_sync_command(args, config).await,
        Some(Command::Plan(args)) => run_plan_command(args, config).await,
        Some(Command::Version | Command::HashObject(_)) => Ok(()),
        None => {
            eprintln!("No command specified. Use --help for usage information.");
            Err(anyhow::anyhow!("No command specified"))
        }
    };

    exit_code(result)
}

fn exit_code(result: treesync::error::Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn handle_version_command() {
    println!("{}", env!("CARGO_PKG_VERSION"));
}

fn build_config_loader(global: &GlobalOptions) -> ConfigLoader {
    let mut loader = ConfigLoader::new();
    if !global.no_default_config {
        loader = loader.add_toml_file_optional(DEFAULT_CONFIG_FILE);
    }
    for path in &global.configs {
        loader = loader.add_toml_file(path);
    }
    loader.with_env_prefix(ENV_PREFIX)
}

fn load_config(global: &GlobalOptions) -> treesync::error::Result<Config> {
    let overrides = global.to_config_overrides();
    let loader = build_config_loader(global).apply_overrides(overrides.as_slice())?;
    Ok(loader.build()?)
}
