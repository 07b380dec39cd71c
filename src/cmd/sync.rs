// treesync: Remote Tree Synchronization Engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `sync` and `plan` command implementations.

use anyhow::{Context, bail};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::cli::sync::SyncArgs;
use crate::config::Config;
use crate::engine::{
    ProgressDisplay, PublishOptions, SyncEngine, SyncOptions, SyncPlan, SyncRequest,
};
use crate::error::{Result, SyncError};
use crate::remote::GitRemote;
use crate::remote::github::GithubRemote;
use crate::utility::fs::collect::collect_files;

/// A request with its exclude patterns, before file collection.
#[derive(Debug, Clone)]
pub struct ResolvedTarget {
    pub request: SyncRequest,
    pub exclude: Vec<String>,
}

/// Merges `--target` settings with command-line overrides.
///
/// # Errors
///
/// Returns an error for an unknown target, or when branch, message or paths
/// end up empty. `message` is only required when `require_message` is set.
pub fn resolve_target(
    args: &SyncArgs,
    config: &Config,
    require_message: bool,
) -> Result<ResolvedTarget> {
    let target = args
        .target
        .as_deref()
        .map(|name| config.target(name))
        .transpose()?;

    let Some(branch) = args
        .branch
        .clone()
        .or_else(|| target.map(|t| t.branch.clone()))
        .filter(|b| !b.trim().is_empty())
    else {
        bail!("no branch to publish to: pass --branch or --target");
    };

    let message = args
        .message
        .clone()
        .or_else(|| target.map(|t| t.message.clone()))
        .unwrap_or_default();
    if require_message && message.trim().is_empty() {
        bail!("no commit message: pass --message or --target");
    }

    let paths = if args.paths.is_empty() {
        target.map(|t| t.paths.clone()).unwrap_or_default()
    } else {
        args.paths.clone()
    };
    // The engine would empty the branch; only allow that through the library
    if paths.is_empty() {
        bail!("no paths to publish: pass PATH arguments or configure target paths");
    }

    let mut exclude = target.map(|t| t.exclude.clone()).unwrap_or_default();
    exclude.extend(args.exclude.iter().cloned());

    let base_dir = args
        .base_dir
        .clone()
        .unwrap_or_else(|| config.sync.base_dir.clone());

    Ok(ResolvedTarget {
        request: SyncRequest {
            branch,
            message,
            base_dir,
            paths,
        },
        exclude,
    })
}

/// Expands directories and applies excludes, yielding the final request.
///
/// # Errors
///
/// Returns an error if a path is missing or a directory cannot be walked.
pub async fn collect_request(resolved: ResolvedTarget) -> Result<SyncRequest> {
    let ResolvedTarget {
        mut request,
        exclude,
    } = resolved;

    let base_dir = request.base_dir.clone();
    let paths = std::mem::take(&mut request.paths);
    request.paths = tokio::task::spawn_blocking(move || {
        collect_files(&base_dir, &paths, &exclude)
    })
    .await
    .context("file collection task panicked")??;

    info!(
        branch = %request.branch,
        base_dir = %request.base_dir.display(),
        files = request.paths.len(),
        "collected local files"
    );
    Ok(request)
}

/// Engine options from `[sync]`.
#[must_use]
pub fn sync_options(config: &Config, progress: bool) -> SyncOptions {
    let display = if progress {
        ProgressDisplay::Bar
    } else {
        ProgressDisplay::Silent
    };

    SyncOptions {
        publish: PublishOptions::builder()
            .with_upload_concurrency(config.sync.upload_concurrency)
            .with_verify_tip(config.sync.verify_tip)
            .with_progress(display)
            .build(),
        commit_marker: config.sync.commit_marker.clone(),
    }
}

/// Cancels the returned token on Ctrl+C.
fn cancel_on_ctrl_c() -> CancellationToken {
    let cancel = CancellationToken::new();
    let token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Received Ctrl+C, cancelling sync...");
            token.cancel();
        }
    });
    cancel
}

/// Main handler for the `sync` command.
///
/// With `global.dry` set this only plans.
///
/// # Errors
///
/// Returns an error if configuration is incomplete, local files cannot be
/// collected, or the engine fails.
pub async fn run_sync_command(args: &SyncArgs, config: &Config) -> Result<()> {
    if config.global.dry {
        info!("dry run: planning only, the branch will not be touched");
        return run_plan_command(args, config).await;
    }

    config.github.require_repo()?;
    config.github.require_token()?;

    let request = collect_request(resolve_target(args, config, true)?).await?;
    let remote = GithubRemote::new(&config.github)?;
    let engine = SyncEngine::new(remote, sync_options(config, args.progress));
    let cancel = cancel_on_ctrl_c();

    execute_sync(&engine, &request, &cancel).await
}

/// Plans and publishes `request`, printing the changes and the outcome.
///
/// # Errors
///
/// Returns the engine error, with a hint when the branch state is unknown.
pub async fn execute_sync<R: GitRemote>(
    engine: &SyncEngine<R>,
    request: &SyncRequest,
    cancel: &CancellationToken,
) -> Result<()> {
    let plan = engine.plan(request, cancel).await?;
    print_plan(&plan, false);

    match engine.publish(&plan, &request.message, cancel).await {
        Ok(outcome) => {
            println!("{outcome}");
            Ok(())
        }
        Err(e) => Err(explain(e, &request.branch)),
    }
}

fn explain(err: SyncError, branch: &str) -> anyhow::Error {
    if let Some(commit) = err.attempted_commit() {
        let hint = format!(
            "the state of {branch} is unknown; check whether it points at {commit} before retrying"
        );
        return anyhow::Error::new(err).context(hint);
    }
    if err.is_retryable_from_scratch() {
        let hint = format!("{branch} was not changed; the sync can be retried");
        return anyhow::Error::new(err).context(hint);
    }
    anyhow::Error::new(err)
}

/// Main handler for the `plan` command.
///
/// # Errors
///
/// Returns an error if the repository is not configured, local files cannot
/// be collected, or the branch cannot be read.
pub async fn run_plan_command(args: &SyncArgs, config: &Config) -> Result<()> {
    config.github.require_repo()?;

    let request = collect_request(resolve_target(args, config, false)?).await?;
    let remote = GithubRemote::new(&config.github)?;
    let engine = SyncEngine::new(remote, sync_options(config, false));
    let cancel = cancel_on_ctrl_c();

    let plan = engine.plan(&request, &cancel).await?;
    print_plan(&plan, true);
    Ok(())
}

/// Prints planned actions; keeps are listed only when `all` is set.
fn print_plan(plan: &SyncPlan, all: bool) {
    for action in &plan.actions {
        if all || action.is_change() {
            println!("{action}");
        }
    }
    let stats = plan.stats;
    println!(
        "{}: {} kept, {} replaced, {} deleted ({} bytes to upload)",
        plan.snapshot.branch(),
        stats.kept,
        stats.replaced,
        stats.deleted,
        stats.uploaded_bytes
    );
}
