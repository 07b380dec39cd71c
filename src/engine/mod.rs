// treesync: Remote Tree Synchronization Engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Sync engine: make a remote branch's tree equal a set of local files.
//!
//! ```text
//! SyncRequest { branch, message, base_dir, paths }
//!        |
//!        v
//! snapshot::fetch_snapshot ---> RemoteTreeSnapshot
//!        |
//!        v
//! reconcile::reconcile     ---> [Keep | Replace | Delete]     (plan stops here)
//!        |
//!        v
//! publish::Publisher       ---> blobs, tree, commit, ref  ---> SyncOutcome
//! ```
//!
//! One invocation is a linear pipeline. The engine holds only the remote and
//! immutable options, so one instance can serve many sequential syncs.

pub mod hasher;
pub mod marker;
pub mod publish;
pub mod reconcile;
pub mod snapshot;
pub mod types;


use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::error::{EngineResult, SyncError};
use crate::remote::GitRemote;

pub use publish::{ProgressDisplay, PublishOptions, PublishRequest, Publisher};
pub use types::{
    LocalCandidate, ObjectId, PublishAction, REGULAR_FILE_MODE, RemoteTreeEntry,
    RemoteTreeSnapshot, SyncOutcome, SyncStats,
};

/// Default marker appended to engine commit messages.
pub const DEFAULT_COMMIT_MARKER: &str = "[bot-commit]";

/// Engine-wide options, fixed at construction.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub publish: PublishOptions,
    /// Appended to commit messages; empty disables it.
    pub commit_marker: String,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            publish: PublishOptions::default(),
            commit_marker: DEFAULT_COMMIT_MARKER.to_string(),
        }
    }
}

/// One sync: the full desired content of `branch`.
#[derive(Debug, Clone)]
pub struct SyncRequest {
    pub branch: String,
    pub message: String,
    /// Root that repository paths are relative to.
    pub base_dir: PathBuf,
    /// Every file the branch should contain, absolute or relative to `base_dir`.
    pub paths: Vec<PathBuf>,
}

/// Result of the read-only half of a sync.
#[derive(Debug, Clone)]
pub struct SyncPlan {
    pub snapshot: RemoteTreeSnapshot,
    pub actions: Vec<PublishAction>,
    pub stats: SyncStats,
}

impl SyncPlan {
    /// Actions that change the tree.
    pub fn changes(&self) -> impl Iterator<Item = &PublishAction> {
        self.actions.iter().filter(|a| a.is_change())
    }
}

/// Drives snapshot, reconcile and publish against one remote.
#[derive(Debug)]
pub struct SyncEngine<R> {
    remote: R,
    options: SyncOptions,
}

impl<R: GitRemote> SyncEngine<R> {
    #[must_use]
    pub const fn new(remote: R, options: SyncOptions) -> Self {
        Self { remote, options }
    }

    #[must_use]
    pub const fn remote(&self) -> &R {
        &self.remote
    }

    #[must_use]
    pub const fn options(&self) -> &SyncOptions {
        &self.options
    }

    /// Reads the branch and reconciles the local files without writing.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::RemoteRead`], [`SyncError::Hashing`] or
    /// [`SyncError::Cancelled`].
    pub async fn plan(
        &self,
        request: &SyncRequest,
        cancel: &CancellationToken,
    ) -> EngineResult<SyncPlan> {
        let snapshot = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(SyncError::Cancelled("snapshot")),
            snapshot = snapshot::fetch_snapshot(&self.remote, &request.branch) => snapshot?,
        };

        let actions = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(SyncError::Cancelled("reconcile")),
            actions = reconcile::reconcile(&snapshot, &request.base_dir, request.paths.as_slice()) => actions?,
        };

        let stats = SyncStats::from_actions(&actions);
        info!(
            branch = %request.branch,
            kept = stats.kept,
            replaced = stats.replaced,
            deleted = stats.deleted,
            "reconciled"
        );

        Ok(SyncPlan {
            snapshot,
            actions,
            stats,
        })
    }

    /// Publishes a plan produced by [`plan`](Self::plan).
    ///
    /// # Errors
    ///
    /// See [`Publisher::publish`].
    pub async fn publish(
        &self,
        plan: &SyncPlan,
        message: &str,
        cancel: &CancellationToken,
    ) -> EngineResult<SyncOutcome> {
        let message = marker::with_marker(message, &self.options.commit_marker);
        let request = PublishRequest::on_snapshot(&plan.snapshot, &message);
        Publisher::new(&self.remote, &self.options.publish, cancel)
            .publish(&request, &plan.actions)
            .await
    }

    /// Makes `request.branch` contain exactly the requested files, in at most
    /// one commit.
    ///
    /// # Errors
    ///
    /// Any [`SyncError`]. Only [`SyncError::RefUpdate`] leaves the branch in
    /// an unknown state.
    pub async fn update_remote(
        &self,
        request: &SyncRequest,
        cancel: &CancellationToken,
    ) -> EngineResult<SyncOutcome> {
        let plan = self.plan(request, cancel).await?;
        self.publish(&plan, &request.message, cancel).await
    }
}
