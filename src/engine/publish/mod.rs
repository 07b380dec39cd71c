// treesync: Remote Tree Synchronization Engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Commit publisher.
//!
//! ```text
//! actions --any Replace/Delete?--no--> NoOp (zero calls)
//!    |
//!    yes
//!    v
//! create_blob x N   (bounded, all finish first)   --fail--> PublishError
//!    v
//! create_tree { base_tree, Keep | Replace | Delete(sha: null) }
//!    v
//! create_commit { tree, parents: [base_commit] }
//!    v
//! [verify_tip] resolve_ref == base_commit?        --no---> BranchMoved
//!    v
//! update_ref { sha, force: false }  (last call)   --fail--> RefUpdateError
//! ```
//!
//! Cancellation is honoured up to the ref update. Once that request is issued
//! it runs to completion.

mod progress;


use bon::Builder;
use futures_util::{StreamExt, TryStreamExt, stream};
use std::collections::HashMap;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::types::{ObjectId, PublishAction, RemoteTreeSnapshot, SyncOutcome, SyncStats};
use crate::error::{EngineResult, PublishError, RefUpdateError, SyncError};
use crate::remote::{GitRemote, NewBlob, NewCommit, NewTreeEntry};

pub use progress::ProgressDisplay;

/// Default number of blob uploads in flight.
pub const DEFAULT_UPLOAD_CONCURRENCY: usize = 4;

/// Publisher tuning.
#[derive(Debug, Clone, Builder)]
pub struct PublishOptions {
    /// Maximum concurrent blob uploads (values below 1 are treated as 1)
    #[builder(setters(name = with_upload_concurrency), default = DEFAULT_UPLOAD_CONCURRENCY)]
    upload_concurrency: usize,
    /// Re-resolve the branch before moving it and fail if it moved
    #[builder(setters(name = with_verify_tip), default = false)]
    verify_tip: bool,
    /// Upload progress display
    #[builder(setters(name = with_progress), default)]
    progress: ProgressDisplay,
}

impl Default for PublishOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl PublishOptions {
    #[must_use]
    pub fn upload_concurrency(&self) -> usize {
        self.upload_concurrency.max(1)
    }

    #[must_use]
    pub const fn verify_tip(&self) -> bool {
        self.verify_tip
    }

    #[must_use]
    pub const fn progress(&self) -> ProgressDisplay {
        self.progress
    }
}

/// Where and how to publish one action list.
#[derive(Debug, Clone, Copy)]
pub struct PublishRequest<'a> {
    pub branch: &'a str,
    pub base_commit: &'a ObjectId,
    pub base_tree: &'a ObjectId,
    pub message: &'a str,
}

impl<'a> PublishRequest<'a> {
    /// Publishes on top of the commit a snapshot was read from.
    #[must_use]
    pub fn on_snapshot(snapshot: &'a RemoteTreeSnapshot, message: &'a str) -> Self {
        Self {
            branch: snapshot.branch(),
            base_commit: snapshot.commit_id(),
            base_tree: snapshot.tree_id(),
            message,
        }
    }
}

/// Turns a reconciled action list into one commit and a ref move.
#[derive(Debug)]
pub struct Publisher<'a, R: ?Sized> {
    remote: &'a R,
    options: &'a PublishOptions,
    cancel: &'a CancellationToken,
}

impl<'a, R> Publisher<'a, R>
where
    R: GitRemote + ?Sized,
{
    #[must_use]
    pub const fn new(
        remote: &'a R,
        options: &'a PublishOptions,
        cancel: &'a CancellationToken,
    ) -> Self {
        Self {
            remote,
            options,
            cancel,
        }
    }

    /// Publishes `actions` as a single commit on `request.branch`.
    ///
    /// # Errors
    ///
    /// - [`SyncError::Publish`] if a blob, the tree, the commit or the tip
    ///   check fails. The branch is unchanged.
    /// - [`SyncError::Cancelled`] if cancelled before the ref update.
    /// - [`SyncError::RefUpdate`] if moving the branch fails. The error
    ///   carries the attempted commit id.
    pub async fn publish(
        &self,
        request: &PublishRequest<'_>,
        actions: &[PublishAction],
    ) -> EngineResult<SyncOutcome> {
        let stats = SyncStats::from_actions(actions);
        let branch = request.branch;

        if !stats.has_changes() {
            info!(branch, kept = stats.kept, "no changes to publish");
            return Ok(SyncOutcome::NoOp {
                branch: branch.to_string(),
                stats,
            });
        }

        let uploaded = self
            .guarded("blob upload", async {
                self.upload_blobs(actions, &stats).await.map_err(SyncError::from)
            })
            .await?;

        let entries = tree_entries(actions, &uploaded);

        let tree_id = self
            .guarded("tree creation", async {
                self.remote
                    .create_tree(request.base_tree, &entries)
                    .await
                    .map_err(|source| {
                        SyncError::from(PublishError::Tree {
                            branch: branch.to_string(),
                            source,
                        })
                    })
            })
            .await?;
        debug!(branch, tree = %tree_id.short(), entries = entries.len(), "created tree");

        let commit_id = self
            .guarded("commit creation", async {
                self.remote
                    .create_commit(NewCommit {
                        message: request.message,
                        tree: &tree_id,
                        parents: vec![request.base_commit],
                    })
                    .await
                    .map_err(|source| {
                        SyncError::from(PublishError::Commit {
                            branch: branch.to_string(),
                            source,
                        })
                    })
            })
            .await?;
        debug!(branch, commit = %commit_id.short(), "created commit");

        if self.options.verify_tip() {
            self.check_tip(request).await?;
        }

        if self.cancel.is_cancelled() {
            return Err(SyncError::Cancelled("ref update"));
        }

        self.remote
            .update_ref(branch, &commit_id)
            .await
            .map_err(|source| RefUpdateError {
                branch: branch.to_string(),
                commit: commit_id.to_string(),
                source,
            })?;

        info!(
            branch,
            commit = %commit_id,
            replaced = stats.replaced,
            deleted = stats.deleted,
            kept = stats.kept,
            bytes = stats.uploaded_bytes,
            "branch updated"
        );

        Ok(SyncOutcome::Committed {
            branch: branch.to_string(),
            commit_id,
            tree_id,
            stats,
        })
    }

    /// Runs `fut` unless the token fires first.
    async fn guarded<T, F>(&self, stage: &'static str, fut: F) -> EngineResult<T>
    where
        F: Future<Output = EngineResult<T>>,
    {
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => {
                warn!(stage, "sync cancelled");
                Err(SyncError::Cancelled(stage))
            }
            result = fut => result,
        }
    }

    /// Uploads every Replace and returns the ids the remote assigned, by path.
    async fn upload_blobs<'b>(
        &self,
        actions: &'b [PublishAction],
        stats: &SyncStats,
    ) -> Result<HashMap<&'b str, ObjectId>, PublishError> {
        let progress = self
            .options
            .progress()
            .create(stats.uploaded_bytes, stats.replaced);

        let uploads = actions.iter().filter_map(|action| match action {
            PublishAction::Replace {
                path,
                object_id,
                content,
                is_binary,
            } => Some((path.as_str(), object_id, content.as_slice(), *is_binary)),
            PublishAction::Keep { .. } | PublishAction::Delete { .. } => None,
        });

        let uploaded: Result<HashMap<&str, ObjectId>, PublishError> = stream::iter(uploads)
            .map(|(path, expected, content, is_binary)| {
                let progress = progress.as_ref();
                async move {
                    let sha = self
                        .remote
                        .create_blob(NewBlob::from_bytes(content, is_binary))
                        .await
                        .map_err(|source| PublishError::Blob {
                            path: path.to_string(),
                            source,
                        })?;

                    if sha == *expected {
                        debug!(path, sha = %sha.short(), bytes = content.len(), "uploaded blob");
                    } else {
                        warn!(
                            path,
                            expected = %expected,
                            actual = %sha,
                            "remote assigned a different blob id"
                        );
                    }
                    if let Some(pb) = progress {
                        pb.inc(content.len() as u64);
                    }
                    Ok::<_, PublishError>((path, sha))
                }
            })
            .buffer_unordered(self.options.upload_concurrency())
            .try_collect()
            .await;

        if let Some(pb) = progress {
            pb.finish_and_clear();
        }

        uploaded
    }

    async fn check_tip(&self, request: &PublishRequest<'_>) -> EngineResult<()> {
        let branch = request.branch;
        let actual = self
            .guarded("tip check", async {
                self.remote.resolve_ref(branch).await.map_err(|source| {
                    SyncError::from(PublishError::TipCheck {
                        branch: branch.to_string(),
                        source,
                    })
                })
            })
            .await?;

        if actual != *request.base_commit {
            return Err(PublishError::BranchMoved {
                branch: branch.to_string(),
                expected: request.base_commit.to_string(),
                actual: actual.to_string(),
            }
            .into());
        }
        Ok(())
    }
}

/// Tree entries in action order. Replace entries use the id the remote
/// returned for the upload. Keep entries are left to `base_tree`, which
/// also preserves their remote mode.
fn tree_entries(actions: &[PublishAction], uploaded: &HashMap<&str, ObjectId>) -> Vec<NewTreeEntry> {
    actions
        .iter()
        .filter_map(|action| match action {
            PublishAction::Keep { .. } => None,
            PublishAction::Replace {
                path, object_id, ..
            } => {
                let sha = uploaded.get(path.as_str()).unwrap_or(object_id);
                Some(NewTreeEntry::blob(path.clone(), sha.clone()))
            }
            PublishAction::Delete { path } => Some(NewTreeEntry::deletion(path.clone())),
        })
        .collect()
}
