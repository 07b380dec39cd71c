// treesync: Remote Tree Synchronization Engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Remote tree reader.
//!
//! ```text
//! heads/<branch> --resolve_ref--> commit --get_commit--> tree
//!      --get_tree_recursive--> [blob | tree | commit]
//!      --keep blobs--> RemoteTreeSnapshot
//! ```

use tracing::{debug, info};

use super::types::{RemoteTreeEntry, RemoteTreeSnapshot};
use crate::error::RemoteReadError;
use crate::remote::{GitRemote, TreeItemKind};

/// Reads the full blob listing at the tip of `branch`.
///
/// Subtrees are dropped (their blobs carry full paths) and submodule entries
/// are skipped. Nothing is retried here.
///
/// # Errors
///
/// Returns a [`RemoteReadError`] if the branch, commit or tree cannot be
/// resolved, or if the service truncated the listing.
pub async fn fetch_snapshot<R>(
    remote: &R,
    branch: &str,
) -> Result<RemoteTreeSnapshot, RemoteReadError>
where
    R: GitRemote + ?Sized,
{
    let commit_id = remote.resolve_ref(branch).await.map_err(|source| {
        if source.is_not_found() {
            RemoteReadError::BranchNotFound {
                branch: branch.to_string(),
            }
        } else {
            RemoteReadError::Ref {
                branch: branch.to_string(),
                source,
            }
        }
    })?;

    let commit = remote
        .get_commit(&commit_id)
        .await
        .map_err(|source| RemoteReadError::Commit {
            commit: commit_id.to_string(),
            source,
        })?;

    let listing =
        remote
            .get_tree_recursive(&commit.tree)
            .await
            .map_err(|source| RemoteReadError::Tree {
                tree: commit.tree.to_string(),
                source,
            })?;

    if listing.truncated {
        return Err(RemoteReadError::Truncated {
            branch: branch.to_string(),
            tree: commit.tree.to_string(),
        });
    }

    let entries = listing.items.into_iter().filter_map(|item| match item.kind {
        TreeItemKind::Blob => Some(RemoteTreeEntry::new(item.path, item.sha)),
        TreeItemKind::Tree => None,
        TreeItemKind::Commit => {
            debug!(path = %item.path, "skipping submodule entry");
            None
        }
    });

    let snapshot = RemoteTreeSnapshot::new(branch, commit_id, commit.tree, entries);

    info!(
        branch,
        commit = %snapshot.commit_id().short(),
        files = snapshot.len(),
        "read remote snapshot"
    );

    Ok(snapshot)
}
