// treesync: Remote Tree Synchronization Engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Tree reconciler.
//!
//! ```text
//! remaining = copy(snapshot)
//! for each local file:
//!     absent from remaining          --> Replace (new)
//!     matches original or normalized --> Keep,    remove from remaining
//!     otherwise                      --> Replace, remove from remaining
//! for each path left in remaining    --> Delete
//! ```
//!
//! The local set is the full desired state of the branch: any remote path
//! not supplied locally is deleted. An empty local set deletes everything.

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, trace};

use super::hasher;
use super::types::{LocalCandidate, PublishAction, RemoteTreeSnapshot};
use crate::error::HashingError;

/// Lexically resolves `.` and `..` without touching the filesystem.
fn lexical_normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Maps a local path (absolute or relative to `base_dir`) to its absolute
/// location and its slash-separated repository path.
///
/// # Errors
///
/// Returns [`HashingError::OutsideBaseDir`] if the path does not resolve to a
/// file below `base_dir`, or [`HashingError::NonUtf8Path`] if a component
/// below `base_dir` is not valid UTF-8.
pub fn repo_path(base_dir: &Path, path: &Path) -> Result<(PathBuf, String), HashingError> {
    let base = lexical_normalize(base_dir);
    let absolute = lexical_normalize(&base.join(path));

    let outside = || HashingError::OutsideBaseDir {
        path: path.display().to_string(),
        base_dir: base_dir.display().to_string(),
    };

    let relative = absolute.strip_prefix(&base).map_err(|_| outside())?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| match c {
            Component::Normal(part) => {
                part.to_str()
                    .map(str::to_string)
                    .ok_or_else(|| HashingError::NonUtf8Path {
                        path: path.display().to_string(),
                    })
            }
            _ => Err(outside()),
        })
        .collect::<Result<_, _>>()?;

    if parts.is_empty() {
        return Err(outside());
    }

    Ok((absolute, parts.join("/")))
}

/// Reads every local path into a [`LocalCandidate`], preserving input order.
///
/// # Errors
///
/// Returns a [`HashingError`] if a path is outside `base_dir`, maps to a
/// repository path already seen, or cannot be read.
pub async fn read_candidates<P>(
    base_dir: &Path,
    local_paths: &[P],
) -> Result<Vec<LocalCandidate>, HashingError>
where
    P: AsRef<Path>,
{
    let mut seen = HashSet::with_capacity(local_paths.len());
    let mut candidates = Vec::with_capacity(local_paths.len());

    for path in local_paths {
        let (absolute, repo_path) = repo_path(base_dir, path.as_ref())?;

        if !seen.insert(repo_path.clone()) {
            return Err(HashingError::DuplicatePath { path: repo_path });
        }

        let bytes = tokio::fs::read(&absolute)
            .await
            .map_err(|source| HashingError::Read {
                path: absolute.display().to_string(),
                source,
            })?;

        trace!(path = %repo_path, bytes = bytes.len(), "read local candidate");
        candidates.push(LocalCandidate::new(absolute, repo_path, bytes));
    }

    Ok(candidates)
}

/// Classifies candidates against the snapshot.
///
/// Output order: candidates in input order, then deletions in path order.
#[must_use]
pub fn classify(snapshot: &RemoteTreeSnapshot, candidates: &[LocalCandidate]) -> Vec<PublishAction> {
    let mut remaining = snapshot.working_copy();
    let mut actions = Vec::with_capacity(candidates.len() + remaining.len());

    for candidate in candidates {
        let path = candidate.repo_path();
        let digest = hasher::hash(candidate.bytes());

        if let Some(existing) = remaining.remove(path) {
            if digest.matches(&existing) {
                actions.push(PublishAction::Keep {
                    path: path.to_string(),
                    object_id: existing,
                });
                continue;
            }
            debug!(
                path,
                existing = %existing,
                original = %digest.original_id(),
                normalized = %digest.normalized_id(),
                "content changed"
            );
        } else {
            debug!(path, "new file");
        }

        let is_binary = digest.is_binary();
        let (object_id, content) = digest.into_upload();
        actions.push(PublishAction::Replace {
            path: path.to_string(),
            object_id,
            content: content.into_owned(),
            is_binary,
        });
    }

    actions.extend(
        remaining
            .into_keys()
            .map(|path| PublishAction::Delete { path }),
    );

    actions
}

/// Reads local files and classifies them against the snapshot.
///
/// # Errors
///
/// Returns a [`HashingError`] before any network call if a local path is
/// unusable.
pub async fn reconcile<P>(
    snapshot: &RemoteTreeSnapshot,
    base_dir: &Path,
    local_paths: &[P],
) -> Result<Vec<PublishAction>, HashingError>
where
    P: AsRef<Path>,
{
    let candidates = read_candidates(base_dir, local_paths).await?;
    Ok(classify(snapshot, &candidates))
}
