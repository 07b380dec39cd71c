// treesync: Remote Tree Synchronization Engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Engine data model.
//!
//! ```text
//! RemoteTreeSnapshot  branch + commit + tree + {path -> RemoteTreeEntry}
//! LocalCandidate      absolute path + repo path + raw bytes
//! PublishAction       Keep | Replace | Delete
//! SyncOutcome         Committed { commit } | NoOp
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use crate::error::RemoteError;

/// Mode string for regular (non-executable) files in a git tree.
pub const REGULAR_FILE_MODE: &str = "100644";

/// Git object id: 40 lowercase hex characters (SHA-1).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectId(String);

impl ObjectId {
    /// Length of a hex-encoded SHA-1.
    pub const HEX_LEN: usize = 40;

    /// Parses a hex object id. Uppercase input is accepted and lowercased.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::InvalidObjectId`] if the input is not 40 hex digits.
    pub fn parse(s: &str) -> Result<Self, RemoteError> {
        if s.len() == Self::HEX_LEN && s.bytes().all(|b| b.is_ascii_hexdigit()) {
            Ok(Self(s.to_ascii_lowercase()))
        } else {
            Err(RemoteError::InvalidObjectId(s.to_string()))
        }
    }

    /// Builds an id from a raw 20-byte digest.
    #[must_use]
    pub fn from_digest(digest: &[u8]) -> Self {
        Self(hex::encode(digest))
    }

    /// Returns the hex string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First seven characters, as git abbreviates.
    #[must_use]
    pub fn short(&self) -> &str {
        &self.0[..7]
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ObjectId {
    type Error = RemoteError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ObjectId> for String {
    fn from(id: ObjectId) -> Self {
        id.0
    }
}

impl std::str::FromStr for ObjectId {
    type Err = RemoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// One blob in a branch's committed tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteTreeEntry {
    path: String,
    object_id: ObjectId,
}

impl RemoteTreeEntry {
    #[must_use]
    pub const fn new(path: String, object_id: ObjectId) -> Self {
        Self { path, object_id }
    }

    /// Slash-separated path relative to the repository root.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub const fn object_id(&self) -> &ObjectId {
        &self.object_id
    }

    /// Entries are always published as regular files.
    #[must_use]
    pub const fn mode(&self) -> &'static str {
        REGULAR_FILE_MODE
    }
}

/// Full recursive blob listing of one branch tip.
///
/// Built once per sync and never mutated; the reconciler works on a copy.
#[derive(Debug, Clone)]
pub struct RemoteTreeSnapshot {
    branch: String,
    commit_id: ObjectId,
    tree_id: ObjectId,
    entries: BTreeMap<String, RemoteTreeEntry>,
}

impl RemoteTreeSnapshot {
    /// Creates a snapshot. Later entries with a duplicate path replace earlier ones.
    pub fn new(
        branch: impl Into<String>,
        commit_id: ObjectId,
        tree_id: ObjectId,
        entries: impl IntoIterator<Item = RemoteTreeEntry>,
    ) -> Self {
        Self {
            branch: branch.into(),
            commit_id,
            tree_id,
            entries: entries
                .into_iter()
                .map(|entry| (entry.path.clone(), entry))
                .collect(),
        }
    }

    #[must_use]
    pub fn branch(&self) -> &str {
        &self.branch
    }

    /// Tip commit the snapshot was read from.
    #[must_use]
    pub const fn commit_id(&self) -> &ObjectId {
        &self.commit_id
    }

    /// Root tree of the tip commit.
    #[must_use]
    pub const fn tree_id(&self) -> &ObjectId {
        &self.tree_id
    }

    #[must_use]
    pub fn get(&self, path: &str) -> Option<&RemoteTreeEntry> {
        self.entries.get(path)
    }

    /// Entries in path order.
    pub fn entries(&self) -> impl Iterator<Item = &RemoteTreeEntry> {
        self.entries.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Mutable working copy (path -> object id) for reconciliation.
    #[must_use]
    pub fn working_copy(&self) -> BTreeMap<String, ObjectId> {
        self.entries
            .iter()
            .map(|(path, entry)| (path.clone(), entry.object_id.clone()))
            .collect()
    }
}

/// A local file read for reconciliation.
#[derive(Debug, Clone)]
pub struct LocalCandidate {
    absolute_path: PathBuf,
    repo_path: String,
    bytes: Vec<u8>,
}

impl LocalCandidate {
    #[must_use]
    pub const fn new(absolute_path: PathBuf, repo_path: String, bytes: Vec<u8>) -> Self {
        Self {
            absolute_path,
            repo_path,
            bytes,
        }
    }

    #[must_use]
    pub const fn absolute_path(&self) -> &PathBuf {
        &self.absolute_path
    }

    /// Slash-separated path relative to the base directory.
    #[must_use]
    pub fn repo_path(&self) -> &str {
        &self.repo_path
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// What the publisher must do with one path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishAction {
    /// Unchanged; reuse the committed blob.
    Keep { path: String, object_id: ObjectId },
    /// New or changed; upload `content`, which hashes to `object_id`.
    Replace {
        path: String,
        object_id: ObjectId,
        content: Vec<u8>,
        is_binary: bool,
    },
    /// Present remotely but not locally; drop from the tree.
    Delete { path: String },
}

impl PublishAction {
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::Keep { path, .. } | Self::Replace { path, .. } | Self::Delete { path } => path,
        }
    }

    /// Object id the path will have after publishing (`None` for deletions).
    #[must_use]
    pub const fn object_id(&self) -> Option<&ObjectId> {
        match self {
            Self::Keep { object_id, .. } | Self::Replace { object_id, .. } => Some(object_id),
            Self::Delete { .. } => None,
        }
    }

    /// Whether this action changes the tree.
    #[must_use]
    pub const fn is_change(&self) -> bool {
        !matches!(self, Self::Keep { .. })
    }

    /// Short lowercase label used in logs and plan output.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Keep { .. } => "keep",
            Self::Replace { .. } => "replace",
            Self::Delete { .. } => "delete",
        }
    }
}

impl fmt::Display for PublishAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keep { path, object_id } => write!(f, "keep    {path} ({})", object_id.short()),
            Self::Replace {
                path,
                object_id,
                content,
                is_binary,
            } => {
                let kind = if *is_binary { "binary" } else { "text" };
                write!(
                    f,
                    "replace {path} ({}, {} bytes, {kind})",
                    object_id.short(),
                    content.len()
                )
            }
            Self::Delete { path } => write!(f, "delete  {path}"),
        }
    }
}

/// Counts for one reconciled action list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncStats {
    pub kept: usize,
    pub replaced: usize,
    pub deleted: usize,
    pub uploaded_bytes: u64,
}

impl SyncStats {
    #[must_use]
    pub fn from_actions(actions: &[PublishAction]) -> Self {
        actions.iter().fold(Self::default(), |mut stats, action| {
            match action {
                PublishAction::Keep { .. } => stats.kept += 1,
                PublishAction::Replace { content, .. } => {
                    stats.replaced += 1;
                    stats.uploaded_bytes += content.len() as u64;
                }
                PublishAction::Delete { .. } => stats.deleted += 1,
            }
            stats
        })
    }

    /// Whether any Replace or Delete is present.
    #[must_use]
    pub const fn has_changes(&self) -> bool {
        self.replaced > 0 || self.deleted > 0
    }
}

/// Terminal outcome of one engine invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// A commit was created and the branch now points at it.
    Committed {
        branch: String,
        commit_id: ObjectId,
        tree_id: ObjectId,
        stats: SyncStats,
    },
    /// Everything matched; no network calls were made to publish.
    NoOp { branch: String, stats: SyncStats },
}

impl SyncOutcome {
    #[must_use]
    pub fn branch(&self) -> &str {
        match self {
            Self::Committed { branch, .. } | Self::NoOp { branch, .. } => branch,
        }
    }

    /// New branch tip, if a commit was created.
    #[must_use]
    pub const fn commit_id(&self) -> Option<&ObjectId> {
        match self {
            Self::Committed { commit_id, .. } => Some(commit_id),
            Self::NoOp { .. } => None,
        }
    }

    #[must_use]
    pub const fn stats(&self) -> &SyncStats {
        match self {
            Self::Committed { stats, .. } | Self::NoOp { stats, .. } => stats,
        }
    }

    #[must_use]
    pub const fn is_noop(&self) -> bool {
        matches!(self, Self::NoOp { .. })
    }
}

impl fmt::Display for SyncOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Committed {
                branch, commit_id, ..
            } => write!(f, "commit created, ref {branch} updated to {commit_id}"),
            Self::NoOp { .. } => f.write_str("no-op: no actions required"),
        }
    }
}
