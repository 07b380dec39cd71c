// treesync: Remote Tree Synchronization Engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Hosted git service abstraction.
//!
//! ```text
//!            GitRemote (trait)
//!   read:   resolve_ref  get_commit  get_tree_recursive
//!   write:  create_blob  create_tree  create_commit  update_ref
//!                 |
//!        +--------+---------+
//!        v                  v
//!   GithubRemote        MemoryRemote
//!   (reqwest, REST)     (tests only)
//! ```
//!
//! Methods return `BoxFuture` so the trait stays object safe and the engine
//! can drive several blob uploads at once.

pub mod github;

#[cfg(test)]
pub(crate) mod fake;


use base64::Engine as _;
use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

use crate::engine::{ObjectId, REGULAR_FILE_MODE};
use crate::error::RemoteError;

pub use github::GithubRemote;

/// A commit as read from the remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    pub sha: ObjectId,
    pub tree: ObjectId,
    pub parents: Vec<ObjectId>,
}

/// Object kind of a tree listing item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeItemKind {
    Blob,
    Tree,
    /// Submodule gitlink.
    Commit,
}

/// One item of a recursive tree listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TreeItem {
    pub path: String,
    pub mode: String,
    #[serde(rename = "type")]
    pub kind: TreeItemKind,
    pub sha: ObjectId,
}

/// Recursive tree listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TreeListing {
    pub sha: ObjectId,
    #[serde(rename = "tree")]
    pub items: Vec<TreeItem>,
    /// Set when the service cut the listing short.
    #[serde(default)]
    pub truncated: bool,
}

/// Transfer encoding for blob content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BlobEncoding {
    #[serde(rename = "utf-8")]
    Utf8,
    #[serde(rename = "base64")]
    Base64,
}

/// Blob creation request body.
#[derive(Debug, Clone, Serialize)]
pub struct NewBlob<'a> {
    pub content: Cow<'a, str>,
    pub encoding: BlobEncoding,
}

impl<'a> NewBlob<'a> {
    /// Binary content, and text that is not valid UTF-8, goes as base64.
    #[must_use]
    pub fn from_bytes(bytes: &'a [u8], is_binary: bool) -> Self {
        if !is_binary && let Ok(text) = std::str::from_utf8(bytes) {
            return Self {
                content: Cow::Borrowed(text),
                encoding: BlobEncoding::Utf8,
            };
        }
        Self {
            content: Cow::Owned(base64::engine::general_purpose::STANDARD.encode(bytes)),
            encoding: BlobEncoding::Base64,
        }
    }

    /// Decodes the payload back to raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::Decode`] if base64 content is malformed.
    pub fn to_bytes(&self) -> Result<Vec<u8>, RemoteError> {
        match self.encoding {
            BlobEncoding::Utf8 => Ok(self.content.as_bytes().to_vec()),
            BlobEncoding::Base64 => base64::engine::general_purpose::STANDARD
                .decode(self.content.as_bytes())
                .map_err(|e| RemoteError::Decode {
                    url: "<blob>".to_string(),
                    message: e.to_string(),
                }),
        }
    }
}

/// One entry of a tree creation request.
///
/// `sha: None` serializes as `null`, which removes the path from the base tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewTreeEntry {
    pub path: String,
    pub mode: &'static str,
    #[serde(rename = "type")]
    pub kind: TreeItemKind,
    pub sha: Option<ObjectId>,
}

impl NewTreeEntry {
    /// A regular-file blob entry.
    #[must_use]
    pub const fn blob(path: String, sha: ObjectId) -> Self {
        Self {
            path,
            mode: REGULAR_FILE_MODE,
            kind: TreeItemKind::Blob,
            sha: Some(sha),
        }
    }

    /// A deletion marker.
    #[must_use]
    pub const fn deletion(path: String) -> Self {
        Self {
            path,
            mode: REGULAR_FILE_MODE,
            kind: TreeItemKind::Blob,
            sha: None,
        }
    }
}

/// Commit creation request.
#[derive(Debug, Clone, Serialize)]
pub struct NewCommit<'a> {
    pub message: &'a str,
    pub tree: &'a ObjectId,
    pub parents: Vec<&'a ObjectId>,
}

/// Operations consumed from the hosted git service.
pub trait GitRemote: Send + Sync {
    /// Resolves `heads/<branch>` to its tip commit.
    ///
    /// # Errors
    ///
    /// Returns a [`RemoteError`]; a missing branch is an HTTP 404.
    fn resolve_ref<'a>(&'a self, branch: &'a str) -> BoxFuture<'a, Result<ObjectId, RemoteError>>;

    /// Reads a commit's tree and parents.
    ///
    /// # Errors
    ///
    /// Returns a [`RemoteError`] if the commit cannot be read.
    fn get_commit<'a>(&'a self, sha: &'a ObjectId)
    -> BoxFuture<'a, Result<CommitInfo, RemoteError>>;

    /// Lists a tree recursively in one request.
    ///
    /// # Errors
    ///
    /// Returns a [`RemoteError`] if the tree cannot be read.
    fn get_tree_recursive<'a>(
        &'a self,
        sha: &'a ObjectId,
    ) -> BoxFuture<'a, Result<TreeListing, RemoteError>>;

    /// Uploads a blob and returns its id.
    ///
    /// # Errors
    ///
    /// Returns a [`RemoteError`] if the upload is rejected.
    fn create_blob<'a>(&'a self, blob: NewBlob<'a>) -> BoxFuture<'a, Result<ObjectId, RemoteError>>;

    /// Creates a tree from `entries` layered over `base_tree`.
    ///
    /// # Errors
    ///
    /// Returns a [`RemoteError`] if the tree is rejected.
    fn create_tree<'a>(
        &'a self,
        base_tree: &'a ObjectId,
        entries: &'a [NewTreeEntry],
    ) -> BoxFuture<'a, Result<ObjectId, RemoteError>>;

    /// Creates a commit and returns its id.
    ///
    /// # Errors
    ///
    /// Returns a [`RemoteError`] if the commit is rejected.
    fn create_commit<'a>(
        &'a self,
        commit: NewCommit<'a>,
    ) -> BoxFuture<'a, Result<ObjectId, RemoteError>>;

    /// Moves `heads/<branch>` to `sha` without forcing.
    ///
    /// # Errors
    ///
    /// Returns a [`RemoteError`]; a non-fast-forward is an HTTP 422.
    fn update_ref<'a>(
        &'a self,
        branch: &'a str,
        sha: &'a ObjectId,
    ) -> BoxFuture<'a, Result<(), RemoteError>>;
}
