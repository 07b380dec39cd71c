// treesync: Remote Tree Synchronization Engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!                SyncError (~24 bytes)
//!                       |
//!   +--------+-------+--+-----+--------+------+----+
//!   |        |       |        |        |      |    |
//!   v        v       v        v        v      v    v
//! Remote  Hashing Publish RefUpdate Config  Io  Cancelled/
//!  Read     Box     Box      Box      Box   Box  Other
//!  Box
//!
//! Stage errors wrap the transport-level RemoteError:
//!   RemoteRead  BranchNotFound, Ref, Commit, Tree, Truncated
//!   Hashing     Read, OutsideBaseDir, DuplicatePath
//!   Publish     Blob, Tree, Commit, TipCheck, BranchMoved
//!   RefUpdate   branch + attempted commit + cause
//!   Remote      Http, Transport, Decode, InvalidObjectId
//! ```
//!
//! Everything before the ref update leaves the remote branch untouched, so
//! [`SyncError::is_retryable_from_scratch`] is true for those stages. A
//! [`RefUpdateError`] means objects exist and the branch may or may not have
//! moved.

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`SyncError`].
pub type EngineResult<T> = std::result::Result<T, SyncError>;

/// Top-level engine error type.
///
/// All sub-errors are boxed to keep this enum at ~24 bytes on the stack.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Reading the branch snapshot failed. No remote mutation occurred.
    #[error("remote read error: {0}")]
    RemoteRead(#[from] Box<RemoteReadError>),

    /// A local file could not be read or placed. No network call was made.
    #[error("hashing error: {0}")]
    Hashing(#[from] Box<HashingError>),

    /// Creating blobs, tree or commit failed. The branch is unchanged.
    #[error("publish error: {0}")]
    Publish(#[from] Box<PublishError>),

    /// Moving the branch failed after objects were created.
    #[error("ref update error: {0}")]
    RefUpdate(#[from] Box<RefUpdateError>),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// The pipeline was cancelled before the ref update was issued.
    #[error("sync cancelled during {0}")]
    Cancelled(&'static str),

    /// I/O error.
    #[error("io error: {0}")]
    Io(Box<std::io::Error>),

    /// Generic error with message.
    #[error("{0}")]
    Other(Box<str>),
}

impl SyncError {
    /// Whether the remote branch is known to be untouched, so the whole sync
    /// can simply be run again from a fresh snapshot.
    #[must_use]
    pub const fn is_retryable_from_scratch(&self) -> bool {
        matches!(
            self,
            Self::RemoteRead(_) | Self::Publish(_) | Self::Cancelled(_)
        )
    }

    /// Commit id that may or may not have become the branch tip.
    #[must_use]
    pub fn attempted_commit(&self) -> Option<&str> {
        match self {
            Self::RefUpdate(err) => Some(&err.commit),
            _ => None,
        }
    }
}

// --- From implementations for boxing ---

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for SyncError {
                fn from(err: $error) -> Self {
                    SyncError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    RemoteReadError => RemoteRead,
    HashingError => Hashing,
    PublishError => Publish,
    RefUpdateError => RefUpdate,
    ConfigError => Config,
    std::io::Error => Io,
}

// --- Remote (transport) Errors ---

/// Failure talking to the hosted git service.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Non-success HTTP response.
    #[error("http error {status}: {url} ({message})")]
    Http {
        status: u16,
        url: String,
        message: String,
    },

    /// Connection, TLS or timeout failure from reqwest.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body did not have the expected shape.
    #[error("failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },

    /// A request URL could not be built from the configured API root.
    #[error("invalid url {url}: {message}")]
    InvalidUrl { url: String, message: String },

    /// The service returned something that is not a 40-hex object id.
    #[error("invalid object id: '{0}'")]
    InvalidObjectId(String),
}

impl RemoteError {
    /// HTTP status of the failed response, if there was one.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the service reported the object as missing.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self.status(), Some(404))
    }
}

// --- Remote Read Errors ---

/// Errors while building a [`RemoteTreeSnapshot`](crate::engine::RemoteTreeSnapshot).
#[derive(Debug, Error)]
pub enum RemoteReadError {
    /// The branch does not exist on the remote.
    #[error("branch not found: {branch}")]
    BranchNotFound { branch: String },

    /// Resolving the branch to its tip commit failed.
    #[error("failed to resolve branch {branch}: {source}")]
    Ref {
        branch: String,
        #[source]
        source: RemoteError,
    },

    /// Fetching the tip commit failed.
    #[error("failed to read commit {commit}: {source}")]
    Commit {
        commit: String,
        #[source]
        source: RemoteError,
    },

    /// Fetching the recursive tree listing failed.
    #[error("failed to read tree {tree}: {source}")]
    Tree {
        tree: String,
        #[source]
        source: RemoteError,
    },

    /// The service returned a partial listing.
    #[error("tree {tree} of branch {branch} was truncated by the remote")]
    Truncated { branch: String, tree: String },
}

// --- Hashing Errors ---

/// Local candidate errors, raised before any network call.
#[derive(Debug, Error)]
pub enum HashingError {
    /// The file could not be read.
    #[error("failed to read '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The file does not live under the base directory.
    #[error("'{path}' is outside base directory '{base_dir}'")]
    OutsideBaseDir { path: String, base_dir: String },

    /// Two local paths map to the same repository path.
    #[error("duplicate repository path: {path}")]
    DuplicatePath { path: String },

    /// A path component is not valid UTF-8 and has no repository name.
    #[error("path is not valid UTF-8: {path}")]
    NonUtf8Path { path: String },
}

// --- Publish Errors ---

/// Failures while creating objects, before the branch is touched.
#[derive(Debug, Error)]
pub enum PublishError {
    /// Uploading a blob failed.
    #[error("failed to create blob for {path}: {source}")]
    Blob {
        path: String,
        #[source]
        source: RemoteError,
    },

    /// Creating the tree failed.
    #[error("failed to create tree for {branch}: {source}")]
    Tree {
        branch: String,
        #[source]
        source: RemoteError,
    },

    /// Creating the commit failed.
    #[error("failed to create commit on {branch}: {source}")]
    Commit {
        branch: String,
        #[source]
        source: RemoteError,
    },

    /// Re-reading the branch tip before the ref update failed.
    #[error("failed to re-read tip of {branch}: {source}")]
    TipCheck {
        branch: String,
        #[source]
        source: RemoteError,
    },

    /// The branch moved since the snapshot was read.
    #[error("branch {branch} moved from {expected} to {actual}; re-run from a fresh snapshot")]
    BranchMoved {
        branch: String,
        expected: String,
        actual: String,
    },
}

// --- Ref Update Errors ---

/// The final ref move failed. Objects were created; the ref state is unknown.
#[derive(Debug, Error)]
#[error("failed to move {branch} to {commit}: {source}")]
pub struct RefUpdateError {
    pub branch: String,
    pub commit: String,
    #[source]
    pub source: RemoteError,
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse configuration sources.
    #[error("failed to parse config: {message}")]
    ParseError { message: String },

    /// Missing required configuration key.
    #[error("missing required config key '{key}' in section '[{section}]'")]
    MissingKey { section: String, key: String },

    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },

    /// Named sync target does not exist.
    #[error("unknown sync target: {0}")]
    UnknownTarget(String),
}
