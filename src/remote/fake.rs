// treesync: Remote Tree Synchronization Engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! In-memory [`GitRemote`] for engine tests.
//!
//! Stores blobs, trees and commits keyed by real or synthetic ids and records
//! every call so tests can assert on network traffic.

use futures_util::future::BoxFuture;
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use super::{
    CommitInfo, GitRemote, NewBlob, NewCommit, NewTreeEntry, TreeItem, TreeItemKind, TreeListing,
};
use crate::engine::hasher::blob_id;
use crate::engine::{ObjectId, REGULAR_FILE_MODE};
use crate::error::RemoteError;

/// Remote operation, for call recording and failure injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Op {
    ResolveRef,
    GetCommit,
    GetTree,
    CreateBlob,
    CreateTree,
    CreateCommit,
    UpdateRef,
}

#[derive(Debug, Default)]
struct State {
    branches: HashMap<String, ObjectId>,
    commits: HashMap<ObjectId, CommitInfo>,
    messages: HashMap<ObjectId, String>,
    trees: HashMap<ObjectId, BTreeMap<String, ObjectId>>,
    blobs: HashMap<ObjectId, Vec<u8>>,
    calls: Vec<Op>,
    fail: Option<Op>,
    truncate_trees: bool,
    move_tip_on_commit: Option<ObjectId>,
}

#[derive(Debug, Default)]
pub(crate) struct MemoryRemote {
    state: Mutex<State>,
}

fn synthetic_id(seed: &str) -> ObjectId {
    blob_id(seed.as_bytes())
}

fn injected(op: Op) -> RemoteError {
    RemoteError::Http {
        status: 500,
        url: format!("memory://{op:?}"),
        message: "injected failure".to_string(),
    }
}

fn not_found(what: &str) -> RemoteError {
    RemoteError::Http {
        status: 404,
        url: format!("memory://{what}"),
        message: "Not Found".to_string(),
    }
}

impl MemoryRemote {
    /// Creates a remote with `branch` pointing at a root commit holding `files`.
    pub(crate) fn with_branch(branch: &str, files: &[(&str, &[u8])]) -> Self {
        let remote = Self::default();
        {
            let mut state = remote.lock();
            let mut tree = BTreeMap::new();
            for (path, bytes) in files {
                let id = blob_id(bytes);
                state.blobs.insert(id.clone(), bytes.to_vec());
                tree.insert((*path).to_string(), id);
            }
            let tree_id = Self::store_tree(&mut state, tree);
            let commit_id = synthetic_id(&format!("root commit {tree_id}"));
            state.commits.insert(
                commit_id.clone(),
                CommitInfo {
                    sha: commit_id.clone(),
                    tree: tree_id,
                    parents: Vec::new(),
                },
            );
            state.branches.insert(branch.to_string(), commit_id);
        }
        remote
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn store_tree(state: &mut State, tree: BTreeMap<String, ObjectId>) -> ObjectId {
        let listing: String = tree
            .iter()
            .map(|(path, id)| format!("{path} {id}\n"))
            .collect();
        let id = synthetic_id(&format!("tree\n{listing}"));
        state.trees.insert(id.clone(), tree);
        id
    }

    /// Makes the next call of `op` fail with HTTP 500.
    pub(crate) fn fail_on(&self, op: Op) {
        self.lock().fail = Some(op);
    }

    /// Makes tree listings report `truncated: true`.
    pub(crate) fn truncate_trees(&self) {
        self.lock().truncate_trees = true;
    }

    /// Simulates a concurrent writer moving the branch once a commit is created.
    pub(crate) fn move_tip_on_commit(&self, to: ObjectId) {
        self.lock().move_tip_on_commit = Some(to);
    }

    pub(crate) fn calls(&self) -> Vec<Op> {
        self.lock().calls.clone()
    }

    pub(crate) fn count(&self, op: Op) -> usize {
        self.lock().calls.iter().filter(|c| **c == op).count()
    }

    pub(crate) fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    pub(crate) fn tip(&self, branch: &str) -> Option<ObjectId> {
        self.lock().branches.get(branch).cloned()
    }

    pub(crate) fn message(&self, commit: &ObjectId) -> Option<String> {
        self.lock().messages.get(commit).cloned()
    }

    pub(crate) fn commit(&self, commit: &ObjectId) -> Option<CommitInfo> {
        self.lock().commits.get(commit).cloned()
    }

    /// Files (path -> bytes) at the tip of `branch`.
    pub(crate) fn files(&self, branch: &str) -> BTreeMap<String, Vec<u8>> {
        let state = self.lock();
        let Some(tree) = state
            .branches
            .get(branch)
            .and_then(|c| state.commits.get(c))
            .and_then(|c| state.trees.get(&c.tree))
        else {
            return BTreeMap::new();
        };
        tree.iter()
            .map(|(path, id)| {
                (
                    path.clone(),
                    state.blobs.get(id).cloned().unwrap_or_default(),
                )
            })
            .collect()
    }

    fn begin(&self, op: Op) -> Result<std::sync::MutexGuard<'_, State>, RemoteError> {
        let mut state = self.lock();
        state.calls.push(op);
        if state.fail == Some(op) {
            state.fail = None;
            return Err(injected(op));
        }
        Ok(state)
    }
}

impl GitRemote for MemoryRemote {
    fn resolve_ref<'a>(&'a self, branch: &'a str) -> BoxFuture<'a, Result<ObjectId, RemoteError>> {
        Box::pin(async move {
            let state = self.begin(Op::ResolveRef)?;
            state
                .branches
                .get(branch)
                .cloned()
                .ok_or_else(|| not_found(branch))
        })
    }

    fn get_commit<'a>(
        &'a self,
        sha: &'a ObjectId,
    ) -> BoxFuture<'a, Result<CommitInfo, RemoteError>> {
        Box::pin(async move {
            let state = self.begin(Op::GetCommit)?;
            state
                .commits
                .get(sha)
                .cloned()
                .ok_or_else(|| not_found(sha.as_str()))
        })
    }

    fn get_tree_recursive<'a>(
        &'a self,
        sha: &'a ObjectId,
    ) -> BoxFuture<'a, Result<TreeListing, RemoteError>> {
        Box::pin(async move {
            let state = self.begin(Op::GetTree)?;
            let tree = state.trees.get(sha).ok_or_else(|| not_found(sha.as_str()))?;
            Ok(TreeListing {
                sha: sha.clone(),
                items: tree
                    .iter()
                    .map(|(path, id)| TreeItem {
                        path: path.clone(),
                        mode: REGULAR_FILE_MODE.to_string(),
                        kind: TreeItemKind::Blob,
                        sha: id.clone(),
                    })
                    .collect(),
                truncated: state.truncate_trees,
            })
        })
    }

    fn create_blob<'a>(&'a self, blob: NewBlob<'a>) -> BoxFuture<'a, Result<ObjectId, RemoteError>> {
        Box::pin(async move {
            let mut state = self.begin(Op::CreateBlob)?;
            let bytes = blob.to_bytes()?;
            let id = blob_id(&bytes);
            state.blobs.insert(id.clone(), bytes);
            Ok(id)
        })
    }

    fn create_tree<'a>(
        &'a self,
        base_tree: &'a ObjectId,
        entries: &'a [NewTreeEntry],
    ) -> BoxFuture<'a, Result<ObjectId, RemoteError>> {
        Box::pin(async move {
            let mut state = self.begin(Op::CreateTree)?;
            let mut tree = state
                .trees
                .get(base_tree)
                .cloned()
                .ok_or_else(|| not_found(base_tree.as_str()))?;
            for entry in entries {
                match &entry.sha {
                    Some(sha) => {
                        tree.insert(entry.path.clone(), sha.clone());
                    }
                    None => {
                        tree.remove(&entry.path);
                    }
                }
            }
            Ok(Self::store_tree(&mut state, tree))
        })
    }

    fn create_commit<'a>(
        &'a self,
        commit: NewCommit<'a>,
    ) -> BoxFuture<'a, Result<ObjectId, RemoteError>> {
        Box::pin(async move {
            let mut state = self.begin(Op::CreateCommit)?;
            let parents: Vec<ObjectId> = commit.parents.iter().map(|p| (*p).clone()).collect();
            let seed = format!(
                "commit {} {:?} {}",
                commit.tree,
                parents,
                commit.message
            );
            let id = synthetic_id(&seed);
            state.commits.insert(
                id.clone(),
                CommitInfo {
                    sha: id.clone(),
                    tree: commit.tree.clone(),
                    parents,
                },
            );
            state.messages.insert(id.clone(), commit.message.to_string());
            if let Some(moved) = state.move_tip_on_commit.take() {
                for tip in state.branches.values_mut() {
                    *tip = moved.clone();
                }
            }
            Ok(id)
        })
    }

    fn update_ref<'a>(
        &'a self,
        branch: &'a str,
        sha: &'a ObjectId,
    ) -> BoxFuture<'a, Result<(), RemoteError>> {
        Box::pin(async move {
            let mut state = self.begin(Op::UpdateRef)?;
            let Some(tip) = state.branches.get(branch).cloned() else {
                return Err(not_found(branch));
            };
            let is_descendant = state
                .commits
                .get(sha)
                .is_some_and(|c| c.parents.contains(&tip));
            if !is_descendant {
                return Err(RemoteError::Http {
                    status: 422,
                    url: format!("memory://refs/heads/{branch}"),
                    message: "Update is not a fast forward".to_string(),
                });
            }
            state.branches.insert(branch.to_string(), sha.clone());
            Ok(())
        })
    }
}
