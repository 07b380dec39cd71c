// treesync: Remote Tree Synchronization Engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! GitHub git-data REST client.
//!
//! ```text
//! GET   /repos/{o}/{r}/git/ref/heads/{branch}   --> tip commit
//! GET   /repos/{o}/{r}/git/commits/{sha}        --> tree + parents
//! GET   /repos/{o}/{r}/git/trees/{sha}?recursive=1
//! POST  /repos/{o}/{r}/git/blobs                { content, encoding }
//! POST  /repos/{o}/{r}/git/trees                { base_tree, tree[] }
//! POST  /repos/{o}/{r}/git/commits              { message, tree, parents }
//! PATCH /repos/{o}/{r}/git/refs/heads/{branch}  { sha, force: false }
//! ```

use futures_util::future::BoxFuture;
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use super::{CommitInfo, GitRemote, NewBlob, NewCommit, NewTreeEntry, TreeListing};
use crate::config::types::GithubConfig;
use crate::engine::ObjectId;
use crate::error::RemoteError;

#[derive(Debug, Deserialize)]
struct ShaRef {
    sha: ObjectId,
}

#[derive(Debug, Deserialize)]
struct RefResponse {
    object: ShaRef,
}

#[derive(Debug, Deserialize)]
struct CommitResponse {
    sha: ObjectId,
    tree: ShaRef,
    #[serde(default)]
    parents: Vec<ShaRef>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Debug, Serialize)]
struct TreeRequest<'a> {
    base_tree: &'a ObjectId,
    tree: &'a [NewTreeEntry],
}

#[derive(Debug, Serialize)]
struct RefUpdateRequest<'a> {
    sha: &'a ObjectId,
    force: bool,
}

/// [`GitRemote`] over the GitHub REST API.
#[derive(Debug, Clone)]
pub struct GithubRemote {
    client: Client,
    repo_url: String,
    token: Option<String>,
}

impl GithubRemote {
    /// Builds a client for `owner/repo` from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::Transport`] if the HTTP client cannot be built.
    pub fn new(config: &GithubConfig) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self::with_client(client, config))
    }

    /// Uses an existing client (shared connection pool).
    #[must_use]
    pub fn with_client(client: Client, config: &GithubConfig) -> Self {
        let repo_url = format!(
            "{}/repos/{}/{}",
            config.api_url.trim_end_matches('/'),
            config.owner,
            config.repo
        );
        let token = Some(config.token.clone()).filter(|t| !t.is_empty());

        Self {
            client,
            repo_url,
            token,
        }
    }

    /// Base URL of the repository resource.
    #[must_use]
    pub fn repo_url(&self) -> &str {
        &self.repo_url
    }

    fn git_url(&self, path: &str) -> String {
        format!("{}/git/{path}", self.repo_url)
    }

    /// URL of a branch ref under `prefix`, one percent-encoded path segment
    /// per `/`-separated part of the branch name.
    fn branch_url(&self, prefix: &str, branch: &str) -> Result<String, RemoteError> {
        let base = self.git_url(prefix);
        let invalid = |message: String| RemoteError::InvalidUrl {
            url: base.clone(),
            message,
        };

        let mut url = Url::parse(&base).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| invalid("not a hierarchical url".to_string()))?
            .pop_if_empty()
            .extend(branch.split('/'));
        Ok(url.into())
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let request = self
            .client
            .request(method, url)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28");

        match &self.token {
            Some(token) => request.header("Authorization", format!("Bearer {token}")),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        url: &str,
    ) -> Result<T, RemoteError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map_or_else(|_| body.trim().to_string(), |e| e.message);
            return Err(RemoteError::Http {
                status: status.as_u16(),
                url: url.to_string(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| RemoteError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

impl GitRemote for GithubRemote {
    fn resolve_ref<'a>(&'a self, branch: &'a str) -> BoxFuture<'a, Result<ObjectId, RemoteError>> {
        Box::pin(async move {
            let url = self.branch_url("ref/heads", branch)?;
            debug!(branch, "resolving branch");
            let response: RefResponse = self.send(self.request(Method::GET, &url), &url).await?;
            Ok(response.object.sha)
        })
    }

    fn get_commit<'a>(
        &'a self,
        sha: &'a ObjectId,
    ) -> BoxFuture<'a, Result<CommitInfo, RemoteError>> {
        Box::pin(async move {
            let url = self.git_url(&format!("commits/{sha}"));
            debug!(%sha, "reading commit");
            let response: CommitResponse =
                self.send(self.request(Method::GET, &url), &url).await?;
            Ok(CommitInfo {
                sha: response.sha,
                tree: response.tree.sha,
                parents: response.parents.into_iter().map(|p| p.sha).collect(),
            })
        })
    }

    fn get_tree_recursive<'a>(
        &'a self,
        sha: &'a ObjectId,
    ) -> BoxFuture<'a, Result<TreeListing, RemoteError>> {
        Box::pin(async move {
            let url = self.git_url(&format!("trees/{sha}?recursive=1"));
            debug!(%sha, "listing tree");
            self.send(self.request(Method::GET, &url), &url).await
        })
    }

    fn create_blob<'a>(&'a self, blob: NewBlob<'a>) -> BoxFuture<'a, Result<ObjectId, RemoteError>> {
        Box::pin(async move {
            let url = self.git_url("blobs");
            let request = self.request(Method::POST, &url).json(&blob);
            let response: ShaRef = self.send(request, &url).await?;
            Ok(response.sha)
        })
    }

    fn create_tree<'a>(
        &'a self,
        base_tree: &'a ObjectId,
        entries: &'a [NewTreeEntry],
    ) -> BoxFuture<'a, Result<ObjectId, RemoteError>> {
        Box::pin(async move {
            let url = self.git_url("trees");
            debug!(%base_tree, entries = entries.len(), "creating tree");
            let body = TreeRequest {
                base_tree,
                tree: entries,
            };
            let request = self.request(Method::POST, &url).json(&body);
            let response: ShaRef = self.send(request, &url).await?;
            Ok(response.sha)
        })
    }

    fn create_commit<'a>(
        &'a self,
        commit: NewCommit<'a>,
    ) -> BoxFuture<'a, Result<ObjectId, RemoteError>> {
        Box::pin(async move {
            let url = self.git_url("commits");
            debug!(tree = %commit.tree, "creating commit");
            let request = self.request(Method::POST, &url).json(&commit);
            let response: ShaRef = self.send(request, &url).await?;
            Ok(response.sha)
        })
    }

    fn update_ref<'a>(
        &'a self,
        branch: &'a str,
        sha: &'a ObjectId,
    ) -> BoxFuture<'a, Result<(), RemoteError>> {
        Box::pin(async move {
            let url = self.branch_url("refs/heads", branch)?;
            debug!(branch, %sha, "updating ref");
            let body = RefUpdateRequest { sha, force: false };
            let request = self.request(Method::PATCH, &url).json(&body);
            let _: RefResponse = self.send(request, &url).await?;
            Ok(())
        })
    }
}
