// treesync: Remote Tree Synchronization Engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for the GitHub remote using wiremock.
//!
//! Covers request shapes (paths, headers, bodies) and the mapping of HTTP
//! failures to `RemoteError`.

use serde_json::json;
use treesync::config::types::GithubConfig;
use treesync::engine::ObjectId;
use treesync::engine::hasher::blob_id;
use treesync::error::RemoteError;
use treesync::remote::{GitRemote, GithubRemote, NewBlob, NewCommit, NewTreeEntry, TreeItemKind};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const REPO: &str = "/repos/acme/reports/git";

fn sha(seed: &str) -> ObjectId {
    blob_id(seed.as_bytes())
}

fn remote(server: &MockServer, token: &str) -> GithubRemote {
    let config = GithubConfig {
        api_url: server.uri(),
        owner: "acme".to_string(),
        repo: "reports".to_string(),
        token: token.to_string(),
        ..GithubConfig::default()
    };
    GithubRemote::new(&config).unwrap()
}

// =============================================================================
// Reads
// =============================================================================

#[tokio::test]
async fn test_resolve_ref_sends_auth_headers() {
    let server = MockServer::start().await;
    let tip = sha("tip");

    Mock::given(method("GET"))
        .and(path(format!("{REPO}/ref/heads/staging")))
        .and(header("authorization", "Bearer ghp_test"))
        .and(header("accept", "application/vnd.github+json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ref": "refs/heads/staging",
            "object": { "sha": tip.as_str(), "type": "commit" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let resolved = remote(&server, "ghp_test").resolve_ref("staging").await.unwrap();
    assert_eq!(resolved, tip);
}

#[tokio::test]
async fn test_branch_name_is_percent_encoded() {
    let server = MockServer::start().await;
    let tip = sha("tip");

    Mock::given(method("GET"))
        .and(path(format!("{REPO}/ref/heads/release/v1%23rc%3F%25")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ref": "refs/heads/release/v1#rc?%",
            "object": { "sha": tip.as_str(), "type": "commit" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PATCH"))
        .and(path(format!("{REPO}/refs/heads/release/v1%23rc%3F%25")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ref": "refs/heads/release/v1#rc?%",
            "object": { "sha": tip.as_str(), "type": "commit" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let remote = remote(&server, "ghp_test");
    let resolved = remote.resolve_ref("release/v1#rc?%").await.unwrap();
    assert_eq!(resolved, tip);
    remote.update_ref("release/v1#rc?%", &tip).await.unwrap();
}

#[tokio::test]
async fn test_missing_branch_is_http_404() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{REPO}/ref/heads/gone")))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "message": "Not Found" })),
        )
        .mount(&server)
        .await;

    let err = remote(&server, "").resolve_ref("gone").await.unwrap_err();
    match err {
        RemoteError::Http {
            status, message, ..
        } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Not Found");
        }
        other => panic!("expected RemoteError::Http, got {other:?}"),
    }
}

#[tokio::test]
async fn test_get_commit_and_tree() {
    let server = MockServer::start().await;
    let commit = sha("commit");
    let parent = sha("parent");
    let tree = sha("tree");
    let file = blob_id(b"hello\n");

    Mock::given(method("GET"))
        .and(path(format!("{REPO}/commits/{commit}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sha": commit.as_str(),
            "tree": { "sha": tree.as_str() },
            "parents": [{ "sha": parent.as_str() }],
            "message": "previous"
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("{REPO}/trees/{tree}")))
        .and(query_param("recursive", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sha": tree.as_str(),
            "tree": [
                { "path": "docs", "mode": "040000", "type": "tree", "sha": tree.as_str() },
                { "path": "docs/a.txt", "mode": "100644", "type": "blob", "sha": file.as_str(), "size": 6 }
            ],
            "truncated": true
        })))
        .mount(&server)
        .await;

    let remote = remote(&server, "t");
    let info = remote.get_commit(&commit).await.unwrap();
    assert_eq!(info.tree, tree);
    assert_eq!(info.parents, [parent]);

    let listing = remote.get_tree_recursive(&tree).await.unwrap();
    assert!(listing.truncated);
    assert_eq!(listing.items.len(), 2);
    assert_eq!(listing.items[1].kind, TreeItemKind::Blob);
    assert_eq!(listing.items[1].sha, file);
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{REPO}/ref/heads/main")))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy</html>"))
        .mount(&server)
        .await;

    let err = remote(&server, "t").resolve_ref("main").await.unwrap_err();
    assert!(matches!(err, RemoteError::Decode { .. }), "got {err:?}");
}

// =============================================================================
// Writes
// =============================================================================

#[tokio::test]
async fn test_create_blob_bodies() {
    let server = MockServer::start().await;
    let text_id = blob_id(b"# Report\n");
    let binary_id = blob_id(&[0, 1, 2]);

    Mock::given(method("POST"))
        .and(path(format!("{REPO}/blobs")))
        .and(body_json(json!({ "content": "# Report\n", "encoding": "utf-8" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "sha": text_id.as_str() })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("{REPO}/blobs")))
        .and(body_json(json!({ "content": "AAEC", "encoding": "base64" })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({ "sha": binary_id.as_str() })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let remote = remote(&server, "t");
    let id = remote
        .create_blob(NewBlob::from_bytes(b"# Report\n", false))
        .await
        .unwrap();
    assert_eq!(id, text_id);

    let id = remote
        .create_blob(NewBlob::from_bytes(&[0, 1, 2], true))
        .await
        .unwrap();
    assert_eq!(id, binary_id);
}

#[tokio::test]
async fn test_create_tree_commit_and_ref() {
    let server = MockServer::start().await;
    let base_tree = sha("base tree");
    let new_tree = sha("new tree");
    let parent = sha("parent");
    let commit = sha("commit");
    let file = blob_id(b"new\n");

    Mock::given(method("POST"))
        .and(path(format!("{REPO}/trees")))
        .and(body_json(json!({
            "base_tree": base_tree.as_str(),
            "tree": [
                { "path": "report.md", "mode": "100644", "type": "blob", "sha": file.as_str() },
                { "path": "old.txt", "mode": "100644", "type": "blob", "sha": null }
            ]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "sha": new_tree.as_str() })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("{REPO}/commits")))
        .and(body_json(json!({
            "message": "Publish",
            "tree": new_tree.as_str(),
            "parents": [parent.as_str()]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "sha": commit.as_str() })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PATCH"))
        .and(path(format!("{REPO}/refs/heads/staging")))
        .and(body_json(json!({ "sha": commit.as_str(), "force": false })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ref": "refs/heads/staging",
            "object": { "sha": commit.as_str(), "type": "commit" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let remote = remote(&server, "t");
    let entries = [
        NewTreeEntry::blob("report.md".to_string(), file),
        NewTreeEntry::deletion("old.txt".to_string()),
    ];
    let tree = remote.create_tree(&base_tree, &entries).await.unwrap();
    assert_eq!(tree, new_tree);

    let created = remote
        .create_commit(NewCommit {
            message: "Publish",
            tree: &tree,
            parents: vec![&parent],
        })
        .await
        .unwrap();
    assert_eq!(created, commit);

    remote.update_ref("staging", &created).await.unwrap();
}

#[tokio::test]
async fn test_non_fast_forward_is_http_422() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path(format!("{REPO}/refs/heads/staging")))
        .respond_with(
            ResponseTemplate::new(422)
                .set_body_json(json!({ "message": "Update is not a fast forward" })),
        )
        .mount(&server)
        .await;

    let err = remote(&server, "t")
        .update_ref("staging", &sha("commit"))
        .await
        .unwrap_err();
    insta::assert_snapshot!(
        err.to_string().replace(&server.uri(), "http://mock"),
        @"http error 422: http://mock/repos/acme/reports/git/refs/heads/staging (Update is not a fast forward)"
    );
}
