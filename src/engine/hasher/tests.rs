// treesync: Remote Tree Synchronization Engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{blob_id, hash, is_binary, normalize_line_endings};
use std::borrow::Cow;

// Reference ids from `git hash-object`.
const EMPTY_BLOB: &str = "e69de29bb2d1d6434b8b29ae775ad8c2e48c5391";
const HELLO_WORLD_LF: &str = "3b18e512dba79e4c8300dd08aeb37f8e728b8dad";

#[test]
fn test_blob_id_matches_git() {
    assert_eq!(blob_id(b"").as_str(), EMPTY_BLOB);
    assert_eq!(blob_id(b"hello world\n").as_str(), HELLO_WORLD_LF);
}

#[test]
fn test_binary_detection() {
    assert!(is_binary(b"PNG\0\x01\x02"));
    assert!(!is_binary(b"plain text\r\n"));
    assert!(!is_binary(b""));
}

#[test]
fn test_normalize_borrows_when_clean() {
    let input = b"line one\nline two\n";
    assert!(matches!(normalize_line_endings(input), Cow::Borrowed(_)));
}

#[test]
fn test_normalize_crlf() {
    let cases: [(&[u8], &[u8]); 4] = [
        (b"a\r\nb\r\n", b"a\nb\n"),
        (b"lone\rcarriage\r\n", b"lone\rcarriage\n"),
        (b"\r\r\n", b"\r\n"),
        (b"trailing\r", b"trailing\r"),
    ];
    for (input, expected) in cases {
        assert_eq!(normalize_line_endings(input).as_ref(), expected);
    }
}

#[test]
fn test_hash_text_with_crlf() {
    let digest = hash(b"hello world\r\n");

    assert!(!digest.is_binary());
    assert_ne!(digest.original_id(), digest.normalized_id());
    assert_eq!(digest.normalized_id().as_str(), HELLO_WORLD_LF);
    assert_eq!(digest.original_id(), &blob_id(b"hello world\r\n"));

    let (id, content) = digest.into_upload();
    assert_eq!(id.as_str(), HELLO_WORLD_LF);
    assert_eq!(content.as_ref(), b"hello world\n");
}

#[test]
fn test_hash_text_without_crlf_has_single_id() {
    let digest = hash(b"hello world\n");
    assert_eq!(digest.original_id(), digest.normalized_id());
    assert!(digest.matches(&blob_id(b"hello world\n")));
}

#[test]
fn test_hash_binary_is_never_normalized() {
    let bytes = b"\0binary\r\npayload";
    let digest = hash(bytes);

    assert!(digest.is_binary());
    assert_eq!(digest.original_id(), digest.normalized_id());
    assert!(!digest.matches(&blob_id(b"\0binary\npayload")));

    let (id, content) = digest.into_upload();
    assert_eq!(id, blob_id(bytes));
    assert_eq!(content.as_ref(), bytes);
}
