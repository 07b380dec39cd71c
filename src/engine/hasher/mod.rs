// treesync: Remote Tree Synchronization Engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git blob hashing.
//!
//! ```text
//! bytes --> contains 0x00? --yes--> binary: sha1("blob N\0" + bytes)
//!              |
//!              no
//!              v
//!           text:  original   = sha1("blob N\0" + bytes)
//!                  normalized = sha1("blob M\0" + bytes with CRLF -> LF)
//! ```
//!
//! The remote may have stored a text file with normalized line endings, so a
//! local file matching either id is unchanged.

use sha1::{Digest, Sha1};
use std::borrow::Cow;

use super::types::ObjectId;

/// Both ids of one piece of content, plus the bytes to upload if it changed.
#[derive(Debug, Clone)]
pub struct BlobDigest<'a> {
    original_id: ObjectId,
    normalized_id: ObjectId,
    is_binary: bool,
    normalized: Cow<'a, [u8]>,
}

impl<'a> BlobDigest<'a> {
    /// Id of the bytes exactly as given.
    #[must_use]
    pub const fn original_id(&self) -> &ObjectId {
        &self.original_id
    }

    /// Id after CRLF normalization (equal to `original_id` for binary content).
    #[must_use]
    pub const fn normalized_id(&self) -> &ObjectId {
        &self.normalized_id
    }

    #[must_use]
    pub const fn is_binary(&self) -> bool {
        self.is_binary
    }

    /// Whether `id` names this content under either hashing.
    #[must_use]
    pub fn matches(&self, id: &ObjectId) -> bool {
        *id == self.original_id || *id == self.normalized_id
    }

    /// Id and bytes to publish: raw for binary, normalized for text.
    #[must_use]
    pub fn into_upload(self) -> (ObjectId, Cow<'a, [u8]>) {
        (self.normalized_id, self.normalized)
    }
}

/// Content with a zero byte is treated as binary.
#[must_use]
pub fn is_binary(bytes: &[u8]) -> bool {
    bytes.contains(&0)
}

/// Git blob id: `sha1("blob " + len + "\0" + bytes)`.
#[must_use]
pub fn blob_id(bytes: &[u8]) -> ObjectId {
    let mut hasher = Sha1::new();
    hasher.update(format!("blob {}\0", bytes.len()).as_bytes());
    hasher.update(bytes);
    ObjectId::from_digest(&hasher.finalize())
}

/// Replaces every `\r\n` with `\n`. Lone `\r` bytes are kept.
#[must_use]
pub fn normalize_line_endings(bytes: &[u8]) -> Cow<'_, [u8]> {
    if !bytes.windows(2).any(|pair| pair == b"\r\n") {
        return Cow::Borrowed(bytes);
    }

    let mut out = Vec::with_capacity(bytes.len());
    let mut iter = bytes.iter().copied().peekable();
    while let Some(byte) = iter.next() {
        if byte == b'\r' && iter.peek() == Some(&b'\n') {
            continue;
        }
        out.push(byte);
    }
    Cow::Owned(out)
}

/// Hashes content both ways.
#[must_use]
pub fn hash(bytes: &[u8]) -> BlobDigest<'_> {
    let original_id = blob_id(bytes);

    if is_binary(bytes) {
        return BlobDigest {
            normalized_id: original_id.clone(),
            original_id,
            is_binary: true,
            normalized: Cow::Borrowed(bytes),
        };
    }

    let normalized = normalize_line_endings(bytes);
    let normalized_id = match &normalized {
        Cow::Borrowed(_) => original_id.clone(),
        Cow::Owned(owned) => blob_id(owned),
    };

    BlobDigest {
        original_id,
        normalized_id,
        is_binary: false,
        normalized,
    }
}

#[cfg(test)]
mod tests;
