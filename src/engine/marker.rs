// treesync: Remote Tree Synchronization Engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Commit message marker for commits created by the engine.
//!
//! Push-triggered callers check [`is_sync_commit`] so the engine's own pushes
//! do not trigger another sync.

use std::borrow::Cow;

/// Appends `marker` on its own paragraph unless it is empty or already present.
#[must_use]
pub fn with_marker<'a>(message: &'a str, marker: &str) -> Cow<'a, str> {
    if marker.is_empty() || message.contains(marker) {
        return Cow::Borrowed(message);
    }

    let trimmed = message.trim_end();
    if trimmed.is_empty() {
        Cow::Owned(marker.to_string())
    } else {
        Cow::Owned(format!("{trimmed}\n\n{marker}"))
    }
}

/// Whether `message` carries the marker. An empty marker never matches.
#[must_use]
pub fn is_sync_commit(message: &str, marker: &str) -> bool {
    !marker.is_empty() && message.contains(marker)
}
