// treesync: Remote Tree Synchronization Engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Upload progress display.

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::OnceLock;

/// Pre-validated style for blob uploads (total bytes are always known).
fn upload_style() -> ProgressStyle {
    static STYLE: OnceLock<ProgressStyle> = OnceLock::new();
    STYLE
        .get_or_init(|| {
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-")
        })
        .clone()
}

/// Progress display for blob uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgressDisplay {
    /// Byte-count bar on stderr
    Bar,
    /// No visual progress (library use, tests)
    #[default]
    Silent,
}

impl ProgressDisplay {
    /// Creates a bar for `total_bytes` spread over `blobs` uploads.
    #[must_use]
    pub fn create(self, total_bytes: u64, blobs: usize) -> Option<ProgressBar> {
        match self {
            Self::Silent => None,
            Self::Bar => {
                let pb = ProgressBar::new(total_bytes);
                pb.set_style(upload_style());
                pb.set_message(format!("{blobs} blob(s)"));
                Some(pb)
            }
        }
    }
}
