// treesync: Remote Tree Synchronization Engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `hash-object` command.

use std::path::Path;

use anyhow::Context;

use crate::cli::sync::HashObjectArgs;
use crate::engine::hasher;
use crate::error::Result;

/// One output line: `<kind> <original> <normalized> <path>`.
///
/// The normalized column repeats the original for binary content.
#[must_use]
pub fn format_digest(path: &Path, bytes: &[u8]) -> String {
    let digest = hasher::hash(bytes);
    let kind = if digest.is_binary() { "binary" } else { "text" };
    format!(
        "{kind:<6} {} {} {}",
        digest.original_id(),
        digest.normalized_id(),
        path.display()
    )
}

/// Prints blob ids for each file.
///
/// # Errors
///
/// Returns an error if a file cannot be read.
pub async fn run_hash_object_command(args: &HashObjectArgs) -> Result<()> {
    for path in &args.files {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        println!("{}", format_digest(path, &bytes));
    }
    Ok(())
}
