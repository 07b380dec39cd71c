// treesync: Remote Tree Synchronization Engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Expands configured paths into the flat list of files to publish.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;
use wax::{Glob, Program};

use super::walk::{WalkOptions, parallel_walk};
use crate::error::Result;

/// Expands `paths` (relative to `base_dir`, or absolute) into files.
///
/// Directories are walked recursively, files are taken as-is. Files whose
/// base-relative path matches any `exclude` glob are dropped. The result is
/// sorted and free of duplicates.
///
/// # Errors
///
/// Returns an error if a path does not exist, a directory walk reports
/// errors, or an exclude pattern is not a valid glob.
pub fn collect_files<P: AsRef<Path>>(
    base_dir: &Path,
    paths: &[P],
    exclude: &[String],
) -> Result<Vec<PathBuf>> {
    let globs = exclude
        .iter()
        .map(|pattern| {
            Glob::new(pattern).with_context(|| format!("invalid exclude pattern '{pattern}'"))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut files = BTreeSet::new();

    for path in paths {
        let path = base_dir.join(path.as_ref());
        let metadata = std::fs::metadata(&path)
            .with_context(|| format!("path does not exist: {}", path.display()))?;

        if metadata.is_dir() {
            let result = parallel_walk(&path, &WalkOptions::for_artifacts())?;
            // A file skipped here would be deleted from the branch
            if result.error_count() > 0 {
                anyhow::bail!(
                    "{} error(s) while walking {}",
                    result.error_count(),
                    path.display()
                );
            }
            debug!(dir = %path.display(), files = result.files().len(), "walked directory");
            files.extend(result.into_files());
        } else {
            files.insert(path);
        }
    }

    if globs.is_empty() {
        return Ok(files.into_iter().collect());
    }

    let before = files.len();
    let kept: Vec<PathBuf> = files
        .into_iter()
        .filter(|file| !is_excluded(base_dir, file, &globs))
        .collect();
    debug!(excluded = before - kept.len(), "applied exclude patterns");

    Ok(kept)
}

fn is_excluded(base_dir: &Path, file: &Path, globs: &[Glob<'_>]) -> bool {
    let relative = file.strip_prefix(base_dir).unwrap_or(file);
    globs.iter().any(|glob| glob.is_match(relative))
}
