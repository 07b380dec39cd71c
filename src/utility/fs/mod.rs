// treesync: Remote Tree Synchronization Engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Filesystem utilities for gathering local artifacts.
//!
//! ```text
//! walk:     parallel_walk()   ignore::WalkParallel (multi-core)
//!           WalkOptions       hidden, gitignore, skip_dirs
//! collect:  collect_files()   paths + exclude globs --> sorted file list
//! ```

pub mod collect;
pub mod walk;
