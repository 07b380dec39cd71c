// treesync: Remote Tree Synchronization Engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Library root.
//!
//! # Crate Architecture
//!
//! ```text
//!                        main.rs
//!                           |
//!                +----------+----------+
//!                v                     v
//!             cli (clap)          cmd (handlers)
//!                |          sync / plan / hash-object
//!                +----------+----------+
//!                           v
//!              ,---------------------------,
//!              |          config           |
//!              |   TOML, env, --set        |
//!              '-----+---------------+-----'
//!                    |               |
//!                    v               v
//!                 engine          utility::fs
//!     snapshot > reconcile >    walk / collect
//!           publish
//!                    |
//!                    v
//!                 remote
//!        GitRemote: GithubRemote (reqwest)
//!
//!   +-----------------------------------------+
//!   |  foundation   error, logging            |
//!   +-----------------------------------------+
//! ```

pub mod cli;
pub mod cmd;
pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod remote;
pub mod utility;
