// hoard: GitHub to archive.org mirroring tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! hoard keeps archive.org copies of a GitHub account.
//!
//! One run, per repository, in listing order:
//!
//! ```text
//! forge::GitHubLister      GET /users/<account>/repos, paged
//!        |
//! mirror::MirrorManager    <out>/<name>.git   clone --mirror | remote update
//!        |
//! archiver::Archiver       <out>/<name>.git.tar.gz
//!        |
//! uploader::Uploader       PUT <s3>/<collection>__<name>/<name>.git.tar.gz
//!        |
//! pipeline                 cleanup or keep, RunSummary
//! ```
//!
//! Around it: `cli` and `cmd` turn flags into a layered `config`; `core`
//! runs git and tar; `net` holds the HTTP clients and retry policy;
//! `error` and `logging` are shared by everything.

pub mod archiver;
pub mod cli;
pub mod cmd;
pub mod config;
pub mod core;
pub mod error;
pub mod forge;
pub mod git;
pub mod logging;
pub mod mirror;
pub mod net;
pub mod pipeline;
pub mod uploader;
