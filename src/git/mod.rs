// hoard: GitHub to archive.org mirroring tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git operations module.
//!
//! ```text
//!   query.rs (gix, read-only)      cmd.rs (git CLI, writes)
//!   .is_bare_repository            .clone_mirror
//!   .list_refs                     .remote_update
//!        |                               |
//!        v                               v
//!    <name>.git/  <── no subprocess     ToolCommand
//!                                       GIT_TERMINAL_PROMPT=0
//!                                       credential helper ← env token
//! ```
//!
//! **query** uses gix so checks never spawn a process.
//! **cmd** uses the git CLI for network operations and auth helpers.

pub mod cmd;
pub mod query;
