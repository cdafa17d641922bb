// hoard: GitHub to archive.org mirroring tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! External tools (git, tar) run as cancellable child processes.
//!
//! ```text
//! ToolCommand::locate("git")
//!   .args() .cwd() .env() .time_limit()
//!   .run(&cancel)
//!       stderr lines  --> tracing (debug), last lines kept for errors
//!       stdout        --> null
//!       --> ToolOutput { code, interrupted }
//! ```
//!
//! A cancelled run is not an error: the child is killed and the output
//! comes back with `interrupted` set, so callers can tell a stop request
//! apart from a failing tool.

pub mod command;
mod exec;

pub use command::{ToolCommand, ToolOutput};
