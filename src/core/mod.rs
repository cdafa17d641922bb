// hoard: GitHub to archive.org mirroring tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Core modules for running external tools.
//!
//! ```text
//!        core
//!         |
//!         v
//!      process
//!         |
//!   ToolCommand --> git, tar
//!   ToolOutput
//! ```

pub mod process;
