// hoard: GitHub to archive.org mirroring tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `hoard options` and `hoard configs`.

use std::io::{self, Write};

use crate::config::Config;
use crate::config::loader::ConfigLoader;

/// Writes every effective option, secrets masked.
///
/// # Errors
///
/// Propagates write failures (a closed pipe, usually).
pub fn write_options(config: &Config, out: &mut impl Write) -> io::Result<()> {
    for line in config.format_options() {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

/// Writes the config files that will be merged, in order.
///
/// # Errors
///
/// Propagates write failures.
pub fn write_configs(loader: &ConfigLoader, out: &mut impl Write) -> io::Result<()> {
    let mut any = false;
    for (n, layer) in loader.present_layers().enumerate() {
        writeln!(out, "{}. {layer}", n + 1)?;
        any = true;
    }
    if !any {
        writeln!(out, "no config files; using defaults, HOARD_* variables and flags")?;
    }
    Ok(())
}
