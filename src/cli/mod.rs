// hoard: GitHub to archive.org mirroring tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command line.
//!
//! ```text
//! hoard [global options] [run options]     mirror, archive and upload
//! hoard [global options] options           print the effective configuration
//! hoard [global options] configs           list the config files in use
//! hoard version
//! ```
//!
//! Flags never act directly: they become [`Overrides`], the top layer of
//! the configuration.

pub mod global;
pub mod run;


use crate::cli::global::GlobalOptions;
use crate::cli::run::RunArgs;
use clap::{Parser, Subcommand};

/// Mirror a GitHub account's repositories to archive.org.
#[derive(Debug, Parser)]
#[command(
    name = "hoard",
    author,
    version,
    about = "Mirror GitHub repositories to archive.org",
    long_about = "hoard Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Lists the repositories of a GitHub account, keeps a bare mirror of\n\
                  each under the output directory, packs every mirror into\n\
                  <name>.git.tar.gz and uploads it to an archive.org collection.",
    after_help = "CONFIG FILES:\n\n\
                  hoard reads `hoard.toml` from the current directory if present,\n\
                  then every file given with --config. HOARD_<SECTION>__<KEY>\n\
                  environment variables and command-line flags override both.\n\n\
                  archive.org keys are read from the `ia` tool's configuration\n\
                  (~/.config/internetarchive/ia.ini) unless IA_ACCESS_KEY_ID and\n\
                  IA_SECRET_ACCESS_KEY or [archive] access_key/secret_key are set."
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(flatten)]
    pub run: RunArgs,

    /// Mirrors when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows the version.
    Version,

    /// Lists all options and their effective values.
    Options,

    /// Lists the config files in use.
    Configs,
}

impl Cli {
    /// Every flag given, as config overrides.
    #[must_use]
    pub fn overrides(&self) -> Overrides {
        let mut overrides = Overrides::default();
        self.global.collect_overrides(&mut overrides);
        self.run.collect_overrides(&mut overrides);
        overrides
    }
}

/// Dotted config keys set from the command line, in flag order.
#[derive(Debug, Clone, Default)]
pub struct Overrides(Vec<(String, config::Value)>);

impl Overrides {
    pub fn put(&mut self, key: &str, value: impl Into<config::Value>) {
        self.0.push((key.to_string(), value.into()));
    }

    /// Sets `key` only when the flag was given.
    pub fn put_some<T: Into<config::Value>>(&mut self, key: &str, value: Option<T>) {
        if let Some(value) = value {
            self.put(key, value);
        }
    }

    /// Sets `key` to `value` when a switch is on.
    pub fn put_if(&mut self, switch: bool, key: &str, value: bool) {
        if switch {
            self.put(key, value);
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(key, _)| key.as_str())
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&config::Value> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }
}

impl IntoIterator for Overrides {
    type Item = (String, config::Value);
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
