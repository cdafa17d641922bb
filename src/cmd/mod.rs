// hoard: GitHub to archive.org mirroring tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command implementations.
//!
//! ```text
//! CLI args --> config loader --> cmd::run_* handlers
//!   (default) mirror run, options, configs
//! ```

pub mod config;
pub mod run;

use crate::cli::Cli;
use crate::config::Config;
use crate::config::loader::ConfigLoader;
use crate::error::Result;

/// Config file read from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "hoard.toml";

/// Environment variable prefix for configuration keys.
pub const ENV_PREFIX: &str = "HOARD";

/// Every configuration layer for this invocation, lowest first.
#[must_use]
pub fn build_config_loader(cli: &Cli) -> ConfigLoader {
    let loader = cli.global.configs.iter().fold(
        ConfigLoader::new().add_toml_file_optional(DEFAULT_CONFIG_FILE),
        ConfigLoader::add_toml_file,
    );
    cli.overrides()
        .into_iter()
        .fold(loader.with_env_prefix(ENV_PREFIX), |loader, (key, value)| {
            loader.set(&key, value)
        })
}

/// Loads and validates the configuration.
///
/// # Errors
///
/// A config file is missing or invalid, or a value is out of range.
pub fn load_config(cli: &Cli) -> Result<Config> {
    build_config_loader(cli).build()
}
