// hoard: GitHub to archive.org mirroring tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! hoard binary.
//!
//! ```text
//! parse flags --> load config --> init logging --> options | configs | mirror run
//! ```
//!
//! Exit status is non-zero when the config is unusable, listing fails, or
//! any repository ends in a failed state.

use std::io::Write;
use std::process::ExitCode;

use hoard::cli::{self, Cli, Command};
use hoard::cmd::config::{write_configs, write_options};
use hoard::cmd::run::run_mirror_command;
use hoard::cmd::{build_config_loader, load_config};
use hoard::config::types::GlobalConfig;
use hoard::logging::{LogConfig, LogLevel, init_logging};

use clap::Parser;
use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if matches!(cli.command, Some(Command::Version)) {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    let config = load_config(&cli);
    let log_config = config.as_ref().map_or_else(
        |_| fallback_log_config(&cli.global),
        |config| log_config_from(&config.global),
    );
    let _log_guard = match init_logging(&log_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("hoard: cannot set up logging: {e:#}");
            return ExitCode::FAILURE;
        }
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e:#}");
            return ExitCode::FAILURE;
        }
    };

    let outcome = match &cli.command {
        Some(Command::Options) => print(|out| write_options(&config, out)),
        Some(Command::Configs) => print(|out| write_configs(&build_config_loader(&cli), out)),
        Some(Command::Version) => Ok(true),
        None => {
            for line in config.format_options() {
                tracing::debug!("{line}");
            }
            run_mirror_command(&config)
                .await
                .map(|summary| summary.is_success())
        }
    };

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn print(
    write: impl FnOnce(&mut std::io::StdoutLock<'static>) -> std::io::Result<()>,
) -> anyhow::Result<bool> {
    let mut out = std::io::stdout().lock();
    write(&mut out)?;
    out.flush()?;
    Ok(true)
}

fn log_config_from(global: &GlobalConfig) -> LogConfig {
    LogConfig::builder()
        .with_console_level(global.output_log_level)
        .with_file_level(global.file_log_level)
        .maybe_with_log_file(global.log_file.clone())
        .with_json_file(global.log_json)
        .build()
}

/// Console logging from the flags alone, so a broken config can still be reported.
fn fallback_log_config(global: &cli::global::GlobalOptions) -> LogConfig {
    let level = global
        .log_level
        .and_then(|n| LogLevel::try_from(n).ok())
        .unwrap_or_default();
    LogConfig::builder().with_console_level(level).build()
}
