// hoard: GitHub to archive.org mirroring tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! tracing setup for a run.
//!
//! ```text
//! init_logging(&LogConfig)
//!   registry
//!    ├─ stderr   console_level, ANSI when a terminal
//!    └─ file     file_level, appended, text or JSON lines,
//!                span close events (per-repo timings)
//!   --> LogGuard (flushes the file writer on drop)
//! ```
//!
//! Levels are the numbers used by `--log-level` and `[global]`:
//! 0 off, 1 error, 2 warn, 3 info, 4 debug, 5 trace, 6 dump.
//! Below dump, HTTP and gix internals are held at warn.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use anyhow::Context;
use bon::Builder;
use serde::{Deserialize, Serialize};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

use crate::error::{ConfigError, Result};

/// Crates whose debug output drowns hoard's own.
const NOISY_CRATES: &[&str] = &["hyper", "hyper_util", "reqwest", "rustls", "h2", "gix"];

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Verbosity, written as a number 0 to 6.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum LogLevel {
    Off = 0,
    Error = 1,
    Warn = 2,
    /// One line per stage and repository.
    #[default]
    Info = 3,
    /// Tool command lines and HTTP requests.
    Debug = 4,
    /// git and tar output.
    Trace = 5,
    /// Trace with dependency internals.
    Dump = 6,
}

impl LogLevel {
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// `EnvFilter` directives for this level.
    #[must_use]
    pub fn directives(self) -> String {
        let base = match self {
            Self::Off => return "off".to_string(),
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace | Self::Dump => "trace",
        };
        if self < Self::Debug || self == Self::Dump {
            return base.to_string();
        }
        NOISY_CRATES
            .iter()
            .fold(base.to_string(), |acc, krate| format!("{acc},{krate}=warn"))
    }
}

impl TryFrom<u8> for LogLevel {
    type Error = ConfigError;

    fn try_from(value: u8) -> std::result::Result<Self, ConfigError> {
        Ok(match value {
            0 => LogLevel::Off,
            1 => LogLevel::Error,
            2 => LogLevel::Warn,
            3 => LogLevel::Info,
            4 => LogLevel::Debug,
            5 => LogLevel::Trace,
            6 => LogLevel::Dump,
            _ => {
                return Err(ConfigError::InvalidValue {
                    section: "global".to_string(),
                    key: "log_level".to_string(),
                    message: format!("log level must be 0-6, got {value}"),
                });
            }
        })
    }
}

impl From<LogLevel> for u8 {
    fn from(level: LogLevel) -> Self {
        level.as_u8()
    }
}

/// Where and how much to log.
#[derive(Debug, Clone, Builder)]
pub struct LogConfig {
    #[builder(setters(name = with_console_level), default)]
    pub console_level: LogLevel,
    #[builder(setters(name = with_file_level), default = LogLevel::Trace)]
    pub file_level: LogLevel,
    /// Appended to, never truncated, so cron runs accumulate.
    #[builder(setters(name = with_log_file), into)]
    pub log_file: Option<PathBuf>,
    #[builder(setters(name = with_json_file), default)]
    pub json_file: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Keeps the file writer alive; dropping it flushes pending lines.
#[must_use = "logs written after the guard is dropped may be lost"]
pub struct LogGuard {
    _file: Option<WorkerGuard>,
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Fails if the log file cannot be opened or a subscriber is already set.
pub fn init_logging(config: &LogConfig) -> Result<LogGuard> {
    let mut layers = vec![console_layer(config.console_level)];
    let guard = match &config.log_file {
        Some(path) => {
            let (layer, guard) = file_layer(path, config)?;
            layers.push(layer);
            Some(guard)
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .context("a global tracing subscriber is already installed")?;

    Ok(LogGuard { _file: guard })
}

fn console_layer(level: LogLevel) -> BoxedLayer {
    fmt::layer()
        .with_target(false)
        .with_ansi(std::io::IsTerminal::is_terminal(&std::io::stderr()))
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::new(level.directives()))
        .boxed()
}

fn file_layer(path: &Path, config: &LogConfig) -> Result<(BoxedLayer, WorkerGuard)> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(file);
    let filter = EnvFilter::new(config.file_level.directives());

    let layer = if config.json_file {
        fmt::layer()
            .json()
            .with_writer(writer)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(filter)
            .boxed()
    } else {
        fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(filter)
            .boxed()
    };
    Ok((layer, guard))
}
