// hoard: GitHub to archive.org mirroring tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration types for hoard.
//!
//! # Config Structure
//!
//! ```text
//! Config
//!   global   dry, keep_mirror, log levels, log_file, process_timeout_secs
//!   github   user, token, api_url, per_page
//!   archive  collection, s3_url, media_type, access_key, secret_key
//!   paths    output_dir
//!   filter   include_forks, include_archived, only
//!   retry    max_attempts, base_delay_ms, max_delay_ms, backoff_factor, jitter
//!   network  timeout_secs, connect_timeout_secs
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::logging::LogLevel;

/// Default GitHub REST API root.
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

/// Default archive.org S3-compatible endpoint.
pub const DEFAULT_IA_S3_URL: &str = "https://s3.us.archive.org";

/// Global configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// List repositories and log the plan without touching disk or network.
    pub dry: bool,
    /// Keep mirrors and archives after a successful upload.
    pub keep_mirror: bool,
    /// Log level for console output (0-6).
    pub output_log_level: LogLevel,
    /// Log level for file output (0-6).
    pub file_log_level: LogLevel,
    /// Path to log file. No file log when unset.
    pub log_file: Option<PathBuf>,
    /// Write the file log as JSON lines.
    pub log_json: bool,
    /// Timeout for each git/tar invocation. Unbounded when unset.
    pub process_timeout_secs: Option<u64>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            dry: false,
            keep_mirror: false,
            output_log_level: LogLevel::Info,
            file_log_level: LogLevel::Trace,
            log_file: None,
            log_json: false,
            process_timeout_secs: None,
        }
    }
}

impl GlobalConfig {
    /// Per-process timeout, if configured.
    #[must_use]
    pub fn process_timeout(&self) -> Option<Duration> {
        self.process_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

/// GitHub account and API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GitHubConfig {
    /// Account (user or organisation) whose repositories are mirrored.
    pub user: String,
    /// Personal access token.
    pub token: String,
    /// REST API root.
    pub api_url: String,
    /// Page size for the repository listing (1-100).
    pub per_page: u32,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            user: String::new(),
            token: String::new(),
            api_url: DEFAULT_GITHUB_API_URL.to_string(),
            per_page: 100,
        }
    }
}

/// archive.org settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArchiveConfig {
    /// Collection the items are filed under; also the item identifier prefix.
    pub collection: String,
    /// S3-compatible upload endpoint.
    pub s3_url: String,
    /// Item media type.
    pub media_type: String,
    /// S3 access key; overrides the `ia` configuration file.
    pub access_key: String,
    /// S3 secret key; overrides the `ia` configuration file.
    pub secret_key: String,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            collection: String::new(),
            s3_url: DEFAULT_IA_S3_URL.to_string(),
            media_type: "data".to_string(),
            access_key: String::new(),
            secret_key: String::new(),
        }
    }
}

/// Filesystem locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    /// Root directory holding `<name>.git` mirrors and their archives.
    pub output_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./backups"),
        }
    }
}

/// Which listed repositories are processed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterConfig {
    /// Process forks.
    pub include_forks: bool,
    /// Process archived (read-only) repositories.
    pub include_archived: bool,
    /// Restrict the run to these repository names. Empty means all.
    pub only: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            include_forks: true,
            include_archived: true,
            only: Vec::new(),
        }
    }
}

/// Backoff policy for transient network failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetrySettings {
    /// Total attempts including the first one.
    pub max_attempts: u32,
    /// Delay before the first retry, in milliseconds.
    pub base_delay_ms: u64,
    /// Upper bound for any single delay, in milliseconds.
    pub max_delay_ms: u64,
    /// Multiplier applied per attempt.
    pub backoff_factor: f64,
    /// Randomise delays to avoid synchronised retries.
    pub jitter: bool,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 500,
            max_delay_ms: 30_000,
            backoff_factor: 2.0,
            jitter: true,
        }
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NetworkConfig {
    /// Total request timeout for API calls.
    pub timeout_secs: u64,
    /// Connect timeout for every request, uploads included.
    pub connect_timeout_secs: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 60,
            connect_timeout_secs: 30,
        }
    }
}

impl NetworkConfig {
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}
