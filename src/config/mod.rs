// hoard: GitHub to archive.org mirroring tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! hoard's settings, merged from several layers.
//!
//! ```text
//! defaults
//!   < hoard.toml in the working directory (if any)
//!   < each --config FILE, in order
//!   < HOARD_<SECTION>__<KEY>      HOARD_GITHUB__API_URL=http://...
//!                                 HOARD_FILTER__ONLY=a,b
//!   < command-line flags
//! ```
//!
//! [`Config::validate`] runs on every load; [`Config::require_run_settings`]
//! only before a mirroring run, so `hoard options` works on a partial
//! config. archive.org keys come from [`credentials`].

pub mod credentials;
pub mod loader;
pub mod types;


use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ConfigError, Result};

use loader::ConfigLoader;
use types::{
    ArchiveConfig, FilterConfig, GitHubConfig, GlobalConfig, NetworkConfig, PathsConfig,
    RetrySettings,
};

/// Everything a run reads, one field per TOML section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Global options.
    pub global: GlobalConfig,
    /// GitHub account and API.
    pub github: GitHubConfig,
    /// archive.org target.
    pub archive: ArchiveConfig,
    /// Filesystem locations.
    pub paths: PathsConfig,
    /// Repository selection.
    pub filter: FilterConfig,
    /// Backoff for transient network errors.
    pub retry: RetrySettings,
    /// HTTP client settings.
    pub network: NetworkConfig,
}

impl Config {
    /// An empty [`ConfigLoader`].
    ///
    /// # Example
    ///
    /// ```no_run
    /// use hoard::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file_optional("hoard.toml")
    ///     .with_env_prefix("HOARD")
    ///     .set("github.user", "acme")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Only `path`, on top of the defaults.
    ///
    /// # Errors
    ///
    /// The file is missing, not TOML, or fails validation.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// # Errors
    ///
    /// `content` is not TOML or fails validation.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Check value ranges. Required keys are checked by [`Config::require_run_settings`]
    /// so that a partial config can still be printed.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for an out-of-range value.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if !(1..=100).contains(&self.github.per_page) {
            return Err(invalid(
                "github",
                "per_page",
                format!("must be between 1 and 100, got {}", self.github.per_page),
            ));
        }
        if self.retry.max_attempts == 0 {
            return Err(invalid("retry", "max_attempts", "must be at least 1".into()));
        }
        if !self.retry.backoff_factor.is_finite() || self.retry.backoff_factor < 1.0 {
            return Err(invalid(
                "retry",
                "backoff_factor",
                format!("must be a number >= 1.0, got {}", self.retry.backoff_factor),
            ));
        }
        if self.retry.max_delay_ms < self.retry.base_delay_ms {
            return Err(invalid(
                "retry",
                "max_delay_ms",
                "must not be smaller than base_delay_ms".into(),
            ));
        }
        if let Some(bad) = self.filter.only.iter().find(|name| !is_plain_name(name)) {
            return Err(invalid(
                "filter",
                "only",
                format!("'{bad}' is not a repository name"),
            ));
        }
        Ok(())
    }

    /// Check the keys a mirroring run cannot do without.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingKey` naming the first absent key and the
    /// CLI flag that provides it.
    pub fn require_run_settings(&self) -> std::result::Result<(), ConfigError> {
        let required = [
            ("github", "user", &self.github.user, " (use --github-user)"),
            (
                "github",
                "token",
                &self.github.token,
                " (use --github-token or GITHUB_TOKEN)",
            ),
            (
                "archive",
                "collection",
                &self.archive.collection,
                " (use --ia-collection)",
            ),
        ];
        for (section, key, value, hint) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::MissingKey {
                    section: section.to_string(),
                    key: key.to_string(),
                    hint: hint.to_string(),
                });
            }
        }
        Ok(())
    }

    /// `key = value` lines for every option, sorted, `=` aligned.
    ///
    /// Tokens and keys print as `[hidden]`, and only when set.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let (global, github, archive) = (&self.global, &self.github, &self.archive);
        let (filter, retry, network) = (&self.filter, &self.retry, &self.network);

        let mut rows: Vec<(&str, String)> = vec![
            ("global.dry", global.dry.to_string()),
            ("global.keep_mirror", global.keep_mirror.to_string()),
            ("global.output_log_level", global.output_log_level.as_u8().to_string()),
            ("global.file_log_level", global.file_log_level.as_u8().to_string()),
            (
                "global.log_file",
                global.log_file.as_deref().map(|p| p.display().to_string()).unwrap_or_default(),
            ),
            ("global.log_json", global.log_json.to_string()),
            (
                "global.process_timeout_secs",
                global
                    .process_timeout_secs
                    .map_or_else(|| "none".to_string(), |s| s.to_string()),
            ),
            ("github.user", github.user.clone()),
            ("github.api_url", github.api_url.clone()),
            ("github.per_page", github.per_page.to_string()),
            ("archive.collection", archive.collection.clone()),
            ("archive.s3_url", archive.s3_url.clone()),
            ("archive.media_type", archive.media_type.clone()),
            ("paths.output_dir", self.paths.output_dir.display().to_string()),
            ("filter.include_forks", filter.include_forks.to_string()),
            ("filter.include_archived", filter.include_archived.to_string()),
            ("retry.max_attempts", retry.max_attempts.to_string()),
            ("retry.base_delay_ms", retry.base_delay_ms.to_string()),
            ("retry.max_delay_ms", retry.max_delay_ms.to_string()),
            ("retry.backoff_factor", retry.backoff_factor.to_string()),
            ("retry.jitter", retry.jitter.to_string()),
            ("network.timeout_secs", network.timeout_secs.to_string()),
            ("network.connect_timeout_secs", network.connect_timeout_secs.to_string()),
        ];
        for (key, secret) in [
            ("github.token", &github.token),
            ("archive.access_key", &archive.access_key),
            ("archive.secret_key", &archive.secret_key),
        ] {
            if !secret.is_empty() {
                rows.push((key, "[hidden]".to_string()));
            }
        }
        if !filter.only.is_empty() {
            rows.push(("filter.only", filter.only.join(",")));
        }
        rows.sort_unstable_by_key(|(key, _)| *key);

        let width = rows.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
        rows.into_iter()
            .map(|(key, value)| format!("{key:<width$} = {value}"))
            .collect()
    }
}

fn invalid(section: &str, key: &str, message: String) -> ConfigError {
    ConfigError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        message,
    }
}

/// A repository name usable as a single path component.
#[must_use]
pub fn is_plain_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}
