// hoard: GitHub to archive.org mirroring tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! archive.org S3 credential lookup.
//!
//! ```text
//! Priority (high → low)
//! 1. [archive] access_key / secret_key
//! 2. IA_ACCESS_KEY_ID / IA_SECRET_ACCESS_KEY
//! 3. ia.ini [s3] access / secret, first file found of:
//!      $IA_CONFIG_FILE
//!      ~/.config/internetarchive/ia.ini
//!      ~/.config/ia.ini
//!      ~/.ia
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use super::types::ArchiveConfig;
use crate::error::{ConfigError, UploadError};

/// S3-style key pair for the archive.org upload API.
#[derive(Clone, PartialEq, Eq)]
pub struct IaCredentials {
    pub access: String,
    pub secret: String,
}

impl IaCredentials {
    #[must_use]
    pub fn new(access: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            access: access.into(),
            secret: secret.into(),
        }
    }

    /// Value of the `authorization` header.
    #[must_use]
    pub fn authorization(&self) -> String {
        format!("LOW {}:{}", self.access, self.secret)
    }

    fn from_pair(access: &str, secret: &str) -> Option<Self> {
        (!access.is_empty() && !secret.is_empty()).then(|| Self::new(access, secret))
    }
}

impl fmt::Debug for IaCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IaCredentials")
            .field("access", &self.access)
            .field("secret", &"[hidden]")
            .finish()
    }
}

#[derive(Debug, Default, Deserialize)]
struct IaIni {
    #[serde(default)]
    s3: IaIniS3,
}

#[derive(Debug, Default, Deserialize)]
struct IaIniS3 {
    #[serde(default)]
    access: String,
    #[serde(default)]
    secret: String,
}

/// Candidate `ia` configuration files, in lookup order.
#[must_use]
pub fn ia_config_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(path) = std::env::var_os("IA_CONFIG_FILE").filter(|p| !p.is_empty()) {
        candidates.push(PathBuf::from(path));
    }
    if let Some(home) = dirs::home_dir() {
        candidates.push(home.join(".config").join("internetarchive").join("ia.ini"));
        candidates.push(home.join(".config").join("ia.ini"));
        candidates.push(home.join(".ia"));
    }
    candidates
}

/// Reads the `[s3]` section of an `ia` configuration file.
///
/// # Errors
///
/// Returns `ConfigError::ParseError` if the file is not valid INI.
pub fn read_ia_config(path: &Path) -> Result<Option<IaCredentials>, ConfigError> {
    let parsed: IaIni = config::Config::builder()
        .add_source(config::File::from(path).format(config::FileFormat::Ini))
        .build()
        .and_then(config::Config::try_deserialize::<IaIni>)
        .map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
    Ok(IaCredentials::from_pair(&parsed.s3.access, &parsed.s3.secret))
}

/// Resolves credentials from config, environment and `ia` files.
///
/// # Errors
///
/// Returns `UploadError::MissingCredentials` when no source provides a
/// complete key pair.
pub fn resolve_credentials(archive: &ArchiveConfig) -> Result<IaCredentials, UploadError> {
    resolve_credentials_from(archive, &ia_config_candidates())
}

/// Same as [`resolve_credentials`] with an explicit file list.
///
/// # Errors
///
/// Returns `UploadError::MissingCredentials` when no source provides a
/// complete key pair.
pub fn resolve_credentials_from(
    archive: &ArchiveConfig,
    candidates: &[PathBuf],
) -> Result<IaCredentials, UploadError> {
    if let Some(creds) = IaCredentials::from_pair(&archive.access_key, &archive.secret_key) {
        debug!("using archive.org credentials from config");
        return Ok(creds);
    }

    let env_access = std::env::var("IA_ACCESS_KEY_ID").unwrap_or_default();
    let env_secret = std::env::var("IA_SECRET_ACCESS_KEY").unwrap_or_default();
    if let Some(creds) = IaCredentials::from_pair(&env_access, &env_secret) {
        debug!("using archive.org credentials from environment");
        return Ok(creds);
    }

    for path in candidates.iter().filter(|p| p.is_file()) {
        match read_ia_config(path) {
            Ok(Some(creds)) => {
                debug!(path = %path.display(), "using archive.org credentials from ia config");
                return Ok(creds);
            }
            Ok(None) => debug!(path = %path.display(), "ia config has no [s3] keys"),
            Err(e) => debug!(error = %e, "skipping unreadable ia config"),
        }
    }

    Err(UploadError::MissingCredentials)
}
