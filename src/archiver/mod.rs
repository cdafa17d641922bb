// hoard: GitHub to archive.org mirroring tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Compresses a mirror into a single uploadable file.
//!
//! ```text
//! <root>/<name>.git  ──  tar -czf <root>/<name>.git.tar.gz -C <root> <name>.git
//!                                        |
//!                                        v
//!                           ArchiveArtifact { path, size }
//! ```
//!
//! A stale artifact is removed first, so a failed run never leaves an old
//! archive that looks fresh.


use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::core::process::ToolCommand;
use crate::error::{ArchiveError, HoardResult, ProcessError};
use crate::mirror::MirrorHandle;

/// Extension appended to the mirror directory name.
pub const ARCHIVE_EXTENSION: &str = "tar.gz";

/// A compressed mirror ready for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveArtifact {
    pub path: PathBuf,
    pub size: u64,
}

impl ArchiveArtifact {
    /// File name as uploaded, e.g. `a.git.tar.gz`.
    #[must_use]
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map_or_else(String::new, |n| n.to_string_lossy().into_owned())
    }
}

/// Artifact path for a mirror: `<root>/<name>.git.tar.gz`.
#[must_use]
pub fn artifact_path(mirror: &MirrorHandle) -> PathBuf {
    mirror
        .root()
        .join(format!("{}.{ARCHIVE_EXTENSION}", mirror.dir_name()))
}

/// Runs `tar` over mirrors.
#[derive(Debug, Clone, Default)]
pub struct Archiver {
    timeout: Option<Duration>,
    cancel: CancellationToken,
}

impl Archiver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Packs `mirror` into `<name>.git.tar.gz` next to it.
    ///
    /// # Errors
    ///
    /// - `ArchiveError::Io` if a stale artifact cannot be removed or the new one
    ///   cannot be inspected.
    /// - `ArchiveError::CommandFailed` if tar is missing, fails or times out.
    /// - `ArchiveError::Interrupted` if cancelled.
    pub async fn compress(&self, mirror: &MirrorHandle) -> HoardResult<ArchiveArtifact> {
        let path = artifact_path(mirror);
        let shown = path.display().to_string();

        remove_stale(&path).await?;

        info!(repo = %mirror.name, artifact = %shown, "compressing mirror");
        let tar = ToolCommand::locate("tar").map_err(|e| ArchiveError::CommandFailed {
            path: shown.clone(),
            message: e.to_string(),
        })?;

        let result = tar
            .arg("-czf")
            .arg(&path)
            .arg("-C")
            .arg(mirror.root())
            .arg(mirror.dir_name())
            .time_limit(self.timeout)
            .run(&self.cancel)
            .await;

        let output = match result {
            Ok(output) => output,
            Err(e) => {
                discard(&path).await;
                let message = e
                    .downcast_ref::<ProcessError>()
                    .map_or_else(|| format!("{e:#}"), ToString::to_string);
                return Err(ArchiveError::CommandFailed {
                    path: shown,
                    message,
                }
                .into());
            }
        };
        if output.interrupted {
            discard(&path).await;
            return Err(ArchiveError::Interrupted { path: shown }.into());
        }

        let size = tokio::fs::metadata(&path)
            .await
            .map_err(|source| ArchiveError::Io {
                path: shown.clone(),
                source,
            })?
            .len();
        debug!(artifact = %shown, size, "archive written");

        Ok(ArchiveArtifact { path, size })
    }
}

async fn remove_stale(path: &Path) -> Result<(), ArchiveError> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {
            debug!(path = %path.display(), "removed stale archive");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(ArchiveError::Io {
            path: path.display().to_string(),
            source,
        }),
    }
}

async fn discard(path: &Path) {
    let _ = tokio::fs::remove_file(path).await;
}
