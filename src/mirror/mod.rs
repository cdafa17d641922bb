// hoard: GitHub to archive.org mirroring tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Bare mirrors of listed repositories.
//!
//! ```text
//! ensure_mirror(repo, root)
//!   <root>/<name>.git absent      → git clone --mirror
//!   present, bare repository      → git remote update (no prune)
//!   present, anything else        → NotAMirror (left untouched)
//! ```


use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::core::process::ToolOutput;
use crate::error::{FsError, HoardResult, MirrorError, ProcessError};
use crate::forge::RepositoryDescriptor;
use crate::git::cmd::{GitOptions, clone_mirror, remote_update};
use crate::git::query::is_bare_repository;

/// A bare mirror on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorHandle {
    /// Repository name; the mirror directory is `<name>.git`.
    pub name: String,
    /// Path of the mirror directory.
    pub path: PathBuf,
}

impl MirrorHandle {
    /// Directory holding the mirror.
    #[must_use]
    pub fn root(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }

    /// `<name>.git`.
    #[must_use]
    pub fn dir_name(&self) -> String {
        mirror_dir_name(&self.name)
    }
}

#[must_use]
pub fn mirror_dir_name(name: &str) -> String {
    format!("{name}.git")
}

/// Mirror path for `name` under `root`.
#[must_use]
pub fn mirror_path(root: &Path, name: &str) -> PathBuf {
    root.join(mirror_dir_name(name))
}

/// Creates and refreshes mirrors.
#[derive(Clone, Default)]
pub struct MirrorManager {
    token: Option<String>,
    timeout: Option<Duration>,
    cancel: CancellationToken,
}

impl fmt::Debug for MirrorManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MirrorManager")
            .field("token", &self.token.as_ref().map(|_| "[hidden]"))
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl MirrorManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Token handed to git for HTTPS authentication.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.token = (!token.is_empty()).then_some(token);
        self
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

    fn git_options(&self) -> GitOptions {
        GitOptions {
            token: self.token.clone(),
            timeout: self.timeout,
            cancel: self.cancel.clone(),
        }
    }

    /// Clones `repo` as a bare mirror under `root`, or refreshes an existing one.
    ///
    /// # Errors
    ///
    /// - `MirrorError::NotAMirror` if the target exists but is not a bare repository.
    /// - `MirrorError::CloneFailed` / `UpdateFailed` if git fails or times out.
    /// - `MirrorError::Interrupted` if cancelled.
    /// - `FsError` if `root` cannot be created.
    pub async fn ensure_mirror(
        &self,
        repo: &RepositoryDescriptor,
        root: &Path,
    ) -> HoardResult<MirrorHandle> {
        // git runs from the root's parent, so a relative root would nest.
        let root = std::path::absolute(root).map_err(|e| FsError::from_io(root, e))?;
        let root = root.as_path();
        let path = mirror_path(root, &repo.name);
        let handle = MirrorHandle {
            name: repo.name.clone(),
            path: path.clone(),
        };
        let options = self.git_options();

        if path.exists() {
            if !is_bare_repository(&path) {
                return Err(MirrorError::NotAMirror {
                    path: path.display().to_string(),
                }
                .into());
            }
            info!(repo = %repo.name, path = %path.display(), "updating mirror");
            let output = remote_update(&path, &options)
                .await
                .map_err(|e| MirrorError::UpdateFailed {
                    repo: repo.name.clone(),
                    message: failure_message(&e),
                })?;
            check_interrupted(&output, &repo.name)?;
        } else {
            tokio::fs::create_dir_all(root)
                .await
                .map_err(|e| FsError::from_io(root, e))?;
            info!(repo = %repo.name, path = %path.display(), "cloning mirror");
            let result = clone_mirror(&repo.clone_url, &path, &options).await;
            let output = match result {
                Ok(output) => output,
                Err(e) => {
                    remove_partial(&path).await;
                    return Err(MirrorError::CloneFailed {
                        repo: repo.name.clone(),
                        message: failure_message(&e),
                    }
                    .into());
                }
            };
            if output.interrupted {
                remove_partial(&path).await;
            }
            check_interrupted(&output, &repo.name)?;
        }

        debug!(repo = %repo.name, "mirror ready");
        Ok(handle)
    }
}

fn check_interrupted(output: &ToolOutput, repo: &str) -> Result<(), MirrorError> {
    if output.interrupted {
        return Err(MirrorError::Interrupted {
            repo: repo.to_string(),
        });
    }
    Ok(())
}

/// The most useful part of a git failure: the process error if there is one.
fn failure_message(err: &anyhow::Error) -> String {
    err.downcast_ref::<ProcessError>()
        .map_or_else(|| format!("{err:#}"), ToString::to_string)
}

/// A half-written clone would be mistaken for a mirror on the next run.
async fn remove_partial(path: &Path) {
    if path.exists()
        && let Err(e) = tokio::fs::remove_dir_all(path).await
    {
        debug!(path = %path.display(), error = %e, "failed to remove partial clone");
    }
}
