// hoard: GitHub to archive.org mirroring tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git command operations using the git CLI.
//!
//! ```text
//! cmd.rs --> ToolCommand --> git
//!   -c credential.helper=                 (drop user helpers)
//!   -c credential.helper=!<print token>   (token from GIT_HOARD_TOKEN)
//! ```
//!
//! `-c` settings live only for the invocation, so the token is never
//! written to the mirror's config.

use std::path::Path;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::core::process::{ToolCommand, ToolOutput};
use crate::error::Result;

/// Environment variable the credential helper reads the token from.
pub const TOKEN_ENV: &str = "GIT_HOARD_TOKEN";

/// Inline credential helper answering `get` with the token from [`TOKEN_ENV`].
const CREDENTIAL_HELPER: &str = "!f() { test \"$1\" = get || exit 0; \
     echo username=x-access-token; echo \"password=${GIT_HOARD_TOKEN}\"; }; f";

/// Per-invocation options shared by every git command.
#[derive(Clone, Default)]
pub struct GitOptions {
    /// HTTPS token handed to git through the credential helper.
    pub token: Option<String>,
    /// Kill git after this long.
    pub timeout: Option<Duration>,
    /// Kill git when cancelled.
    pub cancel: CancellationToken,
}

impl std::fmt::Debug for GitOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitOptions")
            .field("token", &self.token.as_ref().map(|_| "[hidden]"))
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl GitOptions {
    /// A git command with prompts disabled and auth wired up.
    ///
    /// # Errors
    ///
    /// Returns `ProcessError::ExecutableNotFound` if git is not in PATH.
    pub fn git(&self) -> Result<ToolCommand> {
        let mut builder = ToolCommand::locate("git")?
            .env("GIT_TERMINAL_PROMPT", "0")
            .env("GCM_INTERACTIVE", "never")
            .time_limit(self.timeout);

        if let Some(token) = self.token.as_deref().filter(|t| !t.is_empty()) {
            let helper = format!("credential.helper={CREDENTIAL_HELPER}");
            builder = builder
                .args(["-c", "credential.helper="])
                .args(["-c", helper.as_str()])
                .env(TOKEN_ENV, token);
        }
        Ok(builder)
    }
}

/// `git clone --mirror <url> <dest>`.
///
/// # Errors
///
/// Returns an error if git cannot be found or spawned, exits non-zero, or
/// times out.
pub async fn clone_mirror(url: &str, dest: &Path, options: &GitOptions) -> Result<ToolOutput> {
    let parent = dest.parent().unwrap_or_else(|| Path::new("."));
    options
        .git()?
        .args(["clone", "--mirror", "--quiet", url])
        .arg(dest)
        .cwd(parent)
        .run(&options.cancel)
        .await
}

/// `git remote update` inside an existing mirror. Never prunes.
///
/// # Errors
///
/// Returns an error if git cannot be found or spawned, exits non-zero, or
/// times out.
pub async fn remote_update(mirror: &Path, options: &GitOptions) -> Result<ToolOutput> {
    options
        .git()?
        .args(["-c", "fetch.prune=false", "remote", "update"])
        .cwd(mirror)
        .run(&options.cancel)
        .await
}
