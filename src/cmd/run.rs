// hoard: GitHub to archive.org mirroring tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Mirroring run: list, mirror, archive, upload, clean up.

use anyhow::Context as _;
use tokio_util::sync::CancellationToken;

use crate::archiver::Archiver;
use crate::config::Config;
use crate::config::credentials::resolve_credentials;
use crate::error::{FsError, Result};
use crate::forge::{GitHubLister, RepoFilter};
use crate::mirror::MirrorManager;
use crate::net::retry::RetryConfig;
use crate::net::{ProgressDisplay, api_client, upload_client};
use crate::pipeline::{Pipeline, RunSummary};
use crate::uploader::Uploader;

/// Runs the pipeline for the configured account.
///
/// Ctrl+C cancels the in-flight repository; the remaining ones are reported
/// as failed.
///
/// # Errors
///
/// Returns an error if required settings or archive.org credentials are
/// missing, or if the repositories cannot be listed. Per-repository failures
/// are reported in the returned summary.
pub async fn run_mirror_command(config: &Config) -> Result<RunSummary> {
    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Received Ctrl+C, interrupting run...");
            ctrl_c.cancel();
        }
    });

    run_with_cancellation(config, cancel).await
}

/// [`run_mirror_command`] with a caller-supplied cancellation token.
///
/// # Errors
///
/// See [`run_mirror_command`].
pub async fn run_with_cancellation(
    config: &Config,
    cancel: CancellationToken,
) -> Result<RunSummary> {
    config.require_run_settings()?;
    let dry_run = config.global.dry;
    let retry = RetryConfig::from(&config.retry);
    let timeout = config.global.process_timeout();
    let output_dir = std::path::absolute(&config.paths.output_dir)
        .map_err(|e| FsError::from_io(&config.paths.output_dir, e))?;

    // Credentials are resolved before anything is listed or cloned.
    let uploader = if dry_run {
        None
    } else {
        let credentials = resolve_credentials(&config.archive)?;
        let uploader = Uploader::new(
            upload_client(&config.network)?,
            &config.archive.s3_url,
            credentials,
        )?
        .with_retry(retry.clone())
        .with_cancellation(cancel.clone())
        .with_progress(ProgressDisplay::for_stderr());
        Some(uploader)
    };

    let lister = GitHubLister::new(api_client(&config.network)?, &config.github)?
        .with_retry(retry)
        .with_cancellation(cancel.clone());
    let filter = RepoFilter::from(&config.filter);

    let mirrors = MirrorManager::new()
        .with_token(config.github.token.clone())
        .with_timeout(timeout)
        .with_cancellation(cancel.clone());
    let archiver = Archiver::new()
        .with_timeout(timeout)
        .with_cancellation(cancel.clone());

    let pipeline = Pipeline::builder()
        .account(config.github.user.clone())
        .collection(config.archive.collection.clone())
        .media_type(config.archive.media_type.clone())
        .output_dir(output_dir)
        .with_keep_mirror(config.global.keep_mirror)
        .with_dry_run(dry_run)
        .mirrors(mirrors)
        .archiver(archiver)
        .maybe_with_uploader(uploader)
        .with_cancellation(cancel)
        .build();

    let summary = pipeline
        .run(&lister, &filter)
        .await
        .with_context(|| format!("failed to list repositories of '{}'", config.github.user))?;
    summary.log();
    Ok(summary)
}
