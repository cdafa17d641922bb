// hoard: GitHub to archive.org mirroring tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Per-repository pipeline.
//!
//! # Architecture
//!
//! ```text
//! GitHubLister ── collect ──> [repo, repo, ...]
//!                                   |
//!                 for each repo, sequentially, in span `repo`
//!                                   v
//!   Pending ─> Mirrored ─> Archived ─> Uploaded ─┬─> Cleaned
//!      |           |           |           |     └─> Retained (keep_mirror)
//!      └───────────┴───────────┴───────────┴────> Failed { stage, error }
//!                                   |
//!                                   v
//!                              RunSummary
//! ```
//!
//! A failed repository is recorded and the run moves on. Nothing is removed
//! from disk for a failed repository, so the next run can resume from the
//! existing mirror.

mod summary;


use std::path::PathBuf;

use bon::Builder;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument as _, debug, info, info_span, warn};

pub use summary::{RepoOutcome, RepoState, RunSummary, Stage};

use crate::archiver::{ArchiveArtifact, Archiver, artifact_path};
use crate::error::{FsError, HoardResult, UploadError};
use crate::forge::{GitHubLister, RepoFilter, RepositoryDescriptor};
use crate::mirror::{MirrorHandle, MirrorManager, mirror_path};
use crate::uploader::{UploadMetadata, Uploader};

/// Drives every listed repository through mirror, archive, upload and cleanup.
#[derive(Debug, Clone, Builder)]
pub struct Pipeline {
    /// Account the repositories were listed for; names item titles.
    #[builder(into)]
    account: String,
    #[builder(into)]
    collection: String,
    #[builder(into, default = "data".to_string())]
    media_type: String,
    #[builder(into)]
    output_dir: PathBuf,
    #[builder(setters(name = with_keep_mirror), default = false)]
    keep_mirror: bool,
    #[builder(setters(name = with_dry_run), default = false)]
    dry_run: bool,
    #[builder(default)]
    mirrors: MirrorManager,
    #[builder(default)]
    archiver: Archiver,
    /// Required unless `dry_run` is set.
    #[builder(setters(name = with_uploader))]
    uploader: Option<Uploader>,
    #[builder(setters(name = with_cancellation), default)]
    cancel: CancellationToken,
}

impl Pipeline {
    /// Lists `account` and processes every accepted repository.
    ///
    /// # Errors
    ///
    /// Returns the listing error; per-repository failures are reported in
    /// the summary instead.
    pub async fn run(&self, lister: &GitHubLister, filter: &RepoFilter) -> HoardResult<RunSummary> {
        info!(account = %self.account, "listing repositories");
        let repos = lister.collect_repositories(&self.account, filter).await?;
        info!(account = %self.account, count = repos.len(), "repositories listed");
        Ok(self.process(&repos).await)
    }

    /// Processes `repos` in order.
    pub async fn process(&self, repos: &[RepositoryDescriptor]) -> RunSummary {
        let mut summary = RunSummary::default();
        let total = repos.len();

        for (index, repo) in repos.iter().enumerate() {
            if self.cancel.is_cancelled() {
                warn!(repo = %repo.name, "run interrupted, skipping");
                summary.push(RepoOutcome::failed(
                    repo,
                    Stage::Mirror,
                    "run interrupted before this repository started",
                ));
                continue;
            }

            let span = info_span!("repo", repo = %repo.name);
            let outcome = async {
                info!(index = index + 1, total, "processing repository");
                self.process_one(repo).await
            }
            .instrument(span)
            .await;
            summary.push(outcome);
        }

        summary
    }

    async fn process_one(&self, repo: &RepositoryDescriptor) -> RepoOutcome {
        let metadata =
            UploadMetadata::from_descriptor(repo, &self.account, &self.collection, &self.media_type);

        if self.dry_run {
            self.log_plan(repo, &metadata);
            return RepoOutcome::new(repo, RepoState::Pending);
        }

        let mirror = match self.mirrors.ensure_mirror(repo, &self.output_dir).await {
            Ok(mirror) => mirror,
            Err(e) => return failure(repo, Stage::Mirror, &e),
        };
        debug!(state = %RepoState::Mirrored, "stage complete");

        let artifact = match self.archiver.compress(&mirror).await {
            Ok(artifact) => artifact,
            Err(e) => return failure(repo, Stage::Archive, &e),
        };
        debug!(state = %RepoState::Archived, size = artifact.size, "stage complete");

        let Some(uploader) = &self.uploader else {
            return failure(repo, Stage::Upload, &UploadError::MissingCredentials);
        };
        let uploaded = match uploader.upload(&artifact, &metadata).await {
            Ok(uploaded) => uploaded,
            Err(e) => return failure(repo, Stage::Upload, &e),
        };
        info!(
            state = %RepoState::Uploaded,
            item = %uploaded.identifier,
            url = %uploaded.url,
            "https://archive.org/details/{}",
            uploaded.identifier
        );

        if self.keep_mirror {
            debug!(path = %mirror.path.display(), "keeping mirror");
            return RepoOutcome::new(repo, RepoState::Retained);
        }
        match remove(&mirror, &artifact).await {
            Ok(()) => RepoOutcome::new(repo, RepoState::Cleaned),
            Err(e) => failure(repo, Stage::Cleanup, &e),
        }
    }

    fn log_plan(&self, repo: &RepositoryDescriptor, metadata: &UploadMetadata) {
        let mirror = mirror_path(&self.output_dir, &repo.name);
        let action = if mirror.exists() { "update" } else { "clone" };
        let artifact = artifact_path(&MirrorHandle {
            name: repo.name.clone(),
            path: mirror.clone(),
        });
        info!(
            action,
            clone_url = %repo.clone_url,
            mirror = %mirror.display(),
            artifact = %artifact.display(),
            item = %metadata.identifier,
            keep_mirror = self.keep_mirror,
            "[DRY-RUN] would mirror, archive and upload"
        );
    }

}

fn failure(repo: &RepositoryDescriptor, stage: Stage, err: &dyn std::fmt::Display) -> RepoOutcome {
    let message = err.to_string();
    warn!(stage = %stage, error = %message, "repository failed");
    RepoOutcome::failed(repo, stage, message)
}

/// Deletes the mirror directory and its artifact.
///
/// # Errors
///
/// Returns an `FsError` if either exists but cannot be removed.
pub async fn remove(mirror: &MirrorHandle, artifact: &ArchiveArtifact) -> Result<(), FsError> {
    match tokio::fs::remove_dir_all(&mirror.path).await {
        Ok(()) => debug!(path = %mirror.path.display(), "removed mirror"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(FsError::from_io(&mirror.path, e)),
    }
    match tokio::fs::remove_file(&artifact.path).await {
        Ok(()) => debug!(path = %artifact.path.display(), "removed archive"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(FsError::from_io(&artifact.path, e)),
    }
    Ok(())
}
