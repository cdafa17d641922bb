// hoard: GitHub to archive.org mirroring tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! archive.org S3 uploads.
//!
//! ```text
//! PUT {s3_url}/{collection}__{name}/{name}.git.tar.gz
//!   authorization: LOW <access>:<secret>
//!   x-amz-auto-make-bucket: 1
//!   x-archive-ignore-preexisting-bucket: 1
//!   x-archive-meta-*: ...
//!   body: artifact, streamed from disk
//!
//! 2xx          → done
//! 401 / 403    → Authentication
//! 429 / 5xx    → Transient (retried)
//! network      → Transient (retried)
//! other        → Rejected
//! ```

pub mod metadata;


use futures_util::TryStreamExt as _;
use indicatif::ProgressBar;
use reqwest::header::{AUTHORIZATION, CONTENT_LENGTH};
use reqwest::{Body, Client, StatusCode};
use tokio_util::io::ReaderStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use url::Url;

pub use metadata::{UploadMetadata, item_identifier};

use crate::archiver::ArchiveArtifact;
use crate::config::credentials::IaCredentials;
use crate::error::UploadError;
use crate::net::ProgressDisplay;
use crate::net::retry::{RetryConfig, retry_with_cancellation};

/// Longest response body kept in a [`UploadError::Rejected`].
const MAX_ERROR_BODY: usize = 512;

/// A finished upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResult {
    pub identifier: String,
    /// Object URL the artifact was stored under.
    pub url: String,
    pub size: u64,
}

/// Uploads artifacts to an S3-compatible archive.org endpoint.
#[derive(Debug, Clone)]
pub struct Uploader {
    client: Client,
    s3_url: Url,
    credentials: IaCredentials,
    retry: RetryConfig,
    cancel: CancellationToken,
    progress: ProgressDisplay,
}

impl Uploader {
    /// # Errors
    ///
    /// Returns `UploadError::InvalidUrl` if `s3_url` is not a base URL.
    pub fn new(client: Client, s3_url: &str, credentials: IaCredentials) -> Result<Self, UploadError> {
        let mut url =
            Url::parse(s3_url).map_err(|e| UploadError::InvalidUrl(format!("{s3_url}: {e}")))?;
        if url.cannot_be_a_base() {
            return Err(UploadError::InvalidUrl(s3_url.to_string()));
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(Self {
            client,
            s3_url: url,
            credentials,
            retry: RetryConfig::default(),
            cancel: CancellationToken::new(),
            progress: ProgressDisplay::Silent,
        })
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    #[must_use]
    pub const fn with_progress(mut self, progress: ProgressDisplay) -> Self {
        self.progress = progress;
        self
    }

    /// `{s3_url}/{identifier}/{file_name}`.
    ///
    /// # Errors
    ///
    /// Returns `UploadError::InvalidUrl` if the endpoint cannot take path segments.
    pub fn object_url(&self, identifier: &str, file_name: &str) -> Result<Url, UploadError> {
        let mut url = self.s3_url.clone();
        url.path_segments_mut()
            .map_err(|()| UploadError::InvalidUrl(self.s3_url.to_string()))?
            .pop_if_empty()
            .extend([identifier, file_name]);
        Ok(url)
    }

    /// Streams `artifact` into the item described by `metadata`.
    ///
    /// Transient failures are retried per the retry policy; each attempt
    /// re-reads the artifact from the start.
    ///
    /// # Errors
    ///
    /// - `UploadError::Authentication` if the credentials are refused.
    /// - `UploadError::Transient` if every attempt failed transiently.
    /// - `UploadError::Rejected` for any other refusal.
    /// - `UploadError::Io` if the artifact cannot be opened.
    /// - `UploadError::Interrupted` if cancelled.
    pub async fn upload(
        &self,
        artifact: &ArchiveArtifact,
        metadata: &UploadMetadata,
    ) -> Result<UploadResult, UploadError> {
        let identifier = metadata.identifier.as_str();
        let file_name = artifact.file_name();
        let url = self.object_url(identifier, &file_name)?;
        let headers = metadata.headers();

        info!(item = identifier, file = %file_name, size = artifact.size, "uploading archive");
        let pb = self.progress.create(artifact.size, &file_name);

        let result = retry_with_cancellation(&self.retry, &self.cancel, || {
            self.put_once(&url, identifier, artifact, &headers, pb.as_ref())
        })
        .await;

        if let Some(pb) = &pb {
            pb.finish_and_clear();
        }

        match result {
            Ok(()) => {
                debug!(item = identifier, url = %url, "upload accepted");
                Ok(UploadResult {
                    identifier: identifier.to_string(),
                    url: url.to_string(),
                    size: artifact.size,
                })
            }
            Err(_) if self.cancel.is_cancelled() => Err(UploadError::Interrupted {
                identifier: identifier.to_string(),
            }),
            Err(e) => Err(e),
        }
    }

    async fn put_once(
        &self,
        url: &Url,
        identifier: &str,
        artifact: &ArchiveArtifact,
        headers: &[(String, String)],
        pb: Option<&ProgressBar>,
    ) -> Result<(), UploadError> {
        let file = tokio::fs::File::open(&artifact.path)
            .await
            .map_err(|source| UploadError::Io {
                path: artifact.path.display().to_string(),
                source,
            })?;

        let counter = pb.cloned();
        if let Some(pb) = &counter {
            pb.set_position(0);
        }
        let stream = ReaderStream::new(file).inspect_ok(move |chunk| {
            if let Some(pb) = &counter {
                pb.inc(chunk.len() as u64);
            }
        });

        let mut request = self
            .client
            .put(url.clone())
            .header(AUTHORIZATION, self.credentials.authorization())
            .header("x-amz-auto-make-bucket", "1")
            .header("x-archive-ignore-preexisting-bucket", "1")
            .header("x-archive-size-hint", artifact.size.to_string())
            .header(CONTENT_LENGTH, artifact.size.to_string());
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }
        let request = request.body(Body::wrap_stream(stream));

        let response = tokio::select! {
            response = request.send() => response,
            () = self.cancel.cancelled() => {
                return Err(UploadError::Interrupted { identifier: identifier.to_string() });
            }
        };
        let response = response.map_err(|e| UploadError::Transient {
            identifier: identifier.to_string(),
            message: e.to_string(),
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(classify_status(status, identifier, &body))
    }
}

/// Maps a non-success upload response to an [`UploadError`].
pub(crate) fn classify_status(status: StatusCode, identifier: &str, body: &str) -> UploadError {
    let identifier = identifier.to_string();
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => UploadError::Authentication {
            identifier,
            status: status.as_u16(),
        },
        s if s == StatusCode::TOO_MANY_REQUESTS || s.is_server_error() => UploadError::Transient {
            identifier,
            message: format!("http {}", s.as_u16()),
        },
        s => UploadError::Rejected {
            identifier,
            status: s.as_u16(),
            body: truncate(body.trim(), MAX_ERROR_BODY),
        },
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.len() <= max {
        return text.to_string();
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}
