// hoard: GitHub to archive.org mirroring tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for the archive.org uploader using wiremock.
//!
//! Covers:
//! - Request path, credentials and metadata headers
//! - Streaming the artifact body
//! - Retry on 5xx, no retry on 403
//! - Encoding of non-ASCII metadata

use std::collections::BTreeSet;
use std::path::Path;

use hoard::archiver::ArchiveArtifact;
use hoard::config::credentials::IaCredentials;
use hoard::error::UploadError;
use hoard::forge::RepositoryDescriptor;
use hoard::net::retry::RetryConfig;
use hoard::uploader::{UploadMetadata, Uploader};
use wiremock::matchers::{body_bytes, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PAYLOAD: &[u8] = b"\x1f\x8b pretend this is a gzip stream";

fn artifact(dir: &Path, name: &str) -> ArchiveArtifact {
    let path = dir.join(format!("{name}.git.tar.gz"));
    std::fs::write(&path, PAYLOAD).unwrap();
    ArchiveArtifact {
        path,
        size: PAYLOAD.len() as u64,
    }
}

fn repo(name: &str, license: Option<&str>, topics: &[&str]) -> RepositoryDescriptor {
    RepositoryDescriptor {
        owner: "acme".to_string(),
        name: name.to_string(),
        description: None,
        license: license.map(String::from),
        topics: topics.iter().map(|t| (*t).to_string()).collect::<BTreeSet<_>>(),
        default_branch: Some("main".to_string()),
        clone_url: format!("https://github.com/acme/{name}.git"),
        html_url: format!("https://github.com/acme/{name}"),
        fork: false,
        archived: false,
        private: false,
    }
}

fn uploader(server: &MockServer) -> Uploader {
    Uploader::new(
        reqwest::Client::new(),
        &server.uri(),
        IaCredentials::new("AK", "SK"),
    )
    .unwrap()
    .with_retry(RetryConfig::immediate(3))
}

// =============================================================================
// Successful uploads
// =============================================================================

#[tokio::test]
async fn test_upload_sends_metadata_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/github-archive__a/a.git.tar.gz"))
        .and(header("authorization", "LOW AK:SK"))
        .and(header("x-amz-auto-make-bucket", "1"))
        .and(header("x-archive-ignore-preexisting-bucket", "1"))
        .and(header("x-archive-meta-collection", "github-archive"))
        .and(header("x-archive-meta-title", "acme/a mirror"))
        .and(header(
            "x-archive-meta-description",
            "Git mirror of https://github.com/acme/a",
        ))
        .and(header("x-archive-meta-mediatype", "data"))
        .and(header(
            "x-archive-meta-licenseurl",
            "https://spdx.org/licenses/MIT.html",
        ))
        .and(header("x-archive-meta01-subject", "infra"))
        .and(body_bytes(PAYLOAD))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let artifact = artifact(dir.path(), "a");
    let metadata =
        UploadMetadata::from_descriptor(&repo("a", Some("MIT"), &["infra"]), "acme", "github-archive", "data");

    let result = uploader(&server).upload(&artifact, &metadata).await.unwrap();
    assert_eq!(result.identifier, "github-archive__a");
    assert_eq!(result.size, PAYLOAD.len() as u64);
    assert!(result.url.ends_with("/github-archive__a/a.git.tar.gz"));
}

#[tokio::test]
async fn test_upload_without_license_omits_header() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/github-archive__b/b.git.tar.gz"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let metadata =
        UploadMetadata::from_descriptor(&repo("b", None, &[]), "acme", "github-archive", "data");
    uploader(&server)
        .upload(&artifact(dir.path(), "b"), &metadata)
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let headers = &requests[0].headers;
    assert!(headers.get("x-archive-meta-licenseurl").is_none());
    assert!(headers.get("x-archive-meta01-subject").is_none());
    assert_eq!(
        headers
            .get("x-archive-size-hint")
            .and_then(|v| v.to_str().ok()),
        Some(PAYLOAD.len().to_string().as_str())
    );
}

#[tokio::test]
async fn test_non_ascii_metadata_is_uri_encoded() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut described = repo("a", None, &[]);
    described.description = Some("Outils réseau".to_string());
    let metadata = UploadMetadata::from_descriptor(&described, "acme", "c", "data");
    uploader(&server)
        .upload(&artifact(dir.path(), "a"), &metadata)
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let description = requests[0]
        .headers
        .get("x-archive-meta-description")
        .and_then(|v| v.to_str().ok())
        .unwrap();
    insta::assert_snapshot!(description, @"uri(Outils%20r%C3%A9seau)");
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test]
async fn test_slow_down_is_retried() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(503).set_body_string("SlowDown"))
        .up_to_n_times(2)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(body_bytes(PAYLOAD))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let metadata = UploadMetadata::from_descriptor(&repo("a", None, &[]), "acme", "c", "data");
    uploader(&server)
        .upload(&artifact(dir.path(), "a"), &metadata)
        .await
        .unwrap();

    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_forbidden_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let metadata = UploadMetadata::from_descriptor(&repo("a", None, &[]), "acme", "c", "data");
    let err = uploader(&server)
        .upload(&artifact(dir.path(), "a"), &metadata)
        .await
        .unwrap_err();

    insta::assert_snapshot!(
        err.to_string(),
        @"archive.org rejected the credentials for item 'c__a' (http 403)"
    );
}

#[tokio::test]
async fn test_persistent_server_error_gives_up() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let metadata = UploadMetadata::from_descriptor(&repo("a", None, &[]), "acme", "c", "data");
    let err = uploader(&server)
        .upload(&artifact(dir.path(), "a"), &metadata)
        .await
        .unwrap_err();
    assert!(matches!(err, UploadError::Transient { .. }));
}

#[tokio::test]
async fn test_missing_artifact() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let missing = ArchiveArtifact {
        path: dir.path().join("gone.git.tar.gz"),
        size: 10,
    };
    let metadata = UploadMetadata::from_descriptor(&repo("gone", None, &[]), "acme", "c", "data");

    let err = uploader(&server)
        .upload(&missing, &metadata)
        .await
        .unwrap_err();
    assert!(matches!(err, UploadError::Io { .. }));
    assert!(server.received_requests().await.unwrap().is_empty());
}
