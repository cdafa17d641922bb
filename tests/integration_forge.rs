// hoard: GitHub to archive.org mirroring tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for the GitHub lister using wiremock.
//!
//! Covers:
//! - Pagination and the short-page stop condition
//! - Descriptor mapping (license normalisation, topics, description)
//! - Authentication and not-found errors
//! - Retry of transient errors
//! - Filters

use futures_util::TryStreamExt as _;
use hoard::config::types::GitHubConfig;
use hoard::error::ForgeError;
use hoard::forge::{GitHubLister, RepoFilter};
use hoard::net::retry::RetryConfig;
use serde_json::{Value, json};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api_repo(name: &str, spdx: Option<&str>, topics: &[&str], fork: bool) -> Value {
    json!({
        "name": name,
        "owner": { "login": "acme" },
        "description": format!("{name} description"),
        "license": spdx.map(|id| json!({ "key": id.to_lowercase(), "spdx_id": id })),
        "topics": topics,
        "default_branch": "main",
        "clone_url": format!("https://github.com/acme/{name}.git"),
        "html_url": format!("https://github.com/acme/{name}"),
        "fork": fork,
        "archived": false,
        "private": false,
        "stargazers_count": 3
    })
}

fn lister(server: &MockServer, per_page: u32) -> GitHubLister {
    let cfg = GitHubConfig {
        user: "acme".to_string(),
        token: "t0k3n".to_string(),
        api_url: server.uri(),
        per_page,
    };
    GitHubLister::new(reqwest::Client::new(), &cfg)
        .unwrap()
        .with_retry(RetryConfig::immediate(3))
}

// =============================================================================
// Listing
// =============================================================================

#[tokio::test]
async fn test_pages_until_short_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/acme/repos"))
        .and(query_param("page", "1"))
        .and(query_param("per_page", "2"))
        .and(header("authorization", "Bearer t0k3n"))
        .and(header("accept", "application/vnd.github+json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            api_repo("a", Some("MIT"), &["infra"], false),
            api_repo("b", None, &[], false),
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/acme/repos"))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([api_repo("c", Some("NOASSERTION"), &[], false)])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let repos = lister(&server, 2)
        .collect_repositories("acme", &RepoFilter::all())
        .await
        .unwrap();

    let names: Vec<_> = repos.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["a", "b", "c"]);

    let a = &repos[0];
    assert_eq!(a.full_name(), "acme/a");
    assert_eq!(a.license.as_deref(), Some("MIT"));
    assert!(a.topics.contains("infra"));
    assert_eq!(a.description.as_deref(), Some("a description"));
    assert_eq!(a.clone_url, "https://github.com/acme/a.git");

    assert_eq!(repos[1].license, None);
    assert_eq!(repos[2].license, None, "NOASSERTION is no license");
}

#[tokio::test]
async fn test_empty_account() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/acme/repos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let repos = lister(&server, 100)
        .collect_repositories("acme", &RepoFilter::all())
        .await
        .unwrap();
    assert!(repos.is_empty());
}

#[tokio::test]
async fn test_stream_is_lazy() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/acme/repos"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            api_repo("a", None, &[], false),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let lister = lister(&server, 1);
    let filter = RepoFilter::all();
    let mut stream = lister.list_repositories("acme", &filter);
    let first = stream.try_next().await.unwrap().unwrap();
    assert_eq!(first.name, "a");
    // Page 2 is never requested because the stream is dropped here.
}

// =============================================================================
// Errors
// =============================================================================

#[tokio::test]
async fn test_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let err = lister(&server, 100)
        .collect_repositories("acme", &RepoFilter::all())
        .await
        .unwrap_err();
    assert!(matches!(err, ForgeError::Authentication { ref account } if account == "acme"));
}

#[tokio::test]
async fn test_unknown_account() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let err = lister(&server, 100)
        .collect_repositories("ghost", &RepoFilter::all())
        .await
        .unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"account not found: 'ghost'");
}

#[tokio::test]
async fn test_rate_limit_is_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403).insert_header("x-ratelimit-remaining", "0"))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            api_repo("a", None, &[], false),
        ])))
        .mount(&server)
        .await;

    let repos = lister(&server, 100)
        .collect_repositories("acme", &RepoFilter::all())
        .await
        .unwrap();
    assert_eq!(repos.len(), 1);
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_server_errors_exhaust_retries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502))
        .expect(3)
        .mount(&server)
        .await;

    let err = lister(&server, 100)
        .collect_repositories("acme", &RepoFilter::all())
        .await
        .unwrap_err();
    assert!(matches!(err, ForgeError::Transient { .. }));
}

#[tokio::test]
async fn test_undecodable_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let err = lister(&server, 100)
        .collect_repositories("acme", &RepoFilter::all())
        .await
        .unwrap_err();
    assert!(matches!(err, ForgeError::Decode { .. }));
}

// =============================================================================
// Filters
// =============================================================================

#[tokio::test]
async fn test_forks_filtered_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            api_repo("a", None, &[], false),
            api_repo("forked", None, &[], true),
            api_repo("b", None, &[], false),
        ])))
        .mount(&server)
        .await;

    let filter = RepoFilter {
        include_forks: false,
        ..RepoFilter::all()
    };
    let repos = lister(&server, 100)
        .collect_repositories("acme", &filter)
        .await
        .unwrap();
    let names: Vec<_> = repos.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["a", "b"]);
}

#[tokio::test]
async fn test_only_filter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            api_repo("a", None, &[], false),
            api_repo("b", None, &[], false),
        ])))
        .mount(&server)
        .await;

    let filter = RepoFilter {
        only: ["b".to_string()].into_iter().collect(),
        ..RepoFilter::all()
    };
    let repos = lister(&server, 100)
        .collect_repositories("acme", &filter)
        .await
        .unwrap();
    assert_eq!(repos.len(), 1);
    assert_eq!(repos[0].name, "b");
}
