// hoard: GitHub to archive.org mirroring tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! GitHub REST API repository lister.
//!
//! ```text
//! GET {api_url}/users/{account}/repos?per_page=N&page=K
//!   Authorization: Bearer <token>
//!   Accept: application/vnd.github+json
//!
//! 200 + N items     → yield, next page
//! 200 + < N items   → yield, stop
//! 401               → Authentication
//! 404               → NotFound
//! 403 (rate limit)  → Transient
//! 429 / 5xx         → Transient
//! other             → HttpError
//! ```

use std::collections::BTreeSet;

use futures_util::stream::{self, BoxStream, StreamExt as _, TryStreamExt as _};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};
use url::Url;

use super::{RepoFilter, RepositoryDescriptor, normalize_spdx};
use crate::config::types::GitHubConfig;
use crate::error::ForgeError;
use crate::net::retry::{RetryConfig, retry_with_cancellation};

const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";
const GITHUB_API_VERSION: &str = "2022-11-28";

#[derive(Debug, Deserialize)]
struct ApiRepository {
    name: String,
    owner: ApiOwner,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    license: Option<ApiLicense>,
    #[serde(default)]
    topics: Vec<String>,
    #[serde(default)]
    default_branch: Option<String>,
    clone_url: String,
    html_url: String,
    #[serde(default)]
    fork: bool,
    #[serde(default)]
    archived: bool,
    #[serde(default)]
    private: bool,
}

#[derive(Debug, Deserialize)]
struct ApiOwner {
    login: String,
}

#[derive(Debug, Deserialize)]
struct ApiLicense {
    #[serde(default)]
    spdx_id: Option<String>,
}

impl From<ApiRepository> for RepositoryDescriptor {
    fn from(api: ApiRepository) -> Self {
        Self {
            owner: api.owner.login,
            name: api.name,
            description: api
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            license: normalize_spdx(api.license.and_then(|l| l.spdx_id)),
            topics: api.topics.into_iter().collect::<BTreeSet<_>>(),
            default_branch: api.default_branch,
            clone_url: api.clone_url,
            html_url: api.html_url,
            fork: api.fork,
            archived: api.archived,
            private: api.private,
        }
    }
}

/// Lists the repositories of one GitHub account.
#[derive(Clone)]
pub struct GitHubLister {
    client: Client,
    api_url: Url,
    token: String,
    per_page: u32,
    retry: RetryConfig,
    cancel: CancellationToken,
}

impl GitHubLister {
    /// Creates a lister for the API described by `cfg`.
    ///
    /// # Errors
    ///
    /// Returns `ForgeError::InvalidUrl` if `cfg.api_url` is not a base URL.
    pub fn new(client: Client, cfg: &GitHubConfig) -> Result<Self, ForgeError> {
        let mut api_url = Url::parse(&cfg.api_url)
            .map_err(|e| ForgeError::InvalidUrl(format!("{}: {e}", cfg.api_url)))?;
        if api_url.cannot_be_a_base() {
            return Err(ForgeError::InvalidUrl(cfg.api_url.clone()));
        }
        if !api_url.path().ends_with('/') {
            let path = format!("{}/", api_url.path());
            api_url.set_path(&path);
        }
        Ok(Self {
            client,
            api_url,
            token: cfg.token.clone(),
            per_page: cfg.per_page.clamp(1, 100),
            retry: RetryConfig::default(),
            cancel: CancellationToken::new(),
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

    /// URL of one listing page.
    ///
    /// # Errors
    ///
    /// Returns `ForgeError::InvalidUrl` if the account name cannot form a URL.
    pub fn page_url(&self, account: &str, page: u32) -> Result<Url, ForgeError> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|()| ForgeError::InvalidUrl(self.api_url.to_string()))?
            .pop_if_empty()
            .extend(["users", account, "repos"]);
        url.query_pairs_mut()
            .append_pair("per_page", &self.per_page.to_string())
            .append_pair("page", &page.to_string());
        Ok(url)
    }

    /// Lazily lists every repository of `account` that `filter` accepts.
    ///
    /// Pages are fetched on demand; the stream ends after the first short or
    /// empty page. A listing error ends the stream after yielding it.
    pub fn list_repositories<'a>(
        &'a self,
        account: &'a str,
        filter: &'a RepoFilter,
    ) -> BoxStream<'a, Result<RepositoryDescriptor, ForgeError>> {
        let pages = stream::try_unfold(Some(1_u32), move |next| async move {
            let Some(page) = next else {
                return Ok(None);
            };
            let repos = self.fetch_page_with_retry(account, page).await?;
            let is_last = repos.len() < self.per_page as usize;
            let next = if is_last { None } else { page.checked_add(1) };
            Ok::<_, ForgeError>(Some((repos, next)))
        });

        pages
            .map_ok(|repos| stream::iter(repos.into_iter().map(Ok::<_, ForgeError>)))
            .try_flatten()
            .try_filter(move |repo| {
                let keep = filter.accepts(repo);
                if !keep {
                    debug!(repo = %repo.name, "filtered out");
                }
                std::future::ready(keep)
            })
            .boxed()
    }

    /// Collects the whole listing.
    ///
    /// # Errors
    ///
    /// Returns the first listing error.
    pub async fn collect_repositories(
        &self,
        account: &str,
        filter: &RepoFilter,
    ) -> Result<Vec<RepositoryDescriptor>, ForgeError> {
        self.list_repositories(account, filter).try_collect().await
    }

    async fn fetch_page_with_retry(
        &self,
        account: &str,
        page: u32,
    ) -> Result<Vec<RepositoryDescriptor>, ForgeError> {
        retry_with_cancellation(&self.retry, &self.cancel, || self.fetch_page(account, page)).await
    }

    async fn fetch_page(
        &self,
        account: &str,
        page: u32,
    ) -> Result<Vec<RepositoryDescriptor>, ForgeError> {
        let url = self.page_url(account, page)?;
        debug!(account, page, "listing repositories");

        let mut request = self
            .client
            .get(url.clone())
            .header(ACCEPT, GITHUB_MEDIA_TYPE)
            .header("x-github-api-version", GITHUB_API_VERSION);
        if !self.token.is_empty() {
            request = request.header(AUTHORIZATION, format!("Bearer {}", self.token));
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let err = classify_status(status, response.headers(), url.as_str(), account);
            return Err(err);
        }

        let body = response.bytes().await?;
        let repos: Vec<ApiRepository> =
            serde_json::from_slice(&body).map_err(|e| ForgeError::Decode {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        trace!(account, page, count = repos.len(), "page received");

        Ok(repos.into_iter().map(RepositoryDescriptor::from).collect())
    }
}

/// Maps a non-success listing response to a [`ForgeError`].
pub(crate) fn classify_status(
    status: StatusCode,
    headers: &HeaderMap,
    url: &str,
    account: &str,
) -> ForgeError {
    let rate_limited = headers
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.trim() == "0");

    match status {
        StatusCode::UNAUTHORIZED => ForgeError::Authentication {
            account: account.to_string(),
        },
        StatusCode::NOT_FOUND => ForgeError::NotFound {
            account: account.to_string(),
        },
        StatusCode::FORBIDDEN if rate_limited => ForgeError::Transient {
            url: url.to_string(),
            message: "rate limit exhausted".to_string(),
        },
        StatusCode::TOO_MANY_REQUESTS => ForgeError::Transient {
            url: url.to_string(),
            message: "too many requests".to_string(),
        },
        s if s.is_server_error() => ForgeError::Transient {
            url: url.to_string(),
            message: format!("server error {}", s.as_u16()),
        },
        s => ForgeError::HttpError {
            status: s.as_u16(),
            url: url.to_string(),
        },
    }
}
