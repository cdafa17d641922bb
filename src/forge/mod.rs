// hoard: GitHub to archive.org mirroring tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Repository listing from a code forge.
//!
//! ```text
//! GitHubLister::list_repositories(account)
//!      |
//!      v
//!  page 1, 2, ... (GET /users/{account}/repos)  ── retried on Transient
//!      |
//!      v
//!  RepositoryDescriptor stream ── RepoFilter (forks, archived, only)
//! ```

pub mod github;


use std::collections::BTreeSet;

use crate::config::types::FilterConfig;

pub use github::GitHubLister;

/// SPDX value GitHub reports when it cannot identify a license.
const SPDX_NOASSERTION: &str = "NOASSERTION";

/// One repository of the mirrored account. Read-only once listed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryDescriptor {
    pub owner: String,
    pub name: String,
    pub description: Option<String>,
    /// SPDX identifier, absent when unknown.
    pub license: Option<String>,
    pub topics: BTreeSet<String>,
    pub default_branch: Option<String>,
    pub clone_url: String,
    pub html_url: String,
    pub fork: bool,
    pub archived: bool,
    pub private: bool,
}

impl RepositoryDescriptor {
    /// `<owner>/<name>`.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

/// Drop empty strings and GitHub's `NOASSERTION` placeholder.
pub(crate) fn normalize_spdx(spdx: Option<String>) -> Option<String> {
    spdx.map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case(SPDX_NOASSERTION))
}

/// Which listed repositories the run processes.
#[derive(Debug, Clone, Default)]
pub struct RepoFilter {
    pub include_forks: bool,
    pub include_archived: bool,
    pub only: BTreeSet<String>,
}

impl RepoFilter {
    /// A filter that keeps everything.
    #[must_use]
    pub fn all() -> Self {
        Self {
            include_forks: true,
            include_archived: true,
            only: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn accepts(&self, repo: &RepositoryDescriptor) -> bool {
        (self.include_forks || !repo.fork)
            && (self.include_archived || !repo.archived)
            && (self.only.is_empty() || self.only.contains(&repo.name))
    }
}

impl From<&FilterConfig> for RepoFilter {
    fn from(cfg: &FilterConfig) -> Self {
        Self {
            include_forks: cfg.include_forks,
            include_archived: cfg.include_archived,
            only: cfg.only.iter().cloned().collect(),
        }
    }
}
