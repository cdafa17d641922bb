// hoard: GitHub to archive.org mirroring tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Item metadata and its S3 header encoding.
//!
//! ```text
//! RepositoryDescriptor ──> UploadMetadata ──> x-archive-meta-* headers
//!
//! collection   → x-archive-meta-collection
//! title        → x-archive-meta-title
//! description  → x-archive-meta-description
//! media type   → x-archive-meta-mediatype
//! license url  → x-archive-meta-licenseurl      (only when known)
//! subjects[i]  → x-archive-metaNN-subject       (NN = 01, 02, ...)
//! ```
//!
//! Values that are not printable ASCII travel as `uri(<percent-encoded>)`,
//! which archive.org decodes on ingest.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::forge::RepositoryDescriptor;

/// Metadata attached to an archive.org item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadMetadata {
    /// Item identifier, see [`item_identifier`].
    pub identifier: String,
    pub collection: String,
    pub title: String,
    pub description: String,
    pub license_url: Option<String>,
    pub subjects: Vec<String>,
    pub media_type: String,
}

/// Deterministic item identifier: `<collection>__<name>`.
#[must_use]
pub fn item_identifier(collection: &str, repo_name: &str) -> String {
    format!("{collection}__{repo_name}")
}

/// SPDX license page for an identifier.
#[must_use]
pub fn license_url(spdx: &str) -> String {
    format!("https://spdx.org/licenses/{spdx}.html")
}

impl UploadMetadata {
    /// Projects a listed repository onto item metadata.
    ///
    /// `account` is the account the run was started for, which names the
    /// item title `<account>/<repo> mirror`.
    #[must_use]
    pub fn from_descriptor(
        repo: &RepositoryDescriptor,
        account: &str,
        collection: &str,
        media_type: &str,
    ) -> Self {
        let description = repo
            .description
            .clone()
            .unwrap_or_else(|| format!("Git mirror of {}", repo.html_url));
        Self {
            identifier: item_identifier(collection, &repo.name),
            collection: collection.to_string(),
            title: format!("{account}/{} mirror", repo.name),
            description,
            license_url: repo.license.as_deref().map(license_url),
            subjects: repo.topics.iter().cloned().collect(),
            media_type: media_type.to_string(),
        }
    }

    /// The `x-archive-meta*` headers for this metadata, in a stable order.
    #[must_use]
    pub fn headers(&self) -> Vec<(String, String)> {
        let mut headers = vec![
            meta_header("collection", &self.collection),
            meta_header("title", &self.title),
            meta_header("description", &self.description),
            meta_header("mediatype", &self.media_type),
        ];
        if let Some(url) = &self.license_url {
            headers.push(meta_header("licenseurl", url));
        }
        for (index, subject) in self.subjects.iter().enumerate() {
            headers.push((
                format!("x-archive-meta{:02}-subject", index + 1),
                encode_header_value(subject),
            ));
        }
        headers
    }
}

fn meta_header(key: &str, value: &str) -> (String, String) {
    (format!("x-archive-meta-{key}"), encode_header_value(value))
}

/// Left unescaped inside `uri(...)`; archive.org percent-decodes the rest.
const URI_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Printable ASCII passes through; anything else becomes `uri(...)`.
#[must_use]
pub fn encode_header_value(value: &str) -> String {
    if value.bytes().all(|b| (0x20..=0x7e).contains(&b)) {
        value.to_string()
    } else {
        format!("uri({})", utf8_percent_encode(value, URI_VALUE))
    }
}
