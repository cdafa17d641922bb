// hoard: GitHub to archive.org mirroring tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git query operations using gix.
//!
//! ```text
//! query.rs --> gix::open --> <name>.git/ (no subprocess)
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::MirrorError;

fn open(path: &Path) -> Result<gix::Repository, MirrorError> {
    gix::open(path).map_err(|e| MirrorError::Query {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Whether `path` is the root of a bare repository.
#[must_use]
pub fn is_bare_repository(path: &Path) -> bool {
    gix::open(path).is_ok_and(|repo| repo.is_bare())
}

/// All direct references of the repository, name to object id.
///
/// Symbolic references are skipped; a mirror's `HEAD` is the only one.
///
/// # Errors
///
/// Returns `MirrorError::Query` if the repository cannot be opened or its
/// references cannot be read.
pub fn list_refs(path: &Path) -> Result<BTreeMap<String, String>, MirrorError> {
    let repo = open(path)?;
    let query_err = |message: String| MirrorError::Query {
        path: path.display().to_string(),
        message,
    };

    let platform = repo.references().map_err(|e| query_err(e.to_string()))?;
    let iter = platform.all().map_err(|e| query_err(e.to_string()))?;

    let mut refs = BTreeMap::new();
    for reference in iter {
        let reference = reference.map_err(|e| query_err(e.to_string()))?;
        if let Some(id) = reference.target().try_id() {
            refs.insert(reference.name().as_bstr().to_string(), id.to_hex().to_string());
        }
    }
    Ok(refs)
}
