// hoard: GitHub to archive.org mirroring tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::fmt;

use tracing::{error, info};

use crate::forge::RepositoryDescriptor;

/// Pipeline stage a repository can fail in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Mirror,
    Archive,
    Upload,
    Cleanup,
}

impl Stage {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Mirror => "mirror",
            Self::Archive => "archive",
            Self::Upload => "upload",
            Self::Cleanup => "cleanup",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where a repository ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoState {
    /// Not processed (dry run).
    Pending,
    Mirrored,
    Archived,
    Uploaded,
    /// Uploaded, then mirror and archive removed.
    Cleaned,
    /// Uploaded, mirror kept on disk.
    Retained,
    Failed {
        stage: Stage,
        error: String,
    },
}

impl RepoState {
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

impl fmt::Display for RepoState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => f.write_str("pending"),
            Self::Mirrored => f.write_str("mirrored"),
            Self::Archived => f.write_str("archived"),
            Self::Uploaded => f.write_str("uploaded"),
            Self::Cleaned => f.write_str("cleaned"),
            Self::Retained => f.write_str("retained"),
            Self::Failed { stage, .. } => write!(f, "failed ({stage})"),
        }
    }
}

/// Final state of one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoOutcome {
    pub name: String,
    pub state: RepoState,
}

impl RepoOutcome {
    #[must_use]
    pub fn new(repo: &RepositoryDescriptor, state: RepoState) -> Self {
        Self {
            name: repo.name.clone(),
            state,
        }
    }

    #[must_use]
    pub fn failed(repo: &RepositoryDescriptor, stage: Stage, error: impl Into<String>) -> Self {
        Self::new(
            repo,
            RepoState::Failed {
                stage,
                error: error.into(),
            },
        )
    }
}

/// Outcome of a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    outcomes: Vec<RepoOutcome>,
}

impl RunSummary {
    pub fn push(&mut self, outcome: RepoOutcome) {
        self.outcomes.push(outcome);
    }

    #[must_use]
    pub fn outcomes(&self) -> &[RepoOutcome] {
        &self.outcomes
    }

    /// Looks up the outcome for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RepoState> {
        self.outcomes
            .iter()
            .find(|o| o.name == name)
            .map(|o| &o.state)
    }

    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.state.is_failed()).count()
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    /// `(name, stage, error)` of each failed repository, in run order.
    pub fn failures(&self) -> impl Iterator<Item = (&str, Stage, &str)> {
        self.outcomes.iter().filter_map(|o| match &o.state {
            RepoState::Failed { stage, error } => Some((o.name.as_str(), *stage, error.as_str())),
            _ => None,
        })
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    /// Writes the summary to the log.
    pub fn log(&self) {
        info!(
            total = self.outcomes.len(),
            succeeded = self.succeeded(),
            failed = self.failed(),
            "run finished"
        );
        for (name, stage, message) in self.failures() {
            error!(repo = name, stage = %stage, "{message}");
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} succeeded, {} failed",
            self.succeeded(),
            self.failed()
        )?;
        for (name, stage, message) in self.failures() {
            write!(f, "\n  {name} [{stage}]: {message}")?;
        }
        Ok(())
    }
}
