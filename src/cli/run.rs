// hoard: GitHub to archive.org mirroring tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Options for a mirroring run.
//!
//! Every option is optional on the command line: required values may come
//! from a config file or the environment instead. The merged configuration
//! is checked before the run starts.

use clap::Args;
use std::path::PathBuf;

use super::Overrides;

#[derive(Debug, Clone, Default, Args)]
pub struct RunArgs {
    /// GitHub account (user or organisation) to mirror.
    #[arg(long = "github-user", value_name = "ACCOUNT")]
    pub github_user: Option<String>,

    /// GitHub personal access token.
    #[arg(
        long = "github-token",
        value_name = "TOKEN",
        env = "GITHUB_TOKEN",
        hide_env_values = true
    )]
    pub github_token: Option<String>,

    /// archive.org collection the items are filed under.
    #[arg(long = "ia-collection", value_name = "COLLECTION")]
    pub ia_collection: Option<String>,

    /// Directory holding mirrors and archives [default: ./backups].
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Keep the mirror and archive after a successful upload.
    #[arg(long = "keep-mirror")]
    pub keep_mirror: bool,

    /// Skip repositories that are forks.
    #[arg(long = "no-forks")]
    pub no_forks: bool,

    /// Skip archived (read-only) repositories.
    #[arg(long = "skip-archived")]
    pub skip_archived: bool,

    /// Only process the named repository. Can be specified multiple times.
    #[arg(long = "only", value_name = "NAME", action = clap::ArgAction::Append)]
    pub only: Vec<String>,
}

impl RunArgs {
    pub fn collect_overrides(&self, out: &mut Overrides) {
        out.put_some("github.user", self.github_user.clone());
        out.put_some("github.token", self.github_token.clone());
        out.put_some("archive.collection", self.ia_collection.clone());
        out.put_some(
            "paths.output_dir",
            self.output_dir.as_ref().map(|p| p.display().to_string()),
        );
        out.put_if(self.keep_mirror, "global.keep_mirror", true);
        out.put_if(self.no_forks, "filter.include_forks", false);
        out.put_if(self.skip_archived, "filter.include_archived", false);
        if !self.only.is_empty() {
            out.put("filter.only", self.only.clone());
        }
    }
}
