// hoard: GitHub to archive.org mirroring tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Options shared by every command: config files, dry run and logging.

use clap::Args;
use std::path::PathBuf;

use super::Overrides;

#[derive(Debug, Clone, Default, Args)]
pub struct GlobalOptions {
    /// Extra TOML config file; repeat for more, later files win.
    #[arg(short = 'c', long = "config", value_name = "FILE", action = clap::ArgAction::Append)]
    pub configs: Vec<PathBuf>,

    /// Lists the repositories and logs what would be done, without cloning or uploading.
    #[arg(long)]
    pub dry: bool,

    /// Console verbosity: 0 off, 1 error, 2 warn, 3 info, 4 debug, 5 trace, 6 dump.
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL",
          value_parser = clap::value_parser!(u8).range(0..=6))]
    pub log_level: Option<u8>,

    /// Log file verbosity [default: --log-level when given].
    #[arg(long = "file-log-level", value_name = "LEVEL",
          value_parser = clap::value_parser!(u8).range(0..=6))]
    pub file_log_level: Option<u8>,

    /// Also log to FILE (appended).
    #[arg(long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

impl GlobalOptions {
    pub fn collect_overrides(&self, out: &mut Overrides) {
        out.put_some("global.output_log_level", self.log_level.map(i64::from));
        out.put_some(
            "global.file_log_level",
            self.file_log_level.or(self.log_level).map(i64::from),
        );
        out.put_some(
            "global.log_file",
            self.log_file.as_ref().map(|p| p.display().to_string()),
        );
        out.put_if(self.dry, "global.dry", true);
    }
}
