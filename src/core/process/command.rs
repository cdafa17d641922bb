// hoard: GitHub to archive.org mirroring tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Describing a tool invocation.

use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::{OnceLock, PoisonError, RwLock};
use std::time::Duration;

use crate::error::ProcessError;

/// Resolved tool paths. git and tar are looked up once per run.
static LOCATED: OnceLock<RwLock<BTreeMap<String, PathBuf>>> = OnceLock::new();

fn located() -> &'static RwLock<BTreeMap<String, PathBuf>> {
    LOCATED.get_or_init(|| RwLock::new(BTreeMap::new()))
}

/// Result of a finished (or interrupted) tool run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// Exit code; `None` when the child was killed by a signal.
    pub code: Option<i32>,
    /// The run was cut short by the cancellation token.
    pub interrupted: bool,
}

impl ToolOutput {
    pub(super) fn interrupted() -> Self {
        Self {
            interrupted: true,
            ..Self::default()
        }
    }
}

/// One invocation of an external tool.
#[derive(Debug, Clone)]
pub struct ToolCommand {
    pub(super) program: PathBuf,
    pub(super) label: String,
    pub(super) args: Vec<OsString>,
    pub(super) cwd: Option<PathBuf>,
    /// Never logged; tokens travel here.
    pub(super) env: BTreeMap<String, String>,
    pub(super) time_limit: Option<Duration>,
}

impl ToolCommand {
    /// A command for `program` as given, resolved by the OS at spawn time.
    pub(super) fn new(program: impl AsRef<Path>) -> Self {
        let program = program.as_ref().to_path_buf();
        let label = program
            .file_stem()
            .map_or_else(|| "tool".to_string(), |s| s.to_string_lossy().into_owned());
        Self {
            program,
            label,
            args: Vec::new(),
            cwd: None,
            env: BTreeMap::new(),
            time_limit: None,
        }
    }

    /// A command for `name` looked up in PATH.
    ///
    /// # Errors
    ///
    /// `ProcessError::ExecutableNotFound` if `name` is not in PATH.
    pub fn locate(name: &str) -> Result<Self, ProcessError> {
        let cached = located()
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned();
        let path = match cached {
            Some(path) => path,
            None => {
                let path = which::which(name).map_err(|_| ProcessError::ExecutableNotFound {
                    name: name.to_string(),
                })?;
                located()
                    .write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .insert(name.to_string(), path.clone());
                path
            }
        };
        let mut command = Self::new(path);
        command.label = name.to_string();
        Ok(command)
    }

    #[must_use]
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    #[must_use]
    pub fn cwd(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Adds an environment variable on top of the inherited environment.
    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Kills the tool once `limit` has elapsed. `None` waits forever.
    #[must_use]
    pub const fn time_limit(mut self, limit: Option<Duration>) -> Self {
        self.time_limit = limit;
        self
    }

    /// Shell-like rendering for logs and errors. Environment is left out.
    #[must_use]
    pub fn command_line(&self) -> String {
        let mut line = self.program.display().to_string();
        for arg in &self.args {
            let arg = arg.to_string_lossy();
            if arg.contains(' ') {
                let _ = write!(line, " \"{arg}\"");
            } else {
                let _ = write!(line, " {arg}");
            }
        }
        line
    }
}
