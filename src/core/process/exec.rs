// hoard: GitHub to archive.org mirroring tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Spawning, draining and stopping a tool.
//!
//! ```text
//! run(cancel)
//!   cancelled already?     --> interrupted, nothing spawned
//!   spawn (stdin null, kill_on_drop)
//!   select { exit | cancel | time limit }
//!   cancel                 --> kill, interrupted output
//!   time limit             --> kill, ProcessError::Timeout
//!   exit code != 0         --> ProcessError::NonZeroExit (stderr tail)
//! ```

use std::collections::VecDeque;
use std::process::Stdio;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use super::command::{ToolCommand, ToolOutput};
use crate::error::{ProcessError, Result};

/// stderr lines carried into a `NonZeroExit` message.
const STDERR_TAIL_LINES: usize = 5;

enum Ended {
    Exited,
    Cancelled,
    TimedOut,
}

impl ToolCommand {
    /// Runs the tool to completion.
    ///
    /// # Errors
    ///
    /// - `ProcessError::SpawnFailed` if the child cannot be started.
    /// - `ProcessError::Timeout` if the time limit elapses.
    /// - `ProcessError::NonZeroExit` if the tool fails on its own.
    pub async fn run(self, cancel: &CancellationToken) -> Result<ToolOutput> {
        if cancel.is_cancelled() {
            return Ok(ToolOutput::interrupted());
        }

        let line = self.command_line();
        if let Some(cwd) = &self.cwd {
            debug!(tool = %self.label, cwd = %cwd.display(), cmd = %line, "exec");
        } else {
            debug!(tool = %self.label, cmd = %line, "exec");
        }

        let mut child = self
            .to_command()
            .spawn()
            .map_err(|source| ProcessError::SpawnFailed {
                command: line.clone(),
                source,
            })?;
        trace!(tool = %self.label, pid = ?child.id(), "spawned");

        let stderr = child
            .stderr
            .take()
            .map(|s| tokio::spawn(drain_stderr(s, self.label.clone())));

        let limit = self.time_limit;
        let ended = tokio::select! {
            status = child.wait() => {
                status.with_context(|| format!("failed waiting for {}", self.label))?;
                Ended::Exited
            }
            () = cancel.cancelled() => {
                warn!(tool = %self.label, "stop requested, killing");
                Ended::Cancelled
            }
            () = sleep_or_forever(limit) => {
                warn!(tool = %self.label, limit = ?limit, "time limit reached, killing");
                Ended::TimedOut
            }
        };
        if !matches!(ended, Ended::Exited) {
            child
                .kill()
                .await
                .with_context(|| format!("failed to kill {}", self.label))?;
        }
        let status = child
            .wait()
            .await
            .with_context(|| format!("failed waiting for {} to exit", self.label))?;

        let stderr = collect(stderr).await;

        match ended {
            Ended::Cancelled => Ok(ToolOutput::interrupted()),
            Ended::TimedOut => Err(ProcessError::Timeout {
                command: line,
                timeout_secs: limit.unwrap_or_default().as_secs(),
            }
            .into()),
            Ended::Exited if status.success() => {
                trace!(tool = %self.label, "completed");
                Ok(ToolOutput {
                    code: status.code(),
                    interrupted: false,
                })
            }
            Ended::Exited => Err(ProcessError::NonZeroExit {
                command: line,
                code: status.code().unwrap_or(-1),
                stderr: tail_suffix(&stderr),
            }
            .into()),
        }
    }

    fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .envs(&self.env)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(cwd) = &self.cwd {
            command.current_dir(cwd);
        }
        command
    }
}

async fn sleep_or_forever(limit: Option<std::time::Duration>) {
    match limit {
        Some(limit) => tokio::time::sleep(limit).await,
        None => std::future::pending().await,
    }
}

async fn collect(handle: Option<JoinHandle<String>>) -> String {
    match handle {
        Some(handle) => handle.await.unwrap_or_default(),
        None => String::new(),
    }
}

/// Reads stderr line by line into the log and keeps the last few lines.
async fn drain_stderr<R>(stream: R, tool: String) -> String
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(stream);
    let mut buf = Vec::new();
    let mut kept: VecDeque<String> = VecDeque::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                let text = String::from_utf8_lossy(&buf);
                let line = text.trim_end_matches(['\n', '\r']);
                debug!(tool = %tool, "{line}");
                if line.trim().is_empty() {
                    continue;
                }
                kept.push_back(line.to_string());
                if kept.len() > STDERR_TAIL_LINES {
                    kept.pop_front();
                }
            }
            Err(e) => {
                warn!(tool = %tool, error = %e, "unreadable stderr");
                break;
            }
        }
    }
    Vec::from(kept).join("\n")
}

/// `": a | b | c"` from the last non-blank stderr lines, or empty.
fn tail_suffix(stderr: &str) -> String {
    let lines: Vec<&str> = stderr.lines().filter(|l| !l.trim().is_empty()).collect();
    if lines.is_empty() {
        return String::new();
    }
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    format!(": {}", lines[start..].join(" | "))
}
