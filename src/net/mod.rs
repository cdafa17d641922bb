// hoard: GitHub to archive.org mirroring tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! HTTP clients, retry and progress display.
//!
//! ```text
//! api_client(network)     total timeout + connect timeout    GitHub API
//! upload_client(network)  connect timeout only               archive.org PUT
//!
//! ProgressDisplay::Bar     a.git.tar.gz [=====>     ] 50 MiB/100 MiB
//! ProgressDisplay::Silent  nothing (default, and when stderr is redirected)
//! ```

pub mod retry;

#[cfg(test)]
mod tests;

use std::io::IsTerminal as _;

use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;

use crate::config::types::NetworkConfig;
use crate::error::Result;

/// User-Agent sent with every request.
#[must_use]
pub fn user_agent() -> String {
    format!("hoard/{}", env!("CARGO_PKG_VERSION"))
}

/// Client for short API calls: bounded total request time.
///
/// # Errors
///
/// Returns an error if the TLS backend cannot be initialised.
pub fn api_client(network: &NetworkConfig) -> Result<Client> {
    let client = Client::builder()
        .user_agent(user_agent())
        .connect_timeout(network.connect_timeout())
        .timeout(network.timeout())
        .build()?;
    Ok(client)
}

/// Client for uploads: archives can take hours, so only connecting is bounded.
///
/// # Errors
///
/// Returns an error if the TLS backend cannot be initialised.
pub fn upload_client(network: &NetworkConfig) -> Result<Client> {
    let client = Client::builder()
        .user_agent(user_agent())
        .connect_timeout(network.connect_timeout())
        .build()?;
    Ok(client)
}

const UPLOAD_TEMPLATE: &str = "{msg} [{elapsed_precise}] [{wide_bar:.cyan/blue}] \
     {binary_bytes}/{binary_total_bytes} @ {binary_bytes_per_sec} ({eta})";

/// Whether uploads draw a progress bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgressDisplay {
    Bar,
    /// Nothing drawn; used for tests and when stderr is redirected.
    #[default]
    Silent,
}

impl ProgressDisplay {
    /// `Bar` when stderr is a terminal.
    #[must_use]
    pub fn for_stderr() -> Self {
        if std::io::stderr().is_terminal() {
            Self::Bar
        } else {
            Self::Silent
        }
    }

    /// A bar over `total` bytes labelled with `message`, or `None` when silent.
    #[must_use]
    pub fn create(self, total: u64, message: &str) -> Option<ProgressBar> {
        if self == Self::Silent {
            return None;
        }
        let style = ProgressStyle::with_template(UPLOAD_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");
        let bar = ProgressBar::new(total)
            .with_style(style)
            .with_message(message.to_string());
        Some(bar)
    }
}
