// hoard: GitHub to archive.org mirroring tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Retry with exponential backoff.
//!
//! ```text
//! attempt 1 ── Err(retryable) ── sleep(base * factor^0 ± jitter)
//! attempt 2 ── Err(retryable) ── sleep(base * factor^1 ± jitter)
//! attempt N ── Err ──────────── give up, return the last error
//!
//! Err(non-retryable) ── return immediately
//! cancellation ──────── return the last error without sleeping
//! ```

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::config::types::RetrySettings;
use crate::error::RetryableError;

/// Backoff policy.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub backoff_factor: f64,
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::from(&RetrySettings::default())
    }
}

impl From<&RetrySettings> for RetryConfig {
    fn from(settings: &RetrySettings) -> Self {
        Self {
            max_attempts: settings.max_attempts.max(1),
            base_delay: Duration::from_millis(settings.base_delay_ms),
            max_delay: Duration::from_millis(settings.max_delay_ms),
            backoff_factor: settings.backoff_factor,
            jitter: settings.jitter,
        }
    }
}

impl RetryConfig {
    /// A policy that never waits, for tests.
    #[must_use]
    pub const fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            backoff_factor: 1.0,
            jitter: false,
        }
    }

    /// Delay before retry number `attempt` (0-based).
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let exponential = self.base_delay.as_secs_f64() * self.backoff_factor.powi(exponent);
        let capped = exponential.min(self.max_delay.as_secs_f64());

        let delay = if self.jitter {
            capped * (0.5 + fastrand::f64())
        } else {
            capped
        };

        Duration::from_secs_f64(delay.min(self.max_delay.as_secs_f64()).max(0.0))
    }
}

/// Runs `f` until it succeeds, fails with a non-retryable error, or the
/// attempts run out. Stops waiting as soon as `token` is cancelled.
///
/// # Errors
///
/// Returns the last error from `f`.
pub async fn retry_with_cancellation<F, Fut, T, E>(
    cfg: &RetryConfig,
    token: &CancellationToken,
    mut f: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: RetryableError + std::fmt::Display,
{
    let mut attempt = 0;

    loop {
        match f().await {
            Ok(result) => return Ok(result),
            Err(err) => {
                attempt += 1;

                if !err.is_retryable() {
                    return Err(err);
                }

                if attempt >= cfg.max_attempts {
                    warn!(
                        error = %err,
                        attempt,
                        max_attempts = cfg.max_attempts,
                        "max retry attempts exhausted"
                    );
                    return Err(err);
                }

                let delay = cfg.delay_for(attempt - 1);
                warn!(
                    error = %err,
                    attempt,
                    max_attempts = cfg.max_attempts,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    "retrying after error"
                );

                tokio::select! {
                    () = tokio::time::sleep(delay) => {}
                    () = token.cancelled() => return Err(err),
                }
            }
        }
    }
}
