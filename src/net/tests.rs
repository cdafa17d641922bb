// hoard: GitHub to archive.org mirroring tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::retry::{RetryConfig, retry_with_cancellation};
use super::{ProgressDisplay, user_agent};
use crate::config::types::RetrySettings;
use crate::error::RetryableError;

#[derive(Debug)]
struct MockError {
    retryable: bool,
}

impl fmt::Display for MockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mock error (retryable: {})", self.retryable)
    }
}

impl RetryableError for MockError {
    fn is_retryable(&self) -> bool {
        self.retryable
    }
}

#[tokio::test]
async fn test_non_retryable_error_returns_immediately() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&calls);

    let result: Result<(), MockError> = retry_with_cancellation(&RetryConfig::immediate(5), &CancellationToken::new(), || {
        let counter = Arc::clone(&counter);
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(MockError { retryable: false })
        }
    })
    .await;

    assert!(result.is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_retryable_error_exhausts_attempts() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&calls);

    let result: Result<(), MockError> = retry_with_cancellation(&RetryConfig::immediate(3), &CancellationToken::new(), || {
        let counter = Arc::clone(&counter);
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(MockError { retryable: true })
        }
    })
    .await;

    assert!(result.is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_succeeds_after_transient_failures() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&calls);

    let result = retry_with_cancellation(&RetryConfig::immediate(3), &CancellationToken::new(), || {
        let counter = Arc::clone(&counter);
        async move {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            if n < 2 {
                Err(MockError { retryable: true })
            } else {
                Ok(n)
            }
        }
    })
    .await;

    assert_eq!(result.expect("third attempt succeeds"), 2);
}

#[tokio::test]
async fn test_cancellation_stops_backoff() {
    let cfg = RetryConfig {
        max_attempts: 10,
        base_delay: Duration::from_secs(60),
        max_delay: Duration::from_secs(60),
        backoff_factor: 1.0,
        jitter: false,
    };
    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        canceller.cancel();
    });

    let calls = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&calls);
    let started = std::time::Instant::now();
    let result: Result<(), MockError> = retry_with_cancellation(&cfg, &token, || {
        let counter = Arc::clone(&counter);
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(MockError { retryable: true })
        }
    })
    .await;

    assert!(result.is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(started.elapsed() < Duration::from_secs(10));
}

#[test]
fn test_delay_grows_and_caps() {
    let cfg = RetryConfig {
        max_attempts: 5,
        base_delay: Duration::from_millis(500),
        max_delay: Duration::from_millis(3000),
        backoff_factor: 2.0,
        jitter: false,
    };
    assert_eq!(cfg.delay_for(0), Duration::from_millis(500));
    assert_eq!(cfg.delay_for(1), Duration::from_millis(1000));
    assert_eq!(cfg.delay_for(2), Duration::from_millis(2000));
    assert_eq!(cfg.delay_for(3), Duration::from_millis(3000));
    assert_eq!(cfg.delay_for(30), Duration::from_millis(3000));
}

#[test]
fn test_jitter_stays_within_bounds() {
    let cfg = RetryConfig {
        max_attempts: 3,
        base_delay: Duration::from_millis(1000),
        max_delay: Duration::from_millis(10_000),
        backoff_factor: 2.0,
        jitter: true,
    };
    for _ in 0..100 {
        let delay = cfg.delay_for(0);
        assert!(delay >= Duration::from_millis(500), "{delay:?}");
        assert!(delay <= Duration::from_millis(1500), "{delay:?}");
    }
}

#[test]
fn test_retry_config_from_settings() {
    let cfg = RetryConfig::from(&RetrySettings::default());
    assert_eq!(cfg.max_attempts, 3);
    assert_eq!(cfg.base_delay, Duration::from_millis(500));
    assert_eq!(cfg.max_delay, Duration::from_secs(30));
    assert!(cfg.jitter);
}

#[test]
fn test_user_agent() {
    assert!(user_agent().starts_with("hoard/"));
}

#[test]
fn test_silent_progress_has_no_bar() {
    assert!(ProgressDisplay::Silent.create(100, "x").is_none());
    assert!(ProgressDisplay::Bar.create(100, "x").is_some());
    assert_eq!(ProgressDisplay::default(), ProgressDisplay::Silent);
}
