// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Bounded retry with linear backoff around single fetch attempts
//!
//! Every failed attempt is retried the same way regardless of its kind, so a
//! 403 consumes the budget exactly like a dropped connection. Both the
//! backoff wait and the attempt itself yield to the shared deadline.

use std::time::Duration;
use tracing::{debug, info, warn};

use super::fetcher::PageFetcher;
use crate::search::config::ScrapeConfig;
use crate::search::deadline::Deadline;
use crate::search::types::{DeadlineReason, FetchError, PageSummary, TaskError};

/// Retry budget and backoff step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Attempt n waits n * backoff_step before it starts
    pub backoff_step: Duration,
    /// Upper bound for one attempt; also capped by the deadline
    pub attempt_timeout: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &ScrapeConfig) -> Self {
        Self {
            max_attempts: config.max_retries.max(1),
            backoff_step: config.backoff_step(),
            attempt_timeout: config.attempt_timeout(),
        }
    }

    /// Wait inserted before attempt `attempt` (zero for the first)
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        self.backoff_step * attempt
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&ScrapeConfig::default())
    }
}

/// Fetch `url` with up to `policy.max_attempts` attempts
pub async fn fetch_with_retry(
    fetcher: &dyn PageFetcher,
    url: &str,
    policy: &RetryPolicy,
    deadline: &Deadline,
) -> Result<PageSummary, TaskError> {
    let mut last_error: Option<FetchError> = None;

    for attempt in 0..policy.max_attempts {
        if attempt > 0 {
            let delay = policy.backoff_for(attempt);
            debug!(url = %url, attempt = attempt + 1, ?delay, "Backing off before retry");

            tokio::select! {
                biased;
                _ = deadline.expired() => {
                    let reason = deadline.reason().unwrap_or(DeadlineReason::Expired);
                    warn!(url = %url, attempts = attempt, %reason, "Aborting retries");
                    return Err(TaskError::DeadlineExceeded { attempts: attempt, reason });
                }
                _ = tokio::time::sleep(delay) => {}
            }
        }

        if deadline.is_expired() {
            let reason = deadline.reason().unwrap_or(DeadlineReason::Expired);
            warn!(url = %url, attempts = attempt, %reason, "Deadline fired before attempt");
            return Err(TaskError::DeadlineExceeded { attempts: attempt, reason });
        }

        match run_attempt(fetcher, url, policy.attempt_timeout, deadline).await {
            Ok(summary) => {
                if attempt > 0 {
                    info!(url = %url, attempts = attempt + 1, "Fetch succeeded after retry");
                }
                return Ok(summary);
            }
            Err(error) => {
                warn!(
                    url = %url,
                    attempt = attempt + 1,
                    max_attempts = policy.max_attempts,
                    error = %error,
                    "Fetch attempt failed"
                );
                last_error = Some(error);
            }
        }
    }

    Err(TaskError::RetryExhausted {
        attempts: policy.max_attempts,
        last: last_error.unwrap_or(FetchError::Transport("no attempt made".to_string())),
    })
}

/// One attempt, bounded by its own timeout and by the deadline
async fn run_attempt(
    fetcher: &dyn PageFetcher,
    url: &str,
    attempt_timeout: Duration,
    deadline: &Deadline,
) -> Result<PageSummary, FetchError> {
    let timeout = attempt_timeout.min(deadline.remaining());
    let timed_out = FetchError::Timeout {
        timeout_ms: timeout.as_millis() as u64,
    };
    if timeout.is_zero() {
        return Err(timed_out);
    }

    tokio::select! {
        biased;
        _ = deadline.expired() => Err(timed_out),
        outcome = tokio::time::timeout(timeout, fetcher.fetch(url, timeout)) => {
            outcome.unwrap_or(Err(timed_out))
        }
    }
}
