// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Bounded-parallel dispatch of scrape tasks
//!
//! Every URL gets its own spawned task. A task first waits for an admission
//! permit (capacity `max_parallel`), racing the shared deadline; once admitted
//! it runs the retry controller and drops its permit on every exit path.
//! Each task owns output slot `index`, so completion order never affects the
//! result order.

use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::fetcher::PageFetcher;
use super::retry::{fetch_with_retry, RetryPolicy};
use crate::search::deadline::Deadline;
use crate::search::types::{Task, TaskError, TaskResult};

/// Runs one retry-controlled fetch per URL under an admission limit
#[derive(Clone)]
pub struct TaskDispatcher {
    fetcher: Arc<dyn PageFetcher>,
    policy: RetryPolicy,
    max_parallel: usize,
}

impl TaskDispatcher {
    /// `max_parallel` of zero is treated as one
    pub fn new(fetcher: Arc<dyn PageFetcher>, policy: RetryPolicy, max_parallel: usize) -> Self {
        Self {
            fetcher,
            policy,
            max_parallel: max_parallel.max(1),
        }
    }

    pub fn max_parallel(&self) -> usize {
        self.max_parallel
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Fetch every URL, returning one result per URL in input order
    ///
    /// Returns only after every task has reached a terminal state.
    pub async fn dispatch(&self, urls: &[String], deadline: &Deadline) -> Vec<TaskResult> {
        if urls.is_empty() {
            return Vec::new();
        }

        let limiter = Arc::new(Semaphore::new(self.max_parallel));

        let handles: Vec<_> = urls
            .iter()
            .enumerate()
            .map(|(index, url)| {
                let task = Task {
                    index,
                    url: url.clone(),
                };
                tokio::spawn(run_task(
                    task,
                    Arc::clone(&self.fetcher),
                    self.policy,
                    Arc::clone(&limiter),
                    deadline.clone(),
                ))
            })
            .collect();

        // handles[i] belongs to task i
        let outcomes = join_all(handles).await;

        outcomes
            .into_iter()
            .zip(urls)
            .map(|(outcome, url)| match outcome {
                Ok(result) => result,
                Err(join_error) => {
                    warn!(url = %url, error = %join_error, "Scrape task did not complete");
                    TaskResult::failure(
                        url.clone(),
                        &TaskError::Panicked(join_error.to_string()),
                        Duration::ZERO,
                    )
                }
            })
            .collect()
    }
}

async fn run_task(
    task: Task,
    fetcher: Arc<dyn PageFetcher>,
    policy: RetryPolicy,
    limiter: Arc<Semaphore>,
    deadline: Deadline,
) -> TaskResult {
    let position = task.index + 1;

    // The deadline branch wins ties so an expired request never touches the network
    let permit = if deadline.is_expired() {
        None
    } else {
        tokio::select! {
            biased;
            _ = deadline.expired() => None,
            permit = limiter.acquire_owned() => permit.ok(),
        }
    };
    let Some(_permit) = permit else {
        warn!(index = position, url = %task.url, "Deadline fired before scraping started");
        return TaskResult::failure(task.url, &TaskError::AdmissionTimeout, Duration::ZERO);
    };

    debug!(index = position, url = %task.url, "Starting scrape");
    let started = Instant::now();
    let outcome = fetch_with_retry(fetcher.as_ref(), &task.url, &policy, &deadline).await;
    let elapsed = started.elapsed();

    match outcome {
        Ok(summary) => {
            info!(index = position, url = %task.url, ?elapsed, "Completed scrape");
            TaskResult::success(task.url, summary, elapsed)
        }
        Err(error) => {
            warn!(index = position, url = %task.url, error = %error, "Scrape failed");
            TaskResult::failure(task.url, &error, elapsed)
        }
    }
}
