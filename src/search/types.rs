// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Core types for search-and-scrape requests

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// One URL's unit of work, positioned by its rank in the provider results
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Position in the original query-result order
    pub index: usize,
    /// Page to fetch
    pub url: String,
}

/// Title and snippet extracted from a fetched page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSummary {
    pub title: String,
    pub snippet: String,
}

/// Result of a single fetch attempt
pub type FetchOutcome = Result<PageSummary, FetchError>;

/// Final per-URL result, written exactly once into slot `index`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResult {
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub snippet: String,
    /// Time spent after admission (zero when never admitted)
    #[serde(rename = "elapsedMs", with = "duration_ms")]
    pub elapsed: Duration,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TaskResult {
    /// Build a successful result
    pub fn success(url: impl Into<String>, summary: PageSummary, elapsed: Duration) -> Self {
        Self {
            url: url.into(),
            title: summary.title,
            snippet: summary.snippet,
            elapsed,
            error: None,
        }
    }

    /// Build a failed result; title and snippet stay empty
    pub fn failure(url: impl Into<String>, error: &TaskError, elapsed: Duration) -> Self {
        Self {
            url: url.into(),
            title: String::new(),
            snippet: String::new(),
            elapsed,
            error: Some(error.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Aggregated response for one search query
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateResponse {
    /// The original search query
    pub query: String,
    /// Wall-clock time for the whole request
    #[serde(rename = "totalElapsedMs", with = "duration_ms")]
    pub total_elapsed: Duration,
    /// Number of entries in `results`
    pub result_count: usize,
    /// One entry per provider URL, in provider order
    pub results: Vec<TaskResult>,
}

impl AggregateResponse {
    pub fn new(query: impl Into<String>, total_elapsed: Duration, results: Vec<TaskResult>) -> Self {
        Self {
            query: query.into(),
            total_elapsed,
            result_count: results.len(),
            results,
        }
    }

    /// Number of entries that carry a title/snippet
    pub fn success_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }
}

/// Failure of a single fetch attempt
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// DNS, connect, TLS or other transport-level failure
    #[error("transport error: {0}")]
    Transport(String),

    /// The attempt ran past its own timeout
    #[error("attempt timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("access forbidden (403) - possible bot detection")]
    Forbidden,

    #[error("rate limited (429)")]
    RateLimited,

    #[error("status code {0}")]
    Status(u16),

    /// Response body could not be read
    #[error("body read error: {0}")]
    Body(String),
}

impl FetchError {
    /// Map a non-200 HTTP status to its error kind
    pub fn from_status(status: u16) -> Self {
        match status {
            403 => Self::Forbidden,
            429 => Self::RateLimited,
            other => Self::Status(other),
        }
    }
}

/// Why a request's deadline fired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeadlineReason {
    /// The time budget ran out
    Expired,
    /// The request was cancelled from above (e.g. client went away)
    Cancelled,
}

impl std::fmt::Display for DeadlineReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Expired => write!(f, "deadline exceeded"),
            Self::Cancelled => write!(f, "request cancelled"),
        }
    }
}

/// Terminal failure of one task
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskError {
    /// Deadline fired while waiting for an admission slot
    #[error("timeout before scraping started")]
    AdmissionTimeout,

    /// Every attempt failed; carries the last attempt's error
    #[error("failed after {attempts} attempts: {last}")]
    RetryExhausted { attempts: u32, last: FetchError },

    /// Deadline fired while waiting to retry
    #[error("{reason} while waiting to retry (after {attempts} attempts)")]
    DeadlineExceeded {
        attempts: u32,
        reason: DeadlineReason,
    },

    /// The task's unit of work crashed before reporting
    #[error("scrape task aborted: {0}")]
    Panicked(String),
}

/// Request-level failures; these abort the whole search
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Invalid query: {reason}")]
    InvalidQuery { reason: String },

    /// The provider returned no URLs, so there is nothing to dispatch
    #[error("no results found for query")]
    NoResults,

    #[error("search provider {provider} failed: {message}")]
    ProviderFailure { provider: String, message: String },

    #[error("search timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Search disabled on this host")]
    SearchDisabled,
}

/// Serialise durations as whole milliseconds
pub(crate) mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}
