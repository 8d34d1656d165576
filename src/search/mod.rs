// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Web search and result scraping
//!
//! A query goes to the search provider, the returned URLs are fetched
//! concurrently under a bounded number of slots, and every URL yields a
//! summary or a readable error in the aggregate response.
//!
//! Key features:
//! - DuckDuckGo HTML provider (no API key)
//! - Bounded parallel page fetching with linear-backoff retries
//! - One request-wide deadline that also stops queued and retrying tasks
//! - Rate limiting of inbound searches

pub mod config;
pub mod content;
pub mod deadline;
pub mod duckduckgo;
pub mod provider;
pub mod rate_limiter;
pub mod service;
pub mod types;

// Re-export commonly used types
pub use config::ScrapeConfig;
pub use deadline::Deadline;
pub use provider::SearchProvider;
pub use service::SearchService;
pub use types::{
    AggregateResponse, DeadlineReason, FetchError, PageSummary, SearchError, Task, TaskError,
    TaskResult,
};
