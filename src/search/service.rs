// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Search service orchestration
//!
//! Gets candidate URLs from the provider, fans them out through the task
//! dispatcher under one request deadline, and assembles the aggregate.

use std::sync::Arc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::config::ScrapeConfig;
use super::content::{HttpPageFetcher, PageFetcher, RetryPolicy, TaskDispatcher};
use super::deadline::Deadline;
use super::duckduckgo::DuckDuckGoProvider;
use super::provider::SearchProvider;
use super::rate_limiter::SearchRateLimiter;
use super::types::{AggregateResponse, SearchError};

const MAX_QUERY_CHARS: usize = 500;

/// Main search service that orchestrates the provider and page scraping
pub struct SearchService {
    provider: Arc<dyn SearchProvider>,
    dispatcher: TaskDispatcher,
    rate_limiter: SearchRateLimiter,
    config: ScrapeConfig,
}

impl SearchService {
    /// Create a new search service backed by DuckDuckGo and live HTTP fetching
    pub fn new(config: ScrapeConfig) -> Result<Self, reqwest::Error> {
        let provider = Arc::new(DuckDuckGoProvider::new(&config)?);
        let fetcher = Arc::new(HttpPageFetcher::new(&config)?);
        Ok(Self::with_components(config, provider, fetcher))
    }

    /// Create a service from explicit collaborators
    pub fn with_components(
        config: ScrapeConfig,
        provider: Arc<dyn SearchProvider>,
        fetcher: Arc<dyn PageFetcher>,
    ) -> Self {
        let dispatcher = TaskDispatcher::new(
            fetcher,
            RetryPolicy::from_config(&config),
            config.max_parallel,
        );
        let rate_limiter = SearchRateLimiter::new(config.rate_limit_per_minute);

        debug!(
            "Search service ready: provider={}, max_parallel={}, budget={}ms",
            provider.name(),
            config.max_parallel,
            config.total_timeout_ms
        );

        Self {
            provider,
            dispatcher,
            rate_limiter,
            config,
        }
    }

    /// Search and scrape with a fresh request deadline
    pub async fn search(&self, query: &str) -> Result<AggregateResponse, SearchError> {
        self.search_with_cancel(query, &CancellationToken::new())
            .await
    }

    /// Search and scrape; cancelling `cancel` fires the request deadline early
    pub async fn search_with_cancel(
        &self,
        query: &str,
        cancel: &CancellationToken,
    ) -> Result<AggregateResponse, SearchError> {
        if !self.config.enabled {
            return Err(SearchError::SearchDisabled);
        }
        validate_query(query)?;

        // The budget counts from request arrival
        let start = Instant::now();
        let deadline = Deadline::child_of(cancel, self.config.total_timeout());

        info!("Received search request: q={:?}", query);
        self.rate_limiter.check()?;

        let urls = match self.provider.search(query, self.config.max_results).await {
            Ok(urls) if urls.is_empty() => return Err(SearchError::NoResults),
            Ok(urls) => urls,
            Err(e) => {
                warn!("Search provider {} failed: {}", self.provider.name(), e);
                return Err(e);
            }
        };

        info!("Found {} URLs", urls.len());
        for (i, url) in urls.iter().enumerate() {
            debug!("  URL {}: {}", i + 1, url);
        }

        let results = self.dispatcher.dispatch(&urls, &deadline).await;
        let total_elapsed = start.elapsed();

        let response = AggregateResponse::new(query, total_elapsed, results);
        info!(
            "Total elapsed time for query {:?}: {:?} ({}/{} pages scraped)",
            query,
            total_elapsed,
            response.success_count(),
            response.result_count
        );

        Ok(response)
    }

    /// Check if search is enabled
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Name of the configured provider
    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    pub fn config(&self) -> &ScrapeConfig {
        &self.config
    }
}

fn validate_query(query: &str) -> Result<(), SearchError> {
    if query.trim().is_empty() {
        return Err(SearchError::InvalidQuery {
            reason: "Query cannot be empty".to_string(),
        });
    }
    if query.chars().count() > MAX_QUERY_CHARS {
        return Err(SearchError::InvalidQuery {
            reason: format!("Query too long (max {} characters)", MAX_QUERY_CHARS),
        });
    }
    Ok(())
}
