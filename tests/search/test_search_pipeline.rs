// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! End-to-end searches: provider, dispatcher, retries and real HTTP fetching

use async_trait::async_trait;
use fabstir_scrape_node::search::content::HttpPageFetcher;
use fabstir_scrape_node::search::duckduckgo::DuckDuckGoProvider;
use fabstir_scrape_node::search::{ScrapeConfig, SearchError, SearchProvider, SearchService};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

use super::common::{spawn_site, TestSite};

/// Provider that always returns the same URLs
struct FixedProvider {
    urls: Vec<String>,
}

#[async_trait]
impl SearchProvider for FixedProvider {
    async fn search(&self, _query: &str, limit: usize) -> Result<Vec<String>, SearchError> {
        Ok(self.urls.iter().take(limit).cloned().collect())
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}

fn fast_config() -> ScrapeConfig {
    ScrapeConfig {
        backoff_step_ms: 20,
        ..ScrapeConfig::default()
    }
}

fn fixed_service(site: &TestSite, paths: &[&str], config: ScrapeConfig) -> SearchService {
    let provider = FixedProvider {
        urls: paths.iter().map(|p| site.url(p)).collect(),
    };
    let fetcher = HttpPageFetcher::new(&config).unwrap();
    SearchService::with_components(config, Arc::new(provider), Arc::new(fetcher))
}

#[tokio::test]
async fn test_all_pages_scraped_in_provider_order() {
    let site = spawn_site().await;
    let config = fast_config();
    let provider = DuckDuckGoProvider::with_endpoint(site.url("/ddg"), &config).unwrap();
    let fetcher = HttpPageFetcher::new(&config).unwrap();
    let service = SearchService::with_components(config, Arc::new(provider), Arc::new(fetcher));

    let response = service.search("rust").await.unwrap();

    assert_eq!(response.result_count, 5);
    for (result, name) in response
        .results
        .iter()
        .zip(["one", "two", "three", "four", "five"])
    {
        assert_eq!(result.url, site.url(&format!("/page/{}", name)));
        assert_eq!(result.title, format!("Page {}", name));
        assert_eq!(result.snippet, format!("Description of page {}", name));
        assert!(result.error.is_none());
    }
}

#[tokio::test]
async fn test_one_failing_page_does_not_affect_others() {
    let site = spawn_site().await;
    let service = fixed_service(&site, &["/page/a", "/error", "/page/c"], fast_config());

    let response = service.search("rust").await.unwrap();

    assert_eq!(response.result_count, 3);
    assert_eq!(response.results[0].title, "Page a");
    assert_eq!(response.results[2].title, "Page c");

    let failed = &response.results[1];
    assert_eq!(failed.url, site.url("/error"));
    assert_eq!(failed.title, "");
    assert_eq!(failed.snippet, "");
    assert_eq!(
        failed.error.as_deref(),
        Some("failed after 3 attempts: status code 500")
    );
}

#[tokio::test]
async fn test_forbidden_is_retried_then_reported() {
    let site = spawn_site().await;
    let service = fixed_service(&site, &["/forbidden"], fast_config());

    let response = service.search("rust").await.unwrap();

    assert_eq!(
        response.results[0].error.as_deref(),
        Some("failed after 3 attempts: access forbidden (403) - possible bot detection")
    );
}

#[tokio::test]
async fn test_transient_failures_recovered_by_retry() {
    let site = spawn_site().await;
    let service = fixed_service(&site, &["/flaky/beta"], fast_config());

    let response = service.search("rust").await.unwrap();

    let result = &response.results[0];
    assert!(result.error.is_none());
    assert_eq!(result.title, "Page beta");
    // Two backoffs of 20ms and 40ms precede the third attempt
    assert!(result.elapsed >= Duration::from_millis(60));
}

#[tokio::test]
async fn test_deadline_bounds_slow_pages() {
    let site = spawn_site().await;
    let config = ScrapeConfig {
        max_parallel: 1,
        total_timeout_ms: 500,
        ..fast_config()
    };
    let service = fixed_service(&site, &["/slow", "/slow", "/slow"], config);

    let started = Instant::now();
    let response = service.search("rust").await.unwrap();

    assert!(started.elapsed() < Duration::from_millis(1500));
    assert_eq!(response.result_count, 3);

    let errors: Vec<&str> = response
        .results
        .iter()
        .map(|r| r.error.as_deref().unwrap_or_default())
        .collect();
    let never_started = errors
        .iter()
        .filter(|e| **e == "timeout before scraping started")
        .count();
    let cut_short = errors
        .iter()
        .filter(|e| e.starts_with("deadline exceeded"))
        .count();
    assert_eq!(never_started, 2);
    assert_eq!(cut_short, 1);

    for result in &response.results {
        if result.error.as_deref() == Some("timeout before scraping started") {
            assert_eq!(result.elapsed, Duration::ZERO);
        }
    }
}

#[tokio::test]
async fn test_cancellation_stops_in_flight_tasks() {
    let site = spawn_site().await;
    let service = fixed_service(&site, &["/slow", "/slow", "/slow"], fast_config());

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        trigger.cancel();
    });

    let started = Instant::now();
    let response = service.search_with_cancel("rust", &cancel).await.unwrap();

    assert!(started.elapsed() < Duration::from_millis(1500));
    for result in &response.results {
        let error = result.error.as_deref().unwrap_or_default();
        assert!(error.starts_with("request cancelled"), "got {:?}", error);
    }
}

#[tokio::test]
async fn test_empty_provider_result_fails_request() {
    let site = spawn_site().await;
    let config = fast_config();
    let provider = DuckDuckGoProvider::with_endpoint(site.url("/ddg-empty"), &config).unwrap();
    let fetcher = HttpPageFetcher::new(&config).unwrap();
    let service = SearchService::with_components(config, Arc::new(provider), Arc::new(fetcher));

    let result = service.search("nothing").await;

    assert!(matches!(result, Err(SearchError::NoResults)));
}

#[tokio::test]
async fn test_zero_url_fixed_provider_fails_request() {
    let site = spawn_site().await;
    let service = fixed_service(&site, &[], fast_config());

    let result = service.search("nothing").await;

    assert!(matches!(result, Err(SearchError::NoResults)));
}
