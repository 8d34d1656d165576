// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! HttpPageFetcher against a live local site: one classified attempt per call

use fabstir_scrape_node::search::content::identity::BROWSER_USER_AGENTS;
use fabstir_scrape_node::search::content::{HttpPageFetcher, PageFetcher};
use fabstir_scrape_node::search::{FetchError, ScrapeConfig};
use std::time::{Duration, Instant};

use super::common::spawn_site;

const ATTEMPT_TIMEOUT: Duration = Duration::from_secs(5);

fn fetcher() -> HttpPageFetcher {
    HttpPageFetcher::new(&ScrapeConfig::default()).unwrap()
}

#[tokio::test]
async fn test_fetch_extracts_title_and_description() {
    let site = spawn_site().await;

    let summary = fetcher()
        .fetch(&site.url("/page/alpha"), ATTEMPT_TIMEOUT)
        .await
        .unwrap();

    assert_eq!(summary.title, "Page alpha");
    assert_eq!(summary.snippet, "Description of page alpha");
}

#[tokio::test]
async fn test_fetch_classifies_status_codes() {
    let site = spawn_site().await;
    let fetcher = fetcher();

    assert_eq!(
        fetcher.fetch(&site.url("/forbidden"), ATTEMPT_TIMEOUT).await,
        Err(FetchError::Forbidden)
    );
    assert_eq!(
        fetcher.fetch(&site.url("/rate-limited"), ATTEMPT_TIMEOUT).await,
        Err(FetchError::RateLimited)
    );
    assert_eq!(
        fetcher.fetch(&site.url("/error"), ATTEMPT_TIMEOUT).await,
        Err(FetchError::Status(500))
    );
    assert_eq!(
        fetcher.fetch(&site.url("/page/missing/extra"), ATTEMPT_TIMEOUT).await,
        Err(FetchError::Status(404))
    );
}

#[tokio::test]
async fn test_fetch_non_200_success_is_failure() {
    let site = spawn_site().await;

    let outcome = fetcher()
        .fetch(&site.url("/no-content"), ATTEMPT_TIMEOUT)
        .await;

    assert_eq!(outcome, Err(FetchError::Status(204)));
}

#[tokio::test]
async fn test_fetch_error_messages() {
    let site = spawn_site().await;
    let fetcher = fetcher();

    let forbidden = fetcher
        .fetch(&site.url("/forbidden"), ATTEMPT_TIMEOUT)
        .await
        .unwrap_err();
    assert_eq!(
        forbidden.to_string(),
        "access forbidden (403) - possible bot detection"
    );

    let error = fetcher
        .fetch(&site.url("/error"), ATTEMPT_TIMEOUT)
        .await
        .unwrap_err();
    assert_eq!(error.to_string(), "status code 500");
}

#[tokio::test]
async fn test_fetch_times_out() {
    let site = spawn_site().await;

    let started = Instant::now();
    let outcome = fetcher()
        .fetch(&site.url("/slow"), Duration::from_millis(200))
        .await;

    assert!(matches!(outcome, Err(FetchError::Timeout { .. })));
    assert!(started.elapsed() < Duration::from_millis(1500));
}

#[tokio::test]
async fn test_fetch_follows_redirects() {
    let site = spawn_site().await;

    let summary = fetcher()
        .fetch(&site.url("/redirect"), ATTEMPT_TIMEOUT)
        .await
        .unwrap();

    assert_eq!(summary.title, "Page redirected");
}

#[tokio::test]
async fn test_redirect_cap_is_enforced() {
    let site = spawn_site().await;
    let config = ScrapeConfig {
        max_redirects: 0,
        ..ScrapeConfig::default()
    };
    let fetcher = HttpPageFetcher::new(&config).unwrap();

    let outcome = fetcher.fetch(&site.url("/redirect"), ATTEMPT_TIMEOUT).await;

    assert!(matches!(outcome, Err(FetchError::Transport(_))));
}

#[tokio::test]
async fn test_body_read_is_capped() {
    let site = spawn_site().await;

    let capped = fetcher()
        .fetch(&site.url("/late-title"), ATTEMPT_TIMEOUT)
        .await
        .unwrap();
    assert_eq!(capped.title, "");

    let config = ScrapeConfig {
        max_body_bytes: 1024 * 1024,
        ..ScrapeConfig::default()
    };
    let uncapped = HttpPageFetcher::new(&config)
        .unwrap()
        .fetch(&site.url("/late-title"), ATTEMPT_TIMEOUT)
        .await
        .unwrap();
    assert_eq!(uncapped.title, "Late");
}

#[tokio::test]
async fn test_fetch_sends_browser_identity() {
    let site = spawn_site().await;

    let summary = fetcher()
        .fetch(&site.url("/whoami"), ATTEMPT_TIMEOUT)
        .await
        .unwrap();

    assert!(BROWSER_USER_AGENTS.contains(&summary.title.as_str()));
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    // Bind then drop to get a port nothing listens on
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let outcome = fetcher()
        .fetch(&format!("http://{}/", addr), ATTEMPT_TIMEOUT)
        .await;

    assert!(matches!(outcome, Err(FetchError::Transport(_))));
}
