// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Single-attempt HTTP page fetching
//!
//! One call to [`PageFetcher::fetch`] is one network attempt: send, classify
//! the status, read at most `max_body_bytes` of the body and hand it to the
//! extractor. Retry state lives in the retry controller, never here.

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::extractor::extract_summary;
use super::identity::IdentityRotator;
use crate::search::config::ScrapeConfig;
use crate::search::types::{FetchError, FetchOutcome};

const NAVIGATION_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,image/apng,*/*;q=0.8";
const GITHUB_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Performs one fetch attempt for a URL
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch `url` once, giving up after `timeout`
    async fn fetch(&self, url: &str, timeout: Duration) -> FetchOutcome;
}

/// Build the shared HTTP client used for page fetches
///
/// Connection pool and redirect policy are static configuration shared
/// read-only by every task.
pub fn build_http_client(config: &ScrapeConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(90))
        .connect_timeout(Duration::from_secs(10))
        .tcp_keepalive(Duration::from_secs(30))
        .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
        .build()
}

/// Navigation headers sent with every page request
pub fn navigation_headers(url: &str, user_agent: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();

    if let Ok(value) = HeaderValue::from_str(user_agent) {
        headers.insert(header::USER_AGENT, value);
    }

    let is_github = Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h == "github.com" || h.ends_with(".github.com")))
        .unwrap_or(false);
    let accept = if is_github { GITHUB_ACCEPT } else { NAVIGATION_ACCEPT };

    headers.insert(header::ACCEPT, HeaderValue::from_static(accept));
    headers.insert(header::ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers.insert(header::UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));
    headers.insert("sec-fetch-dest", HeaderValue::from_static("document"));
    headers.insert("sec-fetch-mode", HeaderValue::from_static("navigate"));
    headers.insert("sec-fetch-site", HeaderValue::from_static("none"));
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("max-age=0"));
    headers
}

/// Map a response status to the attempt's classification
///
/// Only an exact 200 proceeds to extraction.
pub fn classify_status(status: StatusCode) -> Result<(), FetchError> {
    if status == StatusCode::OK {
        Ok(())
    } else {
        Err(FetchError::from_status(status.as_u16()))
    }
}

/// HTTP fetcher with rotating browser identity and a body size ceiling
pub struct HttpPageFetcher {
    client: Client,
    identity: IdentityRotator,
    max_body_bytes: usize,
}

impl HttpPageFetcher {
    /// Create a new fetcher
    pub fn new(config: &ScrapeConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(
            build_http_client(config)?,
            IdentityRotator::new(),
            config.max_body_bytes,
        ))
    }

    pub fn with_client(client: Client, identity: IdentityRotator, max_body_bytes: usize) -> Self {
        Self {
            client,
            identity,
            max_body_bytes,
        }
    }

    async fn attempt(&self, url: &str, timeout: Duration) -> FetchOutcome {
        let user_agent = self.identity.next();
        debug!(url = %url, user_agent = %user_agent, "Fetching page");

        let response = self
            .client
            .get(url)
            .headers(navigation_headers(url, user_agent))
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| transport_error(e, timeout))?;

        classify_status(response.status())?;

        let body = read_capped(response, self.max_body_bytes, timeout).await?;
        debug!(url = %url, bytes = body.len(), "Read page body");

        Ok(extract_summary(&body))
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str, timeout: Duration) -> FetchOutcome {
        match tokio::time::timeout(timeout, self.attempt(url, timeout)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(FetchError::Timeout {
                timeout_ms: timeout.as_millis() as u64,
            }),
        }
    }
}

fn transport_error(e: reqwest::Error, timeout: Duration) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout {
            timeout_ms: timeout.as_millis() as u64,
        }
    } else {
        FetchError::Transport(e.to_string())
    }
}

/// Read at most `limit` bytes of the body; the rest is never read
async fn read_capped(
    response: Response,
    limit: usize,
    timeout: Duration,
) -> Result<Vec<u8>, FetchError> {
    let mut body = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout {
                    timeout_ms: timeout.as_millis() as u64,
                }
            } else {
                FetchError::Body(e.to_string())
            }
        })?;

        let room = limit - body.len();
        if chunk.len() >= room {
            body.extend_from_slice(&chunk[..room]);
            break;
        }
        body.extend_from_slice(&chunk);
    }

    Ok(body)
}
