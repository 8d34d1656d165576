// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! DuckDuckGo search provider
//!
//! Implements web search using DuckDuckGo's HTML interface.
//! No API key required.

use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

use super::config::ScrapeConfig;
use super::content::identity::IdentityRotator;
use super::provider::SearchProvider;
use super::types::SearchError;

const DDG_HTML_URL: &str = "https://html.duckduckgo.com/html/";
const PROVIDER_NAME: &str = "duckduckgo";

/// DuckDuckGo search provider (no API key required)
pub struct DuckDuckGoProvider {
    client: Client,
    endpoint: String,
    identity: IdentityRotator,
    timeout_ms: u64,
}

impl DuckDuckGoProvider {
    /// Create a new DuckDuckGo provider against the public endpoint
    pub fn new(config: &ScrapeConfig) -> Result<Self, reqwest::Error> {
        Self::with_endpoint(DDG_HTML_URL, config)
    }

    /// Create a provider that posts queries to `endpoint`
    pub fn with_endpoint(
        endpoint: impl Into<String>,
        config: &ScrapeConfig,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(config.provider_timeout())
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            identity: IdentityRotator::new(),
            timeout_ms: config.provider_timeout_ms,
        })
    }

    fn request_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(self.identity.next()) {
            headers.insert(header::USER_AGENT, value);
        }
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(header::ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
        headers.insert(header::UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));
        headers
    }

    fn failure(message: impl Into<String>) -> SearchError {
        SearchError::ProviderFailure {
            provider: PROVIDER_NAME.to_string(),
            message: message.into(),
        }
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGoProvider {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<String>, SearchError> {
        let response = self
            .client
            .post(&self.endpoint)
            .headers(self.request_headers())
            .form(&[("q", query)])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SearchError::Timeout {
                        timeout_ms: self.timeout_ms,
                    }
                } else {
                    Self::failure(e.to_string())
                }
            })?;

        if response.status() != StatusCode::OK {
            return Err(Self::failure(format!(
                "status code {}",
                response.status().as_u16()
            )));
        }

        let html = response
            .text()
            .await
            .map_err(|e| Self::failure(e.to_string()))?;

        let urls = parse_result_links(&html, limit);
        debug!("DuckDuckGo returned {} links for '{}'", urls.len(), query);

        if urls.is_empty() {
            return Err(SearchError::NoResults);
        }
        Ok(urls)
    }

    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

/// Extract result links (`a.result__a`) in rank order
pub fn parse_result_links(html: &str, limit: usize) -> Vec<String> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("a.result__a") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(resolve_result_url)
        .take(limit)
        .collect()
}

/// Resolve DuckDuckGo's redirect links to the target URL
///
/// Links look like `//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com&rut=...`.
fn resolve_result_url(href: &str) -> Option<String> {
    let href = href.trim();
    if href.starts_with("http://") || href.starts_with("https://") {
        if let Some(target) = uddg_target(href) {
            return Some(target);
        }
        return Some(href.to_string());
    }
    if href.starts_with("//") || href.starts_with('/') {
        let base = Url::parse("https://duckduckgo.com/").ok()?;
        return uddg_target(base.join(href).ok()?.as_str());
    }
    None
}

fn uddg_target(link: &str) -> Option<String> {
    let parsed = Url::parse(link).ok()?;
    parsed
        .query_pairs()
        .find(|(key, _)| key == "uddg")
        .map(|(_, value)| value.into_owned())
        .filter(|target| target.starts_with("http"))
}
