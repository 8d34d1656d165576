// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Configuration for search-and-scrape requests

use serde::Serialize;
use std::env;
use std::time::Duration;

/// Configuration for the scrape pipeline
#[derive(Debug, Clone, Serialize)]
pub struct ScrapeConfig {
    /// Whether search is enabled on this host
    pub enabled: bool,
    /// URLs requested from the search provider per query (default: 5)
    pub max_results: usize,
    /// Pages fetched concurrently per query (default: 10)
    pub max_parallel: usize,
    /// Global budget for one request in milliseconds (default: 15000)
    pub total_timeout_ms: u64,
    /// Budget for a single fetch attempt in milliseconds (default: 8000)
    pub attempt_timeout_ms: u64,
    /// Total attempts per page, including the first (default: 3)
    pub max_retries: u32,
    /// Backoff step; attempt n waits n * step (default: 500)
    pub backoff_step_ms: u64,
    /// Bytes of a page body that are read at most (default: 200 KiB)
    pub max_body_bytes: usize,
    /// Redirect hops followed per fetch (default: 10)
    pub max_redirects: usize,
    /// Timeout for the search provider call in milliseconds (default: 10000)
    pub provider_timeout_ms: u64,
    /// Inbound searches allowed per minute (default: 60)
    pub rate_limit_per_minute: u32,
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

impl ScrapeConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            enabled: env::var("WEB_SEARCH_ENABLED")
                .map(|v| v.to_lowercase() != "false")
                .unwrap_or(defaults.enabled),
            max_results: env_parse("SCRAPE_MAX_RESULTS")
                .unwrap_or(defaults.max_results)
                .min(20),
            max_parallel: env_parse("SCRAPE_MAX_PARALLEL").unwrap_or(defaults.max_parallel),
            total_timeout_ms: env_parse("SCRAPE_TOTAL_TIMEOUT_MS")
                .unwrap_or(defaults.total_timeout_ms),
            attempt_timeout_ms: env_parse("SCRAPE_ATTEMPT_TIMEOUT_MS")
                .unwrap_or(defaults.attempt_timeout_ms),
            max_retries: env_parse("SCRAPE_MAX_RETRIES").unwrap_or(defaults.max_retries),
            backoff_step_ms: env_parse("SCRAPE_BACKOFF_STEP_MS")
                .unwrap_or(defaults.backoff_step_ms),
            max_body_bytes: env_parse("SCRAPE_MAX_BODY_BYTES").unwrap_or(defaults.max_body_bytes),
            max_redirects: env_parse("SCRAPE_MAX_REDIRECTS").unwrap_or(defaults.max_redirects),
            provider_timeout_ms: env_parse("SEARCH_PROVIDER_TIMEOUT_MS")
                .unwrap_or(defaults.provider_timeout_ms),
            rate_limit_per_minute: env_parse("SEARCH_RATE_LIMIT_PER_MINUTE")
                .unwrap_or(defaults.rate_limit_per_minute),
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.max_results == 0 {
            return Err("max_results must be at least 1".to_string());
        }
        if self.max_parallel == 0 {
            return Err("max_parallel must be at least 1".to_string());
        }
        if self.max_retries == 0 {
            return Err("max_retries must be at least 1".to_string());
        }
        if self.attempt_timeout_ms == 0 {
            return Err("attempt_timeout_ms must be greater than 0".to_string());
        }
        if self.max_body_bytes == 0 {
            return Err("max_body_bytes must be greater than 0".to_string());
        }
        if self.rate_limit_per_minute == 0 {
            return Err("Rate limit must be greater than 0".to_string());
        }
        Ok(())
    }

    pub fn total_timeout(&self) -> Duration {
        Duration::from_millis(self.total_timeout_ms)
    }

    pub fn attempt_timeout(&self) -> Duration {
        Duration::from_millis(self.attempt_timeout_ms)
    }

    pub fn backoff_step(&self) -> Duration {
        Duration::from_millis(self.backoff_step_ms)
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_millis(self.provider_timeout_ms)
    }
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_results: 5,
            max_parallel: 10,
            total_timeout_ms: 15_000,
            attempt_timeout_ms: 8_000,
            max_retries: 3,
            backoff_step_ms: 500,
            max_body_bytes: 200 * 1024,
            max_redirects: 10,
            provider_timeout_ms: 10_000,
            rate_limit_per_minute: 60,
        }
    }
}
