// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Rate limiting for inbound search requests

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as GovRateLimiter};
use std::num::NonZeroU32;

use super::types::SearchError;

/// Rate limiter guarding the search provider
pub struct SearchRateLimiter {
    limiter: GovRateLimiter<NotKeyed, InMemoryState, DefaultClock>,
    requests_per_minute: u32,
}

impl SearchRateLimiter {
    /// Create a new rate limiter
    ///
    /// A zero rate falls back to 60 requests per minute.
    pub fn new(requests_per_minute: u32) -> Self {
        let rpm = NonZeroU32::new(requests_per_minute)
            .or(NonZeroU32::new(60))
            .unwrap_or(NonZeroU32::MIN);

        Self {
            limiter: GovRateLimiter::direct(Quota::per_minute(rpm)),
            requests_per_minute,
        }
    }

    /// Check if a request is allowed
    ///
    /// Returns Ok(()) if allowed, or SearchError::RateLimited if not
    pub fn check(&self) -> Result<(), SearchError> {
        self.limiter
            .check()
            .map_err(|_| SearchError::RateLimited {
                retry_after_secs: 60,
            })
    }

    /// Get the configured requests per minute
    pub fn requests_per_minute(&self) -> u32 {
        self.requests_per_minute
    }
}
