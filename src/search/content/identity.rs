// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Browser identity rotation for outbound page fetches

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// Desktop browser User-Agent strings rotated across attempts
pub const BROWSER_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.2 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
];

/// Pick one identity uniformly at random from `pool`
///
/// Falls back to the first built-in identity when `pool` is empty.
pub fn pick<'a, R: Rng + ?Sized>(pool: &[&'a str], rng: &mut R) -> &'a str {
    pool.choose(rng).copied().unwrap_or(BROWSER_USER_AGENTS[0])
}

/// Shared source of identities; the random source is owned, not global
pub struct IdentityRotator {
    pool: Vec<&'static str>,
    rng: Mutex<StdRng>,
}

impl IdentityRotator {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Deterministic rotator for tests
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            pool: BROWSER_USER_AGENTS.to_vec(),
            rng: Mutex::new(rng),
        }
    }

    /// Next identity header value
    pub fn next(&self) -> &'static str {
        match self.rng.lock() {
            Ok(mut rng) => pick(&self.pool, &mut *rng),
            // A poisoned lock only means another thread panicked mid-pick
            Err(poisoned) => pick(&self.pool, &mut *poisoned.into_inner()),
        }
    }
}

impl Default for IdentityRotator {
    fn default() -> Self {
        Self::new()
    }
}
