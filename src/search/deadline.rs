// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Request-scoped deadline shared by every task of one search
//!
//! A `Deadline` fires once, either when its time budget runs out or when the
//! underlying token is cancelled from above. Holders can wait on it and query
//! it, but cannot extend or reset it.

use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::types::DeadlineReason;

#[derive(Debug, Clone)]
pub struct Deadline {
    expires_at: Instant,
    token: CancellationToken,
}

impl Deadline {
    /// Deadline that fires `budget` from now
    pub fn after(budget: Duration) -> Self {
        Self::with_token(budget, CancellationToken::new())
    }

    /// Deadline that also fires when `parent` is cancelled
    pub fn child_of(parent: &CancellationToken, budget: Duration) -> Self {
        Self::with_token(budget, parent.child_token())
    }

    fn with_token(budget: Duration, token: CancellationToken) -> Self {
        Self {
            expires_at: Instant::now() + budget,
            token,
        }
    }

    /// Wait until the deadline fires. Returns immediately if it already has.
    pub async fn expired(&self) {
        // A past sleep_until still pends until the next timer tick
        if self.is_expired() {
            return;
        }
        tokio::select! {
            biased;
            _ = self.token.cancelled() => {}
            _ = tokio::time::sleep_until(self.expires_at) => {}
        }
    }

    pub fn is_expired(&self) -> bool {
        self.token.is_cancelled() || Instant::now() >= self.expires_at
    }

    /// Time left before the budget runs out (zero once fired)
    pub fn remaining(&self) -> Duration {
        if self.token.is_cancelled() {
            return Duration::ZERO;
        }
        self.expires_at.saturating_duration_since(Instant::now())
    }

    /// Why the deadline fired, if it has
    pub fn reason(&self) -> Option<DeadlineReason> {
        if Instant::now() >= self.expires_at {
            Some(DeadlineReason::Expired)
        } else if self.token.is_cancelled() {
            Some(DeadlineReason::Cancelled)
        } else {
            None
        }
    }
}
