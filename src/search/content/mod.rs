// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Page fetching pipeline for search results
//!
//! ## Architecture
//!
//! ```text
//! URLs → TaskDispatcher ──(≤ max_parallel)──▶ fetch_with_retry ──▶ PageFetcher ──▶ extract_summary
//!              │                                    │                   │
//!              └──────────── Deadline (shared, one-shot) ───────────────┘
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let config = ScrapeConfig::from_env();
//! let fetcher = Arc::new(HttpPageFetcher::new(&config)?);
//! let dispatcher = TaskDispatcher::new(fetcher, RetryPolicy::from_config(&config), config.max_parallel);
//!
//! let deadline = Deadline::after(config.total_timeout());
//! let results = dispatcher.dispatch(&urls, &deadline).await;
//! ```

pub mod dispatcher;
pub mod extractor;
pub mod fetcher;
pub mod identity;
pub mod retry;

pub use dispatcher::TaskDispatcher;
pub use extractor::extract_summary;
pub use fetcher::{HttpPageFetcher, PageFetcher};
pub use identity::IdentityRotator;
pub use retry::{fetch_with_retry, RetryPolicy};
