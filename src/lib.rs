// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod cli;
pub mod search;
pub mod version;

// Re-export main types
pub use search::{
    AggregateResponse, Deadline, ScrapeConfig, SearchError, SearchProvider, SearchService,
    TaskError, TaskResult,
};
