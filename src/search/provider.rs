// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Search provider trait definition

use async_trait::async_trait;

use super::types::SearchError;

/// Turns a query into ranked candidate URLs
///
/// Implementations make a single outbound call and fail fast; retrying is
/// never done at this layer.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Perform a web search
    ///
    /// # Arguments
    /// * `query` - The search query string
    /// * `limit` - Maximum number of URLs to return
    ///
    /// # Returns
    /// At most `limit` URLs in ranked order, or an error
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<String>, SearchError>;

    /// Get the provider name for logging
    fn name(&self) -> &'static str;
}
