// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Search API request types

use serde::{Deserialize, Serialize};

const MAX_QUERY_CHARS: usize = 500;

/// Request body for POST /v1/search
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchApiRequest {
    /// Search query string (required, max 500 chars)
    pub query: String,
}

/// Query string for GET /search
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQueryParams {
    #[serde(default)]
    pub q: String,
}

impl SearchApiRequest {
    /// Validate the request
    pub fn validate(&self) -> Result<(), String> {
        validate_query(&self.query)
    }
}

impl SearchQueryParams {
    pub fn validate(&self) -> Result<(), String> {
        validate_query(&self.q)
    }
}

fn validate_query(query: &str) -> Result<(), String> {
    if query.trim().is_empty() {
        return Err("Query cannot be empty".to_string());
    }
    if query.chars().count() > MAX_QUERY_CHARS {
        return Err("Query too long (max 500 characters)".to_string());
    }
    Ok(())
}
