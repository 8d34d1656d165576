// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Web search API endpoints
//!
//! Provides `POST /v1/search` and `GET /search?q=`.

pub mod handler;
pub mod request;

pub use handler::{search_handler, search_query_handler};
pub use request::{SearchApiRequest, SearchQueryParams};
