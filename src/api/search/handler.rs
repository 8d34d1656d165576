// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Search API endpoint handlers

use axum::{
    extract::{Query, State},
    Json,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::request::{SearchApiRequest, SearchQueryParams};
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::search::AggregateResponse;

/// POST /v1/search - Search and scrape the result pages
///
/// # Request
/// - `query`: Search query string (required, max 500 chars)
///
/// # Response
/// - `query`: Original search query
/// - `totalElapsedMs`: Wall-clock time for the request
/// - `resultCount`: Number of entries in `results`
/// - `results`: One entry per provider URL, in provider order, each with
///   `url`, `title`, `snippet`, `elapsedMs` and an optional `error`
///
/// # Errors
/// - 400 Bad Request: Invalid query
/// - 429 Too Many Requests: Rate limited
/// - 503 Service Unavailable: Search disabled
/// - 504 Gateway Timeout: Search provider timed out
/// - 500 Internal Server Error: Provider failed or returned nothing
pub async fn search_handler(
    State(state): State<AppState>,
    Json(request): Json<SearchApiRequest>,
) -> Result<Json<AggregateResponse>, ApiError> {
    debug!("Search request: {:?}", request.query);

    if let Err(e) = request.validate() {
        warn!("Search validation failed: {}", e);
        return Err(ApiError::InvalidRequest(e));
    }

    run_search(&state, &request.query).await
}

/// GET /search?q= - Same as `POST /v1/search` with the query in the URL
pub async fn search_query_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchQueryParams>,
) -> Result<Json<AggregateResponse>, ApiError> {
    debug!("Search request: {:?}", params.q);

    if let Err(e) = params.validate() {
        warn!("Search validation failed: {}", e);
        return Err(ApiError::InvalidRequest(e));
    }

    run_search(&state, &params.q).await
}

async fn run_search(state: &AppState, query: &str) -> Result<Json<AggregateResponse>, ApiError> {
    let cancel = CancellationToken::new();
    // Cancels in-flight scrape tasks if the client disconnects and this
    // future is dropped
    let _cancel_on_drop = cancel.clone().drop_guard();

    let response = state
        .search_service
        .search_with_cancel(query, &cancel)
        .await
        .map_err(|e| {
            warn!("Search failed for {:?}: {}", query, e);
            ApiError::from(e)
        })?;

    info!(
        "Search complete: {}/{} pages for {:?} in {}ms",
        response.success_count(),
        response.result_count,
        response.query,
        response.total_elapsed.as_millis()
    );

    Ok(Json(response))
}
