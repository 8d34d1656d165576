// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    extract::State,
    http::Uri,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::{net::SocketAddr, sync::Arc};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::errors::ApiError;
use super::search::{search_handler, search_query_handler};
use crate::search::SearchService;
use crate::version;

#[derive(Clone)]
pub struct AppState {
    pub search_service: Arc<SearchService>,
}

impl AppState {
    pub fn new(search_service: SearchService) -> Self {
        Self {
            search_service: Arc::new(search_service),
        }
    }
}

/// Build the HTTP router for the scrape node
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_handler))
        // Search endpoints
        .route("/search", get(search_query_handler))
        .route("/v1/search", post(search_handler))
        .fallback(not_found_handler)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Serve the router on `addr` until Ctrl-C
pub async fn start_server(addr: SocketAddr, search_service: SearchService) -> anyhow::Result<()> {
    let app = create_router(AppState::new(search_service));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("API server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown signal received");
        })
        .await?;

    Ok(())
}

async fn health_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    let service = &state.search_service;
    Json(json!({
        "status": "healthy",
        "search_enabled": service.is_enabled(),
        "provider": service.provider_name(),
        "version": version::get_version_info(),
    }))
}

async fn not_found_handler(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("No route for {}", uri.path()))
}
