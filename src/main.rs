// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{anyhow, Context, Result};
use fabstir_scrape_node::{
    api::start_server,
    search::{ScrapeConfig, SearchService},
    version,
};
use std::{env, net::SocketAddr};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    println!("🚀 Starting {}...\n", version::get_version_string());
    println!("📦 BUILD VERSION: {}", version::VERSION);
    println!();

    let config = ScrapeConfig::from_env();
    config
        .validate()
        .map_err(|e| anyhow!("invalid scrape configuration: {}", e))?;

    info!(
        "Scrape config: max_results={}, max_parallel={}, total_timeout={}ms, attempts={}",
        config.max_results, config.max_parallel, config.total_timeout_ms, config.max_retries
    );
    if !config.enabled {
        println!("⚠️  Web search is disabled (WEB_SEARCH_ENABLED=false)");
    }

    let api_host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let api_port = env::var("API_PORT").unwrap_or_else(|_| "8080".to_string());
    let addr: SocketAddr = format!("{}:{}", api_host, api_port)
        .parse()
        .with_context(|| format!("invalid API address {}:{}", api_host, api_port))?;

    let search_service = SearchService::new(config).context("failed to build HTTP clients")?;
    println!("✅ Search service ready, serving on http://{}", addr);

    start_server(addr, search_service).await?;

    println!("👋 Goodbye!");
    Ok(())
}
