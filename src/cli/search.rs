// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{anyhow, Result};
use clap::Args;
use tracing::info;

use crate::search::{ScrapeConfig, SearchService};

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Search query
    pub query: String,

    /// URLs to request from the search provider
    #[arg(long)]
    pub max_results: Option<usize>,

    /// Pages fetched concurrently
    #[arg(long)]
    pub max_parallel: Option<usize>,

    /// Global request budget in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Print the configuration on a single line
    #[arg(long)]
    pub compact: bool,
}

impl SearchArgs {
    /// Environment configuration with command line overrides applied
    pub fn to_config(&self) -> ScrapeConfig {
        let mut config = ScrapeConfig::from_env();
        if let Some(max_results) = self.max_results {
            config.max_results = max_results.min(20);
        }
        if let Some(max_parallel) = self.max_parallel {
            config.max_parallel = max_parallel;
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.total_timeout_ms = timeout_ms;
        }
        config
    }
}

pub async fn run_search(args: SearchArgs) -> Result<()> {
    dotenv::dotenv().ok();

    let config = args.to_config();
    config
        .validate()
        .map_err(|e| anyhow!("invalid configuration: {}", e))?;

    let service = SearchService::new(config)?;
    let response = service.search(&args.query).await?;

    info!(
        "{} of {} pages scraped",
        response.success_count(),
        response.result_count
    );

    let output = if args.pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };
    println!("{}", output);

    Ok(())
}

pub fn show_config(args: ConfigArgs) -> Result<()> {
    dotenv::dotenv().ok();

    let config = ScrapeConfig::from_env();
    config
        .validate()
        .map_err(|e| anyhow!("invalid configuration: {}", e))?;

    let output = if args.compact {
        serde_json::to_string(&config)?
    } else {
        serde_json::to_string_pretty(&config)?
    };
    println!("{}", output);

    Ok(())
}
