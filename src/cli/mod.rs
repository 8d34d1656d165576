// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod search;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Fabstir Scrape Node CLI
#[derive(Parser, Debug)]
#[command(name = "scrape-cli")]
#[command(version = crate::version::VERSION_NUMBER)]
#[command(about = "Search the web and scrape the result pages", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one search and print the aggregated results as JSON
    Search(search::SearchArgs),

    /// Print the effective configuration
    Config(search::ConfigArgs),
}

/// Execute CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Search(args) => search::run_search(args).await,
        Commands::Config(args) => search::show_config(args),
    }
}
