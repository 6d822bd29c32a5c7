// src/main.rs
// =============================================================================
// This is the entry point of the crawler.
//
// What happens here:
// 1. Set up logging (RUST_LOG controls the level, default "info")
// 2. Parse command-line arguments and build the crawl configuration
// 3. Run the crawl
// 4. Save the link lists and print the summary
// 5. Exit with proper code (0 = success, 1 = bad arguments, 2 = error)
// =============================================================================

mod cli;
mod crawl;
mod links;
mod net;
mod output;

use anyhow::Result;
use clap::Parser;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use crawl::{CrawlConfig, Crawler};

#[tokio::main]
async fn main() {
    init_tracing();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Logs go to stderr so stdout only carries the summary (or the JSON report)
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// Returns:
//   Ok(0) = crawl finished
//   Ok(1) = missing or invalid start URL
//   Err   = unexpected error (HTTP client setup, writing the result files)
async fn run() -> Result<i32> {
    let cli = Cli::parse();

    let url = cli.url.clone().unwrap_or_default();
    let config = match CrawlConfig::new(&url) {
        Ok(config) => CrawlConfig {
            max_urls: cli.max_urls,
            max_depth: cli.max_depth,
            num_threads: cli.threads,
            user_agent: cli.user_agent.clone(),
            request_timeout: Duration::from_secs(cli.timeout),
            ..config
        },
        Err(e) => {
            eprintln!("[-] {}", e);
            return Ok(1);
        }
    };

    let report = Crawler::new(config)?.crawl().await;

    if !cli.no_save {
        let (internal_path, external_path) = output::save_report(&report, &cli.output_dir)?;
        tracing::info!(
            "Saved links to {} and {}",
            internal_path.display(),
            external_path.display()
        );
    }

    if cli.json {
        output::print_json(&report)?;
    } else {
        output::print_summary(&report);
    }

    Ok(0)
}
