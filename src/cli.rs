// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
// =============================================================================

use clap::Parser;
use std::path::PathBuf;

use crate::crawl::{
    DEFAULT_MAX_DEPTH, DEFAULT_MAX_URLS, DEFAULT_THREADS, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT,
};

#[derive(Parser, Debug)]
#[command(
    name = "sitecrawl",
    version,
    about = "Crawl a website and list its in-domain and third-party links",
    long_about = "sitecrawl starts at one URL, follows same-domain links with a pool of \
                  workers up to a depth and page budget, and writes every link it saw \
                  into an in-domain and a third-party list."
)]
pub struct Cli {
    /// The URL to start crawling from (e.g., https://example.com)
    // Optional for clap so a missing URL gets our own message and exit code
    #[arg(short = 'u', long)]
    pub url: Option<String>,

    /// Maximum number of pages to visit
    #[arg(short = 'm', long = "max-urls", default_value_t = DEFAULT_MAX_URLS)]
    pub max_urls: usize,

    /// Maximum link depth to follow from the start page
    #[arg(short = 'd', long = "max-depth", default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    /// Number of concurrent workers
    #[arg(short = 't', long = "threads", default_value_t = DEFAULT_THREADS)]
    pub threads: usize,

    /// User-Agent header sent with every request
    #[arg(short = 'a', long = "user-agent", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Directory the link lists are written to
    #[arg(short = 'o', long = "output-dir", default_value = ".")]
    pub output_dir: PathBuf,

    /// Don't write the link lists to disk
    #[arg(long)]
    pub no_save: bool,

    /// Print the crawl report as JSON instead of a summary
    #[arg(long)]
    pub json: bool,
}
