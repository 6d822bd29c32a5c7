// src/crawl/config.rs
// =============================================================================
// Run parameters for one crawl. Built once at startup, read-only afterwards.
// =============================================================================

use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const DEFAULT_MAX_URLS: usize = 30;
pub const DEFAULT_MAX_DEPTH: usize = 3;
pub const DEFAULT_THREADS: usize = 4;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

// Problems with the seed URL, reported before the crawl starts
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("URL is required")]
    MissingUrl,
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("URL has no host: {0}")]
    NoHost(String),
}

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Where the crawl starts (depth 0)
    pub base_url: Url,
    /// Budget: how many tasks the workers may dequeue in total
    pub max_urls: usize,
    /// Tasks deeper than this are dequeued but never fetched
    pub max_depth: usize,
    /// Number of concurrent workers
    pub num_threads: usize,
    pub user_agent: String,
    /// Per-request timeout, applied to pages and robots.txt alike
    pub request_timeout: Duration,
}

impl CrawlConfig {
    // Validates the seed URL and fills in the defaults
    //
    // The seed must be an absolute URL with a host, e.g. "https://example.com".
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let trimmed = base_url.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::MissingUrl);
        }

        let url = Url::parse(trimmed).map_err(|e| ConfigError::InvalidUrl {
            url: trimmed.to_string(),
            reason: e.to_string(),
        })?;

        if url.host_str().map_or(true, str::is_empty) {
            return Err(ConfigError::NoHost(trimmed.to_string()));
        }

        Ok(Self {
            base_url: url,
            max_urls: DEFAULT_MAX_URLS,
            max_depth: DEFAULT_MAX_DEPTH,
            num_threads: DEFAULT_THREADS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    // The seed's host; links whose host contains it are "in-domain"
    pub fn seed_domain(&self) -> &str {
        self.base_url.host_str().unwrap_or_default()
    }

    // At least one worker, whatever was asked for
    pub fn worker_count(&self) -> usize {
        self.num_threads.max(1)
    }
}
