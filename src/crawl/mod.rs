// src/crawl/mod.rs
// =============================================================================
// This module is the crawl engine.
//
// Submodules:
// - config: Run parameters (seed, budget, depth, workers, user agent)
// - frontier: The shared work queue and its "everyone is idle" detection
// - registry: The internal/external link sets with atomic dedup
// - coordinator: The worker pool that ties it all together
// =============================================================================

mod config;
mod coordinator;
mod frontier;
mod registry;

pub use config::{
    CrawlConfig, DEFAULT_MAX_DEPTH, DEFAULT_MAX_URLS, DEFAULT_THREADS, DEFAULT_TIMEOUT_SECS,
    DEFAULT_USER_AGENT,
};
pub use coordinator::{CrawlReport, Crawler};
