// src/net/mod.rs
// =============================================================================
// This module contains everything that talks to the network.
//
// Submodules:
// - http: Fetches one URL and returns its body (or why it failed)
// - robots: Fetches, caches and evaluates robots.txt
// =============================================================================

mod http;
mod robots;

pub use http::{FetchError, Fetcher};
pub use robots::RobotsGate;
