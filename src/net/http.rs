// src/net/http.rs
// =============================================================================
// This module performs the crawler's HTTP requests.
//
// Key functionality:
// - One shared reqwest Client (connection pooling, user agent, timeout)
// - A single GET per call, no retries
// - Every failure mode (timeout, DNS, TLS, non-2xx status...) is returned as
//   a FetchError value, never as a panic, so a worker can log it and move on
//
// Rust concepts:
// - async/await: For network I/O that doesn't block the worker thread
// - thiserror: Derives std::error::Error and Display for our error enum
// - Cheap clones: reqwest::Client is an Arc internally
// =============================================================================

use reqwest::{redirect, Client};
use std::time::Duration;
use thiserror::Error;
use url::Url;

// Why a fetch failed
//
// The variants mirror the categories a link checker cares about; the crawler
// only ever logs them and treats the page as "no links".
#[derive(Debug, Error)]
pub enum FetchError {
    /// The URL could not be parsed as an absolute URL
    #[error("invalid URL '{0}'")]
    InvalidUrl(String),
    /// Request timed out
    #[error("request timed out")]
    Timeout,
    /// Redirect chain was too long (or looped)
    #[error("too many redirects")]
    TooManyRedirects,
    /// Could not resolve hostname
    #[error("could not resolve hostname")]
    Dns,
    /// SSL/TLS certificate error
    #[error("SSL certificate error")]
    Tls,
    /// Host unreachable, connection refused, reset...
    #[error("connection failed")]
    Connect,
    /// The server answered with a non-success status code
    #[error("HTTP {0}")]
    Status(u16),
    /// The body could not be read to the end
    #[error("failed to read response body: {0}")]
    Body(String),
    /// Anything else reqwest reports
    #[error("{0}")]
    Other(String),
}

// Fetches pages for the crawl workers
//
// Cloning a Fetcher is cheap and every clone shares the same connection pool.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    // Builds the shared HTTP client
    //
    // Parameters:
    //   user_agent: sent as the User-Agent header on every request
    //   timeout: upper bound for a whole request, so one dead host can't
    //            stall a worker forever
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .redirect(redirect::Policy::limited(10))
            .build()
            .map_err(categorize_error)?;

        Ok(Self { client })
    }

    /// GETs `url` and returns the raw response body.
    ///
    /// The URL's own scheme decides between plain HTTP and HTTPS. Any
    /// non-2xx status is reported as [`FetchError::Status`].
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let parsed = Url::parse(url).map_err(|_| FetchError::InvalidUrl(url.to_string()))?;

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(categorize_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Body(e.to_string()))?;

        Ok(body.to_vec())
    }
}

// Categorizes the different error types reqwest can produce
//
// reqwest errors can happen for many reasons:
// - Network timeout
// - DNS resolution failure
// - SSL certificate issues
// - Too many redirects
fn categorize_error(error: reqwest::Error) -> FetchError {
    let error_string = error.to_string().to_lowercase();

    if error.is_timeout() {
        FetchError::Timeout
    } else if error.is_redirect() {
        FetchError::TooManyRedirects
    } else if error.is_connect() {
        // Connection errors often mean DNS issues or host unreachable
        if error_string.contains("dns") {
            FetchError::Dns
        } else {
            FetchError::Connect
        }
    } else if error_string.contains("certificate") || error_string.contains("ssl") {
        FetchError::Tls
    } else if error.is_body() || error.is_decode() {
        FetchError::Body(error.to_string())
    } else {
        FetchError::Other(error.to_string())
    }
}
