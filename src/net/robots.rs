// src/net/robots.rs
// =============================================================================
// This module decides whether robots.txt lets us crawl a URL.
//
// How it works:
// 1. Derive scheme://host[:port]/robots.txt from the page URL
// 2. Fetch it once per origin and cache the parsed rules
// 3. A URL is disallowed if its path starts with one of the Disallow: values
//
// This is deliberately a small approximation of robots.txt:
// - Only the FIRST User-agent: group is read, whatever agent it names
// - Disallow values are plain prefixes (no `*` wildcards, no `$` anchors)
// - Allow:, Crawl-delay: and Sitemap: lines are ignored
// - A missing robots.txt, a non-2xx answer or a network error allows everything
// =============================================================================

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::debug;
use url::Url;

use super::http::Fetcher;

// The Disallow: prefixes collected from one robots.txt
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RobotsRules {
    disallow: Vec<String>,
}

impl RobotsRules {
    // Parses a robots.txt body
    //
    // The section starts at the first `User-agent:` line (case-insensitive)
    // and ends at the next `User-agent:` line that follows a rule line.
    // Consecutive `User-agent:` lines share one group.
    pub fn parse(body: &str) -> Self {
        let mut disallow = Vec::new();
        let mut in_section = false;
        let mut seen_rule = false;

        for raw_line in body.lines() {
            let line = match raw_line.find('#') {
                Some(idx) => &raw_line[..idx],
                None => raw_line,
            };

            let Some((field, value)) = line.split_once(':') else {
                continue;
            };
            let field = field.trim();
            let value = value.trim();

            if field.eq_ignore_ascii_case("user-agent") {
                if in_section && seen_rule {
                    break;
                }
                in_section = true;
            } else if in_section {
                seen_rule = true;
                if field.eq_ignore_ascii_case("disallow") && !value.is_empty() {
                    disallow.push(value.to_string());
                }
            }
        }

        Self { disallow }
    }

    // True unless `path` starts with one of the disallowed prefixes
    pub fn allows(&self, path: &str) -> bool {
        !self.disallow.iter().any(|prefix| path.starts_with(prefix.as_str()))
    }
}

// Answers "may we crawl this URL?" for the workers
//
// Rules are cached per origin. The first lookup for an origin fetches
// robots.txt; concurrent lookups for the same origin wait on that one fetch.
pub struct RobotsGate {
    fetcher: Fetcher,
    cache: Mutex<HashMap<String, Arc<OnceCell<Option<RobotsRules>>>>>,
}

impl RobotsGate {
    // The fetcher's client already carries the crawl's User-Agent header
    pub fn new(fetcher: Fetcher) -> Self {
        Self {
            fetcher,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Returns `true` if robots.txt for the URL's origin allows its path.
    ///
    /// URLs that don't parse or have no network origin are allowed.
    pub async fn allowed(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else {
            return true;
        };
        let Some(robots_url) = robots_url(&parsed) else {
            return true;
        };

        let cell = {
            let mut cache = self.cache.lock();
            Arc::clone(cache.entry(robots_url.clone()).or_default())
        };

        let rules = cell.get_or_init(|| self.fetch_rules(&robots_url)).await;

        match rules {
            Some(rules) => rules.allows(parsed.path()),
            None => true,
        }
    }

    async fn fetch_rules(&self, robots_url: &str) -> Option<RobotsRules> {
        match self.fetcher.fetch(robots_url).await {
            Ok(body) => {
                let rules = RobotsRules::parse(&String::from_utf8_lossy(&body));
                debug!(
                    "Fetched {} ({} disallowed prefixes)",
                    robots_url,
                    rules.disallow.len()
                );
                Some(rules)
            }
            Err(e) => {
                debug!("No usable robots.txt at {}: {}", robots_url, e);
                None
            }
        }
    }
}

// scheme://host[:port]/robots.txt, or None for URLs without a network origin
fn robots_url(url: &Url) -> Option<String> {
    let origin = url.origin();
    if !origin.is_tuple() {
        return None;
    }
    Some(format!("{}/robots.txt", origin.ascii_serialization()))
}
