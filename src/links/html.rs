// src/links/html.rs
// =============================================================================
// This module extracts links from fetched HTML pages.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Never fails on malformed markup (html5ever recovers like a browser)
//
// We also use the `url` crate to resolve relative links against the page URL.
// =============================================================================

use scraper::{Html, Selector};
use tracing::warn;
use url::Url;

use super::normalize::is_valid;

// Extracts every anchor target from a page, as absolute URLs
//
// Parameters:
//   html: the raw response body (decoded lossily as UTF-8)
//   base_url: the URL the page was fetched from
//
// Returns: the resolved URLs in document order. Links that don't resolve to
// something with a scheme and a host (mailto:, javascript:, broken hrefs...)
// are dropped.
//
// Example:
//   html = "<a href='/docs'>Docs</a>"
//   base_url = "https://example.com/page"
//   result = ["https://example.com/docs"]
pub fn extract_links(html: &[u8], base_url: &str) -> Vec<String> {
    let mut links = Vec::new();

    let base = match Url::parse(base_url) {
        Ok(url) => url,
        Err(e) => {
            // Without a base we can't resolve relative links
            warn!("Invalid base URL {}: {}", base_url, e);
            return links;
        }
    };

    let Ok(selector) = Selector::parse("a[href]") else {
        return links;
    };

    let text = String::from_utf8_lossy(html);
    let document = Html::parse_document(&text);

    for element in document.select(&selector) {
        if let Some(href) = element.value().attr("href") {
            if let Some(absolute_url) = resolve_url(&base, href) {
                links.push(absolute_url);
            }
        }
    }

    links
}

// Resolves a possibly-relative href against the page URL
//
// Examples:
//   base = "https://example.com/page/"
//   href = "/docs"              -> Some("https://example.com/docs")
//   href = "../other"           -> Some("https://example.com/other")
//   href = "//cdn.example.org/" -> Some("https://cdn.example.org/")
//   href = "mailto:x@y.z"       -> None (no host)
fn resolve_url(base: &Url, href: &str) -> Option<String> {
    let url = base.join(href.trim()).ok()?;
    if is_valid(&url) {
        Some(url.to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_absolute_link() {
        let html = br#"<a href="https://www.rust-lang.org">Rust</a>"#;
        let links = extract_links(html, "https://example.com");
        assert_eq!(links, vec!["https://www.rust-lang.org/"]);
    }

    #[test]
    fn test_resolve_relative_link() {
        let html = br#"<a href="/docs">Docs</a>"#;
        let links = extract_links(html, "https://example.com/page");
        assert_eq!(links, vec!["https://example.com/docs"]);
    }

    #[test]
    fn test_resolve_protocol_relative_link() {
        let html = br#"<a href="//cdn.example.org/lib.js">CDN</a>"#;
        let links = extract_links(html, "http://example.com/");
        assert_eq!(links, vec!["http://cdn.example.org/lib.js"]);
    }

    #[test]
    fn test_skip_links_without_host() {
        let html = br#"
            <a href="mailto:test@example.com">Email</a>
            <a href="javascript:void(0)">Click</a>
            <a>No href</a>
        "#;
        let links = extract_links(html, "https://example.com");
        assert!(links.is_empty());
    }

    #[test]
    fn test_document_order() {
        let html = br#"
            <a href="https://rust-lang.org">Rust</a>
            <a href="/docs">Docs</a>
            <a href="../about">About</a>
        "#;
        let links = extract_links(html, "https://example.com/page/");
        assert_eq!(
            links,
            vec![
                "https://rust-lang.org/",
                "https://example.com/docs",
                "https://example.com/about",
            ]
        );
    }

    #[test]
    fn test_malformed_html_does_not_fail() {
        let html = b"<html><body><a href='/ok'>ok<div><a href=\xff\xfe>";
        let links = extract_links(html, "https://example.com/");
        assert_eq!(links[0], "https://example.com/ok");
    }

    #[test]
    fn test_invalid_base_yields_nothing() {
        let html = br#"<a href="/docs">Docs</a>"#;
        assert!(extract_links(html, "not a url").is_empty());
    }
}
