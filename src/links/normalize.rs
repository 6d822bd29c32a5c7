// src/links/normalize.rs
// =============================================================================
// URL canonicalization, so that equivalent spellings of a URL compare equal.
//
// Url::parse already does most of the work:
// - lowercases the scheme and host
// - resolves `.` and `..` path segments
// - drops the default port (80 for http, 443 for https)
// We additionally drop the fragment, which never changes the fetched page.
// =============================================================================

use url::Url;

// Returns the canonical form of `url`, or None if it isn't a valid crawl target
//
// Normalizing an already-normalized URL gives the same URL back.
pub fn normalize(url: &str) -> Option<Url> {
    let mut parsed = Url::parse(url).ok()?;
    if !is_valid(&parsed) {
        return None;
    }
    parsed.set_fragment(None);
    Some(parsed)
}

// A URL is worth considering only if it has both a scheme and a host
pub fn is_valid(url: &Url) -> bool {
    !url.scheme().is_empty() && url.host_str().is_some_and(|host| !host.is_empty())
}
