// src/crawl/registry.rs
// =============================================================================
// The dedup registry: every link the crawl has ever discovered, split into
// "internal" (same domain as the seed) and "external" (everything else).
//
// This is the main race surface of the crawler. Several workers can find the
// same link at the same moment, so "is it new?" and "remember it" must happen
// under one lock. Checking under one lock and inserting under another would
// let two workers both see the link as new and both crawl it.
// =============================================================================

use parking_lot::Mutex;
use std::collections::HashSet;

use crate::links::normalize;

// What the registry decided about one discovered link
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// First sighting of a same-domain link; carries the normalized URL
    NewInternal(String),
    /// First sighting of a third-party link; carries the normalized URL
    NewExternal(String),
    /// Already recorded in one of the two sets
    Duplicate,
    /// Not an absolute URL with a scheme and host; nothing was recorded
    Invalid,
}

#[derive(Debug, Default)]
struct Sets {
    internal: HashSet<String>,
    external: HashSet<String>,
}

#[derive(Debug, Default)]
pub struct DedupRegistry {
    sets: Mutex<Sets>,
}

impl DedupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalizes `url` and records it in exactly one of the two sets.
    ///
    /// A link is internal when its host contains `seed_domain`. Calling this
    /// again with any spelling of an already-recorded URL returns
    /// [`Classification::Duplicate`] and changes nothing.
    pub fn classify(&self, url: &str, seed_domain: &str) -> Classification {
        let Some(normalized) = normalize(url) else {
            return Classification::Invalid;
        };

        let is_internal = normalized
            .host_str()
            .is_some_and(|host| host.contains(seed_domain));
        let key = String::from(normalized);

        let mut sets = self.sets.lock();
        if sets.internal.contains(&key) || sets.external.contains(&key) {
            return Classification::Duplicate;
        }

        if is_internal {
            sets.internal.insert(key.clone());
            Classification::NewInternal(key)
        } else {
            sets.external.insert(key.clone());
            Classification::NewExternal(key)
        }
    }

    pub fn internal_count(&self) -> usize {
        self.sets.lock().internal.len()
    }

    pub fn external_count(&self) -> usize {
        self.sets.lock().external.len()
    }

    // Sorted copies of both sets: (internal, external)
    pub fn snapshot(&self) -> (Vec<String>, Vec<String>) {
        let sets = self.sets.lock();
        let mut internal: Vec<_> = sets.internal.iter().cloned().collect();
        let mut external: Vec<_> = sets.external.iter().cloned().collect();
        internal.sort();
        external.sort();
        (internal, external)
    }
}
