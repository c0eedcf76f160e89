//! Fingerprint-keyed result caching for component projections
//!
//! One cache per component type. Entries are stored behind [`Arc`], so a hit
//! hands out a shared read-only handle; a caller that wants to modify the
//! result must clone it first and can never corrupt the stored copy.

use std::collections::HashMap;
use std::sync::Arc;

use sha2::{Digest, Sha256};

/// Hex characters kept from the SHA-256 digest
pub const FINGERPRINT_LEN: usize = 16;

/// Deterministic key for a component and its parameters
///
/// Pairs are sorted before hashing so the caller's ordering never matters.
pub fn fingerprint(component: &str, params: &[(String, String)]) -> String {
    let mut sorted: Vec<&(String, String)> = params.iter().collect();
    sorted.sort();

    let mut hasher = Sha256::new();
    hasher.update(component.as_bytes());
    for (name, value) in sorted {
        hasher.update(b"\x1f");
        hasher.update(name.as_bytes());
        hasher.update(b"=");
        hasher.update(value.as_bytes());
    }
    let digest = format!("{:x}", hasher.finalize());
    digest[..FINGERPRINT_LEN].to_string()
}

/// Hit/miss counters for one cache
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Cache manager for one kind of projection result
#[derive(Debug)]
pub struct ResultCache<T> {
    entries: HashMap<String, Arc<T>>,
    enabled: bool,
    stats: CacheStats,
}

impl<T> Default for ResultCache<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            enabled: true,
            stats: CacheStats::default(),
        }
    }
}

impl<T> ResultCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// A cache that never stores anything; every lookup is a miss
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Look up a fingerprint, recording a hit or a miss
    pub fn get(&mut self, key: &str) -> Option<Arc<T>> {
        match self.entries.get(key) {
            Some(value) => {
                self.stats.hits += 1;
                Some(Arc::clone(value))
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    /// Store a freshly computed value and return the shared handle
    pub fn insert(&mut self, key: String, value: T) -> Arc<T> {
        let value = Arc::new(value);
        if self.enabled {
            self.entries.insert(key, Arc::clone(&value));
        }
        value
    }

    /// Return the cached value or compute, store and return a new one
    pub fn get_or_insert_with<F>(&mut self, key: String, compute: F) -> Arc<T>
    where
        F: FnOnce() -> T,
    {
        match self.get(&key) {
            Some(hit) => hit,
            None => self.insert(key, compute()),
        }
    }

    /// Drop every entry and reset the statistics
    pub fn clear(&mut self) {
        self.entries.clear();
        self.stats = CacheStats::default();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}
