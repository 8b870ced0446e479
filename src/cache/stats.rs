//! Cache Statistics Module
//!
//! Tracks cache activity: hits, misses, insertions, removals and expirations.

use serde::Serialize;

// == Cache Stats ==
/// Tracks cache activity. Observability only.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups that returned a live value
    pub hits: u64,
    /// Lookups that found nothing live (absent or stale)
    pub misses: u64,
    /// Puts that created a new entry
    pub insertions: u64,
    /// Puts that replaced an existing entry
    pub replacements: u64,
    /// Explicit removals that deleted something
    pub removals: u64,
    /// Stale entries dropped on lookup or by the reaper
    pub expirations: u64,
    /// Current number of entries in the store, live or stale
    pub total_entries: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Overwrites the lookup counters, which the store keeps outside its lock.
    pub fn set_lookups(&mut self, hits: u64, misses: u64) {
        self.hits = hits;
        self.misses = misses;
    }

    /// Records a put, split by whether it created or replaced the entry.
    pub fn record_put(&mut self, inserted: bool) {
        if inserted {
            self.insertions += 1;
        } else {
            self.replacements += 1;
        }
    }

    pub fn record_removal(&mut self) {
        self.removals += 1;
    }

    pub fn record_expirations(&mut self, count: usize) {
        self.expirations += count as u64;
    }

    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}
