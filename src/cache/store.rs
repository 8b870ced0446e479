//! Cache Store Module
//!
//! Concurrency-safe map from key to expirable value, with expiration-aware lookup.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Duration;
use tokio::sync::RwLock;

use crate::cache::{CacheStats, Clock, ExpirableValue, SystemClock};

#[derive(Debug)]
struct StoreInner<V> {
    entries: HashMap<String, ExpirableValue<V>>,
    stats: CacheStats,
}

// == Cache Store ==
/// Shared cache storage with per-key TTL.
///
/// Every operation holds the internal lock while it touches an entry, so a
/// `get` racing a `put` or `remove` on the same key sees either the old or
/// the new entry, never a mix. Lookups of live or absent keys share the read
/// lock; only dropping a stale entry takes the write lock. There is no
/// capacity limit; entries leave the store only through `remove`, lazy expiry
/// on `get`, or `purge_expired`.
#[derive(Debug)]
pub struct CacheStore<V> {
    inner: RwLock<StoreInner<V>>,
    hits: AtomicU64,
    misses: AtomicU64,
    clock: Arc<dyn Clock>,
}

impl<V: Clone> CacheStore<V> {
    // == Constructors ==
    /// Creates an empty store driven by the wall clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an empty store driven by `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: RwLock::new(StoreInner {
                entries: HashMap::new(),
                stats: CacheStats::new(),
            }),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            clock,
        }
    }

    // == Get ==
    /// Retrieves a live value by key.
    ///
    /// A stale entry counts as a miss and is dropped on the spot.
    pub async fn get(&self, key: &str) -> Option<V> {
        let now = self.clock.now();

        {
            let inner = self.inner.read().await;
            match inner.entries.get(key) {
                Some(entry) if entry.is_live(now) => {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    return Some(entry.value().clone());
                }
                Some(_) => {}
                None => {
                    self.misses.fetch_add(1, Ordering::Relaxed);
                    return None;
                }
            }
        }

        // Stale: re-check under the write lock, a put may have landed in between
        let mut inner = self.inner.write().await;
        match inner.entries.get(key).map(|entry| entry.is_live(now)) {
            Some(true) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return inner.entries.get(key).map(|entry| entry.value().clone());
            }
            Some(false) => {
                inner.entries.remove(key);
                inner.stats.record_expirations(1);
                let count = inner.entries.len();
                inner.stats.set_total_entries(count);
            }
            None => {}
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    // == Put ==
    /// Stores `value` under `key`, live for `ttl` from now.
    ///
    /// Replaces any previous entry. Returns `true` if the key was not present.
    pub async fn put(&self, key: impl Into<String>, value: V, ttl: Duration) -> bool {
        let entry = ExpirableValue::with_offset(value, self.clock.now(), ttl);
        self.put_value(key, entry).await
    }

    /// Stores an already built expirable value under `key`.
    pub async fn put_value(&self, key: impl Into<String>, entry: ExpirableValue<V>) -> bool {
        let mut inner = self.inner.write().await;
        let inserted = inner.entries.insert(key.into(), entry).is_none();
        inner.stats.record_put(inserted);
        let count = inner.entries.len();
        inner.stats.set_total_entries(count);
        inserted
    }

    // == Remove ==
    /// Removes the entry for `key`, live or stale.
    ///
    /// Returns whether something was actually removed.
    pub async fn remove(&self, key: &str) -> bool {
        let mut inner = self.inner.write().await;
        let existed = inner.entries.remove(key).is_some();
        if existed {
            inner.stats.record_removal();
            let count = inner.entries.len();
            inner.stats.set_total_entries(count);
        }
        existed
    }

    // == Purge Expired ==
    /// Removes all stale entries from the store.
    ///
    /// Returns the number of entries removed.
    pub async fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut inner = self.inner.write().await;

        let before = inner.entries.len();
        inner.entries.retain(|_, entry| entry.is_live(now));
        let count = before - inner.entries.len();

        inner.stats.record_expirations(count);
        let remaining = inner.entries.len();
        inner.stats.set_total_entries(remaining);
        count
    }

    // == Stats ==
    /// Returns a snapshot of the store statistics.
    pub async fn stats(&self) -> CacheStats {
        let inner = self.inner.read().await;
        let mut stats = inner.stats.clone();
        stats.set_total_entries(inner.entries.len());
        stats.set_lookups(
            self.hits.load(Ordering::Relaxed),
            self.misses.load(Ordering::Relaxed),
        );
        stats
    }

    /// Number of entries physically held, including stale ones not yet reaped.
    pub async fn len(&self) -> usize {
        self.inner.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.entries.is_empty()
    }
}

impl<V: Clone> Default for CacheStore<V> {
    fn default() -> Self {
        Self::new()
    }
}
