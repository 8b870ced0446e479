//! Loader Module
//!
//! Populates the cache store from the content source on a miss.

use std::io;
use std::sync::Arc;

use chrono::Duration;
use tracing::{debug, info};

use crate::cache::CacheStore;
use crate::error::{CacheError, Result};
use crate::resolve::Resource;
use crate::source::ContentSource;

// == Loader ==
/// Reads items from the content source and memoizes them.
///
/// Items at or above `max_entry_bytes` are refused with `TooLarge`; callers
/// may serve them with `read_through`, which never touches the store. The
/// ceiling is checked against the reported size before reading and again
/// against the bytes actually read. Reads run on the blocking pool.
pub struct Loader {
    store: Arc<CacheStore<Resource>>,
    source: Arc<dyn ContentSource>,
    max_entry_bytes: u64,
    ttl: Duration,
}

impl Loader {
    /// Creates a loader writing into `store` with the given size ceiling and TTL.
    pub fn new(
        store: Arc<CacheStore<Resource>>,
        source: Arc<dyn ContentSource>,
        max_entry_bytes: u64,
        ttl: Duration,
    ) -> Self {
        Self {
            store,
            source,
            max_entry_bytes,
            ttl,
        }
    }

    // == Load ==
    /// Reads `key` in full and caches it for the configured TTL.
    ///
    /// Any failure leaves the store untouched.
    pub async fn load(&self, key: &str) -> Result<Resource> {
        if !self.source.exists(key) {
            return Err(CacheError::NotFound(key.to_string()));
        }
        if self.source.is_container(key) {
            return Err(CacheError::NotReadable(key.to_string()));
        }

        let size = self
            .source
            .size(key)
            .map_err(|e| CacheError::source_io(key, e))?;
        if size >= self.max_entry_bytes {
            return Err(CacheError::TooLarge {
                key: key.to_string(),
                size,
                limit: self.max_entry_bytes,
            });
        }

        let resource = self.fetch(key, size).await?;
        let read = resource.size();
        if read >= self.max_entry_bytes {
            // Grew between the size check and the read
            return Err(CacheError::TooLarge {
                key: key.to_string(),
                size: read,
                limit: self.max_entry_bytes,
            });
        }

        if self.store.put(key, resource.clone(), self.ttl).await {
            info!("cached: {} ({} bytes)", key, resource.size());
        } else {
            debug!("refreshed: {} ({} bytes)", key, resource.size());
        }

        Ok(resource)
    }

    // == Read Through ==
    /// Reads `key` straight from the content source without caching it.
    pub async fn read_through(&self, key: &str) -> Result<Resource> {
        let size = self
            .source
            .size(key)
            .map_err(|e| CacheError::source_io(key, e))?;
        self.fetch(key, size).await
    }

    /// Reads the whole item, rejecting a read that produced nothing for a
    /// non-empty item.
    async fn fetch(&self, key: &str, expected: u64) -> Result<Resource> {
        let source = Arc::clone(&self.source);
        let owned_key = key.to_string();
        let bytes = tokio::task::spawn_blocking(move || source.read_all(&owned_key))
            .await
            .map_err(|e| CacheError::source_io(key, io::Error::other(e.to_string())))?
            .map_err(|e| CacheError::source_io(key, e))?;

        if bytes.is_empty() && expected > 0 {
            return Err(CacheError::source_io(
                key,
                io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!("short read: 0 of {} bytes", expected),
                ),
            ));
        }

        Ok(Resource::new(key, bytes))
    }
}
