//! Lookup facade: the single get-or-load entry point for a request front end.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::cache::CacheStore;
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::resolve::{KeyMapper, Loader, Origin, Resolved, Resource};
use crate::source::ContentSource;

// == Resolver ==
/// Composes the cache store and the loader.
///
/// Cheap to clone; clones share the same store. Concurrent misses on one key
/// each load independently and the last put wins.
#[derive(Clone)]
pub struct Resolver {
    store: Arc<CacheStore<Resource>>,
    loader: Arc<Loader>,
    keys: KeyMapper,
}

impl Resolver {
    pub fn new(store: Arc<CacheStore<Resource>>, loader: Loader, keys: KeyMapper) -> Self {
        Self {
            store,
            loader: Arc::new(loader),
            keys,
        }
    }

    /// Builds a resolver over `store` and `source` with the configured limits.
    pub fn from_config(
        config: &Config,
        store: Arc<CacheStore<Resource>>,
        source: Arc<dyn ContentSource>,
    ) -> Self {
        let loader = Loader::new(store.clone(), source, config.max_entry_bytes, config.ttl());
        Self::new(store, loader, KeyMapper::from_config(config))
    }

    pub fn store(&self) -> &Arc<CacheStore<Resource>> {
        &self.store
    }

    pub fn keys(&self) -> &KeyMapper {
        &self.keys
    }

    // == Resolve ==
    /// Returns the bytes for `request_path`, from cache when live.
    ///
    /// Oversized items are read through on every call and never cached.
    pub async fn resolve(&self, request_path: &str) -> Result<Resolved> {
        let key = self.keys.key_for_request(request_path);
        self.resolve_key(&key).await
    }

    /// Same as [`Resolver::resolve`] for an already derived key.
    pub async fn resolve_key(&self, key: &str) -> Result<Resolved> {
        if let Some(resource) = self.store.get(key).await {
            debug!("cache hit for {}", key);
            return Ok(Resolved {
                resource,
                origin: Origin::Cache,
            });
        }

        debug!("cache miss for {}", key);
        match self.loader.load(key).await {
            Ok(resource) => Ok(Resolved {
                resource,
                origin: Origin::Loaded,
            }),
            Err(CacheError::TooLarge { size, limit, .. }) => {
                warn!(
                    "{} is {} bytes (limit {}), serving uncached",
                    key, size, limit
                );
                let resource = self.loader.read_through(key).await?;
                Ok(Resolved {
                    resource,
                    origin: Origin::ReadThrough,
                })
            }
            Err(e) => Err(e),
        }
    }
}
