//! Expired Entry Reaper
//!
//! Background task that periodically removes stale entries, so items nobody
//! asks for again don't occupy memory until the process exits.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheStore;

/// Spawns a background task that periodically purges expired entries.
///
/// The task runs in an infinite loop, sleeping for `interval` between
/// sweeps. Lookups already ignore stale entries; this only reclaims memory.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during shutdown.
///
/// # Example
/// ```ignore
/// let reaper = spawn_reaper_task(store.clone(), Duration::from_secs(60));
/// // Later, during shutdown:
/// reaper.abort();
/// ```
pub fn spawn_reaper_task<V>(store: Arc<CacheStore<V>>, interval: Duration) -> JoinHandle<()>
where
    V: Clone + Send + Sync + 'static,
{
    // A zero interval would spin
    let interval = interval.max(Duration::from_millis(1));

    tokio::spawn(async move {
        info!("Starting expired entry reaper with interval of {:?}", interval);

        loop {
            tokio::time::sleep(interval).await;

            let removed = store.purge_expired().await;

            if removed > 0 {
                info!("reaper: removed {} expired entries", removed);
            } else {
                debug!("reaper: no expired entries found");
            }
        }
    })
}
