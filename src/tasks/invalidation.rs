//! Invalidation Watcher Task
//!
//! Background task that drops cache entries whose files changed on disk.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::cache::CacheStore;
use crate::changes::ChangeNotifier;
use crate::error::{CacheError, Result};
use crate::resolve::KeyMapper;

// == Watcher Handle ==
/// Handle to a running invalidation watcher.
///
/// Dropping the handle cancels the watcher, same as [`WatcherHandle::cancel`].
#[derive(Debug)]
pub struct WatcherHandle {
    cancel: watch::Sender<bool>,
    task: JoinHandle<Result<()>>,
}

impl WatcherHandle {
    /// Requests a cooperative stop. An event already being processed completes.
    pub fn cancel(&self) {
        // No receiver left means the task already exited
        let _ = self.cancel.send(true);
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Cancels the watcher and waits for it to exit.
    ///
    /// Returns the task's own outcome, e.g. `WatcherInit` if it never started.
    pub async fn shutdown(self) -> Result<()> {
        self.cancel();
        match self.task.await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("invalidation watcher ended abnormally: {}", e);
                Ok(())
            }
        }
    }
}

/// Spawns the invalidation watcher for the content rooted at `root`.
///
/// The root is made absolute once; if that or the subscription fails, the
/// task ends with `WatcherInit` and the cache keeps working without
/// invalidation. Each changed path is mapped through `keys` and removed from
/// `store`, whatever kind of change it was. Changed paths may be relative to
/// either the absolute root or its symlink-resolved form.
///
/// # Example
/// ```ignore
/// let handle = spawn_invalidation_watcher(store.clone(), Arc::new(FsNotifier::new()), keys, "./public");
/// // Later, during shutdown:
/// handle.shutdown().await?;
/// ```
pub fn spawn_invalidation_watcher<V>(
    store: Arc<CacheStore<V>>,
    notifier: Arc<dyn ChangeNotifier>,
    keys: KeyMapper,
    root: impl Into<PathBuf>,
) -> WatcherHandle
where
    V: Clone + Send + Sync + 'static,
{
    let root = root.into();
    let (cancel, cancelled) = watch::channel(false);

    let task = tokio::spawn(async move {
        let outcome = run_watcher(store, notifier, keys, &root, cancelled).await;
        if let Err(e) = &outcome {
            error!("invalidation watcher disabled: {}", e);
        }
        outcome
    });

    WatcherHandle { cancel, task }
}

async fn run_watcher<V: Clone>(
    store: Arc<CacheStore<V>>,
    notifier: Arc<dyn ChangeNotifier>,
    keys: KeyMapper,
    root: &Path,
    mut cancelled: watch::Receiver<bool>,
) -> Result<()> {
    let absolute_root = std::path::absolute(root).map_err(|e| CacheError::WatcherInit {
        path: root.to_path_buf(),
        reason: e.to_string(),
    })?;

    let mut changes = notifier.watch(&absolute_root)?;
    // Backends such as inotify and FSEvents report symlink-resolved paths
    let canonical_root =
        std::fs::canonicalize(&absolute_root).unwrap_or_else(|_| absolute_root.clone());
    info!("invalidation watcher started on {}", absolute_root.display());

    loop {
        let changed = tokio::select! {
            biased;
            signal = cancelled.changed() => {
                // Sender dropped with the handle: treat as cancellation
                if signal.is_err() || *cancelled.borrow() {
                    break;
                }
                continue;
            }
            next = changes.next() => match next {
                Some(path) => path,
                None => {
                    info!("change stream closed");
                    break;
                }
            },
        };

        if *cancelled.borrow() {
            break;
        }

        let root = if changed.starts_with(&canonical_root) {
            &canonical_root
        } else {
            &absolute_root
        };
        match keys.key_for_change(root, &changed) {
            Some(key) => {
                if store.remove(&key).await {
                    info!("evicted {}", key);
                } else {
                    debug!("change for uncached {}", key);
                }
            }
            None => warn!("no cache key for changed path {}", changed.display()),
        }
    }

    info!("invalidation watcher stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::changes::ChannelNotifier;
    use chrono::Duration;
    use std::time::Duration as StdDuration;

    fn keys() -> KeyMapper {
        KeyMapper::new("./public", "index.html")
    }

    fn public_root() -> PathBuf {
        std::path::absolute("./public").unwrap()
    }

    /// Polls until `key` is gone from the store or the deadline passes.
    async fn wait_for_removal(store: &CacheStore<String>, key: &str) -> bool {
        for _ in 0..100 {
            if store.get(key).await.is_none() {
                return true;
            }
            tokio::time::sleep(StdDuration::from_millis(10)).await;
        }
        false
    }

    #[tokio::test]
    async fn test_change_evicts_nested_entry() {
        let store = Arc::new(CacheStore::new());
        store
            .put("./public/a/index.html", "<html>".to_string(), Duration::hours(1))
            .await;

        let (sender, notifier) = ChannelNotifier::new();
        let handle = spawn_invalidation_watcher(store.clone(), Arc::new(notifier), keys(), "./public");

        sender.send(public_root().join("a/index.html")).unwrap();

        assert!(wait_for_removal(&store, "./public/a/index.html").await);
        handle.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_change_leaves_other_entries() {
        let store = Arc::new(CacheStore::new());
        store.put("./public/keep.css", "body{}".to_string(), Duration::hours(1)).await;
        store.put("./public/drop.css", "p{}".to_string(), Duration::hours(1)).await;

        let (sender, notifier) = ChannelNotifier::new();
        let handle = spawn_invalidation_watcher(store.clone(), Arc::new(notifier), keys(), "./public");

        sender.send(public_root().join("drop.css")).unwrap();
        assert!(wait_for_removal(&store, "./public/drop.css").await);

        assert_eq!(store.get("./public/keep.css").await, Some("body{}".to_string()));
        handle.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_repeated_and_unknown_paths_do_not_stop_watcher() {
        let store = Arc::new(CacheStore::new());
        store.put("./public/late.txt", "x".to_string(), Duration::hours(1)).await;

        let (sender, notifier) = ChannelNotifier::new();
        let handle = spawn_invalidation_watcher(store.clone(), Arc::new(notifier), keys(), "./public");

        sender.send(public_root()).unwrap();
        sender.send(public_root().join("never-cached.txt")).unwrap();
        sender.send(public_root().join("never-cached.txt")).unwrap();
        sender.send(public_root().join("late.txt")).unwrap();

        assert!(wait_for_removal(&store, "./public/late.txt").await);
        assert!(!handle.is_finished());
        handle.shutdown().await.unwrap();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlinked_root_matches_resolved_paths() {
        let dir = tempfile::tempdir().unwrap();
        let real = dir.path().join("site");
        std::fs::create_dir_all(real.join("a")).unwrap();
        let link = dir.path().join("public");
        std::os::unix::fs::symlink(&real, &link).unwrap();

        let store = Arc::new(CacheStore::new());
        store
            .put("./public/a/index.html", "<html>".to_string(), Duration::hours(1))
            .await;
        store.put("./public/index.html", "home".to_string(), Duration::hours(1)).await;

        let (sender, notifier) = ChannelNotifier::new();
        let handle = spawn_invalidation_watcher(store.clone(), Arc::new(notifier), keys(), link.clone());

        // Events arrive under the resolved directory, not the link
        let resolved = std::fs::canonicalize(&real).unwrap();
        sender.send(resolved.join("a/index.html")).unwrap();

        assert!(wait_for_removal(&store, "./public/a/index.html").await);
        assert_eq!(store.get("./public/index.html").await, Some("home".to_string()));
        handle.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_cancel_stops_idle_watcher() {
        let store: Arc<CacheStore<String>> = Arc::new(CacheStore::new());
        let (_sender, notifier) = ChannelNotifier::new();
        let handle = spawn_invalidation_watcher(store, Arc::new(notifier), keys(), "./public");

        let outcome = tokio::time::timeout(StdDuration::from_secs(1), handle.shutdown()).await;
        assert!(matches!(outcome, Ok(Ok(()))));
    }

    #[tokio::test]
    async fn test_cancelled_watcher_skips_pending_event() {
        let store = Arc::new(CacheStore::new());
        store.put("./public/a.txt", "a".to_string(), Duration::hours(1)).await;

        let (sender, notifier) = ChannelNotifier::new();
        let handle = spawn_invalidation_watcher(store.clone(), Arc::new(notifier), keys(), "./public");

        // Cancel before the event is queued; the watcher must not act on it
        handle.cancel();
        sender.send(public_root().join("a.txt")).unwrap();
        handle.shutdown().await.unwrap();

        assert_eq!(store.get("./public/a.txt").await, Some("a".to_string()));
    }

    #[tokio::test]
    async fn test_stream_end_finishes_watcher() {
        let store: Arc<CacheStore<String>> = Arc::new(CacheStore::new());
        let (sender, notifier) = ChannelNotifier::new();
        let handle = spawn_invalidation_watcher(store, Arc::new(notifier), keys(), "./public");

        drop(sender);

        let outcome = tokio::time::timeout(StdDuration::from_secs(1), async {
            while !handle.is_finished() {
                tokio::time::sleep(StdDuration::from_millis(5)).await;
            }
        })
        .await;
        assert!(outcome.is_ok());
        assert!(handle.shutdown().await.is_ok());
    }

    #[tokio::test]
    async fn test_unresolvable_root_is_fatal_to_watcher_only() {
        let store = Arc::new(CacheStore::new());
        store.put("./public/a.txt", "a".to_string(), Duration::hours(1)).await;

        let (_sender, notifier) = ChannelNotifier::new();
        let handle = spawn_invalidation_watcher(store.clone(), Arc::new(notifier), keys(), "");

        let outcome = handle.shutdown().await;
        assert!(matches!(outcome, Err(CacheError::WatcherInit { .. })));

        // Store keeps serving
        assert_eq!(store.get("./public/a.txt").await, Some("a".to_string()));
    }

    #[tokio::test]
    async fn test_subscription_failure_is_watcher_init() {
        let store: Arc<CacheStore<String>> = Arc::new(CacheStore::new());
        let (_sender, notifier) = ChannelNotifier::new();
        let notifier: Arc<dyn ChangeNotifier> = Arc::new(notifier);

        // First subscription takes the only receiver
        notifier.watch(&public_root()).unwrap();
        let handle = spawn_invalidation_watcher(store, notifier, keys(), "./public");

        assert!(matches!(
            handle.shutdown().await,
            Err(CacheError::WatcherInit { .. })
        ));
    }
}
