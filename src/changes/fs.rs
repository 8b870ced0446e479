//! OS-level change notifier built on the `notify` crate.

use std::path::Path;

use notify::{Event, EventKind, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::{ChangeNotifier, ChangeStream};
use crate::error::{CacheError, Result};

/// Watches a directory tree recursively and reports every path touched by a
/// create, modify or remove event. Event kinds are not distinguished.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsNotifier;

impl FsNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl ChangeNotifier for FsNotifier {
    fn watch(&self, root: &Path) -> Result<ChangeStream> {
        let (tx, rx) = mpsc::unbounded_channel();

        let init_error = |e: notify::Error| CacheError::WatcherInit {
            path: root.to_path_buf(),
            reason: e.to_string(),
        };

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            match res {
                Ok(event) => {
                    if !matches!(
                        event.kind,
                        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
                    ) {
                        return;
                    }
                    for path in event.paths {
                        // Receiver gone means the stream was dropped
                        if tx.send(path).is_err() {
                            return;
                        }
                    }
                }
                Err(e) => warn!("filesystem notifier error: {}", e),
            }
        })
        .map_err(init_error)?;

        watcher
            .watch(root, RecursiveMode::Recursive)
            .map_err(init_error)?;
        debug!("notifier subscribed to {}", root.display());

        Ok(ChangeStream::with_guard(rx, watcher))
    }
}
