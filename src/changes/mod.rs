//! Changes Module
//!
//! The capability the invalidation watcher needs from a filesystem watcher:
//! a live, possibly repeating sequence of changed absolute paths.

mod channel;
mod fs;

use std::path::{Path, PathBuf};

use tokio::sync::mpsc;

use crate::error::Result;

pub use channel::ChannelNotifier;
pub use fs::FsNotifier;

// == Change Notifier ==
/// Subscribes to changes below a root directory.
pub trait ChangeNotifier: Send + Sync {
    /// Starts watching `root` (already absolute).
    ///
    /// Fails with `WatcherInit` when the subscription can't be set up.
    fn watch(&self, root: &Path) -> Result<ChangeStream>;
}

// == Change Stream ==
/// Sequence of changed paths. Ends only when the producer goes away.
pub struct ChangeStream {
    receiver: mpsc::UnboundedReceiver<PathBuf>,
    /// Keeps whatever produces events (e.g. an OS watcher) alive
    _guard: Option<Box<dyn Send>>,
}

impl ChangeStream {
    pub fn from_receiver(receiver: mpsc::UnboundedReceiver<PathBuf>) -> Self {
        Self {
            receiver,
            _guard: None,
        }
    }

    /// Like `from_receiver`, holding `guard` until the stream is dropped.
    pub fn with_guard(
        receiver: mpsc::UnboundedReceiver<PathBuf>,
        guard: impl Send + 'static,
    ) -> Self {
        Self {
            receiver,
            _guard: Some(Box::new(guard)),
        }
    }

    /// Waits for the next changed path.
    pub async fn next(&mut self) -> Option<PathBuf> {
        self.receiver.recv().await
    }
}

impl std::fmt::Debug for ChangeStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeStream")
            .field("guarded", &self._guard.is_some())
            .finish()
    }
}
