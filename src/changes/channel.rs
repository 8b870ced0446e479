//! Channel-fed notifier, for embedding callers and tests that produce
//! change paths themselves.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tokio::sync::mpsc;

use super::{ChangeNotifier, ChangeStream};
use crate::error::{CacheError, Result};

/// Notifier whose events are whatever is sent on the paired sender.
///
/// Only one subscription can be handed out.
#[derive(Debug)]
pub struct ChannelNotifier {
    receiver: Mutex<Option<mpsc::UnboundedReceiver<PathBuf>>>,
}

impl ChannelNotifier {
    pub fn new() -> (mpsc::UnboundedSender<PathBuf>, Self) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let notifier = Self {
            receiver: Mutex::new(Some(receiver)),
        };
        (sender, notifier)
    }
}

impl ChangeNotifier for ChannelNotifier {
    fn watch(&self, root: &Path) -> Result<ChangeStream> {
        let taken = self
            .receiver
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();

        taken
            .map(ChangeStream::from_receiver)
            .ok_or_else(|| CacheError::WatcherInit {
                path: root.to_path_buf(),
                reason: "channel notifier already subscribed".to_string(),
            })
    }
}
