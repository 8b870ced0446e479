//! In-memory content source for unit tests.

use std::collections::HashMap;
use std::io;
use std::sync::Mutex;
use std::time::Duration;

use crate::source::ContentSource;

#[derive(Debug, Clone)]
enum Item {
    File {
        bytes: Vec<u8>,
        reported_size: u64,
        fail: bool,
    },
    Dir,
}

/// Content source backed by a map, counting reads per key.
#[derive(Debug, Default)]
pub struct MemorySource {
    items: Mutex<HashMap<String, Item>>,
    reads: Mutex<HashMap<String, usize>>,
    delays: Mutex<HashMap<String, Duration>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, key: &str, contents: &str) -> Self {
        self.set_file(key, contents);
        self
    }

    /// A file whose reported size differs from the bytes it yields.
    pub fn with_sized_file(self, key: &str, reported_size: u64, bytes: &[u8]) -> Self {
        self.insert(
            key,
            Item::File {
                bytes: bytes.to_vec(),
                reported_size,
                fail: false,
            },
        );
        self
    }

    /// A file whose read blocks the calling thread for `delay`.
    pub fn with_slow_file(self, key: &str, contents: &str, delay: Duration) -> Self {
        self.set_file(key, contents);
        self.delays.lock().unwrap().insert(key.to_string(), delay);
        self
    }

    pub fn with_failing_file(self, key: &str, reported_size: u64) -> Self {
        self.insert(
            key,
            Item::File {
                bytes: Vec::new(),
                reported_size,
                fail: true,
            },
        );
        self
    }

    pub fn with_dir(self, key: &str) -> Self {
        self.insert(key, Item::Dir);
        self
    }

    pub fn set_file(&self, key: &str, contents: &str) {
        self.insert(
            key,
            Item::File {
                bytes: contents.as_bytes().to_vec(),
                reported_size: contents.len() as u64,
                fail: false,
            },
        );
    }

    pub fn reads(&self, key: &str) -> usize {
        self.reads.lock().unwrap().get(key).copied().unwrap_or(0)
    }

    fn insert(&self, key: &str, item: Item) {
        self.items.lock().unwrap().insert(key.to_string(), item);
    }

    fn item(&self, key: &str) -> Option<Item> {
        self.items.lock().unwrap().get(key).cloned()
    }
}

impl ContentSource for MemorySource {
    fn exists(&self, key: &str) -> bool {
        self.item(key).is_some()
    }

    fn is_container(&self, key: &str) -> bool {
        matches!(self.item(key), Some(Item::Dir))
    }

    fn size(&self, key: &str) -> io::Result<u64> {
        match self.item(key) {
            Some(Item::File { reported_size, .. }) => Ok(reported_size),
            Some(Item::Dir) => Ok(0),
            None => Err(io::Error::from(io::ErrorKind::NotFound)),
        }
    }

    fn read_all(&self, key: &str) -> io::Result<Vec<u8>> {
        *self.reads.lock().unwrap().entry(key.to_string()).or_default() += 1;
        let delay = self.delays.lock().unwrap().get(key).copied();
        if let Some(delay) = delay {
            std::thread::sleep(delay);
        }
        match self.item(key) {
            Some(Item::File { fail: true, .. }) => {
                Err(io::Error::new(io::ErrorKind::PermissionDenied, "read refused"))
            }
            Some(Item::File { bytes, .. }) => Ok(bytes),
            Some(Item::Dir) => Err(io::Error::new(io::ErrorKind::Other, "is a directory")),
            None => Err(io::Error::from(io::ErrorKind::NotFound)),
        }
    }
}
