//! Public Cache - an in-memory resource cache over a filesystem content store
//!
//! Serves previously read file contents from memory, reloads entries whose
//! TTL ran out, and drops entries as soon as their file changes on disk.

pub mod cache;
pub mod changes;
pub mod config;
pub mod error;
pub mod resolve;
pub mod source;
pub mod tasks;

pub use cache::CacheStore;
pub use config::Config;
pub use error::{CacheError, Result};
pub use resolve::{Origin, Resolved, Resolver, Resource};
pub use tasks::{spawn_invalidation_watcher, spawn_reaper_task, WatcherHandle};
