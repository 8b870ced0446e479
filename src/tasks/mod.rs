//! Background Tasks Module
//!
//! Contains the tasks that run alongside request handling.
//!
//! # Tasks
//! - Invalidation watcher: drops entries whose files changed on disk
//! - Reaper: removes expired entries at configured intervals

mod cleanup;
mod invalidation;

pub use cleanup::spawn_reaper_task;
pub use invalidation::{spawn_invalidation_watcher, WatcherHandle};
