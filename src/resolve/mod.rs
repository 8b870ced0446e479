//! Resolve Module
//!
//! Get-or-load path from a request path to cached bytes.

mod key;
mod loader;
mod resolver;
mod resource;

#[cfg(test)]
pub(crate) mod fake;

pub use key::KeyMapper;
pub use loader::Loader;
pub use resolver::Resolver;
pub use resource::{Origin, Resolved, Resource};
