//! Cache key derivation
//!
//! Turns request paths and changed filesystem paths into the same keys, so a
//! change event lands on the entry a lookup created.

use std::path::{Component, Path};

use crate::config::Config;

// == Key Mapper ==
/// Maps paths under the content root to cache keys of the form
/// `<root>/<normalized relative path>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMapper {
    root: String,
    default_key: String,
}

impl KeyMapper {
    /// Creates a mapper for keys under `root`.
    ///
    /// `default_key` is the relative path served for an empty or root request.
    pub fn new(root: impl Into<String>, default_key: impl Into<String>) -> Self {
        let root = root.into();
        let trimmed = root.trim_end_matches('/');
        let root = if trimmed.is_empty() { "." } else { trimmed }.to_string();

        let default_key = normalize(&default_key.into()).join("/");
        Self { root, default_key }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.content_root, &config.default_key)
    }

    /// The content root as configured, used as the key prefix.
    pub fn root(&self) -> &str {
        &self.root
    }

    // == Request Keys ==
    /// Derives the key for a request path. Never empty.
    ///
    /// Query strings and fragments are ignored. `..` segments can't climb
    /// above the root.
    pub fn key_for_request(&self, request_path: &str) -> String {
        let path = request_path
            .split(['?', '#'])
            .next()
            .unwrap_or_default();

        let segments = normalize(path);
        if segments.is_empty() {
            self.join(&self.default_key)
        } else {
            self.join(&segments.join("/"))
        }
    }

    // == Change Keys ==
    /// Derives the key for a changed absolute path, given the absolute root
    /// the notifier was watching.
    ///
    /// Paths outside the root fall back to their file name. Returns `None`
    /// for the root itself and for names that aren't valid UTF-8.
    pub fn key_for_change(&self, absolute_root: &Path, changed: &Path) -> Option<String> {
        let relative = match changed.strip_prefix(absolute_root) {
            Ok(rest) => {
                let mut parts = Vec::new();
                for component in rest.components() {
                    if let Component::Normal(name) = component {
                        parts.push(name.to_str()?);
                    }
                }
                parts.join("/")
            }
            Err(_) => changed.file_name()?.to_str()?.to_string(),
        };

        let segments = normalize(&relative);
        if segments.is_empty() {
            return None;
        }
        Some(self.join(&segments.join("/")))
    }

    fn join(&self, relative: &str) -> String {
        format!("{}/{}", self.root, relative)
    }
}

/// Splits a slash separated path into clean segments.
fn normalize(path: &str) -> Vec<&str> {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments
}
