//! Configuration loading and validation.

#[expect(clippy::module_inception, reason = "config::config mirrors the sibling module layout")]
mod config;

pub use config::{Config, DEFAULT_CONFIG_YAML, DEFAULT_SEARCH_NAMES, TrackedItem};
