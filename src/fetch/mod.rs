//! Metric collection from the external sources.
//!
//! This module gathers daily metric readings for the tracked items from four
//! sources: PyPI download stats (pypistats.org), the npm downloads API,
//! GitHub repository data, and Discord invite counts.
//!
//! # Implementation Model
//!
//! Each source has its own provider with a single `fetch` operation that
//! returns a [`FetchOutcome`]: `Found` with zero or more readings,
//! `NotFound` when the item does not exist at its source, or `Error`. The
//! [`Collector`] fans the tracked items out across the providers with
//! bounded parallelism and a per-fetch timeout, so a slow or failing source
//! only costs its own readings for the day.

pub mod collector;
pub mod discord;
pub mod github;
pub(crate) mod http;
pub mod npm;
mod outcome;
mod progress;
pub mod pypi;
mod reading;
mod repo_ref;
mod source;

pub use collector::{Collector, ItemOutcome};
pub use outcome::FetchOutcome;
pub use progress::{NoProgress, Progress};
pub use reading::MetricReading;
pub use repo_ref::RepoRef;
pub use source::{DAILY_DOWNLOADS, FORKS, MEMBERS, ONLINE, OPEN_ISSUES, STARS, Source};
