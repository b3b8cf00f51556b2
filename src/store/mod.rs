//! Time-series persistence for metric readings.
//!
//! Readings are kept in a single CSV file (`date,item,source,metric,value`)
//! so the history stays trivially diffable and plottable by external tools.
//! The store guarantees at most one reading per (item, source, metric, date)
//! key and rewrites the file atomically on commit.

mod lock;
#[expect(clippy::module_inception, reason = "store::store mirrors the sibling module layout")]
mod store;
mod window;

pub use store::{AppendResult, Series, Store};
pub use window::Window;
