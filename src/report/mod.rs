//! Report generation.
//!
//! Renders the Markdown dashboard from the latest readings and references to
//! externally produced trend plots. Rendering is read-only and deterministic.

mod markdown;

pub use markdown::{PlotRef, SummaryRow, generate};
