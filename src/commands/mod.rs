//! Command-line interface and orchestration.

mod common;
mod fetch;
mod init;
mod progress_reporter;
mod render;
mod run;
mod validate;

pub use fetch::{FetchArgs, fetch_metrics};
pub use init::{InitArgs, init_config};
pub use render::{RenderArgs, render_metrics};
pub use run::{RunArgs, run_batch};
pub use validate::{ValidateArgs, validate_config};
