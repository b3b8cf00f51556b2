//! A tool to track package downloads and repository traction over time.
//!
//! # Overview
//!
//! `pkg-pulse` collects daily metrics for a configured list of packages and
//! repositories (PyPI and npm download counts, GitHub stars, forks, and open
//! issues, and Discord community sizes), appends them to a CSV time series,
//! and regenerates a Markdown dashboard with a summary table and references
//! to externally rendered trend plots.
//!
//! # Quick Start
//!
//! Generate a starter configuration, then run the daily batch:
//!
//! ```bash
//! pkg-pulse init
//! pkg-pulse run
//! ```
//!
//! `run` is what an external scheduler (cron, GitHub Actions) should invoke
//! once a day. The steps are also available individually:
//!
//! ```bash
//! pkg-pulse fetch     # collect today's readings into the store
//! pkg-pulse render    # regenerate the dashboard from the store
//! ```
//!
//! # Configuration
//!
//! Tracked items live in `pulse.yml` (or `.yaml`/`.toml`/`.json`):
//!
//! ```yaml
//! items:
//!   - name: armoriq-sdk
//!     source: pypi
//!   - name: "@armoriq/sdk"
//!     source: npm
//!   - name: armoriq/armoriq-sdk
//!     source: github
//!     metrics: ["Stars", "Open Issues"]
//!   - name: vYqbNP3q
//!     source: discord
//!     label: ArmorIQ Community
//! ```
//!
//! Validate changes with `pkg-pulse validate`.
//!
//! # GitHub Access
//!
//! GitHub items work without credentials, but the unauthenticated API allows
//! only 60 requests per hour. Provide a personal access token (no special
//! permissions needed) to raise that to 5000:
//!
//! ```bash
//! export GITHUB_TOKEN=ghp_xxxxxxxxxxxxxxxxxxxx
//! pkg-pulse run
//! ```
//!
//! # Failure Model
//!
//! A source that errors, times out, or returns 404 costs only its own
//! readings for the day; the run completes, the failure is reported in the
//! summary, and prior readings remain in the store. Store write failures are
//! fatal and abort the run before any report is produced.

use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use clap::{Parser, Subcommand};
use pkg_pulse::Result;

mod commands;

use crate::commands::{
    FetchArgs, InitArgs, RenderArgs, RunArgs, ValidateArgs, fetch_metrics, init_config, render_metrics, run_batch, validate_config,
};

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(name = "pkg-pulse", version, about)]
#[command(styles = CLAP_STYLES)]
struct Cli {
    #[command(subcommand)]
    command: PulseSubcommand,
}

#[derive(Subcommand, Debug)]
enum PulseSubcommand {
    /// Fetch today's readings for all tracked items
    Fetch(FetchArgs),
    /// Regenerate the Markdown dashboard from the store
    Render(RenderArgs),
    /// Fetch, then render: the daily batch entry point
    Run(RunArgs),
    /// Generate a default configuration file
    Init(InitArgs),
    /// Validate a configuration file
    Validate(ValidateArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        PulseSubcommand::Fetch(fetch_args) => fetch_metrics(fetch_args).await,
        PulseSubcommand::Render(render_args) => render_metrics(render_args).await,
        PulseSubcommand::Run(run_args) => run_batch(run_args).await,
        PulseSubcommand::Init(init_args) => init_config(init_args),
        PulseSubcommand::Validate(validate_args) => validate_config(validate_args),
    }
}
