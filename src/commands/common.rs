//! Shared plumbing for the fetch, render, and run commands.

use super::progress_reporter::ProgressReporter;
use camino::Utf8PathBuf;
use clap::Args;
use clap::ValueEnum;
use core::time::Duration;
use pkg_pulse::Result;
use pkg_pulse::config::Config;
use pkg_pulse::fetch::{Collector, Progress};
use std::io::IsTerminal;
use std::sync::Arc;

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    None,
    /// Only error messages
    Error,
    /// Warning and error messages
    Warn,
    /// Info, warning, and error messages
    Info,
    /// Debug and above messages
    Debug,
    /// All messages including trace
    Trace,
}

/// Control when console output uses colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Colorize when stdout is a terminal
    Auto,
    /// Always colorize
    Always,
    /// Never colorize
    Never,
}

impl ColorMode {
    fn should_colorize(self) -> bool {
        match self {
            Self::Auto => std::io::stdout().is_terminal(),
            Self::Always => true,
            Self::Never => false,
        }
    }
}

/// Common arguments shared between the fetch, render, and run commands
#[derive(Args, Debug)]
pub struct CommonArgs {
    /// GitHub personal access token
    #[arg(long, value_name = "TOKEN", env = "GITHUB_TOKEN")]
    pub github_token: Option<String>,

    /// Path to configuration file [default: one of pulse.[yml|yaml|toml|json] ]
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    /// Control when to use colored output
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    pub color: ColorMode,

    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "none", global = true)]
    pub log_level: LogLevel,
}

#[derive(Debug)]
pub struct Common {
    pub config: Config,
    pub collector: Collector,
    pub use_colors: bool,
}

impl Common {
    /// Create a new Common processor with logger, config, and collector
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded or the
    /// collector cannot be initialized
    pub fn new(args: &CommonArgs) -> Result<Self> {
        Self::init_logging(args.log_level);

        let (config, warnings) = Config::load(args.config.as_deref())?;

        // Print warnings if any
        if !warnings.is_empty() {
            eprintln!("\n⚠️  Configuration validation warnings:");
            for warning in &warnings {
                eprintln!("   {warning}");
            }
            eprintln!();
        }

        // Create progress reporter
        // When logging is disabled, use a short delay so the progress bar appears for long operations
        // When logging is enabled, use an infinite delay so the progress bar never appears (would interfere with log output)
        let delay = if args.log_level == LogLevel::None {
            Some(Duration::from_millis(500))
        } else {
            None
        };

        let use_colors = args.color.should_colorize();
        let progress: Arc<dyn Progress> = Arc::new(ProgressReporter::new(delay, use_colors));

        let collector = Collector::new(
            args.github_token.as_deref(),
            Duration::from_secs(config.fetch_timeout_secs),
            config.max_concurrent_fetches,
            progress,
        )?;

        Ok(Self {
            config,
            collector,
            use_colors,
        })
    }

    /// Initialize logger based on log level
    fn init_logging(log_level: LogLevel) {
        if log_level == LogLevel::None {
            return;
        }

        let level = match log_level {
            LogLevel::None => return, // Already checked above, but being explicit
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        };

        let env = env_logger::Env::default().filter_or("RUST_LOG", level);

        env_logger::Builder::from_env(env)
            .format_timestamp(None)
            .format_module_path(false)
            .format_target(matches!(log_level, LogLevel::Debug) || matches!(log_level, LogLevel::Trace))
            .init();
    }
}
