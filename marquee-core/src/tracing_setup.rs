//! Logging for the `marquee` binary.
//!
//! Two sinks: stderr shows Marquee's own crates at the level picked on the
//! command line (dependencies stay at warn), and a per-run file keeps a full
//! trace of every controller transition and upstream request.

use std::fs::{File, create_dir_all};
use std::path::{Path, PathBuf};

use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use crate::{MarqueeError, Result};

/// Name of the per-run debug log written inside the logs directory.
pub const LOG_FILE_NAME: &str = "marquee-last-run.log";

/// Tracing targets owned by this workspace.
const MARQUEE_TARGETS: &[&str] = &["marquee", "marquee_core", "marquee_search"];

/// Verbosity accepted by `--log-level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LevelFilter {
    fn from(level: CliLogLevel) -> Self {
        match level {
            CliLogLevel::Error => LevelFilter::ERROR,
            CliLogLevel::Warn => LevelFilter::WARN,
            CliLogLevel::Info => LevelFilter::INFO,
            CliLogLevel::Debug => LevelFilter::DEBUG,
            CliLogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

/// Console directive: Marquee crates at `level`, everything else no louder than warn.
pub fn console_directive(level: LevelFilter) -> String {
    let others = level.min(LevelFilter::WARN);
    MARQUEE_TARGETS
        .iter()
        .fold(others.to_string(), |mut directive, target| {
            directive.push_str(&format!(",{target}={level}"));
            directive
        })
}

/// Installs the console and file layers and returns the log file path.
///
/// `RUST_LOG` overrides the console directive when set. The file layer always
/// records at trace and is truncated on every run.
///
/// # Errors
/// - `MarqueeError::Io` - The logs directory or log file cannot be created
/// - `MarqueeError::Configuration` - A global subscriber is already installed
pub fn init_tracing(level: impl Into<LevelFilter>, logs_dir: Option<&Path>) -> Result<PathBuf> {
    let level = level.into();
    let logs_dir = logs_dir.unwrap_or_else(|| Path::new("logs"));
    create_dir_all(logs_dir)?;

    let log_file_path = logs_dir.join(LOG_FILE_NAME);
    let log_file = File::create(&log_file_path)?;

    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(console_directive(level)));
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .without_time()
        .with_filter(console_filter);

    let file_layer = fmt::layer()
        .with_writer(log_file)
        .with_ansi(false)
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_filter(LevelFilter::TRACE);

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| MarqueeError::Configuration {
            reason: format!("logging already initialized: {e}"),
        })?;

    tracing::debug!(%level, log_file = %log_file_path.display(), "Logging ready");
    Ok(log_file_path)
}
