//! Marquee CLI - Command-line interface
//!
//! Provides command-line access to catalog search and the suggestion box.

mod commands;
mod session;

use std::path::PathBuf;

use clap::Parser;
use marquee_core::MarqueeConfig;
use marquee_core::tracing_setup::{CliLogLevel, init_tracing};

#[derive(Parser)]
#[command(name = "marquee")]
#[command(about = "Movie and TV search with live suggestions")]
struct Cli {
    /// Console log level (the log file always records everything)
    #[arg(long, value_enum, default_value_t = CliLogLevel::Warn, global = true)]
    log_level: CliLogLevel,
    /// Directory for the run log
    #[arg(long, global = true)]
    logs_dir: Option<PathBuf>,
    /// Use the built-in demo catalog instead of TMDB
    #[arg(long, global = true)]
    demo: bool,
    #[command(subcommand)]
    command: commands::Commands,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level, cli.logs_dir.as_deref())
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;

    let config = MarqueeConfig::from_env();
    if let Err(error) = commands::handle_command(cli.command, &config, cli.demo).await {
        tracing::error!(%error, "Command failed");
        eprintln!("Error: {}", error.user_message());
        if error.is_user_error() {
            eprintln!("Hint: pass --demo to browse the built-in catalog without an API key.");
        }
        std::process::exit(1);
    }

    Ok(())
}
