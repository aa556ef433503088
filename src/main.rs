#![forbid(unsafe_code)]

mod analytics;
mod board;
mod color;
mod config;
mod constants;
mod export;
mod flows;
mod gui;
mod ids;
mod store;
mod types;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{Level as TraceLevel, info};
use tracing_subscriber::FmtSubscriber;

use config::AppConfig;
use store::{Store, open_file_storage};

/// Mood tracking, journaling and mood boards
#[derive(Debug, Parser)]
#[command(name = "moodmuse", version, about)]
struct Cli {
    /// Directory holding the persisted store
    #[arg(long, value_name = "DIR")]
    storage_dir: Option<PathBuf>,

    /// Directory exported boards are written to
    #[arg(long, value_name = "DIR")]
    export_dir: Option<PathBuf>,

    /// trace, debug, info, warn or error
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,
}

fn parse_level(level: &str) -> TraceLevel {
    match level.to_lowercase().as_str() {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "warn" => TraceLevel::WARN,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::INFO,
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load();
    if let Some(dir) = cli.storage_dir {
        config.storage_dir = Some(dir);
    }
    if let Some(dir) = cli.export_dir {
        config.export_dir = Some(dir);
    }

    // Flag, then LOG_LEVEL, then the config file
    let log_level = cli
        .log_level
        .or_else(|| std::env::var("LOG_LEVEL").ok())
        .unwrap_or_else(|| config.log_level.clone());

    let subscriber = FmtSubscriber::builder()
        .with_max_level(parse_level(&log_level))
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install tracing subscriber")?;

    let storage = open_file_storage(config.storage_dir.clone());
    info!(
        storage = %storage.dir().display(),
        export = ?config.export_dir,
        "Starting MoodMuse"
    );
    let store = Store::load(storage);

    gui::run_gui(config, store)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("DEBUG"), TraceLevel::DEBUG);
        assert_eq!(parse_level("warn"), TraceLevel::WARN);
        assert_eq!(parse_level("verbose"), TraceLevel::INFO);
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::parse_from(["moodmuse", "--storage-dir", "/tmp/mm", "--log-level", "trace"]);
        assert_eq!(cli.storage_dir, Some(PathBuf::from("/tmp/mm")));
        assert_eq!(cli.export_dir, None);
        assert_eq!(cli.log_level.as_deref(), Some("trace"));
    }
}
