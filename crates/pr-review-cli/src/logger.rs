//! Logging using simplelog
//!
//! Log lines go to stderr so they never mix with the JSON printed on stdout.
//! With `--log-file` a timestamped copy is also written to the cache
//! directory (~/.cache/pr-review/ on Linux).

use anyhow::{Context, Result};
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};
use std::fs::File;
use std::path::PathBuf;

fn level_from_env() -> LevelFilter {
    std::env::var("RUST_LOG")
        .map(|v| match v.to_lowercase().as_str() {
            "error" => LevelFilter::Error,
            "warn" => LevelFilter::Warn,
            "info" => LevelFilter::Info,
            "debug" => LevelFilter::Debug,
            "trace" => LevelFilter::Trace,
            "off" => LevelFilter::Off,
            _ => LevelFilter::Warn,
        })
        .unwrap_or(LevelFilter::Warn)
}

fn log_file_path() -> Result<PathBuf> {
    let timestamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
    Ok(pr_review_config::cache_dir()?.join(format!("pr-review-{}.log", timestamp)))
}

/// Initialize logging.
///
/// Returns the path of the log file when one was requested.
pub fn init(log_file: bool) -> Result<Option<PathBuf>> {
    let level = level_from_env();

    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_time_offset_to_local()
        .unwrap_or_else(|c| c) // Fallback if local time offset fails
        .build();

    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    loggers.push(TermLogger::new(
        level,
        config.clone(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ));

    let path = if log_file {
        let path = log_file_path()?;
        let file = File::create(&path)
            .with_context(|| format!("Failed to create log file {}", path.display()))?;
        // The file always gets debug output, whatever the terminal shows
        loggers.push(WriteLogger::new(level.max(LevelFilter::Debug), config, file));
        Some(path)
    } else {
        None
    };

    CombinedLogger::init(loggers).context("Failed to initialize logger")?;
    Ok(path)
}
