//! Configuration and cache directory paths
//!
//! Uses XDG directories via `dirs` crate.
//!
//! Platform-specific locations:
//! - Linux: `~/.config/pr-review/`, `~/.cache/pr-review/`
//! - macOS: `~/Library/Application Support/pr-review/`, `~/Library/Caches/pr-review/`
//! - Windows: `%APPDATA%\pr-review\`, `%LOCALAPPDATA%\pr-review\`

use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_NAME: &str = "pr-review";

/// Get the application config directory
pub fn config_dir() -> Result<PathBuf> {
    let base = dirs::config_dir().context("Could not determine config directory")?;
    Ok(base.join(APP_NAME))
}

/// Get the application cache directory and ensure it exists
pub fn cache_dir() -> Result<PathBuf> {
    let base = dirs::cache_dir().context("Could not determine cache directory")?;
    let dir = base.join(APP_NAME);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create cache directory {}", dir.display()))?;
    Ok(dir)
}

/// Get path to app config file
pub fn app_config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}
