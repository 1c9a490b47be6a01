//! Configuration for pr-review
//!
//! This crate provides:
//! - Directory paths for config and cache files
//! - Configuration file lookup (TOML)
//! - Review configuration (ReviewConfig)

pub mod config_file;
pub mod paths;
pub mod review_config;

pub use config_file::load_config_file;
pub use paths::{cache_dir, config_dir};
pub use review_config::{FileListLayout, ReviewConfig};
