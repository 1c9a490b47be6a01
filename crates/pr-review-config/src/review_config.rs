//! Review configuration
//!
//! Configuration loaded from `.pr-review.toml`.

use serde::{Deserialize, Serialize};

/// How changed files are arranged in the tree view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileListLayout {
    /// One entry per file, in the order the pull request lists them.
    #[default]
    Flat,
    /// Files grouped under their directories.
    Tree,
}

/// Review configuration loaded from `.pr-review.toml`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ReviewConfig {
    /// Arrangement of changed files
    #[serde(default)]
    pub file_list_layout: FileListLayout,

    /// Keep focus in the tree when a file is opened from it
    #[serde(default = "default_preserve_focus")]
    pub preserve_focus: bool,

    /// Render binary image files as inline previews
    #[serde(default = "default_image_preview")]
    pub image_preview: bool,
}

fn default_preserve_focus() -> bool {
    true
}

fn default_image_preview() -> bool {
    true
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            file_list_layout: FileListLayout::default(),
            preserve_focus: default_preserve_focus(),
            image_preview: default_image_preview(),
        }
    }
}

impl ReviewConfig {
    /// Load config from CWD first, then home and config directories, or use defaults
    pub fn load() -> Self {
        match crate::load_config_file() {
            Some(content) => Self::from_toml_or_default(&content),
            None => {
                log::debug!("Using default review config");
                Self::default()
            }
        }
    }

    /// Parse config content, falling back to defaults if it is invalid
    pub fn from_toml_or_default(content: &str) -> Self {
        match toml::from_str(content) {
            Ok(config) => {
                log::info!("Loaded review config from file");
                config
            }
            Err(e) => {
                log::warn!("Failed to parse config file: {}", e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ReviewConfig::default();
        assert_eq!(config.file_list_layout, FileListLayout::Flat);
        assert!(config.preserve_focus);
        assert!(config.image_preview);
    }

    #[test]
    fn test_config_deserialize() {
        let toml = r#"
            file_list_layout = "tree"
            preserve_focus = false
        "#;
        let config: ReviewConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.file_list_layout, FileListLayout::Tree);
        assert!(!config.preserve_focus);
        // image_preview should use default
        assert!(config.image_preview);
    }

    #[test]
    fn test_config_deserialize_empty() {
        let config: ReviewConfig = toml::from_str("").unwrap();
        assert_eq!(config, ReviewConfig::default());
    }

    #[test]
    fn test_invalid_config_falls_back_to_default() {
        let config = ReviewConfig::from_toml_or_default("file_list_layout = \"spiral\"");
        assert_eq!(config, ReviewConfig::default());

        let config = ReviewConfig::from_toml_or_default("image_preview = false");
        assert!(!config.image_preview);
    }
}
