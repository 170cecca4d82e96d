//! Configuration file support for swatch
//!
//! Reads from .swatch/config.toml

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration structure
#[derive(Debug, Deserialize, Serialize, Default, Clone)]
pub struct Config {
    /// Asset generation settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Usage analysis settings
    #[serde(default)]
    pub analyze: AnalyzeConfig,
}

/// Export-related configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ExportConfig {
    /// Skip tokens whose name starts with '#'
    /// Those are working annotations from the design tool, not real tokens.
    /// Default: false
    #[serde(default)]
    pub exclude_hash_prefixed: bool,

    /// Skip tokens whose name ends with "hover"
    /// Default: false
    #[serde(default)]
    pub exclude_hover_suffixed: bool,

    /// Name of the generated constants namespace
    /// Default: "DesignToken"
    #[serde(default = "default_namespace")]
    pub constant_namespace: String,
}

fn default_namespace() -> String {
    "DesignToken".to_string()
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            exclude_hash_prefixed: false,
            exclude_hover_suffixed: false,
            constant_namespace: default_namespace(),
        }
    }
}

/// Usage-analysis configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AnalyzeConfig {
    /// File extensions to scan for token usages
    /// Default: ["swift"]
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

fn default_extensions() -> Vec<String> {
    vec!["swift".to_string()]
}

impl Default for AnalyzeConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
        }
    }
}

impl Config {
    /// Load config from .swatch/config.toml
    /// Returns default config if file doesn't exist
    pub fn load() -> Self {
        if let Some(path) = Self::find_config_path() {
            if let Ok(contents) = std::fs::read_to_string(&path) {
                if let Ok(config) = toml::from_str(&contents) {
                    return config;
                }
            }
        }
        Self::default()
    }

    /// Find config.toml next to the tool state: SWATCH_DIR when set,
    /// otherwise by walking up the directory tree
    fn find_config_path() -> Option<PathBuf> {
        if let Ok(dir) = std::env::var("SWATCH_DIR") {
            let config_path = PathBuf::from(dir).join("config.toml");
            return config_path.exists().then_some(config_path);
        }

        let current_dir = std::env::current_dir().ok()?;
        let mut dir = current_dir.as_path();

        loop {
            let config_path = dir.join(".swatch").join("config.toml");
            if config_path.exists() {
                return Some(config_path);
            }

            match dir.parent() {
                Some(parent) => dir = parent,
                None => break,
            }
        }
        None
    }

    /// Check whether a token name passes the export filters
    pub fn export_allows(&self, name: &str) -> bool {
        if self.export.exclude_hash_prefixed && name.starts_with('#') {
            return false;
        }
        if self.export.exclude_hover_suffixed && name.to_lowercase().ends_with("hover") {
            return false;
        }
        true
    }
}
