//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/refrain/config.toml, or a path given on the
//!    command line)
//!
//! Command-line flags such as `--data-file` are applied on top by the CLI.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the library file inside `data_dir`
pub const DATA_FILE_NAME: &str = "affirmation_data.json";

/// History entries shown when no count is given
pub const DEFAULT_HISTORY_COUNT: usize = 10;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Directory holding the library file
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Explicit library file path (overrides data_dir)
    #[serde(default)]
    pub data_file: Option<PathBuf>,

    /// Default number of history entries to show
    #[serde(default = "default_history_count")]
    pub history_count: usize,

    /// Insert the built-in collection when the library is opened
    #[serde(default = "default_seed")]
    pub seed: bool,

    /// Log file (logs go to stderr when unset)
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            data_file: None,
            history_count: DEFAULT_HISTORY_COUNT,
            seed: true,
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration, preferring a path given on the command line
    pub fn load_with_cli_override(config_path: Option<&PathBuf>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_path(path),
            None => Self::load(),
        }
    }

    /// Load configuration from a specific path
    ///
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        toml::from_str(toml_content).context("Failed to parse config TOML")
    }

    /// Save configuration to a specific path
    pub fn save_to_path(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;
        Ok(())
    }

    /// Get the default config file path
    pub fn config_file_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("refrain")
            .join("config.toml")
    }

    /// Get the path to the library file
    pub fn data_path(&self) -> PathBuf {
        self.data_file
            .clone()
            .unwrap_or_else(|| self.data_dir.join(DATA_FILE_NAME))
    }
}

/// Get the default data directory
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("refrain")
}

fn default_history_count() -> usize {
    DEFAULT_HISTORY_COUNT
}

fn default_seed() -> bool {
    true
}
