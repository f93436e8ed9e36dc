//! Configuration management for Faraday
//!
//! This module handles loading, validation, and management of the application
//! configuration from YAML files.

use crate::error::{FaradayError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Dataset file configuration
    #[serde(default)]
    pub dataset: DatasetConfig,

    /// Data-entry behavior configuration
    #[serde(default)]
    pub entry: EntryConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Dataset file configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Path to the JSON dataset file
    pub file: String,
}

/// Data-entry behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryConfig {
    /// Earliest accepted release year
    pub min_release_year: u16,

    /// Minimum number of points for a hand-entered charging curve
    pub min_curve_points: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    pub level: String,

    /// Path to log file (or log directory)
    pub file: String,

    /// Number of rotated files to keep
    pub backup_count: u32,

    /// Whether to log to the console (stderr)
    pub console_output: bool,

    /// Whether to use JSON format
    pub json_format: bool,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            file: "data/ev-data.json".to_string(),
        }
    }
}

impl Default for EntryConfig {
    fn default() -> Self {
        Self {
            min_release_year: 2010,
            min_curve_points: 3,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "INFO".to_string(),
            file: "/tmp/faraday.log".to_string(),
            backup_count: 5,
            console_output: false,
            json_format: false,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from the default locations
    pub fn load() -> Result<Self> {
        let default_paths = ["faraday_config.yaml", "/etc/faraday/config.yaml"];

        for path in &default_paths {
            if Path::new(path).exists() {
                return Self::from_file(path);
            }
        }

        // Fall back to default configuration
        Ok(Config::default())
    }

    /// Save configuration to a YAML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.dataset.file.is_empty() {
            return Err(FaradayError::validation(
                "dataset.file",
                "Dataset file path cannot be empty",
            ));
        }

        if self.entry.min_curve_points < 2 {
            return Err(FaradayError::validation(
                "entry.min_curve_points",
                "A curve needs at least its 0% and 100% endpoints",
            ));
        }

        if self.entry.min_release_year < 1990 {
            return Err(FaradayError::validation(
                "entry.min_release_year",
                "Minimum release year is implausibly early",
            ));
        }

        Ok(())
    }
}
