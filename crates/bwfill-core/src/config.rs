//! # Configuration System
//!
//! Provides YAML-based configuration for bandwidth-fill applications:
//!
//! - Repeater settings (input/output bandwidth, sample rate, normalization)
//! - Logging configuration
//!
//! ## Configuration Search Path
//!
//! Configuration is loaded from the first file found:
//! 1. Path specified via `BWFILL_CONFIG` environment variable
//! 2. `./bwfill.yaml` (current directory)
//! 3. `~/.config/bwfill/config.yaml` (user config)
//! 4. `/etc/bwfill/config.yaml` (system config)
//!
//! ## Example Configuration
//!
//! ```yaml
//! repeater:
//!   input_bandwidth: 12000.0
//!   output_bandwidth: 20000000.0
//!   sample_rate: 1.0
//!   normalize: false
//!
//! logging:
//!   level: info
//!   format: compact
//! ```

use crate::observe::LogConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Error type for configuration operations.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Configuration file not found
    NotFound(String),
    /// Failed to read configuration file
    ReadError(String),
    /// Failed to parse configuration
    ParseError(String),
    /// Invalid configuration value
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NotFound(msg) => write!(f, "config not found: {}", msg),
            ConfigError::ReadError(msg) => write!(f, "failed to read config: {}", msg),
            ConfigError::ParseError(msg) => write!(f, "failed to parse config: {}", msg),
            ConfigError::ValidationError(msg) => write!(f, "invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Spectral repeater configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RepeaterConfig {
    /// Bandwidth of the input signal in Hz
    pub input_bandwidth: f64,
    /// Target output bandwidth in Hz
    pub output_bandwidth: f64,
    /// Sample rate in Hz
    pub sample_rate: f64,
    /// Divide the summed output by the copy count
    pub normalize: bool,
}

impl Default for RepeaterConfig {
    fn default() -> Self {
        Self {
            input_bandwidth: 12e3,
            output_bandwidth: 20e6,
            sample_rate: 1.0,
            normalize: false,
        }
    }
}

/// Complete bandwidth-fill configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FillConfig {
    /// Configuration version
    pub version: String,
    /// Repeater configuration
    pub repeater: RepeaterConfig,
    /// Logging configuration
    pub logging: LogConfig,
}

impl Default for FillConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            repeater: RepeaterConfig::default(),
            logging: LogConfig::default(),
        }
    }
}

impl FillConfig {
    /// Load configuration from the default search path.
    ///
    /// Search order:
    /// 1. `BWFILL_CONFIG` environment variable
    /// 2. `./bwfill.yaml`
    /// 3. `~/.config/bwfill/config.yaml`
    /// 4. `/etc/bwfill/config.yaml`
    ///
    /// Returns default config if no file is found.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = std::env::var("BWFILL_CONFIG") {
            if Path::new(&path).exists() {
                return Self::load_from(Path::new(&path));
            }
        }

        for path in Self::config_search_paths() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(format!("{}: {}", path.display(), e)))?;

        Self::parse(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content =
            serde_yaml::to_string(self).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        std::fs::write(path, content)
            .map_err(|e| ConfigError::ReadError(format!("{}: {}", path.display(), e)))
    }

    /// Get configuration search paths.
    pub fn config_search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("./bwfill.yaml")];

        if let Some(config_dir) = directories::ProjectDirs::from("", "", "bwfill") {
            paths.push(config_dir.config_dir().join("config.yaml"));
        }

        paths.push(PathBuf::from("/etc/bwfill/config.yaml"));

        paths
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.repeater.input_bandwidth > 0.0) || !self.repeater.input_bandwidth.is_finite() {
            return Err(ConfigError::ValidationError(
                "input_bandwidth must be positive".to_string(),
            ));
        }
        if !(self.repeater.output_bandwidth > 0.0) || !self.repeater.output_bandwidth.is_finite() {
            return Err(ConfigError::ValidationError(
                "output_bandwidth must be positive".to_string(),
            ));
        }
        if !(self.repeater.sample_rate > 0.0) || !self.repeater.sample_rate.is_finite() {
            return Err(ConfigError::ValidationError(
                "sample_rate must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Generate example configuration YAML.
    pub fn example_yaml() -> String {
        serde_yaml::to_string(&Self::default()).unwrap_or_default()
    }
}
