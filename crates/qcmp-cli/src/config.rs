//! Configuration management for the qcmp CLI.
//!
//! Values come from, highest precedence first:
//! 1. Command-line flags
//! 2. Environment variables (with `QCMP_` prefix)
//! 3. Configuration file (YAML)
//! 4. Default values

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use qcmp_compile::PRESET_NAMES;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file: {0}")]
    IoError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Device preset used when no device file is given
    #[serde(default = "default_device")]
    pub device: String,

    /// Device description file, takes precedence over `device`
    #[serde(default)]
    pub device_file: Option<PathBuf>,

    /// Decomposer optimization level (0-3)
    #[serde(default = "default_optimization_level")]
    pub optimization_level: u8,

    /// Check operator equivalence after decomposition
    #[serde(default)]
    pub verify: bool,
}

fn default_device() -> String {
    "heavy_hex_16".to_string()
}

fn default_optimization_level() -> u8 {
    3
}

impl Default for Config {
    fn default() -> Self {
        Config {
            device: default_device(),
            device_file: None,
            optimization_level: default_optimization_level(),
            verify: false,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(format!("{}: {e}", path.as_ref().display())))?;

        let config: Config = serde_yaml_ng::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Load the file (or defaults) and apply environment overrides.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Config::default(),
        };
        let config = config.merge_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Override fields from `QCMP_*` variables, read through `lookup`.
    ///
    /// Variables that are absent leave the fields unchanged.
    pub fn merge_env(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(v) = lookup("QCMP_DEVICE") {
            self.device = v;
            self.device_file = None;
        }
        if let Some(v) = lookup("QCMP_DEVICE_FILE") {
            self.device_file = Some(PathBuf::from(v));
        }
        if let Some(v) = lookup("QCMP_OPT_LEVEL") {
            self.optimization_level = v.parse().map_err(|_| {
                ConfigError::ValidationError(format!("QCMP_OPT_LEVEL is not a level: {v}"))
            })?;
        }
        if let Some(v) = lookup("QCMP_VERIFY") {
            self.verify = matches!(v.to_lowercase().as_str(), "1" | "true" | "yes" | "on");
        }
        Ok(self)
    }

    /// Apply command-line flags on top of this configuration.
    #[must_use]
    pub fn with_flags(
        mut self,
        device: Option<String>,
        device_file: Option<PathBuf>,
        optimization_level: Option<u8>,
        verify: bool,
    ) -> Self {
        if let Some(device) = device {
            self.device = device;
            self.device_file = None;
        }
        if device_file.is_some() {
            self.device_file = device_file;
        }
        if let Some(level) = optimization_level {
            self.optimization_level = level;
        }
        self.verify |= verify;
        self
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.optimization_level > 3 {
            return Err(ConfigError::ValidationError(format!(
                "optimization_level must be 0-3, got {}",
                self.optimization_level
            )));
        }

        if self.device_file.is_none() && !PRESET_NAMES.contains(&self.device.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "Unknown device: '{}'. Available: {}",
                self.device,
                PRESET_NAMES.join(", ")
            )));
        }

        Ok(())
    }
}
