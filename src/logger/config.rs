//! Configuration types for the logger
//!
//! Deserialized directly from the `[logger]` section of the settings files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::Level;

use crate::logger::LoggerError;

fn default_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_path() -> PathBuf {
    PathBuf::from("logs/kelurahan.log")
}

fn default_max_size() -> u64 {
    10 * 1024 * 1024
}

fn default_max_files() -> usize {
    5
}

/// Main logger configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerConfig {
    /// Level or full `EnvFilter` directive (e.g. `info,kelurahan=debug`)
    #[serde(default = "default_level")]
    pub level: String,

    #[serde(default)]
    pub console: ConsoleConfig,

    #[serde(default)]
    pub file: FileConfig,
}

impl LoggerConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), LoggerError> {
        self.parse_level()?;
        self.file.validate()?;

        if !self.console.enabled && !self.file.enabled {
            return Err(LoggerError::config(
                "At least one output (console or file) must be enabled",
            ));
        }

        Ok(())
    }

    /// Parse the default level out of the level directive.
    ///
    /// Only the first, target-less directive is checked; per-target directives
    /// are left to `EnvFilter`.
    pub fn parse_level(&self) -> Result<Level, LoggerError> {
        let base = self.level.split(',').next().unwrap_or_default().trim();
        match base.to_lowercase().as_str() {
            "trace" => Ok(Level::TRACE),
            "debug" => Ok(Level::DEBUG),
            "info" => Ok(Level::INFO),
            "warn" => Ok(Level::WARN),
            "error" => Ok(Level::ERROR),
            _ => Err(LoggerError::config(format!(
                "Invalid log level '{}'. Valid levels are: trace, debug, info, warn, error",
                self.level
            ))),
        }
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            console: ConsoleConfig::default(),
            file: FileConfig::default(),
        }
    }
}

/// Console output configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_true")]
    pub colored: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            colored: true,
        }
    }
}

/// File output configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_log_path")]
    pub path: PathBuf,
    #[serde(default = "default_true")]
    pub append: bool,
    #[serde(default)]
    pub format: LogFormat,
    #[serde(default)]
    pub rotation: RotationConfig,
}

impl FileConfig {
    /// Pure check; the writer creates missing directories itself.
    pub fn validate(&self) -> Result<(), LoggerError> {
        if !self.enabled {
            return Ok(());
        }
        if self.path.as_os_str().is_empty() {
            return Err(LoggerError::config(
                "File path cannot be empty when file output is enabled",
            ));
        }
        self.rotation.validate()
    }
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path: default_log_path(),
            append: true,
            format: LogFormat::Json,
            rotation: RotationConfig::default(),
        }
    }
}

/// Log format options
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Full,
    Compact,
    #[default]
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full" => Ok(LogFormat::Full),
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            _ => Err(LoggerError::config(format!(
                "Invalid log format '{}'. Valid formats are: full, compact, json",
                s
            ))),
        }
    }
}

/// Size-based rotation of the log file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationConfig {
    /// Rotate once the active file reaches this many bytes
    #[serde(default = "default_max_size")]
    pub max_size: u64,
    /// Rotated files kept next to the active one
    #[serde(default = "default_max_files")]
    pub max_files: usize,
    /// Gzip rotated files
    #[serde(default)]
    pub compress: bool,
}

impl RotationConfig {
    pub fn validate(&self) -> Result<(), LoggerError> {
        if self.max_size == 0 {
            return Err(LoggerError::config("Maximum file size must be greater than 0"));
        }
        if self.max_files == 0 {
            return Err(LoggerError::config(
                "Maximum number of files must be greater than 0",
            ));
        }
        Ok(())
    }
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            max_size: default_max_size(),
            max_files: default_max_files(),
            compress: false,
        }
    }
}
