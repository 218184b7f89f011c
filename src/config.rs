//! Configuration management for devprobe
//!
//! Settings are loaded from environment variables with defaults. Command-line
//! flags override whatever the environment provides.
//!
//! # Environment Variables
//!
//! - `DEVPROBE_LOG_LEVEL`: Logging level - default: "info"
//! - `DEVPROBE_LOG_JSON`: Emit JSON logs (true|false) - default: "false"
//! - `DEVPROBE_DETECTORS`: Comma-separated detectors to run - default: all
//!
//! # Example
//!
//! ```no_run
//! use devprobe::DevprobeConfig;
//!
//! let config = DevprobeConfig::default();
//! config.validate().expect("Invalid configuration");
//! ```

use crate::detection::Language;
use std::env;
use std::fmt;
use thiserror::Error;

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_LOG_JSON: bool = false;
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

pub const ENV_LOG_LEVEL: &str = "DEVPROBE_LOG_LEVEL";
pub const ENV_LOG_JSON: &str = "DEVPROBE_LOG_JSON";
pub const ENV_DETECTORS: &str = "DEVPROBE_DETECTORS";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Valid options: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Unknown detector: {0}. Valid options: node, go, python, rust")]
    UnknownDetector(String),

    #[error("No detectors enabled")]
    NoDetectors,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DevprobeConfig {
    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Emit logs as JSON lines
    pub log_json: bool,

    /// Detector names to run, in lower case
    pub detectors: Vec<String>,
}

impl Default for DevprobeConfig {
    /// Loads `DEVPROBE_*` variables, falling back to defaults for anything unset
    fn default() -> Self {
        let log_level = env::var(ENV_LOG_LEVEL)
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        let log_json = env::var(ENV_LOG_JSON)
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(DEFAULT_LOG_JSON);

        let detectors = env::var(ENV_DETECTORS)
            .ok()
            .map(|v| parse_detector_list(&v))
            .filter(|list| !list.is_empty())
            .unwrap_or_else(all_detectors);

        Self {
            log_level,
            log_json,
            detectors,
        }
    }
}

impl DevprobeConfig {
    /// Replaces the detector list with a comma-separated selection
    pub fn with_detectors(mut self, list: &str) -> Self {
        self.detectors = parse_detector_list(list);
        self
    }

    pub fn with_log_level(mut self, level: &str) -> Self {
        self.log_level = level.to_lowercase();
        self
    }

    pub fn is_detector_enabled(&self, name: &str) -> bool {
        self.detectors.iter().any(|d| d.eq_ignore_ascii_case(name))
    }

    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for an unknown log level, an unknown detector
    /// name, or an empty detector list.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(self.log_level.clone()));
        }

        if self.detectors.is_empty() {
            return Err(ConfigError::NoDetectors);
        }

        if let Some(unknown) = self
            .detectors
            .iter()
            .find(|d| Language::from_name(d).is_none())
        {
            return Err(ConfigError::UnknownDetector(unknown.clone()));
        }

        Ok(())
    }
}

impl fmt::Display for DevprobeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Devprobe Configuration:")?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        writeln!(f, "  Log JSON: {}", self.log_json)?;
        writeln!(f, "  Detectors: {}", self.detectors.join(", "))?;
        Ok(())
    }
}

fn all_detectors() -> Vec<String> {
    Language::all().iter().map(|l| l.as_str().to_string()).collect()
}

fn parse_detector_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(|name| name.trim().to_lowercase())
        .filter(|name| !name.is_empty())
        .collect()
}
