//! Structured logging setup for devprobe
//!
//! Initializes a `tracing` subscriber that writes to stderr, so stdout only
//! ever carries detection output. Filtering honours `RUST_LOG` on top of the
//! configured level.
//!
//! # Example
//!
//! ```no_run
//! use devprobe::util::logging::{self, LoggingConfig};
//! use devprobe::DevprobeConfig;
//!
//! let config = DevprobeConfig::default().with_log_level("debug");
//! logging::init_logging(LoggingConfig::from(&config));
//!
//! use tracing::{debug, info};
//! info!("Application started");
//! debug!(path = "./service", "Probing project");
//! ```

use crate::config::DevprobeConfig;
use std::io;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Minimum log level to display
    pub level: Level,

    /// Use JSON output format
    pub use_json: bool,

    /// Include the module target (e.g., devprobe::languages) in logs
    pub include_target: bool,

    /// Include file and line number information
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            use_json: false,
            include_target: true,
            include_location: false,
        }
    }
}

impl From<&DevprobeConfig> for LoggingConfig {
    /// An unknown level falls back to info; `validate()` reports it
    fn from(config: &DevprobeConfig) -> Self {
        Self {
            level: parse_level(&config.log_level),
            use_json: config.log_json,
            ..Default::default()
        }
    }
}

/// Parses a log level, case-insensitively
///
/// Returns `Level::INFO` when the string is not a known level.
///
/// ```
/// use devprobe::util::logging::parse_level;
/// use tracing::Level;
///
/// assert_eq!(parse_level("debug"), Level::DEBUG);
/// assert_eq!(parse_level("WARN"), Level::WARN);
/// assert_eq!(parse_level("chatty"), Level::INFO);
/// ```
pub fn parse_level(level_str: &str) -> Level {
    match level_str.trim().to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn crate_directive(level: Level) -> Directive {
    format!("devprobe={}", level)
        .parse()
        .unwrap_or_else(|_| LevelFilter::from_level(level).into())
}

/// Initializes the logging system; later calls are ignored
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = EnvFilter::builder()
            .with_default_directive(LevelFilter::WARN.into())
            .from_env_lossy()
            .add_directive(crate_directive(config.level));

        let layer = fmt::layer()
            .with_writer(io::stderr)
            .with_target(config.include_target)
            .with_file(config.include_location)
            .with_line_number(config.include_location);

        if config.use_json {
            tracing_subscriber::registry()
                .with(filter)
                .with(layer.json())
                .init();
        } else {
            tracing_subscriber::registry().with(filter).with(layer).init();
        }
    });
}
