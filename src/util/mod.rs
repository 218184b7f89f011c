//! Utility modules for devprobe

pub mod logging;

pub use logging::{init_logging, LoggingConfig};
