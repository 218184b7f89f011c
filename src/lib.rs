//! devprobe - heuristic project detection
//!
//! Inspects a project directory, reads its ecosystem manifest, and reports
//! what the project needs at runtime: language version, backing services,
//! and the logging, queue, upload, metrics and tracing libraries it uses.
//!
//! # Core Concepts
//!
//! - **Detector**: One per ecosystem (Node, Go, Python, Rust). Reads its
//!   manifest and returns a [`Detection`], `None` when the manifest is absent.
//! - **Registry**: Runs every detector and ranks the matches by confidence.
//! - **Detection**: Flat record of everything found, with derived helpers such
//!   as [`Detection::needs_worker`] and [`Detection::metrics_port`].
//!
//! # Example Usage
//!
//! ```no_run
//! use devprobe::DetectorRegistry;
//! use std::path::Path;
//!
//! let registry = DetectorRegistry::with_defaults();
//! if let Some(detection) = registry.detect_primary(Path::new("./service")) {
//!     println!("{} {}", detection.language, detection.version);
//!     if detection.needs_worker() {
//!         println!("worker: {}", detection.worker_command);
//!     }
//! }
//! ```
//!
//! # Project Structure
//!
//! - [`detection`]: Detection record and error types
//! - [`languages`]: Ecosystem detectors and the registry
//! - [`parsers`]: Manifest parsers
//! - [`fs`]: Filesystem abstraction with real and in-memory implementations

pub mod cli;
pub mod config;
pub mod detection;
pub mod fs;
pub mod languages;
pub mod parsers;
pub mod util;

pub use config::{ConfigError, DevprobeConfig};
pub use detection::{DetectError, Detection, Language, LogFormat, TracingProtocol};
pub use languages::{
    Detector, DetectorRegistry, GoDetector, NodeDetector, PythonDetector, RustDetector,
};
pub use util::{init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_name_is_devprobe() {
        assert_eq!(NAME, "devprobe");
    }
}
