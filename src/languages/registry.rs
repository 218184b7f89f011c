use super::{Detector, GoDetector, NodeDetector, PythonDetector, RustDetector};
use crate::config::DevprobeConfig;
use crate::detection::Detection;
use crate::fs::{FileSystem, RealFileSystem};
use std::cmp::Ordering;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Clone)]
pub struct DetectorRegistry {
    detectors: Vec<Arc<dyn Detector>>,
}

impl DetectorRegistry {
    pub fn new() -> Self {
        Self {
            detectors: Vec::new(),
        }
    }

    /// Node, Go, Python and Rust detectors on the real filesystem
    pub fn with_defaults() -> Self {
        Self::with_fs(Arc::new(RealFileSystem::new()))
    }

    /// Default detectors sharing the given filesystem
    pub fn with_fs(fs: Arc<dyn FileSystem>) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(NodeDetector::with_fs(fs.clone())));
        registry.register(Arc::new(GoDetector::with_fs(fs.clone())));
        registry.register(Arc::new(PythonDetector::with_fs(fs.clone())));
        registry.register(Arc::new(RustDetector::with_fs(fs)));
        registry
    }

    /// Default detectors restricted to the ones enabled in `config`
    pub fn from_config(config: &DevprobeConfig) -> Self {
        let mut registry = Self::with_defaults();
        registry
            .detectors
            .retain(|d| config.is_detector_enabled(d.name()));
        registry
    }

    pub fn register(&mut self, detector: Arc<dyn Detector>) {
        self.detectors.push(detector);
    }

    /// Runs every detector and returns the matches, most confident first.
    ///
    /// Detector errors are logged and dropped. Ties keep registration order.
    pub fn detect_all(&self, path: &Path) -> Vec<Detection> {
        let mut detections = Vec::new();

        for detector in &self.detectors {
            match detector.detect(path) {
                Ok(Some(detection)) => detections.push(detection),
                Ok(None) => {
                    debug!(detector = detector.name(), path = %path.display(), "Not applicable");
                }
                Err(e) => {
                    warn!(detector = detector.name(), error = %e, "Detector failed, skipping");
                }
            }
        }

        detections.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(Ordering::Equal)
        });

        detections
    }

    /// Highest-confidence detection, if any detector matched
    pub fn detect_primary(&self, path: &Path) -> Option<Detection> {
        self.detect_all(path).into_iter().next()
    }

    pub fn get(&self, name: &str) -> Option<&dyn Detector> {
        self.detectors
            .iter()
            .find(|d| d.name().eq_ignore_ascii_case(name))
            .map(|d| d.as_ref())
    }

    pub fn detector_names(&self) -> Vec<&str> {
        self.detectors.iter().map(|d| d.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.detectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detectors.is_empty()
    }
}

impl Default for DetectorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
