//! Rust detector (Cargo.toml)

use super::{probe_upload_dir, read_manifest, Detector};
use crate::detection::{DetectError, Detection, Language, TracingProtocol, MULTIPART_SENTINEL};
use crate::fs::{FileSystem, RealFileSystem};
use crate::parsers::CargoManifest;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

const MANIFEST: &str = "Cargo.toml";
const DEFAULT_VERSION: &str = "1.75";
const DEFAULT_BINARY: &str = "app";
const METRICS_PORT: u16 = 9000;

const EDITION_VERSIONS: &[(&str, &str)] = &[
    ("2024", "1.85"),
    ("2021", "1.75"),
    ("2018", "1.31"),
    ("2015", "1.0"),
];

const POSTGRES_CRATES: &[&str] = &[
    "sqlx",
    "diesel",
    "tokio-postgres",
    "postgres",
    "deadpool-postgres",
    "sea-orm",
    "cornucopia",
];

const REDIS_CRATES: &[&str] = &["redis", "deadpool-redis", "fred", "bb8-redis"];

/// Text loggers, with the facade crate each one needs alongside it
const TEXT_LOGGERS: &[(&str, Option<&str>)] = &[
    ("env_logger", Some("log")),
    ("log4rs", None),
    ("fern", None),
    ("flexi_logger", None),
    ("pretty_env_logger", None),
    ("simplelog", None),
];

const QUEUE_CRATES: &[&str] = &["sidekiq", "apalis", "lapin", "faktory", "fang"];

const UPLOAD_CRATES: &[&str] = &["actix-multipart", "multer"];
const WEB_FRAMEWORKS: &[&str] = &["actix-web", "axum", "rocket"];

const UPLOAD_DIRS: &[&str] = &[
    "uploads",
    "upload",
    "files",
    "static/uploads",
    "public/uploads",
    "assets/uploads",
];

const METRICS_CRATES: &[&str] = &[
    "prometheus",
    "metrics-exporter-prometheus",
    "axum-prometheus",
    "actix-web-prom",
    "opentelemetry-prometheus",
    "autometrics",
];

const TRACING_CRATES: &[&str] = &[
    "opentelemetry",
    "opentelemetry_sdk",
    "opentelemetry-otlp",
    "opentelemetry-jaeger",
    "opentelemetry-zipkin",
    "tracing-opentelemetry",
];

/// Crates that speak OTLP regardless of which exporters sit next to them
const GENERIC_OTEL_CRATES: &[&str] = &["opentelemetry", "opentelemetry_sdk", "opentelemetry-otlp"];

/// Maps an edition to the first toolchain that supports it
pub fn edition_version(edition: &str) -> Option<&'static str> {
    EDITION_VERSIONS
        .iter()
        .find(|(e, _)| *e == edition)
        .map(|(_, version)| *version)
}

pub struct RustDetector {
    fs: Arc<dyn FileSystem>,
}

impl RustDetector {
    pub fn new() -> Self {
        Self::with_fs(Arc::new(RealFileSystem::new()))
    }

    pub fn with_fs(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    fn version(manifest: &CargoManifest) -> String {
        manifest
            .rust_version
            .clone()
            .or_else(|| {
                manifest
                    .edition
                    .as_deref()
                    .and_then(edition_version)
                    .map(String::from)
            })
            .unwrap_or_else(|| DEFAULT_VERSION.to_string())
    }

    fn detect_services(manifest: &CargoManifest, detection: &mut Detection) {
        if POSTGRES_CRATES.iter().any(|c| manifest.has_dependency(c)) {
            detection.add_service("postgres");
        }
        if REDIS_CRATES.iter().any(|c| manifest.has_dependency(c)) {
            detection.add_service("redis");
        }
    }

    fn detect_logging(manifest: &CargoManifest, detection: &mut Detection) {
        let has_tracing = manifest.has_dependency("tracing");
        let has_subscriber = manifest.has_dependency("tracing-subscriber");

        if has_tracing && has_subscriber {
            detection.add_json_logger("tracing");
        }
        if manifest.has_dependency("slog-json") {
            detection.add_json_logger("slog");
        }

        for (logger, facade) in TEXT_LOGGERS {
            let paired = facade.map_or(true, |f| manifest.has_dependency(f));
            if paired && manifest.has_dependency(logger) {
                detection.add_text_logger(*logger);
            }
        }
        if has_tracing && !has_subscriber {
            detection.add_text_logger("tracing");
        }
    }

    fn detect_queues(manifest: &CargoManifest, detection: &mut Detection) {
        for queue in QUEUE_CRATES.iter().filter(|q| manifest.has_dependency(q)) {
            detection.add_queue_library(*queue);
        }

        if detection.needs_worker() {
            let binary = manifest.name.as_deref().unwrap_or(DEFAULT_BINARY);
            detection.worker_command = format!("./{} worker", binary);
        }
    }

    fn detect_uploads(&self, root: &Path, manifest: &CargoManifest, detection: &mut Detection) {
        for library in UPLOAD_CRATES.iter().filter(|l| manifest.has_dependency(l)) {
            detection.add_file_upload_library(*library);
        }

        let has_explicit = detection.needs_file_processor();
        let has_framework = WEB_FRAMEWORKS.iter().any(|f| manifest.has_dependency(f));
        if !has_explicit && !has_framework {
            return;
        }

        if let Some(dir) = probe_upload_dir(self.fs.as_ref(), root, UPLOAD_DIRS) {
            detection.upload_path = dir;
            if !has_explicit {
                detection.add_file_upload_library(MULTIPART_SENTINEL);
            }
        }
    }

    fn detect_metrics(manifest: &CargoManifest, detection: &mut Detection) {
        for library in METRICS_CRATES.iter().filter(|l| manifest.has_dependency(l)) {
            detection.add_metrics_library(*library);
        }
        detection.enable_metrics(METRICS_PORT);
    }

    fn detect_tracing(manifest: &CargoManifest, detection: &mut Detection) {
        for library in TRACING_CRATES.iter().filter(|l| manifest.has_dependency(l)) {
            detection.add_tracing_library(*library);
        }

        detection.tracing_protocol = if GENERIC_OTEL_CRATES
            .iter()
            .any(|c| detection.has_tracing_library(c))
        {
            TracingProtocol::Otlp
        } else if detection.has_tracing_library("opentelemetry-zipkin") {
            TracingProtocol::Zipkin
        } else if detection.has_tracing_library("opentelemetry-jaeger") {
            TracingProtocol::Jaeger
        } else if detection.has_tracing_library("tracing-opentelemetry") {
            TracingProtocol::Otlp
        } else {
            TracingProtocol::None
        };
    }

    fn confidence(manifest: &CargoManifest) -> f64 {
        let mut confidence = 0.7;
        if manifest.name.is_some() {
            confidence += 0.1;
        }
        if manifest.edition.is_some() {
            confidence += 0.1;
        }
        if !manifest.dependencies.is_empty() {
            confidence += 0.1;
        }
        confidence
    }
}

impl Default for RustDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for RustDetector {
    fn name(&self) -> &str {
        Language::Rust.as_str()
    }

    fn manifest_files(&self) -> &[&str] {
        &[MANIFEST]
    }

    fn detect(&self, path: &Path) -> Result<Option<Detection>, DetectError> {
        let manifest_path = path.join(MANIFEST);
        let Some(content) = read_manifest(self.fs.as_ref(), &manifest_path)? else {
            return Ok(None);
        };

        let manifest =
            CargoManifest::parse(&content).map_err(|source| DetectError::InvalidToml {
                path: manifest_path.clone(),
                source,
            })?;

        let mut detection = Detection::new(Language::Rust, Self::version(&manifest))
            .with_confidence(Self::confidence(&manifest));

        Self::detect_services(&manifest, &mut detection);
        Self::detect_logging(&manifest, &mut detection);
        Self::detect_queues(&manifest, &mut detection);
        self.detect_uploads(path, &manifest, &mut detection);
        Self::detect_metrics(&manifest, &mut detection);
        Self::detect_tracing(&manifest, &mut detection);

        debug!(
            manifest = %manifest_path.display(),
            package = manifest.name.as_deref().unwrap_or(""),
            version = %detection.version,
            confidence = detection.confidence,
            "Detected Rust project"
        );

        Ok(Some(detection))
    }
}
