//! Node.js detector (package.json)

use super::{probe_upload_dir, read_manifest, Detector, LibraryRule};
use crate::detection::{DetectError, Detection, Language, TracingProtocol};
use crate::fs::{FileSystem, RealFileSystem};
use crate::parsers::PackageJson;
use regex::Regex;
use std::path::Path;
use std::sync::{Arc, OnceLock};
use tracing::debug;

const MANIFEST: &str = "package.json";
const DEFAULT_VERSION: &str = "20";
const DEFAULT_WORKER_COMMAND: &str = "node worker.js";
const METRICS_PORT: u16 = 3000;

const POSTGRES_PACKAGES: &[&str] = &[
    "pg",
    "postgres",
    "postgresql",
    "prisma",
    "@prisma/client",
    "typeorm",
    "sequelize",
    "knex",
];

const REDIS_PACKAGES: &[&str] = &["redis", "ioredis", "@redis/client", "bull", "bullmq"];

const JSON_LOGGERS: &[&str] = &["pino", "bunyan", "roarr", "bole"];
const TEXT_LOGGERS: &[&str] = &["winston", "log4js", "loglevel", "signale"];
const HTTP_LOGGERS: &[&str] = &["morgan", "express-winston"];

const QUEUE_PACKAGES: &[&str] = &["bull", "bullmq", "bee-queue", "agenda", "kue", "pg-boss"];

const WORKER_SCRIPTS: &[&str] = &[
    "worker",
    "start:worker",
    "worker:start",
    "queue",
    "start:queue",
    "queue:start",
    "process",
    "jobs",
];

const UPLOAD_PACKAGES: &[&str] = &[
    "multer",
    "formidable",
    "busboy",
    "express-fileupload",
    "multiparty",
    "connect-multiparty",
];

const UPLOAD_DIRS: &[&str] = &[
    "uploads",
    "upload",
    "files",
    "public/uploads",
    "static/uploads",
    "tmp/uploads",
];

const METRICS_PACKAGES: &[LibraryRule] = &[
    ("prom-client", "prom-client"),
    ("express-prometheus-middleware", "express-prometheus-middleware"),
    ("express-prom-bundle", "express-prom-bundle"),
    ("prometheus-api-metrics", "prometheus-api-metrics"),
    ("@opentelemetry/exporter-prometheus", "opentelemetry-prometheus"),
    ("fastify-metrics", "fastify-metrics"),
    ("koa-prometheus-exporter", "koa-prometheus-exporter"),
    ("nestjs-prometheus", "nestjs-prometheus"),
];

const TRACING_PACKAGES: &[&str] = &[
    "@opentelemetry/api",
    "@opentelemetry/sdk-node",
    "@opentelemetry/sdk-trace-node",
    "@opentelemetry/sdk-trace-base",
    "@opentelemetry/auto-instrumentations-node",
    "@opentelemetry/exporter-trace-otlp-http",
    "@opentelemetry/exporter-trace-otlp-grpc",
    "@opentelemetry/exporter-jaeger",
    "@opentelemetry/exporter-zipkin",
    "jaeger-client",
    "zipkin",
];

fn first_number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+").expect("number regex is valid"))
}

/// Extracts the first run of digits from an `engines.node` constraint.
///
/// `">=18.0.0 <21.0.0"` yields `"18"`.
pub fn parse_version_constraint(constraint: &str) -> Option<String> {
    first_number_re()
        .find(constraint)
        .map(|m| m.as_str().to_string())
}

pub struct NodeDetector {
    fs: Arc<dyn FileSystem>,
}

impl NodeDetector {
    pub fn new() -> Self {
        Self::with_fs(Arc::new(RealFileSystem::new()))
    }

    pub fn with_fs(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    fn detect_services(pkg: &PackageJson, detection: &mut Detection) {
        if POSTGRES_PACKAGES.iter().any(|p| pkg.has_dependency(p)) {
            detection.add_service("postgres");
        }
        if REDIS_PACKAGES.iter().any(|p| pkg.has_dependency(p)) {
            detection.add_service("redis");
        }
    }

    fn detect_logging(pkg: &PackageJson, detection: &mut Detection) {
        for logger in JSON_LOGGERS.iter().filter(|l| pkg.has_dependency(l)) {
            detection.add_json_logger(*logger);
        }
        for logger in TEXT_LOGGERS.iter().filter(|l| pkg.has_dependency(l)) {
            detection.add_text_logger(*logger);
        }
        for logger in HTTP_LOGGERS.iter().filter(|l| pkg.has_dependency(l)) {
            detection.add_logging_library(*logger);
        }
    }

    fn detect_queues(pkg: &PackageJson, detection: &mut Detection) {
        for queue in QUEUE_PACKAGES.iter().filter(|q| pkg.has_dependency(q)) {
            detection.add_queue_library(*queue);
        }

        if detection.needs_worker() {
            detection.worker_command = Self::worker_command(pkg);
        }
    }

    fn worker_command(pkg: &PackageJson) -> String {
        let script = WORKER_SCRIPTS
            .iter()
            .copied()
            .find(|name| pkg.has_script(name))
            .or_else(|| {
                pkg.script_names()
                    .find(|name| name.to_lowercase().contains("worker"))
            });

        match script {
            Some(name) => format!("npm run {}", name),
            None => DEFAULT_WORKER_COMMAND.to_string(),
        }
    }

    fn detect_uploads(&self, root: &Path, pkg: &PackageJson, detection: &mut Detection) {
        for library in UPLOAD_PACKAGES.iter().filter(|l| pkg.has_dependency(l)) {
            detection.add_file_upload_library(*library);
        }

        if detection.needs_file_processor() {
            if let Some(dir) = probe_upload_dir(self.fs.as_ref(), root, UPLOAD_DIRS) {
                detection.upload_path = dir;
            }
        }
    }

    fn detect_metrics(pkg: &PackageJson, detection: &mut Detection) {
        for (package, library) in METRICS_PACKAGES {
            if pkg.has_dependency(package) {
                detection.add_metrics_library(*library);
            }
        }
        detection.enable_metrics(METRICS_PORT);
    }

    fn detect_tracing(pkg: &PackageJson, detection: &mut Detection) {
        for library in TRACING_PACKAGES.iter().filter(|l| pkg.has_dependency(l)) {
            detection.add_tracing_library(*library);
        }

        detection.tracing_protocol = if detection
            .tracing_libraries
            .iter()
            .any(|l| l.starts_with("@opentelemetry/"))
        {
            TracingProtocol::Otlp
        } else if detection.has_tracing_library("jaeger-client") {
            TracingProtocol::Jaeger
        } else if detection.has_tracing_library("zipkin") {
            TracingProtocol::Zipkin
        } else {
            TracingProtocol::None
        };
    }

    fn confidence(pkg: &PackageJson) -> f64 {
        let mut confidence = 0.5;
        if pkg.node_engine.is_some() {
            confidence += 0.3;
        }
        if pkg.name.is_some() {
            confidence += 0.1;
        }
        if !pkg.dependencies.is_empty() {
            confidence += 0.1;
        }
        confidence
    }
}

impl Default for NodeDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for NodeDetector {
    fn name(&self) -> &str {
        Language::Node.as_str()
    }

    fn manifest_files(&self) -> &[&str] {
        &[MANIFEST]
    }

    fn detect(&self, path: &Path) -> Result<Option<Detection>, DetectError> {
        let manifest = path.join(MANIFEST);
        let Some(content) = read_manifest(self.fs.as_ref(), &manifest)? else {
            return Ok(None);
        };

        let pkg = PackageJson::parse(&content).map_err(|source| DetectError::InvalidJson {
            path: manifest.clone(),
            source,
        })?;

        let version = pkg
            .node_engine
            .as_deref()
            .and_then(parse_version_constraint)
            .unwrap_or_else(|| DEFAULT_VERSION.to_string());

        let mut detection =
            Detection::new(Language::Node, version).with_confidence(Self::confidence(&pkg));

        Self::detect_services(&pkg, &mut detection);
        Self::detect_logging(&pkg, &mut detection);
        Self::detect_queues(&pkg, &mut detection);
        self.detect_uploads(path, &pkg, &mut detection);
        Self::detect_metrics(&pkg, &mut detection);
        Self::detect_tracing(&pkg, &mut detection);

        debug!(
            manifest = %manifest.display(),
            version = %detection.version,
            confidence = detection.confidence,
            dependencies = pkg.dependencies.len(),
            "Detected Node.js project"
        );

        Ok(Some(detection))
    }
}
