//! Go detector (go.mod)

use super::{probe_upload_dir, read_manifest, Detector, LibraryRule};
use crate::detection::{DetectError, Detection, Language, TracingProtocol, MULTIPART_SENTINEL};
use crate::fs::{FileSystem, RealFileSystem};
use crate::parsers::GoModule;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

const MANIFEST: &str = "go.mod";
const DEFAULT_VERSION: &str = "1.21";
const DEFAULT_BINARY: &str = "app";
const METRICS_PORT: u16 = 2112;

const POSTGRES_PREFIXES: &[&str] = &[
    "github.com/jackc/pgx",
    "github.com/lib/pq",
    "gorm.io/driver/postgres",
    "github.com/go-pg/pg",
    "entgo.io/ent",
];

const REDIS_PREFIXES: &[&str] = &[
    "github.com/redis/go-redis",
    "github.com/go-redis/redis",
    "github.com/gomodule/redigo",
];

const JSON_LOGGERS: &[LibraryRule] = &[
    ("go.uber.org/zap", "zap"),
    ("github.com/rs/zerolog", "zerolog"),
    ("log/slog", "slog"),
    ("golang.org/x/exp/slog", "slog"),
];

const TEXT_LOGGERS: &[LibraryRule] = &[
    ("github.com/sirupsen/logrus", "logrus"),
    ("github.com/apex/log", "apex/log"),
    ("github.com/inconshreveable/log15", "log15"),
    ("github.com/go-kit/log", "go-kit/log"),
    ("github.com/hashicorp/go-hclog", "hclog"),
];

const QUEUE_LIBRARIES: &[LibraryRule] = &[
    ("github.com/hibiken/asynq", "asynq"),
    ("github.com/RichardKnop/machinery", "machinery"),
    ("github.com/gocraft/work", "gocraft/work"),
    ("github.com/adjust/rmq", "rmq"),
    ("github.com/gocelery/gocelery", "gocelery"),
];

const UPLOAD_LIBRARIES: &[LibraryRule] = &[
    ("github.com/gin-contrib/static", "gin-contrib/static"),
    ("github.com/h2non/filetype", "filetype"),
    ("github.com/gabriel-vasile/mimetype", "mimetype"),
];

const WEB_FRAMEWORKS: &[&str] = &[
    "github.com/gin-gonic/gin",
    "github.com/labstack/echo",
    "github.com/gofiber/fiber",
    "github.com/go-chi/chi",
    "github.com/gorilla/mux",
];

const UPLOAD_DIRS: &[&str] = &[
    "uploads",
    "upload",
    "files",
    "static/uploads",
    "public/uploads",
    "assets/uploads",
];

const METRICS_LIBRARIES: &[LibraryRule] = &[
    ("github.com/prometheus/client_golang", "prometheus"),
    ("github.com/VictoriaMetrics/metrics", "victoriametrics"),
    (
        "go.opentelemetry.io/otel/exporters/prometheus",
        "opentelemetry-prometheus",
    ),
    ("github.com/armon/go-metrics", "go-metrics"),
    ("github.com/hashicorp/go-metrics", "go-metrics"),
];

const TRACING_LIBRARIES: &[(&str, &str, TracingProtocol)] = &[
    ("go.opentelemetry.io/otel", "opentelemetry", TracingProtocol::Otlp),
    (
        "go.opentelemetry.io/contrib",
        "opentelemetry-contrib",
        TracingProtocol::Otlp,
    ),
    (
        "github.com/uber/jaeger-client-go",
        "jaeger-client-go",
        TracingProtocol::Jaeger,
    ),
    (
        "github.com/openzipkin/zipkin-go",
        "zipkin-go",
        TracingProtocol::Zipkin,
    ),
];

/// Module paths that live under a tracing prefix but belong to another category
const TRACING_EXCLUDED: &[&str] = &["go.opentelemetry.io/otel/exporters/prometheus"];

pub struct GoDetector {
    fs: Arc<dyn FileSystem>,
}

impl GoDetector {
    pub fn new() -> Self {
        Self::with_fs(Arc::new(RealFileSystem::new()))
    }

    pub fn with_fs(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    fn detect_services(module: &GoModule, detection: &mut Detection) {
        if POSTGRES_PREFIXES.iter().any(|p| module.has_prefix(p)) {
            detection.add_service("postgres");
        }
        if REDIS_PREFIXES.iter().any(|p| module.has_prefix(p)) {
            detection.add_service("redis");
        }
    }

    fn detect_logging(module: &GoModule, detection: &mut Detection) {
        for (prefix, library) in JSON_LOGGERS {
            if module.has_prefix(prefix) {
                detection.add_json_logger(*library);
            }
        }
        for (prefix, library) in TEXT_LOGGERS {
            if module.has_prefix(prefix) {
                detection.add_text_logger(*library);
            }
        }
    }

    fn detect_queues(module: &GoModule, detection: &mut Detection) {
        for (prefix, library) in QUEUE_LIBRARIES {
            if module.has_prefix(prefix) {
                detection.add_queue_library(*library);
            }
        }

        if detection.needs_worker() {
            let binary = module.binary_name().unwrap_or(DEFAULT_BINARY);
            detection.worker_command = format!("./{} worker", binary);
        }
    }

    fn detect_uploads(&self, root: &Path, module: &GoModule, detection: &mut Detection) {
        for (prefix, library) in UPLOAD_LIBRARIES {
            if module.has_prefix(prefix) {
                detection.add_file_upload_library(*library);
            }
        }

        let has_explicit = detection.needs_file_processor();
        let has_framework = WEB_FRAMEWORKS.iter().any(|p| module.has_prefix(p));
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

    fn detect_metrics(module: &GoModule, detection: &mut Detection) {
        for (prefix, library) in METRICS_LIBRARIES {
            if module.has_prefix(prefix) {
                detection.add_metrics_library(*library);
            }
        }
        detection.enable_metrics(METRICS_PORT);
    }

    fn detect_tracing(module: &GoModule, detection: &mut Detection) {
        let mut protocols = Vec::new();

        for (prefix, library, protocol) in TRACING_LIBRARIES {
            let matched = module
                .requires
                .iter()
                .any(|path| path.starts_with(prefix) && !TRACING_EXCLUDED.contains(&path.as_str()));
            if matched {
                detection.add_tracing_library(*library);
                protocols.push(*protocol);
            }
        }

        detection.tracing_protocol = strongest_protocol(&protocols);
    }

    fn confidence(module: &GoModule, version: &str) -> f64 {
        let mut confidence = 0.6;
        if module.module.is_some() {
            confidence += 0.2;
        }
        if version != DEFAULT_VERSION {
            confidence += 0.1;
        }
        if !module.requires.is_empty() {
            confidence += 0.1;
        }
        confidence
    }
}

/// OTLP beats Jaeger beats Zipkin
pub(crate) fn strongest_protocol(found: &[TracingProtocol]) -> TracingProtocol {
    [
        TracingProtocol::Otlp,
        TracingProtocol::Jaeger,
        TracingProtocol::Zipkin,
    ]
    .into_iter()
    .find(|p| found.contains(p))
    .unwrap_or(TracingProtocol::None)
}

impl Default for GoDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for GoDetector {
    fn name(&self) -> &str {
        Language::Go.as_str()
    }

    fn manifest_files(&self) -> &[&str] {
        &[MANIFEST]
    }

    fn detect(&self, path: &Path) -> Result<Option<Detection>, DetectError> {
        let manifest = path.join(MANIFEST);
        let Some(content) = read_manifest(self.fs.as_ref(), &manifest)? else {
            return Ok(None);
        };

        let module = GoModule::parse(&content);
        let version = module
            .go_version
            .clone()
            .unwrap_or_else(|| DEFAULT_VERSION.to_string());
        let confidence = Self::confidence(&module, &version);

        let mut detection = Detection::new(Language::Go, version).with_confidence(confidence);

        Self::detect_services(&module, &mut detection);
        Self::detect_logging(&module, &mut detection);
        Self::detect_queues(&module, &mut detection);
        self.detect_uploads(path, &module, &mut detection);
        Self::detect_metrics(&module, &mut detection);
        Self::detect_tracing(&module, &mut detection);

        debug!(
            manifest = %manifest.display(),
            module = module.module.as_deref().unwrap_or(""),
            version = %detection.version,
            confidence = detection.confidence,
            "Detected Go project"
        );

        Ok(Some(detection))
    }
}
