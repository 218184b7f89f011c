//! Python detector (pyproject.toml, falling back to requirements.txt)

use super::go::strongest_protocol;
use super::{probe_upload_dir, read_manifest, Detector, LibraryRule};
use crate::detection::{DetectError, Detection, Language, TracingProtocol, MULTIPART_SENTINEL};
use crate::fs::{FileSystem, RealFileSystem};
use crate::parsers::{requirements, PyProject};
use regex::Regex;
use std::path::Path;
use std::sync::{Arc, OnceLock};
use tracing::debug;

const PYPROJECT: &str = "pyproject.toml";
const REQUIREMENTS: &str = "requirements.txt";
const DEFAULT_VERSION: &str = "3.11";
const DEFAULT_PROJECT_NAME: &str = "app";
const REQUIREMENTS_CONFIDENCE: f64 = 0.6;
const METRICS_PORT: u16 = 8000;

const POSTGRES_PACKAGES: &[&str] = &[
    "psycopg2",
    "psycopg2-binary",
    "psycopg",
    "asyncpg",
    "sqlalchemy",
    "django",
    "databases",
    "tortoise-orm",
    "piccolo",
];

const REDIS_PACKAGES: &[&str] = &["redis", "aioredis", "redis-py", "celery", "rq", "dramatiq"];

const JSON_LOGGERS: &[&str] = &["structlog", "python-json-logger", "json-logging", "eliot"];
const TEXT_LOGGERS: &[&str] = &["loguru", "logbook", "twiggy"];
const LOGGING_UTILITIES: &[&str] = &["coloredlogs", "rich"];

/// Queue libraries in worker-command priority order; `{name}` is the project name
const QUEUE_LIBRARIES: &[(&str, &str)] = &[
    ("celery", "celery -A {name} worker"),
    ("dramatiq", "dramatiq {name}"),
    ("rq", "rq worker"),
    ("huey", "huey_consumer {name}.huey"),
    ("arq", "arq {name}.WorkerSettings"),
    ("taskiq", "taskiq worker {name}:broker"),
];

const UPLOAD_PACKAGES: &[&str] = &["python-multipart", "aiofiles", "starlette", "werkzeug"];
const WEB_FRAMEWORKS: &[&str] = &["fastapi", "flask", "django", "starlite", "litestar"];

const UPLOAD_DIRS: &[&str] = &[
    "uploads",
    "upload",
    "files",
    "media",
    "media/uploads",
    "static/uploads",
];

/// Keys are hyphen-normalized distribution names
const METRICS_PACKAGES: &[LibraryRule] = &[
    ("prometheus-client", "prometheus-client"),
    (
        "prometheus-fastapi-instrumentator",
        "prometheus-fastapi-instrumentator",
    ),
    ("prometheus-flask-exporter", "prometheus-flask-exporter"),
    ("django-prometheus", "django-prometheus"),
    ("starlette-exporter", "starlette-exporter"),
    (
        "opentelemetry-exporter-prometheus",
        "opentelemetry-prometheus",
    ),
];

const TRACING_PACKAGES: &[(&str, TracingProtocol)] = &[
    ("opentelemetry-api", TracingProtocol::Otlp),
    ("opentelemetry-sdk", TracingProtocol::Otlp),
    ("opentelemetry-distro", TracingProtocol::Otlp),
    ("opentelemetry-exporter-otlp", TracingProtocol::Otlp),
    ("opentelemetry-exporter-otlp-proto-grpc", TracingProtocol::Otlp),
    ("opentelemetry-exporter-otlp-proto-http", TracingProtocol::Otlp),
    ("opentelemetry-exporter-jaeger", TracingProtocol::Otlp),
    ("opentelemetry-exporter-zipkin", TracingProtocol::Otlp),
    ("jaeger-client", TracingProtocol::Jaeger),
    ("py-zipkin", TracingProtocol::Zipkin),
];

fn major_minor_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+\.\d+").expect("version regex is valid"))
}

/// First `major.minor` pair in an interpreter constraint (`">=3.9,<4.0"` → `"3.9"`)
pub fn parse_python_constraint(constraint: &str) -> Option<String> {
    major_minor_re()
        .find(constraint)
        .map(|m| m.as_str().to_string())
}

/// Dependency facts gathered from whichever manifest was found
struct PythonProject {
    name: Option<String>,
    python_constraint: Option<String>,
    dependencies: Vec<String>,
    structured: bool,
}

impl PythonProject {
    fn has(&self, name: &str) -> bool {
        self.dependencies.iter().any(|d| d == name)
    }

    /// Matches with `_` and `-` treated as the same character
    fn has_normalized(&self, name: &str) -> bool {
        self.dependencies
            .iter()
            .any(|d| d.replace('_', "-") == name)
    }

    /// Exact name or a `name-` variant (e.g., `redis-py-cluster` for `redis`)
    fn has_service_package(&self, name: &str) -> bool {
        let prefix = format!("{}-", name);
        self.dependencies
            .iter()
            .any(|d| d == name || d.starts_with(&prefix))
    }
}

pub struct PythonDetector {
    fs: Arc<dyn FileSystem>,
}

impl PythonDetector {
    pub fn new() -> Self {
        Self::with_fs(Arc::new(RealFileSystem::new()))
    }

    pub fn with_fs(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    fn load(&self, path: &Path) -> Result<Option<PythonProject>, DetectError> {
        let pyproject_path = path.join(PYPROJECT);
        if let Some(content) = read_manifest(self.fs.as_ref(), &pyproject_path)? {
            let pyproject =
                PyProject::parse(&content).map_err(|source| DetectError::InvalidToml {
                    path: pyproject_path.clone(),
                    source,
                })?;

            let python_constraint = pyproject.python_constraint().map(String::from);
            return Ok(Some(PythonProject {
                name: pyproject.name,
                python_constraint,
                dependencies: pyproject.dependencies,
                structured: true,
            }));
        }

        let requirements_path = path.join(REQUIREMENTS);
        let Some(content) = read_manifest(self.fs.as_ref(), &requirements_path)? else {
            return Ok(None);
        };

        Ok(Some(PythonProject {
            name: None,
            python_constraint: None,
            dependencies: requirements::parse(&content),
            structured: false,
        }))
    }

    fn detect_services(project: &PythonProject, detection: &mut Detection) {
        if POSTGRES_PACKAGES.iter().any(|p| project.has_service_package(p)) {
            detection.add_service("postgres");
        }
        if REDIS_PACKAGES.iter().any(|p| project.has_service_package(p)) {
            detection.add_service("redis");
        }
    }

    fn detect_logging(project: &PythonProject, detection: &mut Detection) {
        for logger in JSON_LOGGERS.iter().filter(|l| project.has_normalized(l)) {
            detection.add_json_logger(*logger);
        }
        for logger in TEXT_LOGGERS.iter().filter(|l| project.has(l)) {
            detection.add_text_logger(*logger);
        }
        for logger in LOGGING_UTILITIES.iter().filter(|l| project.has(l)) {
            detection.add_logging_library(*logger);
        }
    }

    fn detect_queues(project: &PythonProject, detection: &mut Detection) {
        let name = project.name.as_deref().unwrap_or(DEFAULT_PROJECT_NAME);

        for (library, template) in QUEUE_LIBRARIES {
            if !project.has(library) {
                continue;
            }
            if !detection.needs_worker() {
                detection.worker_command = template.replace("{name}", name);
            }
            detection.add_queue_library(*library);
        }
    }

    fn detect_uploads(&self, root: &Path, project: &PythonProject, detection: &mut Detection) {
        for library in UPLOAD_PACKAGES.iter().filter(|l| project.has(l)) {
            detection.add_file_upload_library(*library);
        }

        let has_explicit = detection.needs_file_processor();
        let has_framework = WEB_FRAMEWORKS.iter().any(|f| project.has(f));
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

    fn detect_metrics(project: &PythonProject, detection: &mut Detection) {
        for (package, library) in METRICS_PACKAGES {
            if project.has_normalized(package) {
                detection.add_metrics_library(*library);
            }
        }
        detection.enable_metrics(METRICS_PORT);
    }

    fn detect_tracing(project: &PythonProject, detection: &mut Detection) {
        let mut protocols = Vec::new();
        for (package, protocol) in TRACING_PACKAGES {
            if project.has_normalized(package) {
                detection.add_tracing_library(*package);
                protocols.push(*protocol);
            }
        }
        detection.tracing_protocol = strongest_protocol(&protocols);
    }

    fn confidence(project: &PythonProject) -> f64 {
        if !project.structured {
            return REQUIREMENTS_CONFIDENCE;
        }

        let mut confidence = 0.7;
        if project.name.is_some() {
            confidence += 0.1;
        }
        if project.python_constraint.is_some() {
            confidence += 0.1;
        }
        if !project.dependencies.is_empty() {
            confidence += 0.1;
        }
        confidence
    }
}

impl Default for PythonDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for PythonDetector {
    fn name(&self) -> &str {
        Language::Python.as_str()
    }

    fn manifest_files(&self) -> &[&str] {
        &[PYPROJECT, REQUIREMENTS]
    }

    fn detect(&self, path: &Path) -> Result<Option<Detection>, DetectError> {
        let Some(project) = self.load(path)? else {
            return Ok(None);
        };

        let version = project
            .python_constraint
            .as_deref()
            .and_then(parse_python_constraint)
            .unwrap_or_else(|| DEFAULT_VERSION.to_string());

        let mut detection =
            Detection::new(Language::Python, version).with_confidence(Self::confidence(&project));

        Self::detect_services(&project, &mut detection);
        Self::detect_logging(&project, &mut detection);
        Self::detect_queues(&project, &mut detection);
        self.detect_uploads(path, &project, &mut detection);
        Self::detect_metrics(&project, &mut detection);
        Self::detect_tracing(&project, &mut detection);

        debug!(
            path = %path.display(),
            structured = project.structured,
            version = %detection.version,
            confidence = detection.confidence,
            "Detected Python project"
        );

        Ok(Some(detection))
    }
}
