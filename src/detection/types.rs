use serde::{Deserialize, Serialize};
use std::fmt;

/// Port reported by [`Detection::metrics_port`] when no ecosystem default was recorded
pub const FALLBACK_METRICS_PORT: u16 = 9090;

/// Path reported by [`Detection::metrics_path`] when none was recorded
pub const DEFAULT_METRICS_PATH: &str = "/metrics";

/// Library name recorded when uploads are inferred from a web framework plus an uploads directory
pub const MULTIPART_SENTINEL: &str = "multipart";

/// Supported ecosystems
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Node,
    Go,
    Python,
    Rust,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Node => "node",
            Language::Go => "go",
            Language::Python => "python",
            Language::Rust => "rust",
        }
    }

    pub fn all() -> &'static [Language] {
        &[Language::Node, Language::Go, Language::Python, Language::Rust]
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|lang| lang.as_str().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Default output shape of the strongest detected logger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Text,
    #[default]
    Unknown,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Json => "json",
            LogFormat::Text => "text",
            LogFormat::Unknown => "unknown",
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wire protocol implied by the detected tracing libraries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TracingProtocol {
    Otlp,
    Jaeger,
    Zipkin,
    #[default]
    #[serde(rename = "")]
    None,
}

impl TracingProtocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            TracingProtocol::Otlp => "otlp",
            TracingProtocol::Jaeger => "jaeger",
            TracingProtocol::Zipkin => "zipkin",
            TracingProtocol::None => "",
        }
    }

    pub fn is_none(&self) -> bool {
        *self == TracingProtocol::None
    }
}

impl fmt::Display for TracingProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of running one ecosystem detector against a project directory.
///
/// Library lists are kept free of duplicates and preserve insertion order.
/// Derived fields (`worker_command`, `metrics_port`, `metrics_path`) stay
/// zero-valued while their library list is empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub language: Language,
    pub version: String,
    pub services: Vec<String>,
    pub confidence: f64,
    pub logging_libraries: Vec<String>,
    pub log_format: LogFormat,
    pub queue_libraries: Vec<String>,
    pub worker_command: String,
    pub file_upload_libraries: Vec<String>,
    pub upload_path: String,
    pub metrics_libraries: Vec<String>,
    pub metrics_port: u16,
    pub metrics_path: String,
    pub tracing_libraries: Vec<String>,
    pub tracing_protocol: TracingProtocol,
}

impl Detection {
    pub fn new(language: Language, version: impl Into<String>) -> Self {
        Self {
            language,
            version: version.into(),
            services: Vec::new(),
            confidence: 0.0,
            logging_libraries: Vec::new(),
            log_format: LogFormat::Unknown,
            queue_libraries: Vec::new(),
            worker_command: String::new(),
            file_upload_libraries: Vec::new(),
            upload_path: String::new(),
            metrics_libraries: Vec::new(),
            metrics_port: 0,
            metrics_path: String::new(),
            tracing_libraries: Vec::new(),
            tracing_protocol: TracingProtocol::None,
        }
    }

    /// Sets the confidence from a sum of signal weights, rounded to two decimals and clamped to [0, 1]
    pub fn with_confidence(mut self, score: f64) -> Self {
        self.confidence = normalize_confidence(score);
        self
    }

    pub fn has_service(&self, service: &str) -> bool {
        contains(&self.services, service)
    }

    pub fn has_logging_library(&self, library: &str) -> bool {
        contains(&self.logging_libraries, library)
    }

    pub fn has_queue_library(&self, library: &str) -> bool {
        contains(&self.queue_libraries, library)
    }

    pub fn has_file_upload_library(&self, library: &str) -> bool {
        contains(&self.file_upload_libraries, library)
    }

    pub fn has_metrics_library(&self, library: &str) -> bool {
        contains(&self.metrics_libraries, library)
    }

    pub fn has_tracing_library(&self, library: &str) -> bool {
        contains(&self.tracing_libraries, library)
    }

    pub fn needs_file_processor(&self) -> bool {
        !self.file_upload_libraries.is_empty()
    }

    pub fn needs_worker(&self) -> bool {
        !self.queue_libraries.is_empty()
    }

    pub fn needs_metrics(&self) -> bool {
        !self.metrics_libraries.is_empty()
    }

    pub fn needs_tracing(&self) -> bool {
        !self.tracing_libraries.is_empty()
    }

    pub fn has_structured_logging(&self) -> bool {
        self.log_format == LogFormat::Json
    }

    pub fn metrics_port(&self) -> u16 {
        if self.metrics_port > 0 {
            self.metrics_port
        } else {
            FALLBACK_METRICS_PORT
        }
    }

    pub fn metrics_path(&self) -> &str {
        if self.metrics_path.is_empty() {
            DEFAULT_METRICS_PATH
        } else {
            &self.metrics_path
        }
    }

    /// Stored protocol, or OTLP when tracing libraries exist without a recognizable protocol
    pub fn tracing_protocol(&self) -> TracingProtocol {
        if self.tracing_protocol.is_none() && self.needs_tracing() {
            TracingProtocol::Otlp
        } else {
            self.tracing_protocol
        }
    }

    pub fn add_service(&mut self, service: impl Into<String>) {
        push_unique(&mut self.services, service);
    }

    pub fn add_logging_library(&mut self, library: impl Into<String>) {
        push_unique(&mut self.logging_libraries, library);
    }

    pub fn add_queue_library(&mut self, library: impl Into<String>) {
        push_unique(&mut self.queue_libraries, library);
    }

    pub fn add_file_upload_library(&mut self, library: impl Into<String>) {
        push_unique(&mut self.file_upload_libraries, library);
    }

    pub fn add_metrics_library(&mut self, library: impl Into<String>) {
        push_unique(&mut self.metrics_libraries, library);
    }

    pub fn add_tracing_library(&mut self, library: impl Into<String>) {
        push_unique(&mut self.tracing_libraries, library);
    }

    /// Records a JSON-native logger. JSON always wins the format.
    pub fn add_json_logger(&mut self, library: impl Into<String>) {
        self.add_logging_library(library);
        self.log_format = LogFormat::Json;
    }

    /// Records a text logger. Only fills the format if nothing stronger was seen.
    pub fn add_text_logger(&mut self, library: impl Into<String>) {
        self.add_logging_library(library);
        if self.log_format == LogFormat::Unknown {
            self.log_format = LogFormat::Text;
        }
    }

    pub fn enable_metrics(&mut self, port: u16) {
        if self.needs_metrics() {
            self.metrics_port = port;
            self.metrics_path = DEFAULT_METRICS_PATH.to_string();
        }
    }
}

impl fmt::Display for Detection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} (confidence {:.2})",
            self.language, self.version, self.confidence
        )
    }
}

fn contains(list: &[String], value: &str) -> bool {
    list.iter().any(|item| item == value)
}

fn push_unique(list: &mut Vec<String>, value: impl Into<String>) {
    let value = value.into();
    if !contains(list, &value) {
        list.push(value);
    }
}

pub(crate) fn normalize_confidence(score: f64) -> f64 {
    let rounded = (score * 100.0).round() / 100.0;
    rounded.clamp(0.0, 1.0)
}
