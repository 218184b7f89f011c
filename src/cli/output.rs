//! Output formatting for multiple formats
//!
//! Detections render as JSON, YAML, or a human-readable summary that only
//! lists the categories a project actually uses.
//!
//! # Example
//!
//! ```
//! use devprobe::cli::output::{OutputFormat, OutputFormatter};
//! use devprobe::detection::{Detection, Language};
//!
//! let detection = Detection::new(Language::Go, "1.22").with_confidence(0.9);
//! let formatter = OutputFormatter::new(OutputFormat::Json);
//! let output = formatter.format(&detection).unwrap();
//! assert!(output.contains("\"go\""));
//! ```

use anyhow::{Context, Result};
use serde::Serialize;

use crate::detection::Detection;

const RULE: &str = "\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}";

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// YAML format
    Yaml,
    /// Human-readable formatted text
    Human,
}

/// A registered detector and the manifests it reads
#[derive(Debug, Clone, Serialize)]
pub struct DetectorInfo {
    pub name: String,
    pub manifests: Vec<String>,
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a single detection
    pub fn format(&self, detection: &Detection) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(detection)
                .context("Failed to serialize detection to JSON"),
            OutputFormat::Yaml => {
                serde_yaml::to_string(detection).context("Failed to serialize detection to YAML")
            }
            OutputFormat::Human => Ok(self.format_human(detection)),
        }
    }

    /// Formats every detection, most confident first
    pub fn format_all(&self, detections: &[Detection]) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(detections)
                .context("Failed to serialize detections to JSON"),
            OutputFormat::Yaml => {
                serde_yaml::to_string(detections).context("Failed to serialize detections to YAML")
            }
            OutputFormat::Human => Ok(detections
                .iter()
                .map(|d| self.format_human(d))
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    pub fn format_detectors(&self, detectors: &[DetectorInfo]) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(detectors)
                .context("Failed to serialize detectors to JSON"),
            OutputFormat::Yaml => {
                serde_yaml::to_string(detectors).context("Failed to serialize detectors to YAML")
            }
            OutputFormat::Human => {
                let mut output = String::from("Registered Detectors\n");
                output.push_str(RULE);
                output.push_str("\n\n");
                for detector in detectors {
                    output.push_str(&format!(
                        "{:<8} {}\n",
                        detector.name,
                        detector.manifests.join(", ")
                    ));
                }
                Ok(output)
            }
        }
    }

    fn format_human(&self, detection: &Detection) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "\u{2713} {} {}\n",
            detection.language, detection.version
        ));
        output.push_str(RULE);
        output.push_str("\n\n");

        let confidence_pct = (detection.confidence * 100.0).round() as u8;
        let filled_blocks = ((detection.confidence * 10.0).round() as usize).min(10);
        let confidence_bar =
            "\u{2588}".repeat(filled_blocks) + &"\u{2591}".repeat(10 - filled_blocks);
        output.push_str(&format!(
            "Confidence: {} {}%\n\n",
            confidence_bar, confidence_pct
        ));

        let mut rows: Vec<(&str, String)> = Vec::new();
        if !detection.services.is_empty() {
            rows.push(("Services", detection.services.join(", ")));
        }
        if !detection.logging_libraries.is_empty() {
            rows.push((
                "Logging",
                format!(
                    "{} ({})",
                    detection.logging_libraries.join(", "),
                    detection.log_format
                ),
            ));
        }
        if detection.needs_worker() {
            rows.push(("Queues", detection.queue_libraries.join(", ")));
            rows.push(("Worker", detection.worker_command.clone()));
        }
        if detection.needs_file_processor() {
            rows.push(("Uploads", detection.file_upload_libraries.join(", ")));
            if !detection.upload_path.is_empty() {
                rows.push(("Upload Dir", detection.upload_path.clone()));
            }
        }
        if detection.needs_metrics() {
            rows.push((
                "Metrics",
                format!(
                    "{} (:{}{})",
                    detection.metrics_libraries.join(", "),
                    detection.metrics_port(),
                    detection.metrics_path()
                ),
            ));
        }
        if detection.needs_tracing() {
            rows.push((
                "Tracing",
                format!(
                    "{} ({})",
                    detection.tracing_libraries.join(", "),
                    detection.tracing_protocol()
                ),
            ));
        }

        if rows.is_empty() {
            output.push_str("No services or libraries detected\n");
        } else {
            for (i, (label, value)) in rows.iter().enumerate() {
                let connector = if i == rows.len() - 1 {
                    "\u{2514}"
                } else {
                    "\u{251C}"
                };
                output.push_str(&format!(
                    "{}\u{2500} {:<12}{}\n",
                    connector,
                    format!("{}:", label),
                    value
                ));
            }
        }

        output
    }
}
