//! Subcommand handlers, each returning the process exit code

use super::commands::{DetectArgs, DetectorsArgs};
use super::output::{DetectorInfo, OutputFormat, OutputFormatter};
use crate::config::DevprobeConfig;
use crate::languages::DetectorRegistry;

use anyhow::{bail, Context, Result};
use std::env;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, error, info};

pub const EXIT_DETECTED: i32 = 0;
pub const EXIT_NOT_DETECTED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

pub fn handle_detect(args: &DetectArgs, config: &DevprobeConfig, quiet: bool) -> i32 {
    match run_detect(args, config) {
        Ok(true) => EXIT_DETECTED,
        Ok(false) => {
            if !quiet {
                eprintln!("No supported project manifest found");
            }
            EXIT_NOT_DETECTED
        }
        Err(e) => {
            error!("{:#}", e);
            EXIT_ERROR
        }
    }
}

pub fn handle_detectors(args: &DetectorsArgs) -> i32 {
    match run_detectors(args) {
        Ok(()) => EXIT_DETECTED,
        Err(e) => {
            error!("{:#}", e);
            EXIT_ERROR
        }
    }
}

fn run_detect(args: &DetectArgs, config: &DevprobeConfig) -> Result<bool> {
    let path = resolve_path(args.path.clone())?;

    let mut config = config.clone();
    if let Some(list) = &args.detectors {
        config = config.with_detectors(list);
    }
    config.validate().context("Configuration error")?;

    let registry = DetectorRegistry::from_config(&config);
    debug!(detectors = ?registry.detector_names(), "Running detectors");
    info!("Probing project: {}", path.display());

    let detections = registry.detect_all(&path);
    info!("Detection complete: {} matches", detections.len());

    let Some(primary) = detections.first() else {
        return Ok(false);
    };

    let formatter = OutputFormatter::new(args.format.into());
    let rendered = if args.all {
        formatter.format_all(&detections)?
    } else {
        formatter.format(primary)?
    };

    emit(&rendered, args.output.as_ref())?;
    Ok(true)
}

fn run_detectors(args: &DetectorsArgs) -> Result<()> {
    let registry = DetectorRegistry::with_defaults();
    let detectors: Vec<DetectorInfo> = registry
        .detector_names()
        .into_iter()
        .filter_map(|name| registry.get(name))
        .map(|detector| DetectorInfo {
            name: detector.name().to_string(),
            manifests: detector
                .manifest_files()
                .iter()
                .map(|m| m.to_string())
                .collect(),
        })
        .collect();

    let format: OutputFormat = args.format.into();
    let rendered = OutputFormatter::new(format).format_detectors(&detectors)?;
    emit(&rendered, None)
}

fn resolve_path(path: Option<PathBuf>) -> Result<PathBuf> {
    let path = match path {
        Some(path) => path,
        None => env::current_dir().context("Failed to get current directory")?,
    };

    if !path.exists() {
        bail!("Project path does not exist: {}", path.display());
    }
    if !path.is_dir() {
        bail!("Project path is not a directory: {}", path.display());
    }

    path.canonicalize()
        .with_context(|| format!("Failed to canonicalize {}", path.display()))
}

fn emit(rendered: &str, output: Option<&PathBuf>) -> Result<()> {
    match output {
        Some(file) => {
            fs::write(file, ensure_trailing_newline(rendered))
                .with_context(|| format!("Failed to write output to {}", file.display()))?;
            info!("Output written to {}", file.display());
        }
        None => print!("{}", ensure_trailing_newline(rendered)),
    }
    Ok(())
}

fn ensure_trailing_newline(rendered: &str) -> String {
    if rendered.ends_with('\n') {
        rendered.to_string()
    } else {
        format!("{}\n", rendered)
    }
}
