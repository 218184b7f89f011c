use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure to read or parse a manifest that exists.
///
/// A missing manifest is not an error; detectors report it as `Ok(None)`.
#[derive(Error, Debug)]
pub enum DetectError {
    #[error("Failed to read manifest {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("Invalid JSON in {path}: {source}")]
    InvalidJson {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Invalid TOML in {path}: {source}")]
    InvalidToml {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl DetectError {
    pub fn path(&self) -> &Path {
        match self {
            DetectError::Read { path, .. }
            | DetectError::InvalidJson { path, .. }
            | DetectError::InvalidToml { path, .. } => path,
        }
    }
}
