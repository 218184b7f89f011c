//! Ecosystem detectors and the registry that ranks their results

mod go;
mod node;
mod python;
mod registry;
mod rust;

pub use go::GoDetector;
pub use node::{parse_version_constraint, NodeDetector};
pub use python::{parse_python_constraint, PythonDetector};
pub use registry::DetectorRegistry;
pub use rust::{edition_version, RustDetector};

use crate::detection::{DetectError, Detection};
use crate::fs::FileSystem;
use std::io;
use std::path::Path;

/// Trait implemented by every ecosystem detector
pub trait Detector: Send + Sync {
    /// Stable identifier (e.g., "node", "rust")
    fn name(&self) -> &str;

    /// Manifest files probed by this detector, in precedence order
    fn manifest_files(&self) -> &[&str];

    /// Inspect a project directory.
    ///
    /// Returns `Ok(None)` when the manifest is absent and `Err` only when it
    /// exists but cannot be read or parsed.
    fn detect(&self, path: &Path) -> Result<Option<Detection>, DetectError>;
}

/// Maps a dependency name (or module-path prefix) to its canonical library name
pub(crate) type LibraryRule = (&'static str, &'static str);

/// Reads a manifest, treating a missing file as "not applicable"
///
/// Any other stat failure is a `DetectError::Read`.
pub(crate) fn read_manifest(
    fs: &dyn FileSystem,
    manifest: &Path,
) -> Result<Option<String>, DetectError> {
    let read_error = |source| DetectError::Read {
        path: manifest.to_path_buf(),
        source,
    };

    match fs.try_is_file(manifest) {
        Ok(true) => {}
        Ok(false) => return Ok(None),
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(read_error(e)),
    }

    fs.read_to_string(manifest).map(Some).map_err(read_error)
}

/// First candidate that exists as a directory under `root`
pub(crate) fn probe_upload_dir(
    fs: &dyn FileSystem,
    root: &Path,
    candidates: &[&str],
) -> Option<String> {
    candidates
        .iter()
        .find(|candidate| fs.is_dir(&root.join(candidate)))
        .map(|candidate| candidate.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MockFileSystem;

    #[test]
    fn test_read_manifest_missing() {
        let fs = MockFileSystem::new();
        let result = read_manifest(&fs, &fs.root().join("package.json")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_read_manifest_directory_is_not_a_manifest() {
        let fs = MockFileSystem::new();
        fs.add_dir("package.json");
        let result = read_manifest(&fs, &fs.root().join("package.json")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_read_manifest_unreadable() {
        let fs = MockFileSystem::new();
        fs.add_unreadable_file("package.json");

        let err = read_manifest(&fs, &fs.root().join("package.json")).unwrap_err();
        assert!(matches!(err, DetectError::Read { .. }));
    }

    #[test]
    fn test_read_manifest_stat_failure() {
        let fs = MockFileSystem::new();
        fs.add_inaccessible("Cargo.toml");

        let err = read_manifest(&fs, &fs.root().join("Cargo.toml")).unwrap_err();
        match err {
            DetectError::Read { path, source } => {
                assert!(path.ends_with("Cargo.toml"));
                assert_eq!(source.kind(), io::ErrorKind::PermissionDenied);
            }
            other => panic!("expected read error, got {:?}", other),
        }
    }

    #[test]
    fn test_probe_upload_dir_respects_candidate_order() {
        let fs = MockFileSystem::new();
        fs.add_dir("files");
        fs.add_dir("upload");

        let found = probe_upload_dir(&fs, fs.root(), &["uploads", "upload", "files"]);
        assert_eq!(found.as_deref(), Some("upload"));
    }

    #[test]
    fn test_probe_upload_dir_ignores_plain_files() {
        let fs = MockFileSystem::new();
        fs.add_file("uploads", "not a directory");

        assert!(probe_upload_dir(&fs, fs.root(), &["uploads"]).is_none());
    }
}
