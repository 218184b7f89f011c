//! FileSystem trait definition

use std::io;
use std::path::Path;

/// Read-only view of the file system used by detectors
pub trait FileSystem: Send + Sync {
    /// Check if a path exists
    fn exists(&self, path: &Path) -> bool;

    /// Check if path is a directory
    fn is_dir(&self, path: &Path) -> bool;

    /// Check if path is a file
    fn is_file(&self, path: &Path) -> bool;

    /// Check if path is a file, reporting stat failures
    ///
    /// A missing path is `Err` with `ErrorKind::NotFound`.
    fn try_is_file(&self, path: &Path) -> io::Result<bool>;

    /// Read file contents as string
    fn read_to_string(&self, path: &Path) -> io::Result<String>;
}
