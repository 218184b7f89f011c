use super::FileSystem;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    File,
    Directory,
    Unreadable,
    Inaccessible,
}

#[derive(Debug, Clone)]
struct MockEntry {
    content: Option<String>,
    kind: EntryKind,
}

/// In-memory file system for detector tests
pub struct MockFileSystem {
    files: RwLock<HashMap<PathBuf, MockEntry>>,
    root: PathBuf,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::with_root(PathBuf::from("/mock"))
    }

    pub fn with_root(root: PathBuf) -> Self {
        Self {
            files: RwLock::new(HashMap::new()),
            root,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: &str) {
        self.insert(
            path.as_ref(),
            MockEntry {
                content: Some(content.to_string()),
                kind: EntryKind::File,
            },
        );
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        self.insert(
            path.as_ref(),
            MockEntry {
                content: None,
                kind: EntryKind::Directory,
            },
        );
    }

    /// Adds a file that exists but fails with `PermissionDenied` when read
    pub fn add_unreadable_file(&self, path: impl AsRef<Path>) {
        self.insert(
            path.as_ref(),
            MockEntry {
                content: None,
                kind: EntryKind::Unreadable,
            },
        );
    }

    /// Adds an entry whose stat fails with `PermissionDenied`
    pub fn add_inaccessible(&self, path: impl AsRef<Path>) {
        self.insert(
            path.as_ref(),
            MockEntry {
                content: None,
                kind: EntryKind::Inaccessible,
            },
        );
    }

    fn insert(&self, path: &Path, entry: MockEntry) {
        let path = self.normalize_path(path);
        let mut files = self.files.write().unwrap_or_else(PoisonError::into_inner);

        if let Some(parent) = path.parent() {
            Self::ensure_parents(&mut files, parent);
        }

        files.insert(path, entry);
    }

    fn normalize_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    fn ensure_parents(files: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            files.entry(current.clone()).or_insert(MockEntry {
                content: None,
                kind: EntryKind::Directory,
            });
        }
    }

    fn kind(&self, path: &Path) -> Option<EntryKind> {
        let path = self.normalize_path(path);
        self.files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&path)
            .map(|e| e.kind)
    }
}

impl Default for MockFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for MockFileSystem {
    fn exists(&self, path: &Path) -> bool {
        matches!(self.kind(path), Some(kind) if kind != EntryKind::Inaccessible)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.kind(path) == Some(EntryKind::Directory)
    }

    fn is_file(&self, path: &Path) -> bool {
        matches!(
            self.kind(path),
            Some(EntryKind::File) | Some(EntryKind::Unreadable)
        )
    }

    fn try_is_file(&self, path: &Path) -> io::Result<bool> {
        match self.kind(path) {
            Some(EntryKind::File) | Some(EntryKind::Unreadable) => Ok(true),
            Some(EntryKind::Directory) => Ok(false),
            Some(EntryKind::Inaccessible) => Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("Permission denied: {:?}", path),
            )),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("File not found: {:?}", path),
            )),
        }
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let normalized = self.normalize_path(path);
        let files = self.files.read().unwrap_or_else(PoisonError::into_inner);
        let entry = files.get(&normalized).ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("File not found: {:?}", path))
        })?;

        match entry.kind {
            EntryKind::File => Ok(entry.content.clone().unwrap_or_default()),
            EntryKind::Directory => Err(io::Error::new(
                io::ErrorKind::Other,
                format!("Is a directory: {:?}", path),
            )),
            EntryKind::Unreadable | EntryKind::Inaccessible => Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("Permission denied: {:?}", path),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_file() {
        let fs = MockFileSystem::new();
        fs.add_file("project/go.mod", "module example.com/app");

        assert!(fs.is_file(Path::new("/mock/project/go.mod")));
        assert!(fs.is_dir(Path::new("/mock/project")));
        assert_eq!(
            fs.read_to_string(Path::new("project/go.mod")).unwrap(),
            "module example.com/app"
        );
    }

    #[test]
    fn test_add_dir() {
        let fs = MockFileSystem::new();
        fs.add_dir("public/uploads");

        assert!(fs.is_dir(Path::new("/mock/public/uploads")));
        assert!(fs.is_dir(Path::new("/mock/public")));
        assert!(!fs.is_file(Path::new("/mock/public/uploads")));
    }

    #[test]
    fn test_missing_path() {
        let fs = MockFileSystem::new();

        assert!(!fs.exists(Path::new("/mock/nothing")));
        let err = fs.read_to_string(Path::new("/mock/nothing")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_unreadable_file() {
        let fs = MockFileSystem::new();
        fs.add_unreadable_file("Cargo.toml");

        assert!(fs.is_file(Path::new("/mock/Cargo.toml")));
        let err = fs.read_to_string(Path::new("/mock/Cargo.toml")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
    }

    #[test]
    fn test_inaccessible_entry() {
        let fs = MockFileSystem::new();
        fs.add_inaccessible("go.mod");

        assert!(!fs.exists(Path::new("/mock/go.mod")));
        assert!(!fs.is_file(Path::new("/mock/go.mod")));
        let err = fs.try_is_file(Path::new("/mock/go.mod")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
    }

    #[test]
    fn test_try_is_file_missing() {
        let fs = MockFileSystem::new();
        fs.add_dir("src");

        assert!(!fs.try_is_file(Path::new("/mock/src")).unwrap());
        let err = fs.try_is_file(Path::new("/mock/go.mod")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
