use super::FileSystem;
use std::fs;
use std::io;
use std::path::Path;

pub struct RealFileSystem;

impl RealFileSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RealFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for RealFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn try_is_file(&self, path: &Path) -> io::Result<bool> {
        fs::metadata(path).map(|metadata| metadata.is_file())
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn create_test_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        let base = dir.path();

        fs::create_dir(base.join("uploads")).unwrap();
        fs::File::create(base.join("package.json"))
            .unwrap()
            .write_all(b"{\"name\": \"app\"}")
            .unwrap();

        dir
    }

    #[test]
    fn test_exists() {
        let temp = create_test_dir();
        let fs = RealFileSystem::new();

        assert!(fs.exists(temp.path()));
        assert!(fs.exists(&temp.path().join("package.json")));
        assert!(!fs.exists(&temp.path().join("nonexistent")));
    }

    #[test]
    fn test_is_dir() {
        let temp = create_test_dir();
        let fs = RealFileSystem::new();

        assert!(fs.is_dir(&temp.path().join("uploads")));
        assert!(!fs.is_dir(&temp.path().join("package.json")));
    }

    #[test]
    fn test_is_file() {
        let temp = create_test_dir();
        let fs = RealFileSystem::new();

        assert!(fs.is_file(&temp.path().join("package.json")));
        assert!(!fs.is_file(&temp.path().join("uploads")));
    }

    #[test]
    fn test_try_is_file() {
        let temp = create_test_dir();
        let fs = RealFileSystem::new();

        assert!(fs.try_is_file(&temp.path().join("package.json")).unwrap());
        assert!(!fs.try_is_file(&temp.path().join("uploads")).unwrap());

        let missing = fs.try_is_file(&temp.path().join("go.mod")).unwrap_err();
        assert_eq!(missing.kind(), io::ErrorKind::NotFound);
    }

    #[cfg(unix)]
    #[test]
    fn test_try_is_file_symlink_loop() {
        let temp = create_test_dir();
        let fs = RealFileSystem::new();
        let link = temp.path().join("Cargo.toml");
        std::os::unix::fs::symlink("Cargo.toml", &link).unwrap();

        assert!(!fs.is_file(&link));
        let err = fs.try_is_file(&link).unwrap_err();
        assert_ne!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_read_to_string() {
        let temp = create_test_dir();
        let fs = RealFileSystem::new();

        let content = fs.read_to_string(&temp.path().join("package.json")).unwrap();
        assert_eq!(content, "{\"name\": \"app\"}");

        let missing = fs.read_to_string(&temp.path().join("missing.json"));
        assert_eq!(missing.unwrap_err().kind(), io::ErrorKind::NotFound);
    }
}
