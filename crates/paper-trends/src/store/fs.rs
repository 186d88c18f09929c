use std::path::PathBuf;

use tracing::debug;

use super::ArtifactStore;
use crate::error::{StoreError, StoreResult};

/// Stores artifacts as files in a single directory.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    /// Store rooted at `root`; the directory is created on first write.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

impl ArtifactStore for FsStore {
    fn put(&self, key: &str, bytes: &[u8]) -> StoreResult<String> {
        std::fs::create_dir_all(&self.root).map_err(|e| StoreError::io(&self.root, e))?;
        let path = self.path(key);
        std::fs::write(&path, bytes).map_err(|e| StoreError::io(&path, e))?;
        debug!(path = %path.display(), bytes = bytes.len(), "Wrote artifact");
        Ok(path.display().to_string())
    }

    fn get(&self, key: &str) -> StoreResult<Vec<u8>> {
        let path = self.path(key);
        match std::fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StoreError::not_found(key)),
            Err(e) => Err(StoreError::io(&path, e)),
        }
    }

    fn exists(&self, key: &str) -> bool {
        self.path(key).is_file()
    }

    fn location(&self, key: &str) -> String {
        self.path(key).display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_creates_directory_and_overwrites() {
        let root = std::env::temp_dir().join(format!("paper-trends-{}", uuid::Uuid::new_v4()));
        let store = FsStore::new(root.join("nested"));

        let location = store.put("a.txt", b"first").unwrap();
        store.put("a.txt", b"second").unwrap();

        assert!(location.ends_with("a.txt"));
        assert_eq!(store.get("a.txt").unwrap(), b"second");
        assert!(matches!(store.get("missing.txt"), Err(StoreError::NotFound { .. })));

        std::fs::remove_dir_all(root).unwrap();
    }
}
