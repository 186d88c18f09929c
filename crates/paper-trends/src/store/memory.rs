use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use super::ArtifactStore;
use crate::error::{StoreError, StoreResult};

/// In-memory artifact store; clones share contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    artifacts: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored keys, sorted.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        let artifacts = self.artifacts.read().unwrap_or_else(PoisonError::into_inner);
        let mut keys: Vec<String> = artifacts.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Stored artifact decoded as UTF-8, if present.
    #[must_use]
    pub fn text(&self, key: &str) -> Option<String> {
        self.get(key).ok().map(|b| String::from_utf8_lossy(&b).into_owned())
    }

    /// Number of stored artifacts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.artifacts.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// True when nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ArtifactStore for MemoryStore {
    fn put(&self, key: &str, bytes: &[u8]) -> StoreResult<String> {
        self.artifacts
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), bytes.to_vec());
        Ok(self.location(key))
    }

    fn get(&self, key: &str) -> StoreResult<Vec<u8>> {
        self.artifacts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::not_found(key))
    }

    fn exists(&self, key: &str) -> bool {
        self.artifacts.read().unwrap_or_else(PoisonError::into_inner).contains_key(key)
    }

    fn location(&self, key: &str) -> String {
        format!("memory://{key}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_artifacts() {
        let store = MemoryStore::new();
        let clone = store.clone();
        assert_eq!(clone.put("k", b"v").unwrap(), "memory://k");

        assert!(store.exists("k"));
        assert_eq!(store.text("k").as_deref(), Some("v"));
        assert_eq!(store.keys(), vec!["k".to_string()]);
    }
}
