//! Artifact persistence.
//!
//! The engine writes every artifact through [`ArtifactStore`], addressed by a
//! flat key such as `latest.json`. [`FsStore`] maps keys to files in one
//! directory; [`MemoryStore`] keeps them in a map for tests and embedding.

mod fs;
mod memory;
mod snapshot;

use serde::Serialize;
use serde::de::DeserializeOwned;

pub use fs::FsStore;
pub use memory::MemoryStore;
pub use snapshot::{load_papers, load_summaries};

use crate::error::StoreResult;

/// Artifact keys for one analysis date.
pub mod keys {
    /// Most recent analysis result.
    pub const LATEST: &str = "latest.json";

    /// Most recent Markdown report.
    pub const LATEST_REPORT: &str = "latest_report.md";

    /// Dated analysis result.
    #[must_use]
    pub fn analysis(date: &str) -> String {
        format!("analysis_{date}.json")
    }

    /// Dated Markdown report.
    #[must_use]
    pub fn report(date: &str) -> String {
        format!("report_{date}.md")
    }

    /// Dated word-frequency image.
    #[must_use]
    pub fn wordcloud(date: &str) -> String {
        format!("wordcloud_{date}.svg")
    }
}

/// Key-addressed artifact storage.
///
/// Writing an existing key replaces it.
pub trait ArtifactStore: Send + Sync {
    /// Store `bytes` under `key` and return where it ended up.
    fn put(&self, key: &str, bytes: &[u8]) -> StoreResult<String>;

    /// Bytes stored under `key`.
    fn get(&self, key: &str) -> StoreResult<Vec<u8>>;

    /// True if `key` has been written.
    fn exists(&self, key: &str) -> bool;

    /// Location a key would be written to.
    fn location(&self, key: &str) -> String;
}

/// Serialize `value` as pretty JSON under `key`.
pub fn put_json<T: Serialize + ?Sized>(
    store: &dyn ArtifactStore,
    key: &str,
    value: &T,
) -> StoreResult<String> {
    let bytes = serde_json::to_vec_pretty(value)?;
    store.put(key, &bytes)
}

/// Deserialize the JSON stored under `key`.
pub fn get_json<T: DeserializeOwned>(store: &dyn ArtifactStore, key: &str) -> StoreResult<T> {
    let bytes = store.get(key)?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dated_keys() {
        assert_eq!(keys::analysis("2024-05-01"), "analysis_2024-05-01.json");
        assert_eq!(keys::report("2024-05-01"), "report_2024-05-01.md");
        assert_eq!(keys::wordcloud("2024-05-01"), "wordcloud_2024-05-01.svg");
    }

    #[test]
    fn test_json_helpers() {
        let store = MemoryStore::new();
        put_json(&store, "numbers.json", &vec![1, 2, 3]).unwrap();
        let back: Vec<i32> = get_json(&store, "numbers.json").unwrap();
        assert_eq!(back, vec![1, 2, 3]);
    }
}
