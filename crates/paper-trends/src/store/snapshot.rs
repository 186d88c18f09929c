//! Readers for the fetch and summarize stage snapshots.

use std::path::Path;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::info;

use crate::error::{StoreError, StoreResult};
use crate::models::{Paper, PaperSummary};

/// A snapshot file: an envelope object or a bare array.
#[derive(Deserialize)]
#[serde(untagged)]
enum Snapshot<T> {
    Papers { papers: Vec<T> },
    Summaries { summaries: Vec<T> },
    Bare(Vec<T>),
}

impl<T> Snapshot<T> {
    fn into_records(self) -> Vec<T> {
        match self {
            Self::Papers { papers } => papers,
            Self::Summaries { summaries } => summaries,
            Self::Bare(records) => records,
        }
    }
}

fn load<T: DeserializeOwned>(path: &Path) -> StoreResult<Vec<T>> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(StoreError::not_found(path.display().to_string()));
        }
        Err(e) => return Err(StoreError::io(path, e)),
    };
    let snapshot: Snapshot<T> = serde_json::from_slice(&bytes)?;
    Ok(snapshot.into_records())
}

/// Papers from a fetch-stage snapshot (`{"papers": [...]}` or `[...]`).
pub fn load_papers(path: impl AsRef<Path>) -> StoreResult<Vec<Paper>> {
    let path = path.as_ref();
    let papers = load(path)?;
    info!(path = %path.display(), count = papers.len(), "Loaded papers");
    Ok(papers)
}

/// Summaries from a summarize-stage snapshot
/// (`{"papers": [...]}`, `{"summaries": [...]}` or `[...]`).
pub fn load_summaries(path: impl AsRef<Path>) -> StoreResult<Vec<PaperSummary>> {
    let path = path.as_ref();
    let summaries = load(path)?;
    info!(path = %path.display(), count = summaries.len(), "Loaded summaries");
    Ok(summaries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_and_bare_forms() {
        let envelope: Snapshot<Paper> =
            serde_json::from_str(r#"{"date":"2024-01-01","count":1,"papers":[{"id":"a"}]}"#)
                .unwrap();
        assert_eq!(envelope.into_records()[0].id, "a");

        let bare: Snapshot<Paper> = serde_json::from_str(r#"[{"id":"b"},{"id":"c"}]"#).unwrap();
        assert_eq!(bare.into_records().len(), 2);

        let summaries: Snapshot<PaperSummary> =
            serde_json::from_str(r#"{"summaries":[{"summary":"text"}]}"#).unwrap();
        assert_eq!(summaries.into_records().len(), 1);
    }

    #[test]
    fn test_missing_file() {
        let result = load_papers("/nonexistent/paper-trends/latest.json");
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }
}
