// src/store/file.rs
//! JSON / JSON Lines file written by the ingestion job, re-read on every fetch.

use super::{decode_rows, StoreAdapter, StoreError};
use crate::record::RawRow;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl StoreAdapter for JsonFileStore {
    async fn fetch_all(&self) -> Result<Vec<RawRow>, StoreError> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| StoreError::Io {
                path: self.path.clone(),
                source,
            })?;
        let rows = decode_rows(&content)?;
        tracing::debug!(
            target: "store",
            path = %self.path.display(),
            rows = rows.len(),
            "file store read"
        );
        Ok(rows)
    }

    fn name(&self) -> &'static str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn reads_json_array_from_disk() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(
            f,
            r#"[{{"title":"a","relevance_score":"80"}},{{"title":"b"}}]"#
        )
        .unwrap();

        let store = JsonFileStore::new(f.path());
        let rows = store.fetch_all().await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["title"], "a");
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("absent.json"));
        let err = store.fetch_all().await.unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }), "{err}");
    }

    #[tokio::test]
    async fn picks_up_appended_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("news.jsonl");
        std::fs::write(&path, "{\"title\":\"a\"}\n").unwrap();

        let store = JsonFileStore::new(&path);
        assert_eq!(store.fetch_all().await.unwrap().len(), 1);

        let mut f = std::fs::OpenOptions::new().append(true).open(&path).unwrap();
        writeln!(f, "{{\"title\":\"b\"}}").unwrap();
        assert_eq!(store.fetch_all().await.unwrap().len(), 2);
    }
}
