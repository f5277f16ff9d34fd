// src/store/mod.rs
//! Read-only record store adapters.
//!
//! The pipeline only needs `fetch_all`; every adapter returns raw rows and leaves
//! coercion to [`NewsRecord::from_row`](crate::record::NewsRecord::from_row).

pub mod file;
pub mod http;

use crate::record::RawRow;
use async_trait::async_trait;
use metrics::counter;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

pub use file::JsonFileStore;
pub use http::HttpStore;

/// Why a fetch failed. The pipeline treats all of these as "no records".
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record store is not initialized")]
    NotInitialized,
    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("decoding rows: {0}")]
    Decode(String),
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("store responded with status {0}")]
    Status(u16),
}

#[async_trait]
pub trait StoreAdapter: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<RawRow>, StoreError>;
    fn name(&self) -> &'static str;
}

/// Fixed rows held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    rows: Vec<RawRow>,
}

impl MemoryStore {
    pub fn new(rows: Vec<RawRow>) -> Self {
        Self { rows }
    }
}

#[async_trait]
impl StoreAdapter for MemoryStore {
    async fn fetch_all(&self) -> Result<Vec<RawRow>, StoreError> {
        Ok(self.rows.clone())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

/// Stand-in used when no backend is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredStore;

#[async_trait]
impl StoreAdapter for UnconfiguredStore {
    async fn fetch_all(&self) -> Result<Vec<RawRow>, StoreError> {
        Err(StoreError::NotInitialized)
    }

    fn name(&self) -> &'static str {
        "none"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    #[default]
    None,
    File,
    Http,
}

/// `[store]` section of the service config.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    pub kind: StoreKind,
    pub path: Option<PathBuf>,
    pub url: Option<String>,
    pub timeout_ms: u64,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            kind: StoreKind::None,
            path: None,
            url: None,
            timeout_ms: 3_000,
        }
    }
}

impl StoreSettings {
    /// Build the configured adapter. A kind without its location degrades to
    /// [`UnconfiguredStore`] so the service still answers.
    pub fn build(&self) -> anyhow::Result<Arc<dyn StoreAdapter>> {
        let store: Arc<dyn StoreAdapter> = match (self.kind, &self.path, &self.url) {
            (StoreKind::File, Some(path), _) => Arc::new(JsonFileStore::new(path.clone())),
            (StoreKind::Http, _, Some(url)) => {
                Arc::new(HttpStore::new(url.clone(), self.timeout_ms)?)
            }
            (StoreKind::None, _, _) => Arc::new(UnconfiguredStore),
            (kind, _, _) => {
                warn!(
                    target: "store",
                    ?kind,
                    "store kind set without path/url; running unconfigured"
                );
                Arc::new(UnconfiguredStore)
            }
        };
        Ok(store)
    }
}

/// Decode a rows payload: a JSON array of objects, an object wrapping such an
/// array under `records` or `rows`, or JSON Lines. Non-object entries are skipped.
///
/// In JSON Lines mode a line that does not parse is skipped and counted; the
/// payload is only rejected when no line parses at all.
pub(crate) fn decode_rows(payload: &str) -> Result<Vec<RawRow>, StoreError> {
    let trimmed = payload.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(value) => rows_from_value(value),
        Err(whole_err) => decode_lines(trimmed, &whole_err),
    }
}

fn decode_lines(
    payload: &str,
    whole_err: &serde_json::Error,
) -> Result<Vec<RawRow>, StoreError> {
    let mut rows = Vec::new();
    let mut parsed = 0usize;
    let mut first_bad: Option<String> = None;
    let mut skipped = 0u64;

    for (n, line) in payload.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<serde_json::Value>(line) {
            Ok(serde_json::Value::Object(map)) => {
                parsed += 1;
                rows.push(map);
            }
            Ok(_) => parsed += 1,
            Err(e) => {
                skipped += 1;
                if first_bad.is_none() {
                    first_bad = Some(format!("line {}: {e}", n + 1));
                }
            }
        }
    }

    if parsed == 0 {
        let detail = first_bad.unwrap_or_default();
        return Err(StoreError::Decode(format!("{whole_err}; {detail}")));
    }
    if skipped > 0 {
        warn!(
            target: "store",
            skipped,
            kept = rows.len(),
            first = first_bad.as_deref().unwrap_or(""),
            "skipped unreadable JSON lines"
        );
        counter!("news_store_skipped_lines_total").increment(skipped);
    }
    Ok(rows)
}

fn rows_from_value(value: serde_json::Value) -> Result<Vec<RawRow>, StoreError> {
    use serde_json::Value;
    let items = match value {
        Value::Array(items) => items,
        Value::Object(obj) if !obj.contains_key("records") && !obj.contains_key("rows") => {
            vec![Value::Object(obj)]
        }
        Value::Object(mut obj) => match (obj.remove("records"), obj.remove("rows")) {
            (Some(Value::Array(items)), _) | (_, Some(Value::Array(items))) => items,
            _ => {
                return Err(StoreError::Decode(
                    "`records`/`rows` wrapper is not an array".to_string(),
                ))
            }
        },
        _ => Vec::new(),
    };
    Ok(items
        .into_iter()
        .filter_map(|v| match v {
            Value::Object(map) => Some(map),
            _ => None,
        })
        .collect())
}
