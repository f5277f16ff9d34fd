// src/record.rs
//! Fixed-shape news record built from the loosely typed rows a store returns.
//!
//! Coercion rules (never fail):
//! - `relevance_score`: integer, float (truncated) or numeric text; else 0
//! - `keywords`: comma-separated text or array of strings; trimmed, empties dropped
//! - `has_price` / `has_policy`: bool or text (`true/1/yes/y`), else false
//! - text fields: strings as-is, numbers stringified, anything else empty
//! - `title`: `<b>`/`</b>` highlights removed, HTML entities decoded, trimmed
//! - link fields (`url`, `link`, `originallink`): blank counts as absent

use once_cell::sync::OnceCell;
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// One raw key/value row as delivered by a store adapter.
pub type RawRow = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct NewsRecord {
    pub title: String,
    pub description: String,
    pub url: Option<String>,
    /// Alternate link column used by older ingestion runs.
    pub link: Option<String>,
    /// Publisher link column from the search API.
    pub originallink: Option<String>,
    pub relevance_score: i64,
    pub keywords: BTreeSet<String>,
    pub region: String,
    pub category: String,
    pub has_price: bool,
    pub has_policy: bool,
    /// Lexicographically sortable date-time; the only recency key.
    pub timestamp: String,
}

impl NewsRecord {
    pub fn from_row(row: &RawRow) -> Self {
        Self {
            title: clean_title(&text_field(row, "title")),
            description: text_field(row, "description"),
            url: link_field(row, "url"),
            link: link_field(row, "link"),
            originallink: link_field(row, "originallink"),
            relevance_score: coerce_score(row.get("relevance_score")),
            keywords: coerce_keywords(row.get("keywords")),
            region: text_field(row, "region"),
            category: text_field(row, "category"),
            has_price: coerce_bool(row.get("has_price")),
            has_policy: coerce_bool(row.get("has_policy")),
            timestamp: text_field(row, "timestamp").trim().to_string(),
        }
    }

    /// Link to show: `url`, then `link`, then `originallink`.
    pub fn resolved_link(&self) -> Option<&str> {
        self.url
            .as_deref()
            .or(self.link.as_deref())
            .or(self.originallink.as_deref())
    }
}

pub fn records_from_rows(rows: &[RawRow]) -> Vec<NewsRecord> {
    rows.iter().map(NewsRecord::from_row).collect()
}

/// Score coercion; a missing or malformed value scores 0.
pub fn coerce_score(v: Option<&Value>) -> i64 {
    match v {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse::<i64>().unwrap_or(0),
        _ => 0,
    }
}

pub fn coerce_keywords(v: Option<&Value>) -> BTreeSet<String> {
    let mut out = BTreeSet::new();
    match v {
        Some(Value::String(s)) => {
            for part in s.split(',') {
                push_token(&mut out, part);
            }
        }
        Some(Value::Array(items)) => {
            for it in items {
                if let Value::String(s) = it {
                    push_token(&mut out, s);
                }
            }
        }
        _ => {}
    }
    out
}

fn push_token(out: &mut BTreeSet<String>, raw: &str) {
    let t = raw.trim();
    if !t.is_empty() {
        out.insert(t.to_string());
    }
}

pub fn coerce_bool(v: Option<&Value>) -> bool {
    match v {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_i64() == Some(1),
        Some(Value::String(s)) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "true" | "1" | "yes" | "y"
        ),
        _ => false,
    }
}

fn text_field(row: &RawRow, key: &str) -> String {
    match row.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn link_field(row: &RawRow, key: &str) -> Option<String> {
    let s = text_field(row, key);
    let t = s.trim();
    (!t.is_empty()).then(|| t.to_string())
}

/// Search-API titles carry `<b>` highlights and HTML entities; strip the
/// highlight tags, decode entities and trim. Everything else is kept as written.
pub fn clean_title(s: &str) -> String {
    static RE_HIGHLIGHT: OnceCell<Regex> = OnceCell::new();
    let re = RE_HIGHLIGHT.get_or_init(|| Regex::new(r"(?i)</?b>").unwrap());
    let stripped = re.replace_all(s, "");
    html_escape::decode_html_entities(&stripped).trim().to_string()
}

/// Best-effort check that a timestamp starts like `YYYY-MM-DD`.
/// Only used for diagnostics; ranking still uses the raw string.
pub fn looks_sortable(ts: &str) -> bool {
    static RE_TS: OnceCell<Regex> = OnceCell::new();
    let re = RE_TS.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}").unwrap());
    re.is_match(ts)
}
