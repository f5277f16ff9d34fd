// src/select.rs
//! Selectors: narrow the full record set to a ranked, limited slice.
//!
//! Both selectors sort newest first by comparing `timestamp` strings. The sort is
//! stable, so records with equal timestamps keep their store order.

use crate::category::Category;
use crate::record::NewsRecord;
use serde::{Deserialize, Serialize};

pub const DEFAULT_RELEVANCE_THRESHOLD: i64 = 75;
pub const DEFAULT_LIMIT: usize = 5;

/// Selection policy shared by both branches of the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionPolicy {
    pub relevance_threshold: i64,
    pub latest_limit: usize,
    pub category_limit: usize,
    /// Whether category queries also require `relevance_threshold`.
    pub category_applies_threshold: bool,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self {
            relevance_threshold: DEFAULT_RELEVANCE_THRESHOLD,
            latest_limit: DEFAULT_LIMIT,
            category_limit: DEFAULT_LIMIT,
            category_applies_threshold: false,
        }
    }
}

impl SelectionPolicy {
    pub fn latest(&self, records: &[NewsRecord]) -> Vec<NewsRecord> {
        select_latest(records, self.relevance_threshold, self.latest_limit)
    }

    pub fn by_category(&self, records: &[NewsRecord], category: Category) -> Vec<NewsRecord> {
        let min_score = self
            .category_applies_threshold
            .then_some(self.relevance_threshold);
        select_matching(records, self.category_limit, |r| {
            category.matches_field(&r.category)
                && min_score.map_or(true, |t| r.relevance_score >= t)
        })
    }
}

/// Newest `limit` records scoring at least `threshold`.
pub fn select_latest(records: &[NewsRecord], threshold: i64, limit: usize) -> Vec<NewsRecord> {
    select_matching(records, limit, |r| r.relevance_score >= threshold)
}

/// Newest `limit` records whose trimmed category equals `category`, any score.
pub fn select_by_category(
    records: &[NewsRecord],
    category: Category,
    limit: usize,
) -> Vec<NewsRecord> {
    select_matching(records, limit, |r| category.matches_field(&r.category))
}

fn select_matching<F>(records: &[NewsRecord], limit: usize, keep: F) -> Vec<NewsRecord>
where
    F: Fn(&NewsRecord) -> bool,
{
    let mut kept: Vec<&NewsRecord> = records.iter().filter(|&r| keep(r)).collect();
    kept.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    kept.into_iter().take(limit).cloned().collect()
}
