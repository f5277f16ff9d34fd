// src/pipeline.rs
//! Request pipeline: classify the message, fetch records, select, format.
//!
//! Store failures never escape: an unavailable or empty store simply yields an
//! empty selection, which the webhook layer turns into a "no news yet" reply.

use crate::category::Category;
use crate::config::ConfigHandle;
use crate::format::format_news;
use crate::record::{looks_sortable, records_from_rows, NewsRecord};
use crate::store::StoreAdapter;
use metrics::{
    counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram,
};
use once_cell::sync::OnceCell;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "news_requests_total",
            "News requests by branch (latest/category)."
        );
        describe_counter!(
            "news_empty_results_total",
            "Requests whose selection came back empty."
        );
        describe_counter!(
            "news_store_errors_total",
            "Record store fetch failures (answered with no records)."
        );
        describe_counter!(
            "news_store_skipped_lines_total",
            "JSON Lines rows skipped because they did not parse."
        );
        describe_counter!(
            "news_request_timeouts_total",
            "Webhook calls that hit the request timeout."
        );
        describe_histogram!("news_pipeline_ms", "Pipeline time in milliseconds.");
        describe_gauge!(
            "news_rules_version",
            "Version of the active keyword rule table."
        );
    });
}

/// Short, non-reversible id for log lines. Raw user text and ids are never logged.
pub(crate) fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let digest = Sha256::digest(text.as_bytes());
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

/// What the core hands to the webhook layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineReply {
    /// Category used for the header, if the message named one.
    pub category: Option<Category>,
    pub display_text: String,
    /// Number of records in `display_text`.
    pub items: usize,
}

impl PipelineReply {
    pub fn is_empty(&self) -> bool {
        self.items == 0
    }
}

#[derive(Clone)]
pub struct NewsPipeline {
    store: Arc<dyn StoreAdapter>,
    config: ConfigHandle,
}

impl NewsPipeline {
    pub fn new(store: Arc<dyn StoreAdapter>, config: ConfigHandle) -> Self {
        ensure_metrics_described();
        Self { store, config }
    }

    pub fn config(&self) -> &ConfigHandle {
        &self.config
    }

    pub fn store_name(&self) -> &'static str {
        self.store.name()
    }

    pub async fn handle_request(&self, message: &str) -> PipelineReply {
        let started = Instant::now();
        let cfg = self.config.current();

        let rule = cfg.classifier.classify_with_rule(message);
        let category = rule.map(|r| r.category);
        debug!(
            target: "news",
            msg = %anon_hash(message),
            keyword = rule.map(|r| r.keyword.as_str()),
            category = category.map(Category::label),
            rules_version = cfg.rules_version,
            "classified"
        );

        let records = self.load_records().await;
        let selected = match category {
            Some(c) => cfg.selection.by_category(&records, c),
            None => cfg.selection.latest(&records),
        };

        let branch = if category.is_some() { "category" } else { "latest" };
        counter!("news_requests_total", "branch" => branch).increment(1);
        if selected.is_empty() {
            counter!("news_empty_results_total", "branch" => branch).increment(1);
        }
        histogram!("news_pipeline_ms").record(started.elapsed().as_secs_f64() * 1000.0);
        gauge!("news_rules_version").set(f64::from(cfg.rules_version));

        info!(
            target: "news",
            branch,
            category = category.map(Category::label),
            total = records.len(),
            selected = selected.len(),
            "news selected"
        );

        PipelineReply {
            category,
            display_text: format_news(&selected, category),
            items: selected.len(),
        }
    }

    /// Fetch and coerce rows; any store failure becomes an empty set.
    async fn load_records(&self) -> Vec<NewsRecord> {
        let rows = match self.store.fetch_all().await {
            Ok(rows) => rows,
            Err(e) => {
                warn!(
                    target: "store",
                    store = self.store.name(),
                    error = %e,
                    "store unavailable; answering with no records"
                );
                counter!("news_store_errors_total").increment(1);
                return Vec::new();
            }
        };
        if rows.is_empty() {
            warn!(target: "store", store = self.store.name(), "store returned no rows");
        }

        let records = records_from_rows(&rows);
        let unsortable = records
            .iter()
            .filter(|r| !looks_sortable(&r.timestamp))
            .count();
        if unsortable > 0 {
            debug!(
                target: "store",
                unsortable,
                "records with non ISO-8601 timestamps; ranking may be off"
            );
        }
        records
    }
}
