// src/lib.rs
// Public library surface for the server binary, the demo and integration tests.

pub mod api;
pub mod category;
pub mod classify;
pub mod config;
pub mod format;
pub mod kakao;
pub mod metrics;
pub mod pipeline;
pub mod record;
pub mod select;
pub mod store;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::category::Category;
pub use crate::classify::{Classifier, KeywordRule};
pub use crate::config::{ConfigHandle, NewsConfig};
pub use crate::pipeline::{NewsPipeline, PipelineReply};
pub use crate::record::{NewsRecord, RawRow};
pub use crate::store::{StoreAdapter, StoreError};

use tracing::info;

/// Build the full service from config: store, pipeline and router.
/// Hot reload of the config file is started here when enabled.
pub fn build_app(cfg: NewsConfig) -> anyhow::Result<axum::Router> {
    let store = cfg.store.build()?;
    info!(
        target: "news",
        rules_version = cfg.rules_version,
        rules = cfg.classifier.rules().len(),
        threshold = cfg.selection.relevance_threshold,
        category_applies_threshold = cfg.selection.category_applies_threshold,
        store = store.name(),
        "news pipeline configured"
    );

    let handle = ConfigHandle::new(cfg);
    config::start_hot_reload_thread(handle.clone(), config::config_path());

    let pipeline = NewsPipeline::new(store, handle);
    Ok(api::router(AppState::new(pipeline)))
}
