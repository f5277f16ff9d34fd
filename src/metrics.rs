// src/metrics.rs
//! Prometheus exposition for the news pipeline series.
//!
//! The pipeline records through the `metrics` facade; without an installed
//! recorder (tests, the demo binary) those calls are no-ops.

use axum::{routing::get, Router};
use metrics::gauge;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

#[derive(Clone)]
pub struct Metrics {
    handle: PrometheusHandle,
}

impl Metrics {
    /// Install the global recorder and publish `news_build_info`.
    /// Fails if a recorder is already installed in this process.
    pub fn init() -> anyhow::Result<Self> {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .map_err(|e| anyhow::anyhow!("prometheus: install recorder: {e}"))?;

        gauge!("news_build_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);
        Ok(Self { handle })
    }

    pub fn render(&self) -> String {
        self.handle.render()
    }

    /// `GET /metrics` in text exposition format.
    pub fn router(&self) -> Router {
        let metrics = self.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let m = metrics.clone();
                async move { m.render() }
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigHandle, NewsConfig};
    use crate::pipeline::NewsPipeline;
    use crate::store::UnconfiguredStore;
    use std::sync::Arc;

    // Only test in the lib binary that installs the global recorder.
    #[tokio::test]
    async fn pipeline_series_show_up_after_a_request() {
        let m = Metrics::init().expect("first install");
        assert!(Metrics::init().is_err(), "second install must fail");

        let p = NewsPipeline::new(
            Arc::new(UnconfiguredStore),
            ConfigHandle::new(NewsConfig::default()),
        );
        p.handle_request("청약").await;

        let body = m.render();
        assert!(body.contains("news_build_info"));
        assert!(body.contains("news_requests_total"));
        assert!(body.contains("branch=\"category\""));
        assert!(body.contains("news_store_errors_total"));
        assert!(body.contains("news_rules_version"));
    }
}
