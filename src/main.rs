//! Real-estate news bot: binary entrypoint.
//! Boots the Axum HTTP server: config, record store, pipeline, routes and metrics.

use realty_news_bot::{build_app, metrics::Metrics, NewsConfig};
use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Compact logs for local runs. The Shuttle runtime installs its own subscriber
/// in deployed environments, in which case this is a no-op.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();
    init_tracing();

    tracing::info!(target: "news", "starting {}", realty_news_bot::api::SERVICE_NAME);

    let cfg = NewsConfig::load()?;
    let mut router = build_app(cfg)?;

    match Metrics::init() {
        Ok(m) => router = router.merge(m.router()),
        Err(e) => tracing::warn!(error = %e, "metrics disabled"),
    }

    tracing::info!(target: "news", "ready: POST /news, GET /health, GET /metrics");
    Ok(router.into())
}
