// src/api.rs
//! HTTP surface: the Kakao skill webhook plus health probes.
//!
//! `/news` always answers 200 with a well-formed skill response; empty results,
//! unreadable bodies and timeouts are turned into user-facing text here.

use std::time::Duration;

use axum::{
    body::Bytes,
    extract::State,
    routing::{get, post},
    Json, Router,
};
use metrics::counter;
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::kakao::{empty_result_message, SkillRequest, SkillResponse, MSG_FAILURE};
use crate::pipeline::{anon_hash, NewsPipeline};

pub const SERVICE_NAME: &str = "오백냥 부동산 뉴스봇";

#[derive(Clone)]
pub struct AppState {
    pub pipeline: NewsPipeline,
}

impl AppState {
    pub fn new(pipeline: NewsPipeline) -> Self {
        Self { pipeline }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/health/ping", get(ping))
        .route("/news", post(news))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

async fn news(State(state): State<AppState>, body: Bytes) -> Json<SkillResponse> {
    let req: SkillRequest = match serde_json::from_slice(&body) {
        Ok(r) => r,
        Err(e) => {
            warn!(target: "api", error = %e, "unreadable skill request");
            return Json(SkillResponse::simple_text(MSG_FAILURE).with_category_menu());
        }
    };

    info!(
        target: "api",
        user = %anon_hash(req.user_id()),
        msg = %anon_hash(req.utterance()),
        "news request"
    );

    let timeout_ms = state.pipeline.config().current().service.request_timeout_ms;
    let budget = Duration::from_millis(timeout_ms);
    let pending = state.pipeline.handle_request(req.utterance());
    let reply = match tokio::time::timeout(budget, pending).await {
        Ok(reply) => reply,
        Err(_) => {
            warn!(target: "api", timeout_ms, "news pipeline timed out");
            counter!("news_request_timeouts_total").increment(1);
            return Json(SkillResponse::simple_text(MSG_FAILURE).with_category_menu());
        }
    };

    let text = if reply.is_empty() {
        empty_result_message(reply.category)
    } else {
        reply.display_text
    };
    Json(SkillResponse::simple_text(&text).with_category_menu())
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Local::now().to_rfc3339(),
    }))
}

async fn ping() -> Json<Value> {
    Json(json!({
        "alive": true,
        "timestamp": chrono::Local::now().to_rfc3339(),
    }))
}
