// tests/store_http.rs
//
// HttpStore against a local mock server: accepted body shapes, status
// failures and how the pipeline absorbs them.

use std::sync::Arc;

use realty_news_bot::store::{HttpStore, StoreAdapter, StoreError};
use realty_news_bot::{ConfigHandle, NewsConfig, NewsPipeline};

#[tokio::test]
async fn fetches_plain_json_array() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/sheet")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"[
                {"title": "금리 동결", "relevance_score": 81, "category": "금융·대출·금리"},
                {"title": "전세 시장 동향", "relevance_score": "77"}
            ]"#,
        )
        .create_async()
        .await;

    let store = HttpStore::new(format!("{}/sheet", server.url()), 2_000).expect("client");
    let rows = store.fetch_all().await.expect("rows");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["title"], "금리 동결");

    mock.assert_async().await;
}

#[tokio::test]
async fn fetches_wrapped_records_object() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/")
        .with_status(200)
        .with_body(r#"{"records": [{"title": "재건축 규제 완화"}], "updated": "2025-05-01"}"#)
        .create_async()
        .await;

    let store = HttpStore::new(server.url(), 2_000).expect("client");
    let rows = store.fetch_all().await.expect("rows");
    assert_eq!(rows.len(), 1);
    assert_eq!(store.name(), "http");

    mock.assert_async().await;
}

#[tokio::test]
async fn non_success_status_is_reported() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/")
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;

    let store = HttpStore::new(server.url(), 2_000).expect("client");
    match store.fetch_all().await {
        Err(StoreError::Status(code)) => assert_eq!(code, 500),
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn garbage_body_is_a_decode_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/")
        .with_status(200)
        .with_body("<html>not a sheet</html>")
        .create_async()
        .await;

    let store = HttpStore::new(server.url(), 2_000).expect("client");
    assert!(matches!(
        store.fetch_all().await,
        Err(StoreError::Decode(_))
    ));
}

#[tokio::test]
async fn pipeline_over_failing_store_answers_empty() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/")
        .with_status(503)
        .create_async()
        .await;

    let store = HttpStore::new(server.url(), 2_000).expect("client");
    let pipeline = NewsPipeline::new(Arc::new(store), ConfigHandle::new(NewsConfig::default()));

    let reply = pipeline.handle_request("대출 금리").await;
    assert!(reply.is_empty());
    assert_eq!(reply.display_text, "💰 금융·대출·금리 뉴스 (총 0건)");
}
