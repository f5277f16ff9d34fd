//! Runs a few chat messages through the pipeline against the configured store
//! and prints the replies, without the HTTP layer.
//!
//! `cargo run --bin news_demo -- "분양 소식" "요즘 집값"`

use realty_news_bot::{ConfigHandle, NewsConfig, NewsPipeline};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().with_target(false).init();

    let cfg = NewsConfig::load()?;
    let store = cfg.store.build()?;
    let pipeline = NewsPipeline::new(store, ConfigHandle::new(cfg));

    let mut messages: Vec<String> = std::env::args().skip(1).collect();
    if messages.is_empty() {
        messages = vec!["뉴스".into(), "정책 뉴스".into(), "청약 일정".into()];
    }

    for msg in messages {
        let reply = pipeline.handle_request(&msg).await;
        println!("> {msg}");
        println!("{}\n", reply.display_text);
    }

    println!("news-demo done");
    Ok(())
}
