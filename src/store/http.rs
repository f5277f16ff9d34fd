// src/store/http.rs
//! Remote store: a URL serving the news sheet as JSON (e.g. a published
//! spreadsheet export or an Apps Script endpoint).

use super::{decode_rows, StoreAdapter, StoreError};
use crate::record::RawRow;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub struct HttpStore {
    url: String,
    client: Client,
}

impl HttpStore {
    pub fn new(url: String, timeout_ms: u64) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms.max(1)))
            .build()?;
        Ok(Self { url, client })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl StoreAdapter for HttpStore {
    async fn fetch_all(&self) -> Result<Vec<RawRow>, StoreError> {
        let resp = self.client.get(&self.url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(StoreError::Status(status.as_u16()));
        }
        let body = resp.text().await?;
        decode_rows(&body)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
