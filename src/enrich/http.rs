//! HTTP enrichment client for the generation service.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use super::Enricher;
use crate::card::PromptFields;
use crate::error::EnrichError;

/// Client for the generation service's `POST /prompt` endpoint.
///
/// The request body is the omit-if-empty serialization of [`PromptFields`];
/// the response is a JSON object with a `response` string.
pub struct HttpEnricher {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpEnricher {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        anyhow::ensure!(
            base_url.starts_with("http://") || base_url.starts_with("https://"),
            "enrichment base URL must be an http(s) URL"
        );
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build enrichment HTTP client")?;
        let endpoint = format!("{}/prompt", base_url.trim_end_matches('/'));
        Ok(Self { client, endpoint })
    }
}

#[derive(Debug, Deserialize)]
struct PromptResponse {
    response: String,
}

#[async_trait]
impl Enricher for HttpEnricher {
    async fn enrich(&self, fields: &PromptFields) -> Result<String, EnrichError> {
        let resp = self
            .client
            .post(&self.endpoint)
            .json(fields)
            .send()
            .await
            .map_err(|e| EnrichError::Unavailable(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(EnrichError::Unavailable(format!(
                "prompt request answered HTTP {status}"
            )));
        }

        let body: PromptResponse = resp
            .json()
            .await
            .map_err(|e| EnrichError::Malformed(e.to_string()))?;

        Ok(body.response)
    }
}
