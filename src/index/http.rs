//! HTTP upload client for the vector-store service.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;

use super::{DocumentFailure, DocumentSink, VectorDocument};
use crate::error::UploadError;

/// Client for the vector store's `POST /insert` endpoint.
pub struct HttpSink {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpSink {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        anyhow::ensure!(
            base_url.starts_with("http://") || base_url.starts_with("https://"),
            "upload base URL must be an http(s) URL"
        );
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build upload HTTP client")?;
        let endpoint = format!("{}/insert", base_url.trim_end_matches('/'));
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl DocumentSink for HttpSink {
    async fn insert(&self, doc: &VectorDocument) -> Result<(), UploadError> {
        let resp = self
            .client
            .post(&self.endpoint)
            .json(doc)
            .send()
            .await
            .map_err(|e| UploadError(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(UploadError(format!(
                "insert of document {} answered HTTP {status}",
                doc.id
            )));
        }
        Ok(())
    }

    /// The HTTP boundary has no native batch write, so a batch degrades to
    /// per-document inserts. Individual failures are reported per document
    /// rather than failing the chunk.
    async fn insert_batch(
        &self,
        docs: &[VectorDocument],
    ) -> Result<Vec<DocumentFailure>, UploadError> {
        let mut failures = Vec::new();
        for doc in docs {
            if let Err(err) = self.insert(doc).await {
                failures.push(DocumentFailure {
                    id: doc.id.clone(),
                    message: err.to_string(),
                });
            }
        }
        Ok(failures)
    }
}
