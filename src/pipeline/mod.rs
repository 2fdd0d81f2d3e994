//! The transform-enrich-upload pipeline.
//!
//! [`run_ingestion`] is the single entry point for one batch pass: load
//! the bulk dump, run the sequential dedup/filter pass, fan eligible
//! records out to the bounded worker pool, and return a [`BatchSummary`].
//! The sequential stages must finish before fan-out — input order decides
//! which duplicate survives.

pub mod compose;
pub mod filter;
pub mod loader;
pub mod scheduler;

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use indicatif::ProgressBar;
use serde::Serialize;
use tracing::info;

use crate::config::CardexConfig;
use crate::enrich::{http::HttpEnricher, Enricher};
use crate::index::{http::HttpSink, DocumentSink};
use scheduler::{CancelFlag, RunOptions};

/// Structured result of one ingestion pass.
#[derive(Debug, Serialize)]
pub struct BatchSummary {
    pub run_id: String,
    pub started_at: String,
    pub loaded: usize,
    pub eligible: usize,
    pub dropped_tokens: usize,
    pub dropped_empty: usize,
    pub dropped_duplicates: usize,
    pub enrich_failures: usize,
    pub uploaded: usize,
    pub upload_failures: usize,
    pub skipped: usize,
    pub elapsed_ms: u64,
}

/// Run one full ingestion pass with the production HTTP clients.
pub async fn run_ingestion(config: &CardexConfig, cancel: CancelFlag) -> Result<BatchSummary> {
    let timeout = config.request_timeout();
    let enricher: Arc<dyn Enricher> =
        Arc::new(HttpEnricher::new(&config.service.base_url, timeout)?);
    let sink: Arc<dyn DocumentSink> = Arc::new(HttpSink::new(&config.service.base_url, timeout)?);
    run_with(config, enricher, sink, cancel).await
}

/// Run one full ingestion pass with injected clients. Tests drive the
/// whole pipeline through this seam with mock implementations.
pub async fn run_with(
    config: &CardexConfig,
    enricher: Arc<dyn Enricher>,
    sink: Arc<dyn DocumentSink>,
    cancel: CancelFlag,
) -> Result<BatchSummary> {
    let run_id = uuid::Uuid::now_v7().to_string();
    let started_at = chrono::Utc::now().to_rfc3339();
    let started = Instant::now();

    let path = config.resolved_source_path();
    let cards = loader::load_cards(&path)?;
    let loaded = cards.len();
    info!(run_id = %run_id, count = loaded, path = %path.display(), "card records loaded");

    let outcome = filter::filter_eligible(cards);
    let eligible = outcome.eligible.len();
    info!(
        eligible,
        tokens = outcome.dropped_tokens,
        empty = outcome.dropped_empty,
        duplicates = outcome.dropped_duplicates,
        "filter pass complete"
    );

    let options = RunOptions {
        workers: config.pipeline.workers,
        upload_mode: config.pipeline.upload_mode,
        chunk_size: config.pipeline.chunk_size,
    };
    let progress = ProgressBar::new(eligible as u64);
    let report = scheduler::run_batch(
        outcome.eligible,
        enricher,
        sink,
        &options,
        cancel,
        Some(progress.clone()),
    )
    .await;
    progress.finish_and_clear();

    let summary = BatchSummary {
        run_id,
        started_at,
        loaded,
        eligible,
        dropped_tokens: outcome.dropped_tokens,
        dropped_empty: outcome.dropped_empty,
        dropped_duplicates: outcome.dropped_duplicates,
        enrich_failures: report.enrich_failures,
        uploaded: report.uploaded,
        upload_failures: report.upload_failures,
        skipped: report.skipped,
        elapsed_ms: started.elapsed().as_millis() as u64,
    };
    info!(
        uploaded = summary.uploaded,
        failed = summary.upload_failures,
        enrich_failures = summary.enrich_failures,
        elapsed_ms = summary.elapsed_ms,
        "ingestion pass complete"
    );
    Ok(summary)
}

/// A fresh, unset cancellation flag.
pub fn cancel_flag() -> CancelFlag {
    Arc::new(AtomicBool::new(false))
}
