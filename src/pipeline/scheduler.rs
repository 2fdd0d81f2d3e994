//! Bounded worker-pool execution of the per-record pipeline.
//!
//! All eligible records are enqueued up front into a queue sized to the
//! record count, so the producer never blocks. N workers share the
//! receiver and each runs enrich → compose → upload for one record at a
//! time; the caller is blocked until every worker has drained the queue
//! and exited. Records are independent units of network I/O, so the only
//! synchronization is the queue itself, the shared counters, and the
//! completion barrier.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use indicatif::ProgressBar;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::card::{PromptFields, RawCard};
use crate::config::UploadMode;
use crate::enrich::Enricher;
use crate::index::{self, DocumentSink, VectorDocument};

/// Cooperative cancellation signal, checked before each per-record
/// pipeline starts. Once set, workers drain the queue without processing.
pub type CancelFlag = Arc<AtomicBool>;

/// Tunables for one fan-out phase.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub workers: usize,
    pub upload_mode: UploadMode,
    pub chunk_size: usize,
}

/// Totals from one fan-out phase.
#[derive(Debug, Default)]
pub struct SchedulerReport {
    pub enrich_failures: usize,
    pub uploaded: usize,
    pub upload_failures: usize,
    /// Records dequeued after cancellation and never processed.
    pub skipped: usize,
}

#[derive(Default)]
struct RunMetrics {
    enrich_failures: AtomicUsize,
    uploaded: AtomicUsize,
    upload_failures: AtomicUsize,
    skipped: AtomicUsize,
}

/// Run the per-record pipeline for every record, bounded to
/// `options.workers` concurrent in-flight records, and block until all
/// workers exit.
///
/// In [`UploadMode::Single`] each worker uploads its own document. In
/// [`UploadMode::Chunked`] workers only enrich and compose; documents are
/// collected, restored to enqueue order, and written in one sequential
/// chunk pass after the barrier.
pub async fn run_batch(
    records: Vec<RawCard>,
    enricher: Arc<dyn Enricher>,
    sink: Arc<dyn DocumentSink>,
    options: &RunOptions,
    cancel: CancelFlag,
    progress: Option<ProgressBar>,
) -> SchedulerReport {
    let total = records.len();
    let metrics = Arc::new(RunMetrics::default());
    let collected: Arc<Mutex<Vec<(usize, VectorDocument)>>> =
        Arc::new(Mutex::new(Vec::with_capacity(total)));

    if total > 0 {
        // Queue capacity equals the record count, so enqueueing below
        // never blocks the producer.
        let (tx, rx) = mpsc::channel::<(usize, RawCard)>(total);
        let rx = Arc::new(Mutex::new(rx));

        let mut workers = JoinSet::new();
        for _ in 0..options.workers.max(1) {
            workers.spawn(worker_loop(
                rx.clone(),
                enricher.clone(),
                sink.clone(),
                options.clone(),
                cancel.clone(),
                metrics.clone(),
                collected.clone(),
                progress.clone(),
            ));
        }

        for item in records.into_iter().enumerate() {
            if tx.send(item).await.is_err() {
                break;
            }
        }
        drop(tx);

        // Completion barrier: the batch is done only when every worker has
        // observed the closed, empty queue.
        while let Some(joined) = workers.join_next().await {
            if let Err(err) = joined {
                warn!(error = %err, "worker task failed");
            }
        }
    }

    let mut report = SchedulerReport {
        enrich_failures: metrics.enrich_failures.load(Ordering::Relaxed),
        uploaded: metrics.uploaded.load(Ordering::Relaxed),
        upload_failures: metrics.upload_failures.load(Ordering::Relaxed),
        skipped: metrics.skipped.load(Ordering::Relaxed),
    };

    if options.upload_mode == UploadMode::Chunked {
        let mut docs = match Arc::try_unwrap(collected) {
            Ok(mutex) => mutex.into_inner(),
            Err(arc) => std::mem::take(&mut *arc.lock().await),
        };
        if cancel.load(Ordering::Relaxed) {
            report.skipped += docs.len();
        } else {
            // Chunk order must follow enqueue order, not completion order.
            docs.sort_by_key(|(idx, _)| *idx);
            let docs: Vec<VectorDocument> = docs.into_iter().map(|(_, doc)| doc).collect();
            let chunk_report =
                index::upload_in_chunks(sink.as_ref(), &docs, options.chunk_size).await;
            report.uploaded += chunk_report.uploaded;
            report.upload_failures += chunk_report.failed;
        }
    }

    report
}

#[allow(clippy::too_many_arguments)]
async fn worker_loop(
    rx: Arc<Mutex<mpsc::Receiver<(usize, RawCard)>>>,
    enricher: Arc<dyn Enricher>,
    sink: Arc<dyn DocumentSink>,
    options: RunOptions,
    cancel: CancelFlag,
    metrics: Arc<RunMetrics>,
    collected: Arc<Mutex<Vec<(usize, VectorDocument)>>>,
    progress: Option<ProgressBar>,
) {
    loop {
        // Hold the receiver lock only for the dequeue, never across the
        // record pipeline.
        let next = { rx.lock().await.recv().await };
        let Some((position, card)) = next else {
            break;
        };

        if cancel.load(Ordering::Relaxed) {
            metrics.skipped.fetch_add(1, Ordering::Relaxed);
            continue;
        }

        let doc = process_record(&card, enricher.as_ref(), &metrics).await;

        match options.upload_mode {
            UploadMode::Single => match sink.insert(&doc).await {
                Ok(()) => {
                    debug!(card = %card.name, id = %doc.id, "document uploaded");
                    metrics.uploaded.fetch_add(1, Ordering::Relaxed);
                }
                Err(err) => {
                    warn!(card = %card.name, error = %err, "upload failed, abandoning record");
                    metrics.upload_failures.fetch_add(1, Ordering::Relaxed);
                }
            },
            UploadMode::Chunked => {
                collected.lock().await.push((position, doc));
            }
        }

        if let Some(pb) = &progress {
            pb.inc(1);
        }
    }
}

/// Enrich one card and compose its document. Enrichment failure degrades
/// to empty enrichment text — the record is never dropped here.
async fn process_record(
    card: &RawCard,
    enricher: &dyn Enricher,
    metrics: &RunMetrics,
) -> VectorDocument {
    let fields = PromptFields::from_card(card);
    let enrichment = match enricher.enrich(&fields).await {
        Ok(text) => {
            debug!(card = %card.name, "enrichment received");
            text
        }
        Err(err) => {
            warn!(card = %card.name, error = %err, "enrichment failed, proceeding without description");
            metrics.enrich_failures.fetch_add(1, Ordering::Relaxed);
            String::new()
        }
    };

    let data = super::compose::compose_vector_text(card, &enrichment);
    VectorDocument::new(card, data)
}
