#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use cardex::card::{PromptFields, RawCard};
use cardex::enrich::Enricher;
use cardex::error::{EnrichError, UploadError};
use cardex::index::{DocumentFailure, DocumentSink, VectorDocument};

/// Build a minimal card record for filter/pipeline fixtures.
pub fn card(oracle_id: &str, type_line: &str, oracle_text: Option<&str>) -> RawCard {
    RawCard {
        oracle_id: oracle_id.into(),
        name: format!("card-{oracle_id}"),
        type_line: type_line.into(),
        oracle_text: oracle_text.map(Into::into),
        ..Default::default()
    }
}

/// An eligible (non-token, with rules text) card with a distinct id.
pub fn eligible_card(n: usize) -> RawCard {
    card(&format!("id-{n}"), "Instant", Some("Draw a card."))
}

/// Enricher that counts invocations and answers instantly.
pub struct MockEnricher {
    calls: AtomicUsize,
    fail: bool,
}

impl MockEnricher {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: false,
        }
    }

    /// An enricher whose every call fails as unavailable.
    pub fn failing() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: true,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Enricher for MockEnricher {
    async fn enrich(&self, fields: &PromptFields) -> Result<String, EnrichError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(EnrichError::Unavailable("mock enrichment outage".into()));
        }
        Ok(format!("describes a {} card", fields.type_line))
    }
}

/// Sink that records delivered documents and batch-call sizes, with
/// injectable per-document and whole-chunk failures.
#[derive(Default)]
pub struct MockSink {
    pub docs: Mutex<Vec<VectorDocument>>,
    pub batch_sizes: Mutex<Vec<usize>>,
    /// Documents with these ids are rejected individually.
    pub fail_ids: Vec<String>,
    /// These `insert_batch` call indices (0-based) fail in transport.
    pub fail_chunks: Vec<usize>,
}

impl MockSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recorded(&self) -> Vec<VectorDocument> {
        self.docs.lock().unwrap().clone()
    }

    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batch_sizes.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentSink for MockSink {
    async fn insert(&self, doc: &VectorDocument) -> Result<(), UploadError> {
        if self.fail_ids.iter().any(|id| id == &doc.id) {
            return Err(UploadError(format!("mock rejection of {}", doc.id)));
        }
        self.docs.lock().unwrap().push(doc.clone());
        Ok(())
    }

    async fn insert_batch(
        &self,
        docs: &[VectorDocument],
    ) -> Result<Vec<DocumentFailure>, UploadError> {
        let call_index = {
            let mut sizes = self.batch_sizes.lock().unwrap();
            sizes.push(docs.len());
            sizes.len() - 1
        };
        if self.fail_chunks.contains(&call_index) {
            return Err(UploadError(format!(
                "mock transport failure for chunk {call_index}"
            )));
        }

        let mut failures = Vec::new();
        for doc in docs {
            if self.fail_ids.iter().any(|id| id == &doc.id) {
                failures.push(DocumentFailure {
                    id: doc.id.clone(),
                    message: "mock rejection".into(),
                });
            } else {
                self.docs.lock().unwrap().push(doc.clone());
            }
        }
        Ok(failures)
    }
}
