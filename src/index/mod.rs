//! Vector-index write path.
//!
//! Defines [`VectorDocument`] (the unit of output), the [`DocumentSink`]
//! capability trait, and [`upload_in_chunks`], the chunked write mode. The
//! production sink ([`http::HttpSink`]) talks to the vector-store service;
//! tests inject recording sinks.

pub mod http;

use async_trait::async_trait;
use serde::Serialize;
use tracing::warn;

use crate::card::{map_colors, RawCard};
use crate::error::UploadError;

/// Display/filtering metadata carried alongside the vectorizable text.
/// None of these fields feed the embedding step.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentMetadata {
    pub name: String,
    pub release_date: String,
    pub rarity: Option<String>,
    pub set_name: Option<String>,
    pub colors: Vec<String>,
    pub image_url: Option<String>,
    pub source_uri: String,
}

/// The unit of upload: identity, display metadata, and the composed text
/// that the store vectorizes.
#[derive(Debug, Clone, Serialize)]
pub struct VectorDocument {
    pub id: String,
    pub metadata: DocumentMetadata,
    pub data: String,
}

impl VectorDocument {
    /// Build the document for a card from its composed vectorizable text.
    /// `image_url` picks the `"normal"` variant from the image-URI map.
    pub fn new(card: &RawCard, data: String) -> Self {
        let colors = card
            .color_identity
            .as_deref()
            .map(map_colors)
            .unwrap_or_default();
        Self {
            id: card.oracle_id.clone(),
            metadata: DocumentMetadata {
                name: card.name.clone(),
                release_date: card.released_at.clone(),
                rarity: card.rarity.clone(),
                set_name: card.set_name.clone(),
                colors,
                image_url: card.image_uris.get("normal").cloned(),
                source_uri: card.scryfall_uri.clone(),
            },
            data,
        }
    }
}

/// A single document the store rejected inside an otherwise-delivered batch.
#[derive(Debug, Clone)]
pub struct DocumentFailure {
    pub id: String,
    pub message: String,
}

/// Trait for writing documents to the vector store.
///
/// `insert` is the per-record shape; `insert_batch` is the bounded-batch
/// shape, where `Err` means the whole batch failed in transport and `Ok`
/// carries the store's per-document rejections.
#[async_trait]
pub trait DocumentSink: Send + Sync {
    async fn insert(&self, doc: &VectorDocument) -> Result<(), UploadError>;

    async fn insert_batch(
        &self,
        docs: &[VectorDocument],
    ) -> Result<Vec<DocumentFailure>, UploadError>;
}

/// Outcome of a chunked upload pass.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ChunkReport {
    pub chunks: usize,
    pub uploaded: usize,
    pub failed: usize,
}

/// Write documents in chunks of `chunk_size`, in input order.
///
/// Chunk boundaries align exactly on `chunk_size` except for the final,
/// possibly-shorter chunk. A chunk that fails in transport is abandoned —
/// not retried — and the remaining chunks still run. Per-document
/// rejections inside a delivered chunk are logged individually.
pub async fn upload_in_chunks(
    sink: &dyn DocumentSink,
    docs: &[VectorDocument],
    chunk_size: usize,
) -> ChunkReport {
    let mut report = ChunkReport::default();
    for chunk in docs.chunks(chunk_size.max(1)) {
        report.chunks += 1;
        match sink.insert_batch(chunk).await {
            Ok(failures) => {
                for failure in &failures {
                    warn!(id = %failure.id, error = %failure.message, "vector store rejected document");
                }
                report.uploaded += chunk.len() - failures.len();
                report.failed += failures.len();
            }
            Err(err) => {
                warn!(size = chunk.len(), error = %err, "chunk upload failed, abandoning chunk");
                report.failed += chunk.len();
            }
        }
    }
    report
}
