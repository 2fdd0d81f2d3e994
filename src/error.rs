//! Error taxonomy for the ingestion pipeline.
//!
//! Loader errors ([`LoadError`]) are fatal to a batch — nothing has been
//! admitted yet. Enrichment ([`EnrichError`]) and upload ([`UploadError`])
//! errors are recoverable per record or per chunk: the failing unit is
//! logged and abandoned, sibling workers keep running, nothing is retried.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to produce the raw record batch from the bulk source.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The source file could not be opened or read.
    #[error("failed to read card source {}", path.display())]
    SourceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The payload did not parse as a well-formed collection of records.
    #[error("failed to decode card source {}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure of a single enrichment call.
///
/// Either way the record proceeds with empty enrichment text — these are
/// degradations, not drops.
#[derive(Debug, Error)]
pub enum EnrichError {
    /// The endpoint could not be reached, timed out, or answered non-2xx.
    #[error("enrichment service unavailable: {0}")]
    Unavailable(String),

    /// The response body did not decode as the documented shape.
    #[error("enrichment response malformed: {0}")]
    Malformed(String),
}

/// Failure to write a document (or a whole chunk) to the vector store.
#[derive(Debug, Error)]
#[error("upload failed: {0}")]
pub struct UploadError(pub String);
