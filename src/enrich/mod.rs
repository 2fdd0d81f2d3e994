//! Card enrichment.
//!
//! Provides the [`Enricher`] trait and the production HTTP implementation
//! ([`http::HttpEnricher`]) that asks the generation service to describe a
//! card in natural language. Enrichment is a priced side effect — one
//! outbound call per invocation, no caching, no retry.

pub mod http;

use async_trait::async_trait;

use crate::card::PromptFields;
use crate::error::EnrichError;

/// Trait for generating descriptive text from a card's normalized fields.
///
/// A failed call yields an [`EnrichError`]; the caller substitutes empty
/// enrichment text and the record proceeds degraded rather than dropped.
#[async_trait]
pub trait Enricher: Send + Sync {
    /// Generate a description for one card. One network call per invocation.
    async fn enrich(&self, fields: &PromptFields) -> Result<String, EnrichError>;
}
