//! Tagging-model port.
//!
//! Defines the interface for extracting structured attributes from
//! free-text product names and descriptions. Implementations wrap a large
//! language model provider; the monitor batches products per request to
//! bound round-trips and cost.

use async_trait::async_trait;

use crate::domain::ProductTags;
use crate::error::Result;

/// One product's free text handed to the model.
#[derive(Debug, Clone, PartialEq)]
pub struct TagRequest {
    pub name: String,
    pub description: Option<String>,
    pub roastery: String,
}

/// Client for batched attribute extraction.
///
/// # Thread Safety
///
/// Implementations must be thread-safe (`Send + Sync`).
///
/// # Errors
///
/// [`tag_batch`](Self::tag_batch) distinguishes quota exhaustion
/// ([`TaggerError::QuotaExhausted`](crate::error::TaggerError::QuotaExhausted)),
/// which aborts the remaining batches, from transport failures. A malformed
/// model response is not an error: the implementation degrades to empty
/// bags with confidence 0 for that batch.
#[async_trait]
pub trait Tagger: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &'static str;

    /// Extract tags for a batch of products.
    ///
    /// The returned vector has the same length and order as `requests`;
    /// callers pair each result with its product immediately.
    async fn tag_batch(&self, requests: &[TagRequest]) -> Result<Vec<ProductTags>>;
}

/// A tagger for configurations without a model: every product gets the
/// empty bag, so no group ids are ever derived.
pub struct DisabledTagger;

#[async_trait]
impl Tagger for DisabledTagger {
    fn name(&self) -> &'static str {
        "disabled"
    }

    async fn tag_batch(&self, requests: &[TagRequest]) -> Result<Vec<ProductTags>> {
        Ok(vec![ProductTags::default(); requests.len()])
    }
}
