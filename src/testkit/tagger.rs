//! Mock [`Tagger`] implementations for testing.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::ProductTags;
use crate::error::{Result, TaggerError};
use crate::port::outbound::tagger::{TagRequest, Tagger};

/// A tagger answering from a fixed name → tags table.
///
/// Requests for unknown names get the empty bag, mirroring a model that
/// could not extract anything.
#[derive(Default)]
pub struct TableTagger {
    by_name: HashMap<String, ProductTags>,
}

impl TableTagger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the tags returned for a product name.
    #[must_use]
    pub fn with(mut self, name: &str, tags: ProductTags) -> Self {
        self.by_name.insert(name.to_string(), tags);
        self
    }
}

#[async_trait]
impl Tagger for TableTagger {
    fn name(&self) -> &'static str {
        "table"
    }

    async fn tag_batch(&self, requests: &[TagRequest]) -> Result<Vec<ProductTags>> {
        Ok(requests
            .iter()
            .map(|request| self.by_name.get(&request.name).cloned().unwrap_or_default())
            .collect())
    }
}

/// A tagger whose every batch fails with quota exhaustion.
pub struct QuotaTagger;

#[async_trait]
impl Tagger for QuotaTagger {
    fn name(&self) -> &'static str {
        "quota"
    }

    async fn tag_batch(&self, _requests: &[TagRequest]) -> Result<Vec<ProductTags>> {
        Err(TaggerError::QuotaExhausted("scripted quota error".to_string()).into())
    }
}
