//! Raw scrape observations.
//!
//! A [`RawObservation`] is one sighting of one listing at one point in time,
//! as handed over by an observation source. Observations are ephemeral: they
//! are consumed to update the durable [`Product`](super::product::Product)
//! row and its availability history, never persisted directly.

use rust_decimal::Decimal;

use super::size::{extract_size, size_in_grams};

/// One scrape of one product listing.
#[derive(Debug, Clone, PartialEq)]
pub struct RawObservation {
    /// Listing title as shown on the shop page.
    pub name: String,
    /// Product page URL.
    pub url: String,
    /// Listed price in currency-agnostic units.
    pub price: Decimal,
    /// Whether the listing is purchasable right now.
    pub available: bool,
    /// Free-text description, when the source exposes one.
    pub description: Option<String>,
    /// Organic flag from source metadata or name heuristics.
    pub organic: bool,
    /// Roastery the listing belongs to.
    pub roastery: String,
    /// Category/collection URL the listing was found under.
    pub source_url: String,
}

impl RawObservation {
    /// Normalized size token derived from the listing name, if any.
    #[must_use]
    pub fn size_token(&self) -> Option<String> {
        extract_size(&self.name)
    }

    /// Size in grams derived from the normalized token, if any.
    #[must_use]
    pub fn size_grams(&self) -> Option<u32> {
        self.size_token().as_deref().and_then(size_in_grams)
    }

    /// Key identifying the durable product row this observation maps to.
    ///
    /// (name, roastery) uniquely identifies a product; re-scraping the same
    /// pair updates the row in place.
    #[must_use]
    pub fn product_key(&self) -> (String, String) {
        (self.name.clone(), self.roastery.clone())
    }
}
