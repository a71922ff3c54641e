//! Product-related domain types.
//!
//! - [`Product`] - the durable identity for a (name, roastery) pair
//! - [`ProductTags`] - best-effort attributes extracted by the tagging model
//! - [`NormalizedAttributes`] - the cleaned attribute record fed to scoring

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ids::{GroupId, ProductId};
use super::size::size_in_grams;

/// Best-effort structured attributes extracted from free text.
///
/// Every field is optional: the tagging model may be disabled, may fail for
/// a batch, or may simply not know. An entirely empty bag means the product
/// was never tagged and can never join a product group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductTags {
    pub country_of_origin: Option<String>,
    pub region: Option<String>,
    pub process_method: Option<String>,
    pub roast_level: Option<String>,
    pub variety: Option<String>,
    #[serde(default)]
    pub is_organic: bool,
    #[serde(default)]
    pub is_fair_trade: bool,
    #[serde(default)]
    pub is_decaf: bool,
    #[serde(default)]
    pub flavor_notes: Vec<String>,
    #[serde(default)]
    pub certifications: Vec<String>,
    /// Model confidence, 0-100.
    #[serde(default)]
    pub confidence: u8,
}

impl ProductTags {
    /// Whether the bag carries no extracted content at all.
    ///
    /// Used to decide if a group id is computable; flag fields alone do not
    /// count because an untagged product defaults them to false.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.country_of_origin.is_none()
            && self.region.is_none()
            && self.process_method.is_none()
            && self.roast_level.is_none()
            && self.variety.is_none()
            && self.flavor_notes.is_empty()
            && self.certifications.is_empty()
    }
}

/// The durable product row for a (name, roastery) pair.
///
/// Created on first sighting, updated in place on every subsequent sighting,
/// never deleted. The availability history lives in separate append-only
/// [`AvailabilityRecord`](super::availability::AvailabilityRecord)s.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub roastery: String,
    pub url: String,
    pub price: Decimal,
    pub description: Option<String>,
    /// Organic flag from source metadata or name heuristics.
    pub organic: bool,
    /// Normalized size token derived from the name, e.g. "250g".
    pub size_token: Option<String>,
    pub size_grams: Option<u32>,
    /// Content-derived group id; present once the product has been tagged.
    pub group_id: Option<GroupId>,
    pub tags: ProductTags,
    pub tagged_at: Option<DateTime<Utc>>,
    pub first_seen_at: DateTime<Utc>,
}

impl Product {
    /// Whether the tagging pipeline has run for this product.
    #[must_use]
    pub fn is_tagged(&self) -> bool {
        self.tagged_at.is_some()
    }

    /// Normalized attribute record for preference scoring.
    #[must_use]
    pub fn normalized_attributes(&self) -> NormalizedAttributes {
        NormalizedAttributes::from_product(self)
    }
}

/// The cleaned attribute record the scoring engine evaluates.
///
/// String attributes are lower-cased and trimmed; boolean flags are OR'd
/// from explicit product flags and the extracted tags; derived values are
/// `None` when their inputs are unknown, never an error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedAttributes {
    pub roastery: String,
    pub country: Option<String>,
    pub continent: Option<String>,
    pub region: Option<String>,
    pub variety: Option<String>,
    pub process: Option<String>,
    pub roast: Option<String>,
    pub organic: bool,
    pub decaf: bool,
    pub fair_trade: bool,
    pub size_grams: Option<u32>,
    /// `price * 1000 / size_grams` when both are known.
    pub price_per_kg: Option<Decimal>,
}

impl NormalizedAttributes {
    /// Build the scoring record for a product.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        let country = product
            .tags
            .country_of_origin
            .as_deref()
            .map(normalize_text);
        let continent = country.as_deref().and_then(continent_of);
        let size_grams = product
            .size_grams
            .or_else(|| product.size_token.as_deref().and_then(size_in_grams));
        let price_per_kg = size_grams
            .filter(|g| *g > 0)
            .map(|g| product.price * Decimal::from(1000) / Decimal::from(g));

        Self {
            roastery: normalize_text(&product.roastery),
            country,
            continent: continent.map(str::to_string),
            region: product.tags.region.as_deref().map(normalize_text),
            variety: product.tags.variety.as_deref().map(normalize_text),
            process: product.tags.process_method.as_deref().map(normalize_text),
            roast: product.tags.roast_level.as_deref().map(normalize_text),
            organic: product.organic || product.tags.is_organic,
            decaf: product.tags.is_decaf,
            fair_trade: product.tags.is_fair_trade,
            size_grams,
            price_per_kg,
        }
    }
}

fn normalize_text(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Map a lower-cased country name to its continent.
///
/// Unknown countries yield `None`; the scoring engine treats a missing
/// continent as an absent attribute, not an error.
#[must_use]
pub fn continent_of(country: &str) -> Option<&'static str> {
    let continent = match country {
        "ethiopia" | "kenya" | "rwanda" | "burundi" | "uganda" | "tanzania" | "congo"
        | "democratic republic of congo" | "malawi" | "zambia" | "zimbabwe" | "cameroon" => {
            "africa"
        }
        "brazil" | "colombia" | "peru" | "bolivia" | "ecuador" | "venezuela" => "south america",
        "guatemala" | "honduras" | "el salvador" | "nicaragua" | "costa rica" | "panama"
        | "mexico" | "jamaica" | "cuba" | "dominican republic" | "haiti" => "central america",
        "indonesia" | "india" | "vietnam" | "thailand" | "myanmar" | "china" | "yemen"
        | "timor-leste" | "east timor" | "philippines" | "laos" => "asia",
        "papua new guinea" | "hawaii" | "australia" => "oceania",
        _ => return None,
    };
    Some(continent)
}
