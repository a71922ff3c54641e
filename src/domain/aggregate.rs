//! Variant aggregation for notification candidates.
//!
//! A check cycle can observe several size variants of the same physical
//! coffee. The [`Aggregator`] collapses them into one notifiable unit: a
//! single representative product for display, the union of observed size
//! tokens, and a per-size offer map.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use super::ids::{GroupId, ProductId};
use super::product::Product;
use super::size::{base_name, size_in_grams};

/// How a candidate earned its notification.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchedBy {
    /// Matched a user favorite by name.
    Favorite(String),
    /// Accepted by the preference scoring engine.
    Preference { score: i32, reasons: Vec<String> },
}

impl MatchedBy {
    /// Label used for legacy grouping and notification log kinds.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Favorite(name) => name.clone(),
            Self::Preference { .. } => "preferences".to_string(),
        }
    }
}

/// Key under which same-coffee observations collapse.
///
/// Tagged products group on content identity; untagged products fall back to
/// the size-stripped base name scoped by what matched them, so unrelated
/// favorites never share a candidate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AggregationKey {
    Group(GroupId),
    Legacy { base_name: String, matched_by: String },
}

impl AggregationKey {
    /// Derive the key for a matched product.
    #[must_use]
    pub fn for_product(product: &Product, matched_by: &MatchedBy) -> Self {
        match &product.group_id {
            Some(group) => Self::Group(group.clone()),
            None => Self::Legacy {
                base_name: base_name(&product.name).to_lowercase(),
                matched_by: matched_by.label(),
            },
        }
    }
}

/// One size variant's offer within a candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct SizeOffer {
    pub product_id: ProductId,
    pub price: Decimal,
    pub url: String,
}

/// One aggregated notification candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub key: AggregationKey,
    pub matched_by: MatchedBy,
    representative: Product,
    sizes: Vec<String>,
    offers: BTreeMap<String, SizeOffer>,
}

impl Candidate {
    fn new(key: AggregationKey, product: &Product, matched_by: MatchedBy) -> Self {
        let mut candidate = Self {
            key,
            matched_by,
            representative: product.clone(),
            sizes: Vec::new(),
            offers: BTreeMap::new(),
        };
        candidate.record_offer(product);
        candidate
    }

    /// The product chosen to stand in for the group in a notification.
    #[must_use]
    pub fn representative(&self) -> &Product {
        &self.representative
    }

    /// Union of distinct size tokens observed, 250g before 1kg.
    ///
    /// Recognized tokens sort by gram value; unrecognized tokens keep their
    /// arrival order after the recognized ones.
    #[must_use]
    pub fn available_sizes(&self) -> Vec<String> {
        let mut sizes = self.sizes.clone();
        sizes.sort_by_key(|token| size_in_grams(token).unwrap_or(u32::MAX));
        sizes
    }

    /// Offer details per observed size token.
    #[must_use]
    pub fn offers(&self) -> &BTreeMap<String, SizeOffer> {
        &self.offers
    }

    /// Ids of every product folded into this candidate.
    #[must_use]
    pub fn product_ids(&self) -> Vec<ProductId> {
        let mut ids: Vec<ProductId> = self.offers.values().map(|o| o.product_id).collect();
        if !ids.contains(&self.representative.id) {
            ids.push(self.representative.id);
        }
        ids.sort();
        ids.dedup();
        ids
    }

    fn absorb(&mut self, product: &Product) {
        self.record_offer(product);
        if replaces_representative(&self.representative, product) {
            self.representative = product.clone();
        }
    }

    fn record_offer(&mut self, product: &Product) {
        let Some(token) = product.size_token.clone() else {
            return;
        };
        if !self.sizes.contains(&token) {
            self.sizes.push(token.clone());
        }
        self.offers.entry(token).or_insert(SizeOffer {
            product_id: product.id,
            price: product.price,
            url: product.url.clone(),
        });
    }
}

/// Representative replacement rule: a strict total order of two binary
/// preferences, applied incrementally as observations arrive.
///
/// The incoming product replaces the current representative iff it is
/// organic while the current one is not, or — organic status equal — its
/// size token is "1kg" while the current one's is "250g". Ties in both
/// dimensions keep the first-seen representative.
fn replaces_representative(current: &Product, incoming: &Product) -> bool {
    let current_organic = current.organic || current.tags.is_organic;
    let incoming_organic = incoming.organic || incoming.tags.is_organic;

    if incoming_organic && !current_organic {
        return true;
    }
    if incoming_organic == current_organic
        && incoming.size_token.as_deref() == Some("1kg")
        && current.size_token.as_deref() == Some("250g")
    {
        return true;
    }
    false
}

/// Collapses one cycle's matched observations into notification candidates.
#[derive(Debug, Default)]
pub struct Aggregator {
    candidates: Vec<Candidate>,
}

impl Aggregator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a matched product into its candidate, creating one if needed.
    pub fn insert(&mut self, product: &Product, matched_by: MatchedBy) {
        let key = AggregationKey::for_product(product, &matched_by);
        match self.candidates.iter_mut().find(|c| c.key == key) {
            Some(candidate) => candidate.absorb(product),
            None => self.candidates.push(Candidate::new(key, product, matched_by)),
        }
    }

    /// Finished candidates in first-seen order.
    #[must_use]
    pub fn into_candidates(self) -> Vec<Candidate> {
        self.candidates
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::domain::ids::ProductId;
    use crate::domain::product::ProductTags;

    fn variant(id: i32, name: &str, size: Option<&str>, organic: bool, price: Decimal) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_string(),
            roastery: "Roastery Co".to_string(),
            url: format!("https://shop.example/p/{id}"),
            price,
            description: None,
            organic,
            size_token: size.map(str::to_string),
            size_grams: size.and_then(size_in_grams),
            group_id: Some(GroupId::from("g1")),
            tags: ProductTags::default(),
            tagged_at: None,
            first_seen_at: Utc::now(),
        }
    }

    fn favorite_match() -> MatchedBy {
        MatchedBy::Favorite("guji".to_string())
    }

    #[test]
    fn organic_wins_regardless_of_arrival_order() {
        let conventional = variant(1, "Guji 250g", Some("250g"), false, dec!(100));
        let organic = variant(2, "Guji 1kg", Some("1kg"), true, dec!(300));

        for order in [[&conventional, &organic], [&organic, &conventional]] {
            let mut agg = Aggregator::new();
            for product in order {
                agg.insert(product, favorite_match());
            }
            let candidates = agg.into_candidates();
            assert_eq!(candidates.len(), 1);
            assert_eq!(candidates[0].representative().id, ProductId::new(2));
            assert_eq!(candidates[0].available_sizes(), vec!["250g", "1kg"]);
        }
    }

    #[test]
    fn larger_pack_wins_when_organic_ties() {
        let small = variant(1, "Guji 250g", Some("250g"), false, dec!(100));
        let large = variant(2, "Guji 1kg", Some("1kg"), false, dec!(300));

        let mut agg = Aggregator::new();
        agg.insert(&small, favorite_match());
        agg.insert(&large, favorite_match());
        let candidates = agg.into_candidates();
        assert_eq!(candidates[0].representative().id, ProductId::new(2));
    }

    #[test]
    fn organic_small_is_not_displaced_by_conventional_large() {
        let organic_small = variant(1, "Guji 250g", Some("250g"), true, dec!(110));
        let conventional_large = variant(2, "Guji 1kg", Some("1kg"), false, dec!(300));

        let mut agg = Aggregator::new();
        agg.insert(&organic_small, favorite_match());
        agg.insert(&conventional_large, favorite_match());
        let candidates = agg.into_candidates();
        assert_eq!(candidates[0].representative().id, ProductId::new(1));
    }

    #[test]
    fn full_ties_keep_first_seen() {
        let first = variant(1, "Guji 250g", Some("250g"), false, dec!(100));
        let second = variant(2, "Guji 250g again", Some("250g"), false, dec!(95));

        let mut agg = Aggregator::new();
        agg.insert(&first, favorite_match());
        agg.insert(&second, favorite_match());
        assert_eq!(
            agg.into_candidates()[0].representative().id,
            ProductId::new(1)
        );
    }

    #[test]
    fn offers_record_price_per_size() {
        let small = variant(1, "Guji 250g", Some("250g"), false, dec!(100));
        let large = variant(2, "Guji 1kg", Some("1kg"), false, dec!(300));

        let mut agg = Aggregator::new();
        agg.insert(&small, favorite_match());
        agg.insert(&large, favorite_match());
        let candidates = agg.into_candidates();
        let offers = candidates[0].offers();
        assert_eq!(offers["250g"].price, dec!(100));
        assert_eq!(offers["1kg"].price, dec!(300));
    }

    #[test]
    fn ungrouped_products_fall_back_to_base_name_key() {
        let mut a = variant(1, "Sidamo, 250g", Some("250g"), false, dec!(100));
        a.group_id = None;
        let mut b = variant(2, "Sidamo, 1kg", Some("1kg"), false, dec!(300));
        b.group_id = None;

        let mut agg = Aggregator::new();
        agg.insert(&a, favorite_match());
        agg.insert(&b, favorite_match());
        assert_eq!(agg.into_candidates().len(), 1);
    }

    #[test]
    fn different_groups_stay_separate() {
        let a = variant(1, "Guji 250g", Some("250g"), false, dec!(100));
        let mut b = variant(2, "Huila 250g", Some("250g"), false, dec!(90));
        b.group_id = Some(GroupId::from("g2"));

        let mut agg = Aggregator::new();
        agg.insert(&a, favorite_match());
        agg.insert(&b, favorite_match());
        assert_eq!(agg.into_candidates().len(), 2);
    }
}
