//! Persistence port for the product catalog.
//!
//! The store owns the durable [`Product`] rows, the append-only availability
//! history, the notification log used for cooldown deduplication, and the
//! favorites list. Exact schema and SQL are an adapter concern; these
//! contracts are what the monitor relies on.

use std::future::Future;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::{
    AvailabilityRecord, Favorite, GroupId, NotificationKind, Product, ProductId, ProductTags,
};
use crate::error::Result;

/// Fields written on every sighting of a (name, roastery) pair.
///
/// The upsert creates the product on first sighting and updates the listing
/// fields in place afterwards; tags and group id are only touched by
/// [`CatalogStore::apply_tags`].
#[derive(Debug, Clone, PartialEq)]
pub struct ProductSighting {
    pub name: String,
    pub roastery: String,
    pub url: String,
    pub price: Decimal,
    pub description: Option<String>,
    pub organic: bool,
    pub size_token: Option<String>,
    pub size_grams: Option<u32>,
}

/// Storage operations for products, availability history, notifications,
/// and favorites.
pub trait CatalogStore: Send + Sync {
    /// Create or update the product row for (name, roastery); never
    /// duplicates and never deletes.
    fn upsert_product(
        &self,
        sighting: &ProductSighting,
    ) -> impl Future<Output = Result<Product>> + Send;

    /// Append one immutable availability record.
    fn append_availability(
        &self,
        record: &AvailabilityRecord,
    ) -> impl Future<Output = Result<()>> + Send;

    /// The most recent availability records for a product, newest first.
    fn recent_availability(
        &self,
        product_id: ProductId,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<AvailabilityRecord>>> + Send;

    /// Products whose most recent availability record is available,
    /// optionally restricted to one roastery.
    fn available_products(
        &self,
        roastery: Option<&str>,
    ) -> impl Future<Output = Result<Vec<Product>>> + Send;

    /// Products the tagging pipeline has not run for yet.
    fn untagged_products(&self) -> impl Future<Output = Result<Vec<Product>>> + Send;

    /// Persist extracted tags and the derived group id for a product.
    fn apply_tags(
        &self,
        product_id: ProductId,
        tags: &ProductTags,
        group_id: Option<&GroupId>,
        tagged_at: DateTime<Utc>,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Append to the notification log after a delivery attempt.
    fn record_notification(
        &self,
        product_id: ProductId,
        kind: NotificationKind,
        sent_at: DateTime<Utc>,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Whether a notification of this kind was sent for this product within
    /// the trailing window.
    fn was_notified_recently(
        &self,
        product_id: ProductId,
        kind: NotificationKind,
        window_hours: u32,
    ) -> impl Future<Output = Result<bool>> + Send;

    /// Persist a favorite, replacing any favorite with the same name.
    fn save_favorite(&self, favorite: &Favorite) -> impl Future<Output = Result<()>> + Send;

    /// Remove a favorite by name. Returns whether one existed.
    fn delete_favorite(&self, name: &str) -> impl Future<Output = Result<bool>> + Send;

    /// All favorites, in name order.
    fn list_favorites(&self) -> impl Future<Output = Result<Vec<Favorite>>> + Send;
}
