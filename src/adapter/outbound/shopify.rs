//! Shopify product-feed source.
//!
//! Most specialty roasteries run on Shopify, which exposes the public
//! `/products.json` endpoint. Reading it yields structured listings without
//! any HTML scraping. One source instance observes one roastery.

use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use url::Url;

use crate::domain::RawObservation;
use crate::error::{Error, Result};
use crate::port::outbound::source::ObservationSource;

/// Maximum listings per feed page; the Shopify cap.
const PAGE_LIMIT: u32 = 250;

/// Observation source backed by a Shopify shop's public product feed.
pub struct ShopifyFeedSource {
    roastery: String,
    base_url: Url,
    client: Client,
}

impl ShopifyFeedSource {
    /// Create a source for one roastery's shop.
    ///
    /// # Errors
    ///
    /// Returns an error when `shop_url` is not a valid absolute URL.
    pub fn new(roastery: impl Into<String>, shop_url: &str) -> Result<Self> {
        Ok(Self {
            roastery: roastery.into(),
            base_url: Url::parse(shop_url)?,
            client: Client::new(),
        })
    }

    fn feed_url(&self) -> Result<Url> {
        let mut url = self.base_url.join("products.json")?;
        url.set_query(Some(&format!("limit={PAGE_LIMIT}")));
        Ok(url)
    }

    fn observation(&self, product: &FeedProduct, variant: &FeedVariant, feed_url: &Url) -> Option<RawObservation> {
        let price: Decimal = variant.price.parse().ok()?;

        // Single-variant products carry the placeholder title "Default Title";
        // real variant titles ("250g", "1kg") become part of the listing name.
        let name = if variant.title.is_empty() || variant.title == "Default Title" {
            product.title.clone()
        } else {
            format!("{}, {}", product.title, variant.title)
        };

        let url = self
            .base_url
            .join(&format!("products/{}", product.handle))
            .map(String::from)
            .unwrap_or_else(|_| self.base_url.to_string());

        Some(RawObservation {
            name,
            url,
            price,
            available: variant.available,
            description: product.body_html.clone().filter(|s| !s.is_empty()),
            organic: product.is_organic(),
            roastery: self.roastery.clone(),
            source_url: feed_url.to_string(),
        })
    }
}

#[async_trait]
impl ObservationSource for ShopifyFeedSource {
    fn roastery(&self) -> &str {
        &self.roastery
    }

    async fn fetch(&self) -> Result<Vec<RawObservation>> {
        let feed_url = self.feed_url()?;
        let catalog: FeedCatalog = self
            .client
            .get(feed_url.clone())
            .send()
            .await
            .map_err(|e| Error::Source(format!("{}: {e}", self.roastery)))?
            .error_for_status()
            .map_err(|e| Error::Source(format!("{}: {e}", self.roastery)))?
            .json()
            .await
            .map_err(|e| Error::Source(format!("{}: {e}", self.roastery)))?;

        Ok(catalog
            .products
            .iter()
            .flat_map(|product| {
                product
                    .variants
                    .iter()
                    .filter_map(|variant| self.observation(product, variant, &feed_url))
            })
            .collect())
    }
}

#[derive(Debug, Deserialize)]
struct FeedCatalog {
    products: Vec<FeedProduct>,
}

#[derive(Debug, Deserialize)]
struct FeedProduct {
    title: String,
    handle: String,
    body_html: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    variants: Vec<FeedVariant>,
}

impl FeedProduct {
    fn is_organic(&self) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case("organic"))
            || self.title.to_lowercase().contains("organic")
    }
}

#[derive(Debug, Deserialize)]
struct FeedVariant {
    #[serde(default)]
    title: String,
    price: String,
    #[serde(default)]
    available: bool,
}
