//! Builders for domain primitives used across tests.
//!
//! Provides concise factory functions for [`RawObservation`] and
//! [`ProductTags`] so tests focus on assertions rather than construction
//! boilerplate.

use rust_decimal::Decimal;

use crate::domain::{ProductTags, RawObservation};

/// Create an available observation for the given roastery.
pub fn observation(roastery: &str, name: &str, price: Decimal) -> RawObservation {
    RawObservation {
        name: name.to_string(),
        url: format!(
            "https://shop.example/products/{}",
            name.to_lowercase().replace(' ', "-")
        ),
        price,
        available: true,
        description: None,
        organic: false,
        roastery: roastery.to_string(),
        source_url: "https://shop.example/products.json".to_string(),
    }
}

/// Create an out-of-stock observation.
pub fn unavailable_observation(roastery: &str, name: &str, price: Decimal) -> RawObservation {
    RawObservation {
        available: false,
        ..observation(roastery, name, price)
    }
}

/// Create a tag bag with the given origin and process.
pub fn tags(country: &str, process: &str) -> ProductTags {
    ProductTags {
        country_of_origin: Some(country.to_string()),
        process_method: Some(process.to_string()),
        confidence: 80,
        ..ProductTags::default()
    }
}
