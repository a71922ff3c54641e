//! User-defined favorites (legacy matching path).
//!
//! A favorite is a named set of free-text search terms plus optional size
//! and organic constraints. Favorites are matched against every available
//! product on each check when preference scoring is disabled; the two
//! matching strategies are mutually exclusive per cycle.

use serde::{Deserialize, Serialize};

use super::ids::FavoriteId;
use super::product::Product;

/// Pack-size constraint for a favorite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizePreference {
    #[serde(rename = "250g")]
    Small,
    #[serde(rename = "1kg")]
    Large,
    Both,
}

impl SizePreference {
    /// The size token this preference selects, if it is restrictive.
    #[must_use]
    pub const fn token(self) -> Option<&'static str> {
        match self {
            Self::Small => Some("250g"),
            Self::Large => Some("1kg"),
            Self::Both => None,
        }
    }

    /// Stable string form used by the store and CLI.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Small => "250g",
            Self::Large => "1kg",
            Self::Both => "both",
        }
    }

    /// Parse the stable string form back.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "250g" => Some(Self::Small),
            "1kg" => Some(Self::Large),
            "both" => Some(Self::Both),
            _ => None,
        }
    }

    /// Whether a product's normalized size token satisfies this preference.
    ///
    /// Products without a recognized size token always pass; the constraint
    /// only filters tokens it can compare.
    #[must_use]
    pub fn admits(self, size_token: Option<&str>) -> bool {
        match (self.token(), size_token) {
            (Some(wanted), Some(actual)) => wanted == actual,
            _ => true,
        }
    }
}

/// A user-named interest matched against scraped products.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Favorite {
    pub id: FavoriteId,
    pub name: String,
    /// Free-text terms; any one matching the product name counts as a hit.
    pub terms: Vec<String>,
    pub size_preference: Option<SizePreference>,
    #[serde(default)]
    pub organic_only: bool,
}

impl Favorite {
    /// Create a favorite with a fresh id.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        terms: Vec<String>,
        size_preference: Option<SizePreference>,
        organic_only: bool,
    ) -> Self {
        Self {
            id: FavoriteId::generate(),
            name: name.into(),
            terms,
            size_preference,
            organic_only,
        }
    }

    /// Whether this favorite matches the given product.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        if self.organic_only && !(product.organic || product.tags.is_organic) {
            return false;
        }
        if let Some(pref) = self.size_preference {
            if !pref.admits(product.size_token.as_deref()) {
                return false;
            }
        }

        let name = product.name.to_lowercase();
        self.terms
            .iter()
            .any(|term| !term.is_empty() && name.contains(&term.to_lowercase()))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::domain::ids::ProductId;
    use crate::domain::product::ProductTags;

    fn product(name: &str, size: Option<&str>, organic: bool) -> Product {
        Product {
            id: ProductId::new(1),
            name: name.to_string(),
            roastery: "Roastery Co".to_string(),
            url: "https://shop.example/p".to_string(),
            price: dec!(12.50),
            description: None,
            organic,
            size_token: size.map(str::to_string),
            size_grams: None,
            group_id: None,
            tags: ProductTags::default(),
            tagged_at: None,
            first_seen_at: Utc::now(),
        }
    }

    #[test]
    fn matches_any_term_case_insensitively() {
        let favorite = Favorite::new(
            "Ethiopian naturals",
            vec!["guji".to_string(), "yirgacheffe".to_string()],
            None,
            false,
        );
        assert!(favorite.matches(&product("Ethiopia GUJI Natural", None, false)));
        assert!(!favorite.matches(&product("Colombia Huila", None, false)));
    }

    #[test]
    fn organic_only_rejects_conventional() {
        let favorite = Favorite::new("organics", vec!["ethiopia".to_string()], None, true);
        assert!(!favorite.matches(&product("Ethiopia Guji", None, false)));
        assert!(favorite.matches(&product("Ethiopia Guji", None, true)));
    }

    #[test]
    fn size_preference_filters_recognized_tokens() {
        let favorite = Favorite::new(
            "bulk",
            vec!["guji".to_string()],
            Some(SizePreference::Large),
            false,
        );
        assert!(favorite.matches(&product("Ethiopia Guji 1kg", Some("1kg"), false)));
        assert!(!favorite.matches(&product("Ethiopia Guji 250g", Some("250g"), false)));
        // Unrecognized sizes cannot be filtered and pass.
        assert!(favorite.matches(&product("Ethiopia Guji", None, false)));
    }

    #[test]
    fn both_admits_every_size() {
        let favorite = Favorite::new(
            "any",
            vec!["guji".to_string()],
            Some(SizePreference::Both),
            false,
        );
        assert!(favorite.matches(&product("Ethiopia Guji 250g", Some("250g"), false)));
        assert!(favorite.matches(&product("Ethiopia Guji 1kg", Some("1kg"), false)));
    }
}
