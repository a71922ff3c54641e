//! Content-derived product group identity.
//!
//! All size and packaging variants of the same physical coffee collapse to
//! one group key derived from the tagged attributes, so "Ethiopia Guji
//! Natural 250g" and "Ethiopia Guji Natural 1kg" from the same roastery are
//! recognized as one product.

use sha2::{Digest, Sha256};

use super::ids::GroupId;
use super::product::ProductTags;

/// Derive the stable group key for a tagged product.
///
/// Returns `None` when the attribute bag is entirely absent (tagging never
/// ran or failed); products without a group id are never merged with others.
///
/// Otherwise the key is the SHA-256 of the lower-cased, colon-joined tuple
/// `(roastery, country|"unknown", region, variety, process, roast, "decaf")`
/// with empty parts dropped. The function is exact on the normalized tuple:
/// two products sharing every normalized attribute for the same roastery are
/// defined to be the same group. That equivalence is deliberate, not an
/// accidental collision.
#[must_use]
pub fn group_id(roastery: &str, tags: &ProductTags) -> Option<GroupId> {
    if tags.is_empty() {
        return None;
    }

    let parts = [
        roastery,
        tags.country_of_origin.as_deref().unwrap_or("unknown"),
        tags.region.as_deref().unwrap_or(""),
        tags.variety.as_deref().unwrap_or(""),
        tags.process_method.as_deref().unwrap_or(""),
        tags.roast_level.as_deref().unwrap_or(""),
        if tags.is_decaf { "decaf" } else { "" },
    ];

    let joined = parts
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(":")
        .to_lowercase();

    let mut hasher = Sha256::new();
    hasher.update(joined.as_bytes());
    Some(GroupId::new(format!("{:x}", hasher.finalize())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(country: &str, process: &str) -> ProductTags {
        ProductTags {
            country_of_origin: Some(country.to_string()),
            process_method: Some(process.to_string()),
            ..ProductTags::default()
        }
    }

    #[test]
    fn identical_bags_yield_identical_ids() {
        let a = group_id("Roastery Co", &tags("Ethiopia", "Natural")).unwrap();
        let b = group_id("Roastery Co", &tags("Ethiopia", "Natural")).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn case_differences_collapse() {
        let a = group_id("Roastery Co", &tags("Ethiopia", "Natural")).unwrap();
        let b = group_id("ROASTERY CO", &tags("ETHIOPIA", "natural")).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn any_differing_field_separates_groups() {
        let a = group_id("Roastery Co", &tags("Ethiopia", "Natural")).unwrap();
        let b = group_id("Roastery Co", &tags("Ethiopia", "Washed")).unwrap();
        let c = group_id("Other Roastery", &tags("Ethiopia", "Natural")).unwrap();
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn decaf_flag_participates_in_identity() {
        let regular = tags("Colombia", "Washed");
        let decaf = ProductTags {
            is_decaf: true,
            ..regular.clone()
        };
        assert_ne!(
            group_id("Roastery Co", &regular),
            group_id("Roastery Co", &decaf)
        );
    }

    #[test]
    fn absent_bag_yields_no_id() {
        assert_eq!(group_id("Roastery Co", &ProductTags::default()), None);
    }

    #[test]
    fn missing_country_falls_back_to_unknown() {
        let bag = ProductTags {
            process_method: Some("Washed".to_string()),
            ..ProductTags::default()
        };
        // Still computable: the bag has content, country renders as "unknown".
        assert!(group_id("Roastery Co", &bag).is_some());
    }
}
