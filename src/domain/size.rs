//! Size-token extraction and base-name stripping.
//!
//! Listing names carry packaging sizes in free text ("Ethiopia Guji Natural,
//! 250g"). [`extract_size`] normalizes these to a canonical token so that
//! size variants can be compared, and [`base_name`] strips the size clause to
//! produce a size-agnostic display name for the legacy grouping path.

use std::sync::LazyLock;

use regex::Regex;

/// Matches integer gram and kilogram clauses: "250g", "250 g", "200 gram", "1kg".
static SIZE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)\s*(kg|grams?|g)\b").expect("valid size pattern"));

/// Matches a trailing or comma-delimited size clause and everything after it.
static SIZE_CLAUSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[,\s]\s*\d+\s*(kg|grams?|g)\b.*$").expect("valid size clause pattern")
});

/// Extract a normalized size token from a listing name.
///
/// Kilogram values are normalized to grams internally and re-rendered:
/// values of 1000g and above render as `"<kg>kg"`, smaller values as
/// `"<n>g"`. A literal `"1500g"` therefore renders as `"1.5kg"`.
///
/// Returns `None` when the name carries no recognizable size clause.
#[must_use]
pub fn extract_size(name: &str) -> Option<String> {
    let captures = SIZE_RE.captures(name)?;
    let value: u32 = captures[1].parse().ok()?;
    let grams = if captures[2].eq_ignore_ascii_case("kg") {
        value.checked_mul(1000)?
    } else {
        value
    };
    Some(render_grams(grams))
}

/// Parse a normalized size token back into grams.
///
/// Accepts the tokens produced by [`extract_size`] ("250g", "1kg", "1.5kg").
#[must_use]
pub fn size_in_grams(token: &str) -> Option<u32> {
    if let Some(kg) = token.strip_suffix("kg") {
        let kg: f64 = kg.parse().ok()?;
        if kg <= 0.0 {
            return None;
        }
        Some((kg * 1000.0).round() as u32)
    } else if let Some(g) = token.strip_suffix('g') {
        g.parse().ok()
    } else {
        None
    }
}

/// Strip a trailing or comma-delimited size clause from a listing name.
///
/// Used only by the legacy heuristic grouping path when no group id exists;
/// AI-tagged products group on content identity instead.
#[must_use]
pub fn base_name(name: &str) -> String {
    SIZE_CLAUSE_RE.replace(name, "").trim().to_string()
}

fn render_grams(grams: u32) -> String {
    if grams >= 1000 {
        format!("{}kg", f64::from(grams) / 1000.0)
    } else {
        format!("{grams}g")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_gram_token() {
        assert_eq!(extract_size("Ethiopia Guji 250g").as_deref(), Some("250g"));
        assert_eq!(extract_size("Ethiopia Guji 250 g").as_deref(), Some("250g"));
        assert_eq!(extract_size("House blend, 200 gram").as_deref(), Some("200g"));
    }

    #[test]
    fn extracts_kilogram_token() {
        assert_eq!(extract_size("Espresso roast 1kg").as_deref(), Some("1kg"));
        assert_eq!(extract_size("Espresso roast 2 kg").as_deref(), Some("2kg"));
    }

    #[test]
    fn normalizes_grams_to_kilograms_at_1000() {
        assert_eq!(extract_size("Bulk bag 1000g").as_deref(), Some("1kg"));
        // Preserved edge case: a literal 1500g renders as 1.5kg.
        assert_eq!(extract_size("Bulk bag 1500g").as_deref(), Some("1.5kg"));
    }

    #[test]
    fn returns_none_without_size_clause() {
        assert_eq!(extract_size("Ethiopia Guji Natural"), None);
        // A bare "g" inside a word is not a size clause.
        assert_eq!(extract_size("Guji grade 1"), None);
    }

    #[test]
    fn size_token_roundtrips_to_grams() {
        assert_eq!(size_in_grams("250g"), Some(250));
        assert_eq!(size_in_grams("1kg"), Some(1000));
        assert_eq!(size_in_grams("1.5kg"), Some(1500));
        assert_eq!(size_in_grams("whole bean"), None);
    }

    #[test]
    fn strips_comma_delimited_size_clause() {
        assert_eq!(base_name("Ethiopia Guji Natural, 250g"), "Ethiopia Guji Natural");
        assert_eq!(base_name("Ethiopia Guji Natural, 1kg whole bean"), "Ethiopia Guji Natural");
    }

    #[test]
    fn strips_trailing_size_clause() {
        assert_eq!(base_name("Ethiopia Guji Natural 250g"), "Ethiopia Guji Natural");
        assert_eq!(base_name("Ethiopia Guji Natural 1kg"), "Ethiopia Guji Natural");
    }

    #[test]
    fn leaves_sizeless_names_alone() {
        assert_eq!(base_name("Ethiopia Guji Natural"), "Ethiopia Guji Natural");
    }
}
