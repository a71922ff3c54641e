//! Declarative preference scoring.
//!
//! Evaluates a [`NormalizedAttributes`] record against a configured set of
//! per-dimension weights and hard constraints, producing an accept/reject
//! decision with a numeric score and trace reasons. Mutually exclusive with
//! the legacy favorites path: one `enabled` flag selects the strategy for
//! the whole cycle.

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;

use super::product::NormalizedAttributes;

/// The closed set of scorable dimensions.
///
/// Dimension names are typed rather than free strings so a typo in
/// configuration fails deserialization instead of silently scoring zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Country,
    Continent,
    Region,
    Variety,
    Process,
    Roast,
    Roastery,
    Organic,
    Decaf,
    FairTrade,
}

impl Dimension {
    /// The product's stringified value for this dimension, lower-cased.
    ///
    /// Boolean dimensions always yield `"true"`/`"false"`; text dimensions
    /// yield `None` when the attribute is unknown.
    #[must_use]
    pub fn value_of(self, attrs: &NormalizedAttributes) -> Option<String> {
        match self {
            Self::Country => attrs.country.clone(),
            Self::Continent => attrs.continent.clone(),
            Self::Region => attrs.region.clone(),
            Self::Variety => attrs.variety.clone(),
            Self::Process => attrs.process.clone(),
            Self::Roast => attrs.roast.clone(),
            Self::Roastery => Some(attrs.roastery.clone()),
            Self::Organic => Some(attrs.organic.to_string()),
            Self::Decaf => Some(attrs.decaf.to_string()),
            Self::FairTrade => Some(attrs.fair_trade.to_string()),
        }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::Country => "country",
            Self::Continent => "continent",
            Self::Region => "region",
            Self::Variety => "variety",
            Self::Process => "process",
            Self::Roast => "roast",
            Self::Roastery => "roastery",
            Self::Organic => "organic",
            Self::Decaf => "decaf",
            Self::FairTrade => "fair_trade",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A constraint predicate value: text compares case-insensitively,
/// booleans exactly.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ConstraintValue {
    Bool(bool),
    Text(String),
}

impl ConstraintValue {
    fn matches(&self, value: &str) -> bool {
        match self {
            Self::Bool(b) => (if *b { "true" } else { "false" }) == value,
            Self::Text(t) => t.eq_ignore_ascii_case(value),
        }
    }
}

impl fmt::Display for ConstraintValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Text(t) => f.write_str(t),
        }
    }
}

/// A conjunction of per-dimension equality checks.
///
/// An empty predicate is vacuously true.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Predicate(pub BTreeMap<Dimension, ConstraintValue>);

impl Predicate {
    /// Whether every key equals the corresponding attribute value.
    ///
    /// A dimension the product has no value for never matches.
    #[must_use]
    pub fn matches(&self, attrs: &NormalizedAttributes) -> bool {
        self.0.iter().all(|(dim, expected)| {
            dim.value_of(attrs)
                .is_some_and(|value| expected.matches(&value))
        })
    }

    fn summary(&self) -> String {
        self.0
            .iter()
            .map(|(dim, value)| format!("{dim}={value}"))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// A conditional requirement: products matching `when` must also match
/// `require`, or they are rejected outright before any dimension scoring.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ConstraintRule {
    #[serde(default)]
    pub when: Predicate,
    #[serde(default)]
    pub require: Predicate,
}

/// Declarative preference model supplied by configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PreferenceConfig {
    /// Selects preference scoring over the legacy favorites path.
    #[serde(default)]
    pub enabled: bool,
    /// Minimum score for acceptance.
    #[serde(default)]
    pub min_score: i32,
    /// Per-dimension maps from attribute value to integer weight.
    #[serde(default)]
    pub dimensions: BTreeMap<Dimension, BTreeMap<String, i32>>,
    /// Hard constraints evaluated before scoring.
    #[serde(default)]
    pub constraints: Vec<ConstraintRule>,
}

/// The scoring verdict for one product.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreOutcome {
    pub score: i32,
    pub accepted: bool,
    pub reasons: Vec<String>,
}

/// Score a product's attributes against the preference model.
///
/// Constraints gate first; dimension weights are additive and may be
/// negative. Each applied weight appends a trace reason of the form
/// `"<dimension>:<value><sign><weight>"`.
#[must_use]
pub fn score(attrs: &NormalizedAttributes, config: &PreferenceConfig) -> ScoreOutcome {
    if !config.enabled {
        return ScoreOutcome {
            score: 0,
            accepted: false,
            reasons: vec!["preferences_disabled".to_string()],
        };
    }

    for rule in &config.constraints {
        if rule.when.matches(attrs) && !rule.require.matches(attrs) {
            return ScoreOutcome {
                score: 0,
                accepted: false,
                reasons: vec![format!(
                    "constraint[{} => {}]",
                    rule.when.summary(),
                    rule.require.summary()
                )],
            };
        }
    }

    let mut total = 0;
    let mut reasons = Vec::new();
    for (dimension, weights) in &config.dimensions {
        let Some(value) = dimension.value_of(attrs) else {
            continue;
        };
        let weight = weights
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(&value))
            .map(|(_, weight)| *weight);
        if let Some(weight) = weight {
            total += weight;
            reasons.push(format!("{dimension}:{value}{weight:+}"));
        }
    }

    ScoreOutcome {
        score: total,
        accepted: total >= config.min_score,
        reasons,
    }
}
