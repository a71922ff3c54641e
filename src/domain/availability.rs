//! Availability history and state-transition classification.
//!
//! Each product accumulates an append-only log of [`AvailabilityRecord`]s;
//! ordering by `checked_at` defines the state-transition history. The
//! classifier is a pure query over that log: it holds no state of its own.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::ids::ProductId;

/// One immutable, timestamped observation of a product's availability.
#[derive(Debug, Clone, PartialEq)]
pub struct AvailabilityRecord {
    pub product_id: ProductId,
    pub available: bool,
    pub price: Decimal,
    pub checked_at: DateTime<Utc>,
}

/// Classification of the latest availability transition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Transition {
    pub newly_available: bool,
    pub newly_unavailable: bool,
}

impl Transition {
    /// Neither flag set: a repeat observation of the same state.
    #[must_use]
    pub const fn is_unchanged(self) -> bool {
        !self.newly_available && !self.newly_unavailable
    }
}

/// Policy for classifying a product's very first availability record.
///
/// The historical behavior flags an unavailable first sighting as
/// newly-unavailable, which double-reports state on the very first check.
/// Whether that is intended is an open question, so the behavior is isolated
/// here and selected by configuration rather than silently corrected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FirstSightingPolicy {
    /// Flag an unavailable first record as newly-unavailable (historical
    /// behavior, the default).
    FlagUnavailable,
    /// Only flag available first records; an unavailable first sighting is
    /// not a transition.
    AvailableOnly,
}

impl Default for FirstSightingPolicy {
    fn default() -> Self {
        Self::FlagUnavailable
    }
}

/// Classify a product's first-ever record under the given policy.
#[must_use]
pub fn first_sighting(record: &AvailabilityRecord, policy: FirstSightingPolicy) -> Transition {
    Transition {
        newly_available: record.available,
        newly_unavailable: match policy {
            FirstSightingPolicy::FlagUnavailable => !record.available,
            FirstSightingPolicy::AvailableOnly => false,
        },
    }
}

/// Classify the latest transition from a newest-first history slice.
///
/// The slice must contain the record for the current observation at index 0;
/// only the two most recent records are consulted.
///
/// - One record: the product was just sighted for the first time; see
///   [`first_sighting`] and [`FirstSightingPolicy`].
/// - Two or more: the newest state is compared against the second-newest;
///   equal states classify as unchanged.
#[must_use]
pub fn classify(history_newest_first: &[AvailabilityRecord], policy: FirstSightingPolicy) -> Transition {
    match history_newest_first {
        [] => Transition::default(),
        [only] => first_sighting(only, policy),
        [newest, previous, ..] => Transition {
            newly_available: newest.available && !previous.available,
            newly_unavailable: !newest.available && previous.available,
        },
    }
}
