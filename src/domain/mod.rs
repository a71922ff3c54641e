//! Source-agnostic domain logic.

mod aggregate;
mod availability;
mod favorite;
mod group;
mod ids;
mod notification;
mod observation;
mod preference;
mod product;
mod size;

// Core domain types
pub use ids::{FavoriteId, GroupId, ProductId};
pub use observation::RawObservation;
pub use product::{continent_of, NormalizedAttributes, Product, ProductTags};

// Size extraction
pub use size::{base_name, extract_size, size_in_grams};

// Group identity
pub use group::group_id;

// Availability state machine
pub use availability::{classify, first_sighting, AvailabilityRecord, FirstSightingPolicy, Transition};

// Variant aggregation
pub use aggregate::{AggregationKey, Aggregator, Candidate, MatchedBy, SizeOffer};

// Preference scoring
pub use preference::{score, ConstraintRule, ConstraintValue, Dimension, Predicate, PreferenceConfig, ScoreOutcome};

// Favorites (legacy matching path)
pub use favorite::{Favorite, SizePreference};

// Notification dedup
pub use notification::{NotificationKind, DEFAULT_COOLDOWN_HOURS};
