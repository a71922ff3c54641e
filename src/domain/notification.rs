//! Notification kinds and the cooldown gate contract.
//!
//! The gate itself is a time-bounded count over the append-only
//! notification log owned by the store; this module defines the typed kind
//! written to and queried from that log.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default cooldown window for repeat notifications.
pub const DEFAULT_COOLDOWN_HOURS: u32 = 24;

/// The type of a sent notification, used for cooldown deduplication.
///
/// A notification is suppressed when one of the same kind was already sent
/// for the same product within the trailing window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A matched product (favorite or preference) came into stock.
    FavoriteAvailable,
    /// A matched product went out of stock.
    FavoriteUnavailable,
    /// A preference-scored product came into stock.
    PreferenceMatch,
    /// A check cycle failed hard.
    CycleError,
}

impl NotificationKind {
    /// Stable string form written to the notification log.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FavoriteAvailable => "favorite_available",
            Self::FavoriteUnavailable => "favorite_unavailable",
            Self::PreferenceMatch => "preference_match",
            Self::CycleError => "cycle_error",
        }
    }

    /// Parse the stable string form back.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "favorite_available" => Some(Self::FavoriteAvailable),
            "favorite_unavailable" => Some(Self::FavoriteUnavailable),
            "preference_match" => Some(Self::PreferenceMatch),
            "cycle_error" => Some(Self::CycleError),
            _ => None,
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
