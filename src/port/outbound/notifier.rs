//! Notifier port for state-change notifications.
//!
//! This module defines the trait for delivering notifications about
//! product state changes and cycle failures, plus the event payloads the
//! monitor hands over.

use rust_decimal::Decimal;

use crate::domain::{Candidate, MatchedBy, NotificationKind, Product};

/// Events that can trigger notifications.
#[derive(Debug, Clone)]
pub enum Event {
    /// A matched product (or group of size variants) came into stock.
    CandidateAvailable(CandidateEvent),
    /// A matched product went out of stock.
    CandidateUnavailable(UnavailableEvent),
    /// A check cycle failed hard and ended early.
    CycleFailed {
        /// The failure description.
        error: String,
    },
}

impl Event {
    /// The notification-log kind this event records under.
    #[must_use]
    pub fn kind(&self) -> NotificationKind {
        match self {
            Self::CandidateAvailable(e) => {
                if e.score.is_some() {
                    NotificationKind::PreferenceMatch
                } else {
                    NotificationKind::FavoriteAvailable
                }
            }
            Self::CandidateUnavailable(_) => NotificationKind::FavoriteUnavailable,
            Self::CycleFailed { .. } => NotificationKind::CycleError,
        }
    }
}

/// Availability event for an aggregated notification candidate.
#[derive(Debug, Clone)]
pub struct CandidateEvent {
    /// Representative display name.
    pub name: String,
    /// Roastery the product belongs to.
    pub roastery: String,
    /// Representative product page URL.
    pub url: String,
    /// Representative price.
    pub price: Decimal,
    /// What matched: favorite name or "preferences".
    pub matched_label: String,
    /// Preference score, when the scoring path matched.
    pub score: Option<i32>,
    /// Scoring trace reasons, when the scoring path matched.
    pub reasons: Vec<String>,
    /// Union of observed size tokens, 250g before 1kg.
    pub sizes: Vec<String>,
    /// Price per observed size token.
    pub size_prices: Vec<(String, Decimal)>,
    /// Whether the representative is organic.
    pub organic: bool,
}

impl From<&Candidate> for CandidateEvent {
    fn from(candidate: &Candidate) -> Self {
        let representative = candidate.representative();
        let (score, reasons) = match &candidate.matched_by {
            MatchedBy::Preference { score, reasons } => (Some(*score), reasons.clone()),
            MatchedBy::Favorite(_) => (None, Vec::new()),
        };
        Self {
            name: representative.name.clone(),
            roastery: representative.roastery.clone(),
            url: representative.url.clone(),
            price: representative.price,
            matched_label: candidate.matched_by.label(),
            score,
            reasons,
            sizes: candidate.available_sizes(),
            size_prices: candidate
                .available_sizes()
                .iter()
                .filter_map(|size| {
                    candidate
                        .offers()
                        .get(size)
                        .map(|offer| (size.clone(), offer.price))
                })
                .collect(),
            organic: representative.organic || representative.tags.is_organic,
        }
    }
}

/// Out-of-stock event for a previously matched product.
#[derive(Debug, Clone)]
pub struct UnavailableEvent {
    /// Product display name.
    pub name: String,
    /// Roastery the product belongs to.
    pub roastery: String,
    /// Last known price.
    pub last_price: Decimal,
    /// What matched: favorite name or "preferences".
    pub matched_label: String,
}

impl UnavailableEvent {
    /// Build the event for a product that left stock.
    #[must_use]
    pub fn new(product: &Product, matched_label: impl Into<String>) -> Self {
        Self {
            name: product.name.clone(),
            roastery: product.roastery.clone(),
            last_price: product.price,
            matched_label: matched_label.into(),
        }
    }
}

/// Trait for notification handlers.
///
/// Notifications are fire-and-forget: the monitor records the send in the
/// notification log after attempting delivery regardless of per-channel
/// outcome, favoring under-notification over storms on transient delivery
/// errors.
///
/// # Implementation Notes
///
/// - Implementations must be thread-safe (`Send + Sync`)
/// - The `notify` method should not block or perform slow I/O synchronously
/// - Consider spawning async tasks for slow operations
pub trait Notifier: Send + Sync {
    /// Handle an event.
    fn notify(&self, event: Event);
}

/// Registry of notifiers (composite pattern).
///
/// Broadcasts events to all registered notifiers.
#[derive(Default)]
pub struct NotifierRegistry {
    notifiers: Vec<Box<dyn Notifier>>,
}

impl NotifierRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self { notifiers: vec![] }
    }

    /// Register a notifier.
    pub fn register(&mut self, notifier: Box<dyn Notifier>) {
        self.notifiers.push(notifier);
    }

    /// Notify all registered notifiers.
    pub fn notify_all(&self, event: Event) {
        for notifier in &self.notifiers {
            notifier.notify(event.clone());
        }
    }

    /// Number of registered notifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.notifiers.len()
    }

    /// Check if registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }
}

/// A no-op notifier for testing or when notifications are disabled.
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _event: Event) {}
}

/// A logging notifier that logs events via tracing.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, event: Event) {
        use tracing::{info, warn};
        match event {
            Event::CandidateAvailable(e) => {
                info!(
                    product = %e.name,
                    roastery = %e.roastery,
                    matched = %e.matched_label,
                    sizes = ?e.sizes,
                    price = %e.price,
                    "Product available"
                );
            }
            Event::CandidateUnavailable(e) => {
                info!(
                    product = %e.name,
                    roastery = %e.roastery,
                    matched = %e.matched_label,
                    "Product out of stock"
                );
            }
            Event::CycleFailed { error } => {
                warn!(error = %error, "Check cycle failed");
            }
        }
    }
}
