//! Check-cycle orchestration.
//!
//! One cycle runs start-to-finish before the next scheduled invocation may
//! begin: observations are fetched per roastery, persisted against the
//! availability history, classified, tagged, aggregated into candidates,
//! matched, gated against the cooldown window, and notified. A run-in-progress
//! flag causes an overlapping trigger to be skipped entirely rather than
//! queued.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::Utc;
use parking_lot::Mutex;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::domain::{
    classify, group_id, Aggregator, AvailabilityRecord, Favorite, FirstSightingPolicy, MatchedBy,
    NotificationKind, PreferenceConfig, Product, ProductId, RawObservation, Transition, score,
};
use crate::error::{Error, Result};
use crate::port::outbound::notifier::{CandidateEvent, Event, NotifierRegistry, UnavailableEvent};
use crate::port::outbound::source::ObservationSource;
use crate::port::outbound::store::{CatalogStore, ProductSighting};
use crate::port::outbound::tagger::{TagRequest, Tagger};

/// Cycle settings resolved from configuration.
#[derive(Debug, Clone)]
pub struct MonitorSettings {
    pub cooldown_hours: u32,
    pub first_sighting_policy: FirstSightingPolicy,
    pub tagging_enabled: bool,
    pub tagging_batch_size: usize,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            cooldown_hours: crate::domain::DEFAULT_COOLDOWN_HOURS,
            first_sighting_policy: FirstSightingPolicy::default(),
            tagging_enabled: false,
            tagging_batch_size: 8,
        }
    }
}

/// Summary of one completed check cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// The cycle was skipped because another was still running.
    pub skipped: bool,
    pub roasteries_checked: usize,
    pub roasteries_failed: usize,
    pub observations: usize,
    pub newly_available: usize,
    pub newly_unavailable: usize,
    /// Products marked unavailable because they vanished from a feed.
    pub swept_missing: usize,
    pub tagged: usize,
    pub notifications_sent: usize,
}

impl CycleReport {
    fn skipped() -> Self {
        Self {
            skipped: true,
            ..Self::default()
        }
    }
}

/// A product sighted this cycle with its classified transition.
#[derive(Debug, Clone)]
struct Sighted {
    product: Product,
    transition: Transition,
}

/// The availability monitor: owns the ports and drives check cycles.
pub struct Monitor<S: CatalogStore> {
    store: S,
    sources: Vec<Box<dyn ObservationSource>>,
    tagger: Box<dyn Tagger>,
    notifiers: NotifierRegistry,
    preferences: PreferenceConfig,
    settings: MonitorSettings,
    running: AtomicBool,
    last_report: Mutex<Option<CycleReport>>,
}

impl<S: CatalogStore> Monitor<S> {
    pub fn new(
        store: S,
        sources: Vec<Box<dyn ObservationSource>>,
        tagger: Box<dyn Tagger>,
        notifiers: NotifierRegistry,
        preferences: PreferenceConfig,
        settings: MonitorSettings,
    ) -> Self {
        Self {
            store,
            sources,
            tagger,
            notifiers,
            preferences,
            settings,
            running: AtomicBool::new(false),
            last_report: Mutex::new(None),
        }
    }

    /// The most recently completed cycle's report.
    #[must_use]
    pub fn last_report(&self) -> Option<CycleReport> {
        self.last_report.lock().clone()
    }

    /// The underlying catalog store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run scheduled check cycles until the task is cancelled.
    ///
    /// The first cycle starts immediately; a cycle that overruns its slot
    /// causes the next tick to be skipped, never queued.
    pub async fn run(&self, interval: Duration) -> Result<()> {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            if let Err(error) = self.run_cycle().await {
                error!(%error, "Check cycle aborted");
            }
        }
    }

    /// Run one check cycle to completion.
    ///
    /// Returns a skipped report when a cycle is already in progress. A hard
    /// failure ends the cycle early, is logged, and triggers a best-effort
    /// error notification; the next scheduled cycle proceeds independently.
    pub async fn run_cycle(&self) -> Result<CycleReport> {
        if self.running.swap(true, Ordering::SeqCst) {
            info!("Check cycle already in progress; skipping this trigger");
            return Ok(CycleReport::skipped());
        }

        let result = self.cycle_inner().await;
        self.running.store(false, Ordering::SeqCst);

        match result {
            Ok(report) => {
                info!(
                    roasteries = report.roasteries_checked,
                    observations = report.observations,
                    newly_available = report.newly_available,
                    newly_unavailable = report.newly_unavailable,
                    notifications = report.notifications_sent,
                    "Check cycle complete"
                );
                *self.last_report.lock() = Some(report.clone());
                Ok(report)
            }
            Err(error) => {
                self.notifiers.notify_all(Event::CycleFailed {
                    error: error.to_string(),
                });
                Err(error)
            }
        }
    }

    async fn cycle_inner(&self) -> Result<CycleReport> {
        let mut report = CycleReport::default();
        let favorites = self.store.list_favorites().await?;
        let mut sighted: Vec<Sighted> = Vec::new();

        for source in &self.sources {
            let roastery = source.roastery();
            let observations = match source.fetch().await {
                Ok(observations) => observations,
                Err(error) => {
                    // A failed fetch is isolated to this roastery; without
                    // observations there is also no basis for the
                    // missing-from-feed sweep.
                    warn!(roastery = %roastery, %error, "Fetch failed; skipping roastery");
                    report.roasteries_failed += 1;
                    continue;
                }
            };

            report.roasteries_checked += 1;
            let mut seen: HashSet<ProductId> = HashSet::new();

            for observation in &observations {
                match self.process_observation(observation).await {
                    Ok(entry) => {
                        report.observations += 1;
                        seen.insert(entry.product.id);
                        sighted.push(entry);
                    }
                    Err(error) => match error {
                        Error::Database(_) | Error::Connection(_) => return Err(error),
                        error => {
                            warn!(
                                product = %observation.name,
                                roastery = %roastery,
                                %error,
                                "Failed to process observation; continuing"
                            );
                        }
                    },
                }
            }

            self.sweep_missing(roastery, &seen, &mut sighted, &mut report)
                .await?;
        }

        self.tag_untagged(&mut sighted, &mut report).await?;
        self.decide_and_notify(sighted, &favorites, &mut report)
            .await?;

        Ok(report)
    }

    /// Persist one observation and classify its availability transition.
    async fn process_observation(&self, observation: &RawObservation) -> Result<Sighted> {
        let sighting = ProductSighting {
            name: observation.name.clone(),
            roastery: observation.roastery.clone(),
            url: observation.url.clone(),
            price: observation.price,
            description: observation.description.clone(),
            organic: observation.organic,
            size_token: observation.size_token(),
            size_grams: observation.size_grams(),
        };

        let product = self.store.upsert_product(&sighting).await?;
        self.store
            .append_availability(&AvailabilityRecord {
                product_id: product.id,
                available: observation.available,
                price: observation.price,
                checked_at: Utc::now(),
            })
            .await?;

        let history = self.store.recent_availability(product.id, 2).await?;
        let transition = classify(&history, self.settings.first_sighting_policy);
        Ok(Sighted {
            product,
            transition,
        })
    }

    /// Absence from a feed is evidence of unavailability, not silence:
    /// products available in history but missing from this roastery's batch
    /// get an explicit unavailable record at their last known price.
    async fn sweep_missing(
        &self,
        roastery: &str,
        seen: &HashSet<ProductId>,
        sighted: &mut Vec<Sighted>,
        report: &mut CycleReport,
    ) -> Result<()> {
        let available = self.store.available_products(Some(roastery)).await?;
        for product in available {
            if seen.contains(&product.id) {
                continue;
            }

            debug!(product = %product.name, roastery = %roastery, "Missing from feed; recording unavailable");
            self.store
                .append_availability(&AvailabilityRecord {
                    product_id: product.id,
                    available: false,
                    price: product.price,
                    checked_at: Utc::now(),
                })
                .await?;

            let history = self.store.recent_availability(product.id, 2).await?;
            let transition = classify(&history, self.settings.first_sighting_policy);
            report.swept_missing += 1;
            sighted.push(Sighted {
                product,
                transition,
            });
        }
        Ok(())
    }

    /// Run the tagging pipeline over products never tagged before.
    ///
    /// A failed batch is skipped; quota exhaustion is re-thrown and aborts
    /// the cycle, because continuing would burn the remaining quota on
    /// guaranteed failures. Already-tagged batches are unaffected.
    async fn tag_untagged(&self, sighted: &mut [Sighted], report: &mut CycleReport) -> Result<()> {
        if !self.settings.tagging_enabled {
            return Ok(());
        }

        let untagged = self.store.untagged_products().await?;
        if untagged.is_empty() {
            return Ok(());
        }
        info!(count = untagged.len(), tagger = self.tagger.name(), "Tagging products");

        for chunk in untagged.chunks(self.settings.tagging_batch_size.max(1)) {
            let requests: Vec<TagRequest> = chunk
                .iter()
                .map(|product| TagRequest {
                    name: product.name.clone(),
                    description: product.description.clone(),
                    roastery: product.roastery.clone(),
                })
                .collect();

            let bags = match self.tagger.tag_batch(&requests).await {
                Ok(bags) => bags,
                Err(Error::Tagger(tagger_error)) if tagger_error.is_quota() => {
                    return Err(Error::Tagger(tagger_error));
                }
                Err(error) => {
                    warn!(%error, "Tagging batch failed; continuing with next batch");
                    continue;
                }
            };

            // Pair each product with its tags immediately; downstream code
            // never works with index-aligned side arrays.
            let now = Utc::now();
            for (product, tags) in chunk.iter().zip(bags) {
                let group = group_id(&product.roastery, &tags);
                self.store
                    .apply_tags(product.id, &tags, group.as_ref(), now)
                    .await?;
                report.tagged += 1;

                if let Some(entry) = sighted.iter_mut().find(|s| s.product.id == product.id) {
                    entry.product.tags = tags;
                    entry.product.group_id = group;
                    entry.product.tagged_at = Some(now);
                }
            }
        }
        Ok(())
    }

    /// Match transitions against the active strategy, collapse variants,
    /// gate against the cooldown window, and notify.
    async fn decide_and_notify(
        &self,
        sighted: Vec<Sighted>,
        favorites: &[Favorite],
        report: &mut CycleReport,
    ) -> Result<()> {
        let mut aggregator = Aggregator::new();
        let mut gone: Vec<(Product, String)> = Vec::new();

        for entry in &sighted {
            if entry.transition.newly_available {
                report.newly_available += 1;
                if self.preferences.enabled {
                    let outcome = score(&entry.product.normalized_attributes(), &self.preferences);
                    if outcome.accepted {
                        aggregator.insert(
                            &entry.product,
                            MatchedBy::Preference {
                                score: outcome.score,
                                reasons: outcome.reasons,
                            },
                        );
                    }
                } else {
                    for favorite in favorites {
                        if favorite.matches(&entry.product) {
                            aggregator.insert(
                                &entry.product,
                                MatchedBy::Favorite(favorite.name.clone()),
                            );
                        }
                    }
                }
            } else if entry.transition.newly_unavailable {
                report.newly_unavailable += 1;
                if !self.preferences.enabled {
                    if let Some(favorite) =
                        favorites.iter().find(|favorite| favorite.matches(&entry.product))
                    {
                        gone.push((entry.product.clone(), favorite.name.clone()));
                    }
                }
            }
        }

        for candidate in aggregator.into_candidates() {
            let event = Event::CandidateAvailable(CandidateEvent::from(&candidate));
            let kind = event.kind();
            let representative = candidate.representative().id;

            if self
                .store
                .was_notified_recently(representative, kind, self.settings.cooldown_hours)
                .await?
            {
                debug!(
                    product = %candidate.representative().name,
                    "Within cooldown window; suppressing notification"
                );
                continue;
            }

            self.notifiers.notify_all(event);
            report.notifications_sent += 1;

            // Recording is a separate step after the delivery attempt;
            // every variant in the candidate enters the cooldown window.
            let now = Utc::now();
            for product_id in candidate.product_ids() {
                self.store.record_notification(product_id, kind, now).await?;
            }
        }

        for (product, favorite_name) in gone {
            let kind = NotificationKind::FavoriteUnavailable;
            if self
                .store
                .was_notified_recently(product.id, kind, self.settings.cooldown_hours)
                .await?
            {
                continue;
            }

            self.notifiers
                .notify_all(Event::CandidateUnavailable(UnavailableEvent::new(
                    &product,
                    favorite_name,
                )));
            report.notifications_sent += 1;
            self.store
                .record_notification(product.id, kind, Utc::now())
                .await?;
        }

        Ok(())
    }
}
