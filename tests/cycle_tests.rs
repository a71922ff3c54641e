//! End-to-end check-cycle tests over a scripted source and a temp database.

mod support;

use beanwatch::app::MonitorSettings;
use beanwatch::domain::{Favorite, FirstSightingPolicy, NotificationKind, PreferenceConfig};
use beanwatch::port::outbound::notifier::Event;
use beanwatch::port::outbound::store::CatalogStore;
use beanwatch::testkit::domain::{observation, tags, unavailable_observation};
use beanwatch::testkit::source::ScriptedSource;
use beanwatch::testkit::tagger::{QuotaTagger, TableTagger};
use rust_decimal_macros::dec;

use support::HarnessBuilder;

fn guji_favorite() -> Favorite {
    Favorite::new("guji", vec!["guji".to_string()], None, false)
}

#[tokio::test]
async fn favorite_notification_on_first_sighting() {
    let builder = HarnessBuilder::new().source(
        ScriptedSource::new("Roastery Co")
            .with_batch(vec![observation("Roastery Co", "Ethiopia Guji, 250g", dec!(12.5))]),
    );
    builder.store().save_favorite(&guji_favorite()).await.unwrap();
    let harness = builder.build();

    let report = harness.monitor.run_cycle().await.unwrap();

    assert_eq!(report.observations, 1);
    assert_eq!(report.newly_available, 1);
    assert_eq!(report.notifications_sent, 1);

    let events = harness.recorder.events();
    assert_eq!(events.len(), 1);
    match &events[0] {
        Event::CandidateAvailable(e) => {
            assert_eq!(e.name, "Ethiopia Guji, 250g");
            assert_eq!(e.matched_label, "guji");
            assert_eq!(e.sizes, vec!["250g"]);
        }
        other => panic!("unexpected event: {other:?}"),
    }

    // The send entered the cooldown log.
    let store = harness.monitor.store();
    let product = &store.available_products(None).await.unwrap()[0];
    assert!(store
        .was_notified_recently(product.id, NotificationKind::FavoriteAvailable, 24)
        .await
        .unwrap());
}

#[tokio::test]
async fn repeat_sighting_is_quiet() {
    let batch = vec![observation("Roastery Co", "Ethiopia Guji, 250g", dec!(12.5))];
    let builder = HarnessBuilder::new().source(
        ScriptedSource::new("Roastery Co")
            .with_batch(batch.clone())
            .with_batch(batch),
    );
    builder.store().save_favorite(&guji_favorite()).await.unwrap();
    let harness = builder.build();

    harness.monitor.run_cycle().await.unwrap();
    let report = harness.monitor.run_cycle().await.unwrap();

    assert_eq!(report.newly_available, 0);
    assert_eq!(report.notifications_sent, 0);
    assert_eq!(harness.recorder.len(), 1);
}

#[tokio::test]
async fn restock_within_cooldown_is_suppressed() {
    let name = "Ethiopia Guji, 250g";
    let builder = HarnessBuilder::new().source(
        ScriptedSource::new("Roastery Co")
            .with_batch(vec![observation("Roastery Co", name, dec!(12.5))])
            .with_batch(vec![unavailable_observation("Roastery Co", name, dec!(12.5))])
            .with_batch(vec![observation("Roastery Co", name, dec!(12.5))]),
    );
    builder.store().save_favorite(&guji_favorite()).await.unwrap();
    let harness = builder.build();

    harness.monitor.run_cycle().await.unwrap(); // in stock -> notify
    harness.monitor.run_cycle().await.unwrap(); // out of stock -> notify
    let report = harness.monitor.run_cycle().await.unwrap(); // restock within window

    assert_eq!(report.newly_available, 1);
    assert_eq!(report.notifications_sent, 0);
    assert_eq!(harness.recorder.len(), 2);
}

#[tokio::test]
async fn missing_from_feed_is_swept_unavailable() {
    let builder = HarnessBuilder::new().source(
        ScriptedSource::new("Roastery Co")
            .with_batch(vec![observation("Roastery Co", "Ethiopia Guji, 250g", dec!(12.5))])
            .with_batch(vec![]),
    );
    builder.store().save_favorite(&guji_favorite()).await.unwrap();
    let harness = builder.build();

    harness.monitor.run_cycle().await.unwrap();
    let report = harness.monitor.run_cycle().await.unwrap();

    assert_eq!(report.swept_missing, 1);
    assert_eq!(report.newly_unavailable, 1);

    let events = harness.recorder.events();
    assert_eq!(events.len(), 2);
    assert!(matches!(events[1], Event::CandidateUnavailable(_)));

    // The product is no longer current stock.
    let store = harness.monitor.store();
    assert!(store.available_products(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn failed_fetch_skips_roastery_and_sweep() {
    let builder = HarnessBuilder::new().source(
        ScriptedSource::new("Roastery Co")
            .with_batch(vec![observation("Roastery Co", "Ethiopia Guji, 250g", dec!(12.5))])
            .with_fetch_error("connect timeout"),
    );
    builder.store().save_favorite(&guji_favorite()).await.unwrap();
    let harness = builder.build();

    harness.monitor.run_cycle().await.unwrap();
    let report = harness.monitor.run_cycle().await.unwrap();

    assert_eq!(report.roasteries_failed, 1);
    assert_eq!(report.swept_missing, 0);
    assert_eq!(harness.recorder.len(), 1);

    // Still considered in stock: absence of evidence from a failed fetch
    // is not evidence of absence.
    let store = harness.monitor.store();
    assert_eq!(store.available_products(None).await.unwrap().len(), 1);
}

#[tokio::test]
async fn size_variants_collapse_into_one_preference_notification() {
    let preferences: PreferenceConfig = toml::from_str(
        r#"
        enabled = true
        min_score = 3
        [dimensions.country]
        ethiopia = 3
        "#,
    )
    .unwrap();

    let harness = HarnessBuilder::new()
        .source(ScriptedSource::new("Roastery Co").with_batch(vec![
            observation("Roastery Co", "Ethiopia Guji, 250g", dec!(12.5)),
            observation("Roastery Co", "Ethiopia Guji, 1kg", dec!(40)),
        ]))
        .tagger(
            TableTagger::new()
                .with("Ethiopia Guji, 250g", tags("Ethiopia", "Natural"))
                .with("Ethiopia Guji, 1kg", tags("Ethiopia", "Natural")),
        )
        .preferences(preferences)
        .build();

    let report = harness.monitor.run_cycle().await.unwrap();

    assert_eq!(report.tagged, 2);
    assert_eq!(report.newly_available, 2);
    assert_eq!(report.notifications_sent, 1);

    let events = harness.recorder.events();
    assert_eq!(events.len(), 1);
    match &events[0] {
        Event::CandidateAvailable(e) => {
            assert_eq!(e.sizes, vec!["250g", "1kg"]);
            assert_eq!(e.score, Some(3));
            assert_eq!(e.matched_label, "preferences");
            // Larger pack wins the representative tie-break.
            assert_eq!(e.name, "Ethiopia Guji, 1kg");
        }
        other => panic!("unexpected event: {other:?}"),
    }

    // Every variant entered the cooldown window.
    let store = harness.monitor.store();
    for product in store.available_products(None).await.unwrap() {
        assert!(store
            .was_notified_recently(product.id, NotificationKind::PreferenceMatch, 24)
            .await
            .unwrap());
    }
}

#[tokio::test]
async fn quota_exhaustion_aborts_the_cycle() {
    let harness = HarnessBuilder::new()
        .source(
            ScriptedSource::new("Roastery Co")
                .with_batch(vec![observation("Roastery Co", "Ethiopia Guji, 250g", dec!(12.5))]),
        )
        .tagger(QuotaTagger)
        .build();

    let result = harness.monitor.run_cycle().await;
    assert!(result.is_err());

    let events = harness.recorder.events();
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], Event::CycleFailed { .. }));
}

#[tokio::test]
async fn first_sighting_unavailable_follows_configured_policy() {
    // Historical behavior: the very first record being unavailable is
    // still flagged and produces an out-of-stock notice.
    let builder = HarnessBuilder::new().source(
        ScriptedSource::new("Roastery Co").with_batch(vec![unavailable_observation(
            "Roastery Co",
            "Ethiopia Guji, 250g",
            dec!(12.5),
        )]),
    );
    builder.store().save_favorite(&guji_favorite()).await.unwrap();
    let harness = builder.build();
    let report = harness.monitor.run_cycle().await.unwrap();
    assert_eq!(report.newly_unavailable, 1);
    assert_eq!(harness.recorder.len(), 1);

    // Corrected policy: quiet.
    let builder = HarnessBuilder::new()
        .source(
            ScriptedSource::new("Roastery Co").with_batch(vec![unavailable_observation(
                "Roastery Co",
                "Ethiopia Guji, 250g",
                dec!(12.5),
            )]),
        )
        .settings(MonitorSettings {
            first_sighting_policy: FirstSightingPolicy::AvailableOnly,
            ..MonitorSettings::default()
        });
    builder.store().save_favorite(&guji_favorite()).await.unwrap();
    let harness = builder.build();
    let report = harness.monitor.run_cycle().await.unwrap();
    assert_eq!(report.newly_unavailable, 0);
    assert!(harness.recorder.is_empty());
}
