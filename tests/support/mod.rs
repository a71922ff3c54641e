#![allow(dead_code)]

pub mod temp_db;

use beanwatch::adapter::outbound::sqlite::SqliteCatalogStore;
use beanwatch::app::{Monitor, MonitorSettings};
use beanwatch::domain::PreferenceConfig;
use beanwatch::port::outbound::notifier::NotifierRegistry;
use beanwatch::port::outbound::source::ObservationSource;
use beanwatch::port::outbound::tagger::{DisabledTagger, Tagger};
use beanwatch::testkit::notifier::RecordingNotifier;

pub use temp_db::TempDb;

/// Monitor wired against a temp sqlite store with a recording notifier.
pub struct Harness {
    pub monitor: Monitor<SqliteCatalogStore>,
    pub recorder: RecordingNotifier,
    _db: TempDb,
}

/// Builder for [`Harness`] so tests only state what they care about.
pub struct HarnessBuilder {
    db: TempDb,
    sources: Vec<Box<dyn ObservationSource>>,
    tagger: Box<dyn Tagger>,
    preferences: PreferenceConfig,
    settings: MonitorSettings,
}

impl HarnessBuilder {
    pub fn new() -> Self {
        Self {
            db: TempDb::create("harness"),
            sources: Vec::new(),
            tagger: Box::new(DisabledTagger),
            preferences: PreferenceConfig::default(),
            settings: MonitorSettings::default(),
        }
    }

    pub fn source(mut self, source: impl ObservationSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    pub fn tagger(mut self, tagger: impl Tagger + 'static) -> Self {
        self.tagger = Box::new(tagger);
        self.settings.tagging_enabled = true;
        self
    }

    pub fn preferences(mut self, preferences: PreferenceConfig) -> Self {
        self.preferences = preferences;
        self
    }

    pub fn settings(mut self, settings: MonitorSettings) -> Self {
        self.settings = settings;
        self
    }

    /// The store backing the harness; use it to seed favorites before build.
    pub fn store(&self) -> SqliteCatalogStore {
        self.db.store()
    }

    pub fn build(self) -> Harness {
        let recorder = RecordingNotifier::new();
        let mut notifiers = NotifierRegistry::new();
        notifiers.register(Box::new(recorder.clone()));

        let monitor = Monitor::new(
            self.db.store(),
            self.sources,
            self.tagger,
            notifiers,
            self.preferences,
            self.settings,
        );

        Harness {
            monitor,
            recorder,
            _db: self.db,
        }
    }
}
