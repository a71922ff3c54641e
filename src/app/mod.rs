//! Application layer - configuration, wiring, and the monitor.

mod config;
mod monitor;

pub use config::{
    Config, DatabaseConfig, LoggingConfig, MonitorConfig, RoasteryConfig, TaggingConfig,
    TelegramAppConfig,
};
pub use monitor::{CycleReport, Monitor, MonitorSettings};

use std::time::Duration;

use tracing::info;

use crate::adapter::outbound::llm::AnthropicTagger;
use crate::adapter::outbound::shopify::ShopifyFeedSource;
use crate::adapter::outbound::sqlite::{create_pool, run_migrations, SqliteCatalogStore};
use crate::error::Result;
use crate::port::outbound::notifier::{LogNotifier, NotifierRegistry};
use crate::port::outbound::source::ObservationSource;
use crate::port::outbound::tagger::{DisabledTagger, Tagger};

/// Application entry points used by the CLI.
pub struct App;

impl App {
    /// Run scheduled check cycles until cancelled.
    pub async fn run(config: Config) -> Result<()> {
        let interval = Duration::from_secs(config.monitor.check_interval_minutes * 60);
        let monitor = build_monitor(&config)?;
        info!(
            roasteries = config.roasteries.len(),
            interval_minutes = config.monitor.check_interval_minutes,
            preferences = config.preferences.enabled,
            "beanwatch monitoring"
        );
        monitor.run(interval).await
    }

    /// Run exactly one check cycle and return its report.
    pub async fn check_once(config: Config) -> Result<CycleReport> {
        build_monitor(&config)?.run_cycle().await
    }
}

/// Wire the monitor from configuration: store, sources, tagger, notifiers.
pub fn build_monitor(config: &Config) -> Result<Monitor<SqliteCatalogStore>> {
    let pool = create_pool(&config.database.url)?;
    run_migrations(&pool)?;
    let store = SqliteCatalogStore::new(pool);

    let mut sources: Vec<Box<dyn ObservationSource>> = Vec::new();
    for roastery in &config.roasteries {
        sources.push(Box::new(ShopifyFeedSource::new(
            &roastery.name,
            &roastery.url,
        )?));
    }

    let tagger: Box<dyn Tagger> = if config.tagging.enabled {
        Box::new(AnthropicTagger::from_env(
            &config.tagging.model,
            config.tagging.max_tokens,
        )?)
    } else {
        Box::new(DisabledTagger)
    };

    let mut notifiers = NotifierRegistry::new();
    notifiers.register(Box::new(LogNotifier));

    #[cfg(feature = "telegram")]
    if config.telegram.enabled {
        use crate::adapter::outbound::telegram::{TelegramConfig, TelegramNotifier};
        match TelegramConfig::from_env() {
            Some(mut telegram) => {
                telegram.notify_unavailable = config.telegram.notify_unavailable;
                notifiers.register(Box::new(TelegramNotifier::new(telegram)));
            }
            None => tracing::warn!(
                "Telegram enabled but TELEGRAM_BOT_TOKEN/TELEGRAM_CHAT_ID are not set"
            ),
        }
    }

    let settings = MonitorSettings {
        cooldown_hours: config.monitor.cooldown_hours,
        first_sighting_policy: config.monitor.first_sighting_policy(),
        tagging_enabled: config.tagging.enabled,
        tagging_batch_size: config.tagging.batch_size,
    };

    Ok(Monitor::new(
        store,
        sources,
        tagger,
        notifiers,
        config.preferences.clone(),
        settings,
    ))
}
