//! Application configuration loading and validation.
//!
//! Configuration is loaded from a TOML file. Secrets (`ANTHROPIC_API_KEY`,
//! `TELEGRAM_BOT_TOKEN`, `TELEGRAM_CHAT_ID`) come from environment variables
//! only, never from the file.

use serde::Deserialize;
use std::path::Path;

use crate::domain::{FirstSightingPolicy, PreferenceConfig, DEFAULT_COOLDOWN_HOURS};
use crate::error::{ConfigError, Result};

mod logging;

pub use logging::LoggingConfig;

/// One roastery to observe.
#[derive(Debug, Clone, Deserialize)]
pub struct RoasteryConfig {
    /// Display name, also the grouping key for identity derivation.
    pub name: String,
    /// Shop base URL exposing a public product feed.
    pub url: String,
}

/// Check-cycle settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Minutes between scheduled check cycles.
    pub check_interval_minutes: u64,
    /// Cooldown window for repeat notifications, in hours.
    pub cooldown_hours: u32,
    /// Flag an unavailable first sighting as newly-unavailable (historical
    /// behavior; set false to suppress the double report).
    pub flag_first_unavailable: bool,
}

impl MonitorConfig {
    /// The first-sighting classification policy this config selects.
    #[must_use]
    pub fn first_sighting_policy(&self) -> FirstSightingPolicy {
        if self.flag_first_unavailable {
            FirstSightingPolicy::FlagUnavailable
        } else {
            FirstSightingPolicy::AvailableOnly
        }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            check_interval_minutes: 60,
            cooldown_hours: DEFAULT_COOLDOWN_HOURS,
            flag_first_unavailable: true,
        }
    }
}

/// Tagging-model settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TaggingConfig {
    /// Whether to run the tagging pipeline at all.
    pub enabled: bool,
    /// Model identifier passed to the provider.
    pub model: String,
    /// Products per tagging request, to bound round-trips and cost.
    pub batch_size: usize,
    /// Maximum tokens to generate per reply.
    pub max_tokens: usize,
}

impl Default for TaggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            model: "claude-sonnet-4-5".into(),
            batch_size: 8,
            max_tokens: 4096,
        }
    }
}

/// Telegram channel settings; the token and chat id come from the
/// environment.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TelegramAppConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Send messages for products going out of stock.
    #[serde(default)]
    pub notify_unavailable: bool,
}

/// Database settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite database path or `:memory:`.
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "beanwatch.db".into(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub monitor: MonitorConfig,
    #[serde(default)]
    pub tagging: TaggingConfig,
    #[serde(default)]
    pub telegram: TelegramAppConfig,
    /// Declarative preference model; when enabled it replaces favorites
    /// matching for the whole cycle.
    #[serde(default)]
    pub preferences: PreferenceConfig,
    /// Roasteries to observe each cycle.
    #[serde(default)]
    pub roasteries: Vec<RoasteryConfig>,
}

impl Config {
    /// Load and validate configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let config: Self = toml::from_str(&content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.monitor.check_interval_minutes == 0 {
            return Err(ConfigError::InvalidValue {
                field: "monitor.check_interval_minutes",
                reason: "must be at least 1".into(),
            }
            .into());
        }
        if self.tagging.enabled && self.tagging.batch_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "tagging.batch_size",
                reason: "must be at least 1".into(),
            }
            .into());
        }
        for roastery in &self.roasteries {
            if roastery.name.trim().is_empty() {
                return Err(ConfigError::MissingField {
                    field: "roasteries.name",
                }
                .into());
            }
            if roastery.url.trim().is_empty() {
                return Err(ConfigError::MissingField {
                    field: "roasteries.url",
                }
                .into());
            }
        }
        Ok(())
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}
