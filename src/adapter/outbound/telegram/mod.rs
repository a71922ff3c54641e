//! Telegram notification delivery.
//!
//! Provides the [`TelegramNotifier`] for sending product state-change
//! messages to a chat. Spawns a background worker so the synchronous
//! [`Notifier::notify`] call never blocks on network I/O.
//!
//! Requires the `telegram` feature to be enabled.

mod format;

use teloxide::prelude::*;
use teloxide::types::ParseMode;
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::port::outbound::notifier::{Event, Notifier};

use format::format_event_message;

/// Configuration for the Telegram notifier.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    /// Bot API token obtained from BotFather.
    pub bot_token: String,
    /// Target chat ID for notifications.
    pub chat_id: i64,
    /// Send messages for products going out of stock (can be noisy).
    pub notify_unavailable: bool,
}

impl TelegramConfig {
    /// Create configuration from environment variables.
    ///
    /// Reads `TELEGRAM_BOT_TOKEN` and `TELEGRAM_CHAT_ID`. Returns `None`
    /// if required variables are missing or invalid.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let bot_token = std::env::var("TELEGRAM_BOT_TOKEN").ok()?;
        let chat_id = std::env::var("TELEGRAM_CHAT_ID")
            .ok()
            .and_then(|s| s.parse().ok())?;

        Some(Self {
            bot_token,
            chat_id,
            notify_unavailable: true,
        })
    }
}

/// Telegram notifier that sends messages to a chat.
///
/// Implements the [`Notifier`] trait and spawns a background worker for
/// message delivery. Delivery is fire-and-forget: failures are logged, not
/// retried, and never block the monitor.
pub struct TelegramNotifier {
    /// Channel sender for queuing outbound notifications.
    sender: mpsc::UnboundedSender<Event>,
}

impl TelegramNotifier {
    /// Create a new Telegram notifier and spawn the background worker.
    #[must_use]
    pub fn new(config: TelegramConfig) -> Self {
        let (sender, mut receiver) = mpsc::unbounded_channel::<Event>();

        tokio::spawn(async move {
            let bot = Bot::new(&config.bot_token);
            let chat = ChatId(config.chat_id);

            while let Some(event) = receiver.recv().await {
                if matches!(event, Event::CandidateUnavailable(_)) && !config.notify_unavailable {
                    continue;
                }
                let text = format_event_message(&event);
                match bot
                    .send_message(chat, text)
                    .parse_mode(ParseMode::Html)
                    .await
                {
                    Ok(_) => info!("Telegram notification sent"),
                    Err(e) => error!(error = %e, "Failed to send Telegram notification"),
                }
            }
        });

        Self { sender }
    }

    /// Send a test message to verify token and chat id.
    ///
    /// # Errors
    ///
    /// Returns the Telegram API error when delivery fails.
    pub async fn send_probe(config: &TelegramConfig) -> Result<(), teloxide::RequestError> {
        let bot = Bot::new(&config.bot_token);
        bot.send_message(ChatId(config.chat_id), "beanwatch: test notification")
            .await?;
        Ok(())
    }
}

impl Notifier for TelegramNotifier {
    fn notify(&self, event: Event) {
        // Worker gone means shutdown is in progress; nothing useful to do.
        let _ = self.sender.send(event);
    }
}
