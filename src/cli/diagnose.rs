//! Handlers for the `diagnose` subcommands.

use anyhow::Context;
use owo_colors::OwoColorize;

use crate::app::Config;
use crate::cli::{Cli, DiagnoseCommand};

/// Execute a diagnose subcommand.
pub async fn execute(cli: &Cli, command: &DiagnoseCommand) -> anyhow::Result<()> {
    match command {
        DiagnoseCommand::Config => config_check(cli),
        DiagnoseCommand::Telegram => telegram_check().await,
    }
}

fn config_check(cli: &Cli) -> anyhow::Result<()> {
    let config = Config::load(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    println!("{} {}", "OK".green().bold(), cli.config.display());
    println!("  roasteries           {}", config.roasteries.len());
    println!(
        "  matching strategy    {}",
        if config.preferences.enabled {
            "preference scoring"
        } else {
            "favorites"
        }
    );
    println!(
        "  tagging              {}",
        if config.tagging.enabled { "enabled" } else { "disabled" }
    );
    println!(
        "  check interval       {} min",
        config.monitor.check_interval_minutes
    );
    Ok(())
}

#[cfg(feature = "telegram")]
async fn telegram_check() -> anyhow::Result<()> {
    use crate::adapter::outbound::telegram::{TelegramConfig, TelegramNotifier};

    let config = TelegramConfig::from_env()
        .context("TELEGRAM_BOT_TOKEN and TELEGRAM_CHAT_ID must be set")?;
    TelegramNotifier::send_probe(&config)
        .await
        .context("sending test notification")?;
    println!("{} test notification sent", "OK".green().bold());
    Ok(())
}

#[cfg(not(feature = "telegram"))]
async fn telegram_check() -> anyhow::Result<()> {
    anyhow::bail!("this build was compiled without the `telegram` feature");
}
