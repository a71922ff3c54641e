//! Command-line interface definitions.

mod check;
mod diagnose;
mod favorite;
mod run;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Beanwatch - coffee-roastery availability tracking and notifications.
#[derive(Parser, Debug)]
#[command(name = "beanwatch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "beanwatch.toml", global = true)]
    pub config: PathBuf,

    /// Override the configured log level
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run scheduled check cycles (foreground, interactive)
    Run(RunArgs),

    /// Run one check cycle and print the report
    Check,

    /// Manage favorites
    #[command(subcommand)]
    Favorite(FavoriteCommand),

    /// Run diagnostic checks
    #[command(subcommand)]
    Diagnose(DiagnoseCommand),
}

/// Arguments for the `run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,
}

/// Subcommands for `beanwatch favorite`
#[derive(Subcommand, Debug)]
pub enum FavoriteCommand {
    /// Add or replace a favorite
    Add(FavoriteAddArgs),
    /// Remove a favorite by name
    Remove(FavoriteRemoveArgs),
    /// List favorites
    List,
}

/// Arguments for `favorite add`.
#[derive(Parser, Debug)]
pub struct FavoriteAddArgs {
    /// Favorite name
    pub name: String,

    /// Comma-separated search terms
    #[arg(short, long)]
    pub terms: String,

    /// Size preference: 250g, 1kg or both
    #[arg(short, long)]
    pub size: Option<String>,

    /// Only match organic products
    #[arg(long)]
    pub organic: bool,
}

/// Arguments for `favorite remove`.
#[derive(Parser, Debug)]
pub struct FavoriteRemoveArgs {
    /// Favorite name
    pub name: String,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Subcommands for `beanwatch diagnose`
#[derive(Subcommand, Debug)]
pub enum DiagnoseCommand {
    /// Validate the configuration file
    Config,
    /// Send a test Telegram notification
    Telegram,
}

/// Dispatch a parsed CLI invocation.
pub async fn dispatch(cli: Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Run(args) => run::execute(&cli, args).await,
        Commands::Check => check::execute(&cli).await,
        Commands::Favorite(command) => favorite::execute(&cli, command).await,
        Commands::Diagnose(command) => diagnose::execute(&cli, command).await,
    }
}
