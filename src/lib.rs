//! Beanwatch - coffee-roastery availability tracking and notifications.
//!
//! This crate periodically reads roastery product feeds, persists per-product
//! availability history, detects state transitions, collapses size variants
//! of the same coffee into one logical product, matches products against
//! user favorites or a weighted preference model, and notifies on relevant
//! changes.
//!
//! # Architecture
//!
//! The crate uses a hexagonal layout:
//!
//! - [`domain`] - pure logic: size extraction, group identity, the
//!   availability state machine, variant aggregation, preference scoring,
//!   favorite matching
//! - [`port`] - trait seams the application drives: observation sources,
//!   the catalog store, the tagging model, notifiers
//! - [`adapter`] - concrete implementations: SQLite via Diesel, Shopify
//!   product feeds, the Anthropic tagging client, Telegram delivery
//! - [`app`] - configuration and the check-cycle monitor
//! - [`cli`] - clap subcommands (`run`, `check`, `favorite`, `diagnose`)
//!
//! # Features
//!
//! - `telegram` - Telegram notification delivery (default)
//! - `testkit` - scripted sources, recording notifiers, and builders for
//!   integration tests
//!
//! # Example
//!
//! ```no_run
//! use beanwatch::app::{App, Config};
//!
//! # async fn example() -> beanwatch::error::Result<()> {
//! let config = Config::load("beanwatch.toml")?;
//! let report = App::check_once(config).await?;
//! println!("{} notifications", report.notifications_sent);
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
