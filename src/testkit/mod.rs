//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`domain`] — builders for observations, products, and tag bags.
//! - [`source`] — [`ScriptedSource`](source::ScriptedSource), a mock
//!   observation source with pre-loaded fetch results.
//! - [`notifier`] — [`RecordingNotifier`](notifier::RecordingNotifier),
//!   which captures events for assertions.
//! - [`tagger`] — [`TableTagger`](tagger::TableTagger) and
//!   [`QuotaTagger`](tagger::QuotaTagger).

pub mod domain;
pub mod notifier;
pub mod source;
pub mod tagger;
