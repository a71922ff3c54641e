//! Outbound ports: seams the application drives.

pub mod notifier;
pub mod source;
pub mod store;
pub mod tagger;
