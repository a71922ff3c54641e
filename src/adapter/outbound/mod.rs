//! Outbound adapters: concrete implementations of the outbound ports.

pub mod llm;
pub mod shopify;
pub mod sqlite;

#[cfg(feature = "telegram")]
pub mod telegram;
