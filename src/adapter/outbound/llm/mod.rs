//! Tagging-model adapters.

mod anthropic;

pub use anthropic::AnthropicTagger;
