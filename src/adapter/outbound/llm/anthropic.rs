//! Anthropic Claude tagging client.
//!
//! Implements the [`Tagger`] trait for the Anthropic Messages API. Products
//! are batched into one completion request; the model is asked for a strict
//! JSON array with one attribute object per product.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::ProductTags;
use crate::error::{Error, Result, TaggerError};
use crate::port::outbound::tagger::{TagRequest, Tagger};

/// Anthropic Messages API endpoint.
const API_URL: &str = "https://api.anthropic.com/v1/messages";

/// API version header value.
const API_VERSION: &str = "2023-06-01";

/// Anthropic Claude tagging client.
#[derive(Debug)]
pub struct AnthropicTagger {
    /// HTTP client for API requests.
    client: Client,
    /// API key for authentication.
    api_key: String,
    /// Model identifier.
    model: String,
    /// Maximum tokens to generate in the response.
    max_tokens: usize,
}

impl AnthropicTagger {
    /// Create a new client with explicit configuration.
    #[must_use]
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, max_tokens: usize) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            max_tokens,
        }
    }

    /// Create a client from the `ANTHROPIC_API_KEY` environment variable.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment variable is not set.
    pub fn from_env(model: impl Into<String>, max_tokens: usize) -> Result<Self> {
        let api_key = std::env::var("ANTHROPIC_API_KEY").map_err(|_| {
            Error::Config(crate::error::ConfigError::MissingField {
                field: "ANTHROPIC_API_KEY",
            })
        })?;
        Ok(Self::new(api_key, model, max_tokens))
    }

    fn prompt(requests: &[TagRequest]) -> String {
        let listings: Vec<serde_json::Value> = requests
            .iter()
            .map(|r| {
                serde_json::json!({
                    "name": r.name,
                    "roastery": r.roastery,
                    "description": r.description,
                })
            })
            .collect();

        format!(
            "You extract structured coffee attributes from shop listings.\n\
             For each listing below, produce one JSON object with exactly these keys:\n\
             country_of_origin, region, process_method, roast_level, variety \
             (strings or null), is_organic, is_fair_trade, is_decaf (booleans), \
             flavor_notes, certifications (arrays of strings), \
             confidence (integer 0-100).\n\
             Reply with a JSON array only, one object per listing, in order. \
             No prose, no markdown.\n\nListings:\n{}",
            serde_json::Value::Array(listings)
        )
    }

    /// Parse the model's reply into one tag bag per request.
    ///
    /// A malformed reply degrades to empty bags with confidence 0 for the
    /// whole batch; it never fails the cycle.
    fn parse_reply(reply: &str, expected: usize) -> Vec<ProductTags> {
        let trimmed = strip_code_fences(reply);
        let parsed: Vec<ProductTags> = match serde_json::from_str(trimmed) {
            Ok(bags) => bags,
            Err(error) => {
                warn!(%error, "Tagging reply was not valid JSON; using empty tags for batch");
                return vec![ProductTags::default(); expected];
            }
        };

        if parsed.len() != expected {
            warn!(
                got = parsed.len(),
                expected, "Tagging reply length mismatch; using empty tags for batch"
            );
            return vec![ProductTags::default(); expected];
        }
        parsed
    }
}

/// Models occasionally wrap JSON in markdown fences despite instructions.
fn strip_code_fences(reply: &str) -> &str {
    let trimmed = reply.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|s| s.strip_suffix("```"))
        .map_or(trimmed, str::trim)
}

#[derive(Serialize)]
struct Request {
    model: String,
    max_tokens: usize,
    messages: Vec<Message>,
}

#[derive(Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct Response {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    text: String,
}

#[async_trait]
impl Tagger for AnthropicTagger {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    async fn tag_batch(&self, requests: &[TagRequest]) -> Result<Vec<ProductTags>> {
        if requests.is_empty() {
            return Ok(Vec::new());
        }

        let request = Request {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            messages: vec![Message {
                role: "user",
                content: Self::prompt(requests),
            }],
        };

        let response = self
            .client
            .post(API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| TaggerError::RequestFailed(e.to_string()))?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            return Err(TaggerError::QuotaExhausted(
                "Anthropic API returned 429".to_string(),
            )
            .into());
        }

        let response: Response = response
            .error_for_status()
            .map_err(|e| TaggerError::RequestFailed(e.to_string()))?
            .json()
            .await
            .map_err(|e| TaggerError::RequestFailed(e.to_string()))?;

        let reply = response
            .content
            .first()
            .map(|block| block.text.as_str())
            .unwrap_or_default();

        Ok(Self::parse_reply(reply, requests.len()))
    }
}
