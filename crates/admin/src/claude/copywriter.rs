//! Product copy generation.
//!
//! [`TextGenerator`] is the seam the form controller talks to. [`Copywriter`]
//! implements it on top of [`ClaudeClient`]. Every failure (no API key,
//! transport error, API error, blank reply) comes back as `None`; callers
//! only ever see "text" or "no text".

use std::future::Future;

use tracing::{debug, instrument, warn};

use crate::config::ClaudeConfig;

use super::client::ClaudeClient;
use super::types::{ChatResponse, Message, StopReason};

const SYSTEM_PROMPT: &str =
    "You write product copy for an online grocery store. Reply with the requested text only.";

/// Produces marketing text for products.
pub trait TextGenerator {
    /// Generate a product description, or `None` if no text is available.
    fn generate_description(
        &self,
        name: &str,
        brand: &str,
        category: &str,
    ) -> impl Future<Output = Option<String>> + Send;

    /// Generate a disclaimer for a category, or `None` if no text is available.
    fn generate_disclaimer(&self, category: &str) -> impl Future<Output = Option<String>> + Send;
}

/// Claude-backed [`TextGenerator`].
///
/// Without a client every request is skipped.
#[derive(Debug, Clone, Default)]
pub struct Copywriter {
    client: Option<ClaudeClient>,
}

impl Copywriter {
    /// A copywriter sending requests through `client`.
    #[must_use]
    pub const fn new(client: ClaudeClient) -> Self {
        Self {
            client: Some(client),
        }
    }

    /// A copywriter that never produces text.
    #[must_use]
    pub const fn disabled() -> Self {
        Self { client: None }
    }

    /// Build from optional configuration.
    ///
    /// A missing or unusable configuration yields a disabled copywriter.
    #[must_use]
    pub fn from_config(config: Option<&ClaudeConfig>) -> Self {
        let Some(config) = config else {
            return Self::disabled();
        };
        match ClaudeClient::new(config) {
            Ok(client) => Self::new(client),
            Err(e) => {
                warn!(error = %e, "Claude client unavailable, AI copywriting disabled");
                Self::disabled()
            }
        }
    }

    /// Whether requests will reach the API.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.client.is_some()
    }

    async fn complete(&self, prompt: String) -> Option<String> {
        let Some(client) = &self.client else {
            warn!("CLAUDE_API_KEY not set, skipping text generation");
            return None;
        };

        let response = match client
            .chat(vec![Message::user(prompt)], Some(SYSTEM_PROMPT.to_string()))
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Text generation failed");
                return None;
            }
        };

        reply_text(&response)
    }
}

impl TextGenerator for Copywriter {
    #[instrument(skip(self))]
    async fn generate_description(
        &self,
        name: &str,
        brand: &str,
        category: &str,
    ) -> Option<String> {
        self.complete(description_prompt(name, brand, category))
            .await
    }

    #[instrument(skip(self))]
    async fn generate_disclaimer(&self, category: &str) -> Option<String> {
        self.complete(disclaimer_prompt(category)).await
    }
}

fn description_prompt(name: &str, brand: &str, category: &str) -> String {
    format!(
        "Write a product description for a grocery store listing.\n\
         \n\
         Product: {name}\n\
         Brand: {brand}\n\
         Category: {category}\n\
         \n\
         Use two or three sentences in a professional, engaging tone. \
         Cover the key features, benefits and quality of the product. \
         Return only the description, without labels or formatting."
    )
}

fn disclaimer_prompt(category: &str) -> String {
    format!(
        "Write a product disclaimer for a grocery store selling {category} products.\n\
         \n\
         Use one or two sentences of standard e-commerce disclaimer language \
         covering the accuracy of product information and possible packaging \
         differences. Do not use quotation marks. \
         Return only the disclaimer, without labels or formatting."
    )
}

/// Text of a response, or `None` for refusals and blank replies.
fn reply_text(response: &ChatResponse) -> Option<String> {
    debug!(
        stop_reason = ?response.stop_reason,
        input_tokens = response.usage.input_tokens,
        output_tokens = response.usage.output_tokens,
        "Text generation finished"
    );
    if response.stop_reason == Some(StopReason::Refusal) {
        warn!("Text generation refused");
        return None;
    }
    clean_reply(&response.text())
}

/// Trim a reply; blank replies count as no text.
fn clean_reply(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompts_mention_inputs() {
        let prompt = description_prompt("Ground Nut Oil", "Dhara", "Oils & Ghee");
        assert!(prompt.contains("Product: Ground Nut Oil"));
        assert!(prompt.contains("Brand: Dhara"));
        assert!(prompt.contains("Category: Oils & Ghee"));

        assert!(disclaimer_prompt("Dairy").contains("selling Dairy products"));
    }

    #[test]
    fn test_clean_reply() {
        assert_eq!(clean_reply("  Fresh oil.\n"), Some("Fresh oil.".to_string()));
        assert_eq!(clean_reply(" \n\t"), None);
        assert_eq!(clean_reply(""), None);
    }

    fn response(stop_reason: &str, text: &str) -> ChatResponse {
        serde_json::from_value(serde_json::json!({
            "id": "msg_01",
            "model": "claude-sonnet-4-20250514",
            "stop_reason": stop_reason,
            "content": [{"type": "text", "text": text}],
            "usage": {"input_tokens": 20, "output_tokens": 10}
        }))
        .expect("deserialize")
    }

    #[test]
    fn test_reply_text() {
        assert_eq!(
            reply_text(&response("end_turn", " Cold pressed oil. ")),
            Some("Cold pressed oil.".to_string())
        );
        assert_eq!(
            reply_text(&response("pause_turn", "Cold pressed oil.")),
            Some("Cold pressed oil.".to_string())
        );
        assert_eq!(reply_text(&response("refusal", "I can't help.")), None);
    }

    #[test]
    fn test_from_config_without_key_is_disabled() {
        assert!(!Copywriter::from_config(None).is_enabled());
    }

    #[tokio::test]
    async fn test_disabled_copywriter_returns_none() {
        let copywriter = Copywriter::disabled();
        assert_eq!(
            copywriter
                .generate_description("Ground Nut Oil", "Dhara", "Oils & Ghee")
                .await,
            None
        );
        assert_eq!(copywriter.generate_disclaimer("Oils & Ghee").await, None);
    }

    #[tokio::test]
    async fn test_unreachable_api_returns_none() {
        let mut config = ClaudeConfig::new(secrecy::SecretString::from("sk-ant-test-key"));
        // Nothing listens on the discard port.
        config.api_url = "http://127.0.0.1:9/v1/messages".to_string();
        let copywriter = Copywriter::from_config(Some(&config));
        assert!(copywriter.is_enabled());

        assert_eq!(copywriter.generate_disclaimer("Dairy").await, None);
    }
}
