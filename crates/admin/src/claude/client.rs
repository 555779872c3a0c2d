//! Claude API client for single-turn text generation.
//!
//! Wraps the non-streaming Anthropic Messages API.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use tracing::instrument;

use crate::config::ClaudeConfig;

use super::error::{ApiErrorResponse, ClaudeError};
use super::types::{ChatRequest, ChatResponse, Message};

const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_MAX_TOKENS: u32 = 1024;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Claude API client.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct ClaudeClient {
    inner: Arc<ClaudeClientInner>,
}

struct ClaudeClientInner {
    client: reqwest::Client,
    model: String,
    api_url: String,
}

impl std::fmt::Debug for ClaudeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaudeClient")
            .field("model", &self.inner.model)
            .field("api_url", &self.inner.api_url)
            .finish_non_exhaustive()
    }
}

impl ClaudeClient {
    /// Create a new Claude client.
    ///
    /// # Errors
    ///
    /// Returns `ClaudeError::Config` if the API key contains characters that
    /// are not valid in an HTTP header, or `ClaudeError::Http` if the HTTP
    /// client cannot be built.
    pub fn new(config: &ClaudeConfig) -> Result<Self, ClaudeError> {
        let api_key = config.api_key.expose_secret();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let mut key_header = HeaderValue::from_str(api_key).map_err(|_| {
            ClaudeError::Config("API key contains invalid header characters".to_string())
        })?;
        key_header.set_sensitive(true);
        headers.insert("x-api-key", key_header);
        headers.insert(
            "anthropic-version",
            HeaderValue::from_static(ANTHROPIC_VERSION),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            inner: Arc::new(ClaudeClientInner {
                client,
                model: config.model.clone(),
                api_url: config.api_url.clone(),
            }),
        })
    }

    /// The model this client sends requests to.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.inner.model
    }

    /// Send a chat request and get a complete response.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self, messages, system), fields(model = %self.inner.model))]
    pub async fn chat(
        &self,
        messages: Vec<Message>,
        system: Option<String>,
    ) -> Result<ChatResponse, ClaudeError> {
        let request = ChatRequest {
            model: self.inner.model.clone(),
            max_tokens: DEFAULT_MAX_TOKENS,
            messages,
            system,
        };

        let response = self
            .inner
            .client
            .post(&self.inner.api_url)
            .json(&request)
            .send()
            .await?;

        Self::handle_response(response).await
    }

    /// Handle a response, mapping error statuses to `ClaudeError`.
    async fn handle_response(response: reqwest::Response) -> Result<ChatResponse, ClaudeError> {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            serde_json::from_str(&body)
                .map_err(|e| ClaudeError::Parse(format!("Failed to parse response: {e}")))
        } else {
            Err(Self::handle_error_status(status, response).await)
        }
    }

    /// Handle an error status code.
    async fn handle_error_status(
        status: reqwest::StatusCode,
        response: reqwest::Response,
    ) -> ClaudeError {
        // Check for rate limiting
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return ClaudeError::RateLimited(retry_after);
        }

        // Check for unauthorized
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return ClaudeError::Unauthorized("Invalid API key".to_string());
        }

        match response.text().await {
            Ok(body) => parse_error_body(body),
            Err(e) => ClaudeError::Http(e),
        }
    }
}

/// Turn an error response body into `ClaudeError::Api`.
fn parse_error_body(body: String) -> ClaudeError {
    match serde_json::from_str::<ApiErrorResponse>(&body) {
        Ok(api_error) => ClaudeError::Api {
            error_type: api_error.error.error_type,
            message: api_error.error.message,
        },
        Err(_) => ClaudeError::Api {
            error_type: "unknown".to_string(),
            message: body,
        },
    }
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    #[test]
    fn test_new_rejects_key_with_newline() {
        let config = ClaudeConfig::new(SecretString::from("sk-ant\nbad"));
        assert!(matches!(
            ClaudeClient::new(&config),
            Err(ClaudeError::Config(_))
        ));
    }

    #[test]
    fn test_debug_hides_key() {
        let config = ClaudeConfig::new(SecretString::from("sk-ant-very-secret"));
        let client = ClaudeClient::new(&config).expect("client");
        let debug_output = format!("{client:?}");
        assert!(debug_output.contains(client.model()));
        assert!(!debug_output.contains("sk-ant-very-secret"));
    }

    #[test]
    fn test_parse_error_body_structured() {
        let body = r#"{"type":"error","error":{"type":"overloaded_error","message":"Overloaded"}}"#;
        let err = parse_error_body(body.to_string());
        assert_eq!(err.to_string(), "API error (overloaded_error): Overloaded");
    }

    #[test]
    fn test_parse_error_body_unstructured() {
        let err = parse_error_body("Bad Gateway".to_string());
        assert_eq!(err.to_string(), "API error (unknown): Bad Gateway");
    }

    #[test]
    fn test_claude_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + Clone>() {}
        assert_send_sync::<ClaudeClient>();
    }
}
