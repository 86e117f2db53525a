//! Anthropic Messages API backend
//!
//! Sends a single user message (plus optional system prompt) to
//! `POST {base_url}/v1/messages` and takes the first content block as the
//! answer. Every request is bounded by the configured timeout.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{AdviceBackend, CompletionRequest};
use crate::config::Config;
use crate::error::{Error, Result};

pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Messages API request
#[derive(Debug, Serialize)]
pub struct MessagesRequest {
    pub model: String,
    pub max_tokens: u32,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
}

/// Message in conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: String, // "user", "assistant"
    pub content: String,
}

impl Message {
    /// Create a user message with text content
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: text.into(),
        }
    }
}

/// Content block types
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },

    /// Any block type we do not consume (tool use, thinking, ...)
    #[serde(other)]
    Other,
}

/// Messages API response
#[derive(Debug, Deserialize)]
pub struct MessagesResponse {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub model: String,
    pub content: Vec<ContentBlock>,
    pub stop_reason: Option<String>, // "end_turn", "max_tokens", ...
    pub usage: Option<Usage>,
}

/// Token usage information
#[derive(Debug, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl MessagesResponse {
    /// Text of the first content block, if that block is text
    pub fn first_text(&self) -> Option<&str> {
        match self.content.first() {
            Some(ContentBlock::Text { text }) => Some(text.as_str()),
            _ => None,
        }
    }
}

/// Messages API backend
#[derive(Clone)]
pub struct AnthropicBackend {
    http_client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl AnthropicBackend {
    /// Create a new backend with a request timeout
    pub fn new(base_url: &str, model: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            &config.base_url,
            &config.model,
            &config.api_key,
            config.timeout,
        )
    }

    /// Send a messages request
    pub async fn messages(
        &self,
        system: Option<&str>,
        messages: Vec<Message>,
        max_tokens: u32,
    ) -> Result<MessagesResponse> {
        let request = MessagesRequest {
            model: self.model.clone(),
            max_tokens,
            messages,
            system: system.map(String::from),
        };

        debug!(
            model = %self.model,
            max_tokens,
            "Sending Messages API request"
        );

        let response = self
            .http_client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api { status, body });
        }

        let messages_response: MessagesResponse = response.json().await?;

        debug!(
            stop_reason = ?messages_response.stop_reason,
            output_tokens = messages_response.usage.as_ref().map(|u| u.output_tokens),
            "Received Messages API response"
        );

        Ok(messages_response)
    }
}

#[async_trait]
impl AdviceBackend for AnthropicBackend {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let response = self
            .messages(
                request.system.as_deref(),
                vec![Message::user(request.prompt.clone())],
                request.max_tokens,
            )
            .await?;

        response
            .first_text()
            .map(str::to_string)
            .ok_or(Error::EmptyResponse)
    }

    /// Reachability check against the models listing endpoint
    async fn health_check(&self) -> bool {
        self.http_client
            .get(format!("{}/v1/models", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .send()
            .await
            .map(|resp| resp.status().is_success())
            .unwrap_or(false)
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn host(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response_with(content: Vec<ContentBlock>) -> MessagesResponse {
        MessagesResponse {
            id: "msg_1".to_string(),
            model: "test-model".to_string(),
            content,
            stop_reason: Some("end_turn".to_string()),
            usage: None,
        }
    }

    #[test]
    fn test_first_text_takes_first_block_only() {
        let response = response_with(vec![
            ContentBlock::Text {
                text: "Shorter showers.".into(),
            },
            ContentBlock::Text {
                text: "Ignored".into(),
            },
        ]);
        assert_eq!(response.first_text(), Some("Shorter showers."));
    }

    #[test]
    fn test_first_text_none_when_first_block_not_text() {
        assert!(response_with(vec![]).first_text().is_none());
        assert!(response_with(vec![ContentBlock::Other]).first_text().is_none());
    }

    #[test]
    fn test_response_deserialization() {
        let json = r#"{
            "id": "msg_01",
            "type": "message",
            "role": "assistant",
            "model": "claude-3-5-sonnet-20240620",
            "content": [{"type": "text", "text": "Fix the leaky tap."}],
            "stop_reason": "end_turn",
            "stop_sequence": null,
            "usage": {"input_tokens": 20, "output_tokens": 6}
        }"#;
        let response: MessagesResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.first_text(), Some("Fix the leaky tap."));
        assert_eq!(response.usage.unwrap().output_tokens, 6);
    }

    #[test]
    fn test_unknown_block_types_tolerated() {
        let json = r#"{
            "content": [{"type": "thinking", "thinking": "..."}, {"type": "text", "text": "hi"}],
            "stop_reason": "end_turn"
        }"#;
        let response: MessagesResponse = serde_json::from_str(json).unwrap();
        assert!(response.first_text().is_none());
    }

    #[test]
    fn test_request_serialization() {
        let request = MessagesRequest {
            model: "test-model".to_string(),
            max_tokens: 300,
            messages: vec![Message::user("Hello")],
            system: None,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "test-model");
        assert_eq!(json["max_tokens"], 300);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "Hello");
        assert!(json.get("system").is_none());
    }

    #[test]
    fn test_backend_new_trims_trailing_slash() {
        let backend = AnthropicBackend::new(
            "http://localhost:8080/",
            "test-model",
            "key",
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(backend.host(), "http://localhost:8080");
        assert_eq!(backend.model(), "test-model");
    }

    #[tokio::test]
    async fn test_health_check_unreachable() {
        let backend = AnthropicBackend::new(
            "http://127.0.0.1:9",
            "test-model",
            "key",
            Duration::from_secs(1),
        )
        .unwrap();
        assert!(!backend.health_check().await);
    }
}
