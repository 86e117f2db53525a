//! Pluggable advice backend abstraction
//!
//! # Architecture
//!
//! - `AdviceBackend` trait: one text completion per request
//! - `AdviceClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `AnthropicBackend` (Messages API), `MockBackend`
//!
//! The backend only moves text. Prompt rendering lives in `crate::advice`,
//! and fault recovery lives in `crate::actions::dispatch`.

pub mod anthropic;
mod mock;

pub use anthropic::{AnthropicBackend, ContentBlock, Message, MessagesRequest, MessagesResponse};
pub use mock::MockBackend;

use async_trait::async_trait;

use crate::config::{BackendKind, Config};
use crate::error::Result;

/// A single completion request
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Optional system instruction
    pub system: Option<String>,
    /// User message
    pub prompt: String,
    /// Upper bound on generated tokens
    pub max_tokens: u32,
}

/// Trait defining the interface for all advice backends
#[async_trait]
pub trait AdviceBackend: Send + Sync {
    /// Send one prompt and return the first text segment of the reply
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;

    /// Check if the backend is reachable
    async fn health_check(&self) -> bool;

    /// Get the model name (for logging)
    fn model(&self) -> &str;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete advice client enum
#[derive(Clone)]
pub enum AdviceClient {
    /// Anthropic Messages API
    Anthropic(AnthropicBackend),
    /// Mock backend for testing
    Mock(MockBackend),
}

impl AdviceClient {
    /// Build the client selected by the configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        match config.backend {
            BackendKind::Anthropic => Ok(AdviceClient::Anthropic(AnthropicBackend::from_config(
                config,
            )?)),
            BackendKind::Mock => Ok(AdviceClient::Mock(MockBackend::new())),
        }
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        AdviceClient::Mock(MockBackend::new())
    }
}

#[async_trait]
impl AdviceBackend for AdviceClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        match self {
            AdviceClient::Anthropic(b) => b.complete(request).await,
            AdviceClient::Mock(b) => b.complete(request).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            AdviceClient::Anthropic(b) => b.health_check().await,
            AdviceClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            AdviceClient::Anthropic(b) => b.model(),
            AdviceClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            AdviceClient::Anthropic(b) => b.host(),
            AdviceClient::Mock(b) => b.host(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advice_client_mock() {
        let client = AdviceClient::mock();
        assert_eq!(client.model(), "mock");
        assert_eq!(client.host(), "mock://localhost");
    }

    #[tokio::test]
    async fn test_mock_health_check() {
        let client = AdviceClient::mock();
        assert!(client.health_check().await);
    }

    #[tokio::test]
    async fn test_mock_complete() {
        let client = AdviceClient::mock();
        let reply = client
            .complete(&CompletionRequest {
                system: None,
                prompt: "How can I save water?".into(),
                max_tokens: 500,
            })
            .await
            .unwrap();
        assert!(!reply.is_empty());
    }
}
