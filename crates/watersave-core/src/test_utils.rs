//! Test utilities for watersave-core
//!
//! Provides a mock Messages API server so the real HTTP backend can be
//! exercised without network access or an API key.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Json, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tokio::sync::oneshot;

/// How the mock server answers `POST /v1/messages`
#[derive(Debug, Clone)]
pub enum MockReply {
    /// 200 with a single text block
    Text(String),
    /// 200 whose first block is not text
    NonText,
    /// Non-2xx status with a JSON error body
    Status(u16),
    /// Sleep before answering with text (for timeout tests)
    Delayed(Duration, String),
}

/// A request captured by the mock server
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub api_key: Option<String>,
    pub anthropic_version: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
struct ServerState {
    reply: MockReply,
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
}

/// Mock Messages API server for testing
pub struct MockAdviceServer {
    addr: SocketAddr,
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockAdviceServer {
    /// Start the mock server on an available port
    pub async fn start(reply: MockReply) -> Self {
        let captured = Arc::new(Mutex::new(Vec::new()));
        let state = ServerState {
            reply,
            captured: captured.clone(),
        };

        let app = Router::new()
            .route("/v1/messages", post(handle_messages))
            .route("/v1/models", get(handle_models))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            captured,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Requests received so far, oldest first
    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.captured.lock().unwrap().clone()
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockAdviceServer {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn handle_models() -> Json<Value> {
    Json(json!({
        "data": [{"type": "model", "id": "mock-model"}],
        "has_more": false
    }))
}

async fn handle_messages(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    state.captured.lock().unwrap().push(CapturedRequest {
        api_key: header("x-api-key"),
        anthropic_version: header("anthropic-version"),
        body: body.clone(),
    });

    let model = body["model"].as_str().unwrap_or("mock-model").to_string();

    match state.reply {
        MockReply::Text(text) => Json(message(&model, json!([{"type": "text", "text": text}])))
            .into_response(),
        MockReply::NonText => Json(message(
            &model,
            json!([{"type": "tool_use", "id": "toolu_1", "name": "lookup", "input": {}}]),
        ))
        .into_response(),
        MockReply::Status(code) => {
            let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (
                status,
                Json(json!({
                    "type": "error",
                    "error": {"type": "api_error", "message": "mock failure"}
                })),
            )
                .into_response()
        }
        MockReply::Delayed(delay, text) => {
            tokio::time::sleep(delay).await;
            Json(message(&model, json!([{"type": "text", "text": text}]))).into_response()
        }
    }
}

fn message(model: &str, content: Value) -> Value {
    json!({
        "id": "msg_mock",
        "type": "message",
        "role": "assistant",
        "model": model,
        "content": content,
        "stop_reason": "end_turn",
        "stop_sequence": null,
        "usage": {"input_tokens": 10, "output_tokens": 5}
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{AdviceBackend, AnthropicBackend, CompletionRequest};
    use crate::error::Error;

    fn request(max_tokens: u32) -> CompletionRequest {
        CompletionRequest {
            system: Some("Be helpful.".into()),
            prompt: "How do I save water?".into(),
            max_tokens,
        }
    }

    fn backend(server: &MockAdviceServer, timeout: Duration) -> AnthropicBackend {
        AnthropicBackend::new(&server.url(), "claude-test", "sk-test", timeout).unwrap()
    }

    #[tokio::test]
    async fn test_backend_round_trip() {
        let server = MockAdviceServer::start(MockReply::Text("Use a bucket.".into())).await;
        let backend = backend(&server, Duration::from_secs(5));

        let reply = backend.complete(&request(300)).await.unwrap();
        assert_eq!(reply, "Use a bucket.");

        let captured = server.requests();
        assert_eq!(captured.len(), 1);
        assert_eq!(captured[0].api_key.as_deref(), Some("sk-test"));
        assert_eq!(captured[0].anthropic_version.as_deref(), Some("2023-06-01"));
        assert_eq!(captured[0].body["model"], "claude-test");
        assert_eq!(captured[0].body["max_tokens"], 300);
        assert_eq!(captured[0].body["system"], "Be helpful.");
        assert_eq!(captured[0].body["messages"][0]["content"], "How do I save water?");
    }

    #[tokio::test]
    async fn test_backend_api_error() {
        let server = MockAdviceServer::start(MockReply::Status(529)).await;
        let backend = backend(&server, Duration::from_secs(5));

        let err = backend.complete(&request(500)).await.unwrap_err();
        match err {
            Error::Api { status, body } => {
                assert_eq!(status, 529);
                assert!(body.contains("mock failure"));
            }
            other => panic!("Expected API error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_backend_non_text_reply() {
        let server = MockAdviceServer::start(MockReply::NonText).await;
        let backend = backend(&server, Duration::from_secs(5));

        let err = backend.complete(&request(500)).await.unwrap_err();
        assert!(matches!(err, Error::EmptyResponse));
    }

    #[tokio::test]
    async fn test_backend_timeout() {
        let server = MockAdviceServer::start(MockReply::Delayed(
            Duration::from_secs(2),
            "too late".into(),
        ))
        .await;
        let backend = backend(&server, Duration::from_millis(200));

        let err = backend.complete(&request(500)).await.unwrap_err();
        match err {
            Error::Http(e) => assert!(e.is_timeout()),
            other => panic!("Expected timeout, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_backend_health_check() {
        let server = MockAdviceServer::start(MockReply::Text("ok".into())).await;
        assert!(backend(&server, Duration::from_secs(5)).health_check().await);
    }
}
