//! Mock backend for testing
//!
//! Returns a canned reply (or a scripted failure) and records every request
//! it receives, so tests can assert whether the service was called at all.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{AdviceBackend, CompletionRequest};
use crate::error::{Error, Result};

const DEFAULT_REPLY: &str = "Take shorter showers and only run full laundry loads.";

/// Mock advice backend for testing
///
/// Clones share the call log, so a test can keep one handle and give the
/// other to the code under test.
#[derive(Clone)]
pub struct MockBackend {
    /// Whether health_check should return true
    pub healthy: bool,
    reply: Arc<String>,
    fail_with_status: Option<u16>,
    calls: Arc<Mutex<Vec<CompletionRequest>>>,
    call_count: Arc<AtomicUsize>,
}

impl MockBackend {
    /// Create a new mock backend (healthy, replies with a fixed tip)
    pub fn new() -> Self {
        Self {
            healthy: true,
            reply: Arc::new(DEFAULT_REPLY.to_string()),
            fail_with_status: None,
            calls: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Mock that answers every request with `reply`
    pub fn with_reply(reply: impl Into<String>) -> Self {
        Self {
            reply: Arc::new(reply.into()),
            ..Self::new()
        }
    }

    /// Mock whose requests all fail with an API error
    pub fn failing(status: u16) -> Self {
        Self {
            healthy: false,
            fail_with_status: Some(status),
            ..Self::new()
        }
    }

    /// Number of completion requests received
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Copy of every request received, oldest first
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AdviceBackend for MockBackend {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(request.clone());
        }

        match self.fail_with_status {
            Some(status) => Err(Error::Api {
                status,
                body: "mock failure".to_string(),
            }),
            None => Ok(self.reply.as_str().to_string()),
        }
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}
