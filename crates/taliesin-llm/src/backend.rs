//! Generation backend trait and implementations.
//!
//! This module defines the abstraction layer over text-generation providers
//! and provides a mock implementation for deterministic tests.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{GenerationError, Result};
use crate::types::{GenerationRequest, GenerationResponse, Usage};

// ─────────────────────────────────────────────────────────────────────────────
// Shared Retry Logic
// ─────────────────────────────────────────────────────────────────────────────

/// Execute an async operation with exponential backoff retry.
///
/// Retries only on transient errors (network failures, rate limits).
/// Non-retryable errors are returned immediately.
pub async fn with_retry<F, Fut, T>(
    max_retries: u32,
    initial_backoff: Duration,
    backend_name: &str,
    mut f: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    let mut last_error = None;
    let mut backoff = initial_backoff;

    for attempt in 0..=max_retries {
        match f().await {
            Ok(result) => return Ok(result),
            Err(e) => {
                if !e.is_retryable() {
                    return Err(e);
                }

                last_error = Some(e);

                if attempt < max_retries {
                    tracing::warn!(
                        backend = backend_name,
                        attempt = attempt + 1,
                        max_retries = max_retries,
                        backoff_ms = backoff.as_millis() as u64,
                        "Request failed, retrying"
                    );
                    tokio::time::sleep(backoff).await;
                    backoff *= 2;
                }
            }
        }
    }

    Err(last_error.unwrap())
}

// ─────────────────────────────────────────────────────────────────────────────
// Generation Backend Trait
// ─────────────────────────────────────────────────────────────────────────────

/// Trait for text-generation providers.
///
/// Implementations of this trait provide the actual connection to services
/// like the OpenAI API or an OpenAI-compatible local server.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Execute a generation request and return the full response.
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse>;

    /// Get the name of this backend.
    fn name(&self) -> &str;

    /// Check if the backend is available and properly configured.
    async fn health_check(&self) -> Result<()>;
}

/// A backend that can be shared across threads.
pub type SharedBackend = Arc<dyn GenerationBackend>;

// ─────────────────────────────────────────────────────────────────────────────
// Mock Backend
// ─────────────────────────────────────────────────────────────────────────────

/// A scripted reply for [`MockBackend`].
#[derive(Debug)]
pub enum MockReply {
    /// A plain text response.
    Text(String),
    /// A JSON payload, serialized into the response text the way a
    /// structured-output call would return it.
    Json(serde_json::Value),
    /// A scripted failure.
    Fail(GenerationError),
}

impl MockReply {
    /// A plain text reply.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// A structured-output reply.
    pub fn json(value: serde_json::Value) -> Self {
        Self::Json(value)
    }

    /// A scripted failure.
    pub fn fail(error: GenerationError) -> Self {
        Self::Fail(error)
    }
}

/// A mock backend for testing purposes.
///
/// Returns pre-configured replies in order, useful for deterministic testing
/// of the research loop. If more requests are made than replies available,
/// an error is returned.
#[derive(Debug)]
pub struct MockBackend {
    name: String,
    replies: std::sync::Mutex<Vec<MockReply>>,
    request_log: std::sync::Mutex<Vec<GenerationRequest>>,
}

impl MockBackend {
    /// Create a new mock backend with the given replies.
    pub fn new(replies: Vec<MockReply>) -> Self {
        Self {
            name: "mock".to_string(),
            replies: std::sync::Mutex::new(replies),
            request_log: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Create a mock backend with a single text reply.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self::new(vec![MockReply::text(text)])
    }

    /// Get all requests that were made to this backend.
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.request_log.lock().unwrap().clone()
    }

    /// Get the number of requests made.
    pub fn request_count(&self) -> usize {
        self.request_log.lock().unwrap().len()
    }
}

#[async_trait]
impl GenerationBackend for MockBackend {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse> {
        // Log the request
        self.request_log.lock().unwrap().push(request);
        let seq = self.request_log.lock().unwrap().len();

        // Return the next reply
        let mut replies = self.replies.lock().unwrap();
        if replies.is_empty() {
            return Err(GenerationError::Api(
                "MockBackend: no more replies available".to_string(),
            ));
        }

        let text = match replies.remove(0) {
            MockReply::Text(text) => text,
            MockReply::Json(value) => value.to_string(),
            MockReply::Fail(error) => return Err(error),
        };

        Ok(GenerationResponse::new(
            format!("mock_gen_{}", seq),
            "mock-model",
            text,
            Usage::new(10, 20),
        ))
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
