//! OpenAI-compatible API backend implementation.
//!
//! This module provides `OpenAiBackend` which connects to OpenAI's API
//! or any OpenAI-compatible service (Ollama, local LLMs, etc.).

use async_trait::async_trait;
use reqwest::{Client, Response, header};
use std::time::Duration;

use crate::backend::{GenerationBackend, SharedBackend, with_retry};
use crate::error::{GenerationError, RateLimitInfo, Result};
use crate::types::{GenerationRequest, GenerationResponse, ResponseFormat, Usage};

/// Default OpenAI API base URL.
const DEFAULT_OPENAI_BASE: &str = "https://api.openai.com/v1";

/// Default timeout for requests.
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Default model when the caller doesn't specify one.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration for the OpenAI-compatible backend.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// API key for authentication (optional for local services like Ollama).
    pub api_key: Option<String>,

    /// Base URL for the API.
    pub base_url: String,

    /// Model override. When set, it takes precedence over the model named in
    /// each request (useful for deployments exposing a single fixed model).
    pub model: Option<String>,

    /// Request timeout.
    pub timeout: Duration,

    /// Maximum retries for transient errors.
    pub max_retries: u32,

    /// Initial backoff duration for retries.
    pub retry_backoff: Duration,

    /// Name for this backend instance.
    pub name: String,
}

impl OpenAiConfig {
    /// Create a new config for OpenAI.
    pub fn openai(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            base_url: DEFAULT_OPENAI_BASE.to_string(),
            model: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: 3,
            retry_backoff: Duration::from_millis(500),
            name: "openai".to_string(),
        }
    }

    /// Create a new config for Ollama (local).
    pub fn ollama() -> Self {
        Self {
            api_key: None,
            base_url: "http://localhost:11434/v1".to_string(),
            model: None,
            timeout: Duration::from_secs(600), // Longer timeout for local inference
            max_retries: 3,
            retry_backoff: Duration::from_millis(500),
            name: "ollama".to_string(),
        }
    }

    /// Create config from environment for OpenAI.
    pub fn openai_from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            GenerationError::Config("OPENAI_API_KEY environment variable not set".to_string())
        })?;
        Ok(Self::openai(api_key))
    }

    /// Set a custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set a model override.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the backend name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set max retries.
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// OpenAI Backend
// ─────────────────────────────────────────────────────────────────────────────

/// OpenAI-compatible API backend.
pub struct OpenAiBackend {
    client: Client,
    config: OpenAiConfig,
}

impl OpenAiBackend {
    /// Create a new OpenAI-compatible backend with the given configuration.
    pub fn new(config: OpenAiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                GenerationError::Internal(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client, config })
    }

    /// Create an OpenAI backend from environment.
    pub fn openai_from_env() -> Result<Self> {
        Self::new(OpenAiConfig::openai_from_env()?)
    }

    /// Create an Ollama backend with default local settings.
    pub fn ollama() -> Result<Self> {
        Self::new(OpenAiConfig::ollama())
    }

    /// Build the chat completions endpoint URL.
    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }

    /// Add authentication headers to a request.
    fn add_headers(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let builder = builder.header(header::CONTENT_TYPE, "application/json");

        if let Some(ref api_key) = self.config.api_key {
            builder.header(header::AUTHORIZATION, format!("Bearer {}", api_key))
        } else {
            builder
        }
    }

    /// Convert our GenerationRequest to OpenAI wire format.
    fn to_wire_request(&self, request: &GenerationRequest) -> OpenAiChatRequest {
        let messages = vec![
            OpenAiMessage {
                role: "system".to_string(),
                content: request.system.clone(),
            },
            OpenAiMessage {
                role: "user".to_string(),
                content: request.user.clone(),
            },
        ];

        let response_format = match request.response_format {
            Some(ResponseFormat::JsonSchema { ref name, ref schema }) => {
                Some(OpenAiResponseFormat {
                    format_type: "json_schema".to_string(),
                    json_schema: Some(OpenAiJsonSchema {
                        name: name.clone(),
                        strict: true,
                        schema: schema.clone(),
                    }),
                })
            }
            Some(ResponseFormat::Text) | None => None,
        };

        // Use config model override if set, otherwise the request's model
        let model = self
            .config
            .model
            .clone()
            .unwrap_or_else(|| request.model.clone());

        OpenAiChatRequest {
            model,
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            response_format,
        }
    }

    /// Handle a successful response.
    async fn handle_response(response: Response) -> Result<GenerationResponse> {
        if !response.status().is_success() {
            return Err(Self::handle_error_response(response).await);
        }

        let body = response.text().await?;
        let parsed: OpenAiChatResponse = serde_json::from_str(&body)
            .map_err(|e| GenerationError::Decode(format!("malformed provider response: {}", e)))?;

        let choice = parsed.choices.into_iter().next().ok_or_else(|| {
            GenerationError::Decode("provider response contained no choices".to_string())
        })?;

        let usage = parsed.usage.unwrap_or(OpenAiUsage {
            prompt_tokens: 0,
            completion_tokens: 0,
        });

        Ok(GenerationResponse {
            id: parsed.id,
            model: parsed.model,
            text: choice.message.content.unwrap_or_default(),
            usage: Usage {
                input_tokens: usage.prompt_tokens,
                output_tokens: usage.completion_tokens,
            },
        })
    }

    /// Handle an error response.
    async fn handle_error_response(response: Response) -> GenerationError {
        let status = response.status();
        let retry_after = response
            .headers()
            .get(header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.text().await.unwrap_or_default();

        if let Ok(error) = serde_json::from_str::<OpenAiErrorResponse>(&body) {
            match status.as_u16() {
                401 => GenerationError::Auth(format!(
                    "Authentication failed: {}",
                    error.error.message
                )),
                429 => GenerationError::RateLimit(RateLimitInfo::parse_openai(
                    &error.error.message,
                    retry_after.as_deref(),
                )),
                500..=599 => {
                    GenerationError::Api(format!("Server error: {}", error.error.message))
                }
                _ => GenerationError::Api(error.error.message),
            }
        } else if status.as_u16() == 429 {
            GenerationError::RateLimit(RateLimitInfo::parse_openai(&body, retry_after.as_deref()))
        } else {
            GenerationError::Api(format!("HTTP {}: {}", status, body))
        }
    }
}

#[async_trait]
impl GenerationBackend for OpenAiBackend {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse> {
        let wire_request = self.to_wire_request(&request);

        tracing::debug!(
            backend = %self.config.name,
            model = %wire_request.model,
            structured = wire_request.response_format.is_some(),
            "Sending OpenAI-compatible request"
        );

        with_retry(
            self.config.max_retries,
            self.config.retry_backoff,
            &self.config.name,
            || async {
                let response = self
                    .add_headers(self.client.post(self.completions_url()))
                    .json(&wire_request)
                    .send()
                    .await?;

                Self::handle_response(response).await
            },
        )
        .await
    }

    fn name(&self) -> &str {
        &self.config.name
    }

    async fn health_check(&self) -> Result<()> {
        // For Ollama, check the models endpoint
        if self.config.name == "ollama" {
            let models_url = format!("{}/models", self.config.base_url.trim_end_matches("/v1"));
            let response = self.client.get(&models_url).send().await?;
            if response.status().is_success() {
                return Ok(());
            }
        }

        // For API-based services, make a minimal request
        let model = self
            .config
            .model
            .clone()
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let request = GenerationRequest::new(model, "", "ping").with_max_tokens(1);

        match self.generate(request).await {
            Ok(_) => Ok(()),
            Err(GenerationError::RateLimit(_)) => Ok(()), // Rate limit means reachable
            Err(e) => Err(e),
        }
    }
}

/// Create a shared OpenAI-compatible backend.
pub fn create_shared_backend(config: OpenAiConfig) -> Result<SharedBackend> {
    Ok(std::sync::Arc::new(OpenAiBackend::new(config)?))
}

// ─────────────────────────────────────────────────────────────────────────────
// OpenAI API Types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, serde::Serialize)]
struct OpenAiChatRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<OpenAiResponseFormat>,
}

#[derive(Debug, serde::Serialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

#[derive(Debug, serde::Serialize)]
struct OpenAiResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    json_schema: Option<OpenAiJsonSchema>,
}

#[derive(Debug, serde::Serialize)]
struct OpenAiJsonSchema {
    name: String,
    strict: bool,
    schema: serde_json::Value,
}

#[derive(Debug, serde::Deserialize)]
struct OpenAiChatResponse {
    id: String,
    choices: Vec<OpenAiChoice>,
    model: String,
    usage: Option<OpenAiUsage>,
}

#[derive(Debug, serde::Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
}

#[derive(Debug, serde::Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
struct OpenAiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, serde::Deserialize)]
struct OpenAiErrorResponse {
    error: OpenAiError,
}

#[derive(Debug, serde::Deserialize)]
struct OpenAiError {
    message: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_config() {
        let config = OpenAiConfig::openai("test-key");
        assert_eq!(config.api_key, Some("test-key".to_string()));
        assert_eq!(config.base_url, DEFAULT_OPENAI_BASE);
        assert_eq!(config.name, "openai");
    }

    #[test]
    fn test_ollama_config() {
        let config = OpenAiConfig::ollama();
        assert!(config.api_key.is_none());
        assert!(config.base_url.contains("localhost"));
        assert_eq!(config.name, "ollama");
        assert_eq!(config.timeout, Duration::from_secs(600));
    }

    #[test]
    fn test_config_builder() {
        let config = OpenAiConfig::openai("key")
            .with_base_url("http://custom.api")
            .with_model("gpt-4o")
            .with_name("custom")
            .with_timeout(Duration::from_secs(60));

        assert_eq!(config.base_url, "http://custom.api");
        assert_eq!(config.model, Some("gpt-4o".to_string()));
        assert_eq!(config.name, "custom");
        assert_eq!(config.timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_completions_url() {
        let config = OpenAiConfig::openai("key");
        let backend = OpenAiBackend::new(config).unwrap();
        assert_eq!(
            backend.completions_url(),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_ollama_completions_url() {
        let config = OpenAiConfig::ollama();
        let backend = OpenAiBackend::new(config).unwrap();
        assert_eq!(
            backend.completions_url(),
            "http://localhost:11434/v1/chat/completions"
        );
    }

    #[test]
    fn test_backend_name() {
        let config = OpenAiConfig::openai("key");
        let backend = OpenAiBackend::new(config).unwrap();
        assert_eq!(backend.name(), "openai");
    }

    #[test]
    fn test_to_wire_request() {
        let config = OpenAiConfig::openai("key").with_model("gpt-4o");
        let backend = OpenAiBackend::new(config).unwrap();

        let request =
            GenerationRequest::new("gpt-4o-mini", "You plan searches.", "topic").with_temperature(0.7);

        let wire = backend.to_wire_request(&request);
        // Should use config model override, not request model
        assert_eq!(wire.model, "gpt-4o");
        assert_eq!(wire.messages.len(), 2);
        assert_eq!(wire.messages[0].role, "system");
        assert_eq!(wire.messages[1].role, "user");
        assert_eq!(wire.temperature, Some(0.7));
        assert!(wire.response_format.is_none());
    }

    #[test]
    fn test_wire_request_json_schema() {
        let config = OpenAiConfig::openai("key");
        let backend = OpenAiBackend::new(config).unwrap();

        let schema = serde_json::json!({
            "type": "object",
            "properties": { "queries": { "type": "array", "items": { "type": "string" } } },
            "required": ["queries"],
            "additionalProperties": false,
        });
        let request =
            GenerationRequest::new("gpt-4o-mini", "sys", "user").with_json_schema("queries", schema);

        let wire = backend.to_wire_request(&request);
        let json = serde_json::to_value(&wire).unwrap();

        assert_eq!(json["response_format"]["type"], "json_schema");
        assert_eq!(json["response_format"]["json_schema"]["name"], "queries");
        assert_eq!(json["response_format"]["json_schema"]["strict"], true);
        assert!(json["response_format"]["json_schema"]["schema"].is_object());
    }

    #[test]
    fn test_wire_request_omits_unset_fields() {
        let config = OpenAiConfig::openai("key");
        let backend = OpenAiBackend::new(config).unwrap();

        let request = GenerationRequest::new("gpt-4o-mini", "sys", "user");
        let wire = backend.to_wire_request(&request);
        let json = serde_json::to_value(&wire).unwrap();

        let obj = json.as_object().unwrap();
        assert!(!obj.contains_key("temperature"));
        assert!(!obj.contains_key("max_tokens"));
        assert!(!obj.contains_key("response_format"));
    }

    #[test]
    fn test_response_parsing() {
        let body = serde_json::json!({
            "id": "chatcmpl-123",
            "model": "gpt-4o-mini",
            "choices": [
                { "message": { "content": "Hello!" }, "finish_reason": "stop" }
            ],
            "usage": { "prompt_tokens": 10, "completion_tokens": 5 }
        });

        let parsed: OpenAiChatResponse = serde_json::from_value(body).unwrap();
        assert_eq!(parsed.id, "chatcmpl-123");
        assert_eq!(
            parsed.choices[0].message.content.as_deref(),
            Some("Hello!")
        );
        assert_eq!(parsed.usage.as_ref().unwrap().prompt_tokens, 10);
    }

    #[test]
    fn test_error_body_parsing() {
        let body = r#"{"error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}}"#;
        let parsed: OpenAiErrorResponse = serde_json::from_str(body).unwrap();
        assert!(parsed.error.message.contains("Incorrect API key"));
    }
}
