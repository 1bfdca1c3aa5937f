//! Core types for generation requests and responses.
//!
//! These types are deliberately narrower than a full chat API surface: every
//! call in the research pipeline is a single system + user prompt pair, with
//! an optional JSON schema constraining the output shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{GenerationError, Result};

// ─────────────────────────────────────────────────────────────────────────────
// Generation Request
// ─────────────────────────────────────────────────────────────────────────────

/// Output format constraint for a generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ResponseFormat {
    /// Free-form text (the default).
    Text,
    /// Structured output validated against a JSON schema.
    JsonSchema {
        /// Name the provider associates with the schema.
        name: String,
        /// The schema itself.
        schema: Value,
    },
}

/// A generation request to a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// The model to use.
    pub model: String,

    /// System prompt establishing the role for this call.
    pub system: String,

    /// User prompt carrying the task payload.
    pub user: String,

    /// Temperature for sampling.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Maximum tokens to generate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Output format constraint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
}

impl GenerationRequest {
    /// Create a new request with the given model and prompt pair.
    pub fn new(model: impl Into<String>, system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            system: system.into(),
            user: user.into(),
            temperature: None,
            max_tokens: None,
            response_format: None,
        }
    }

    /// Set temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Cap the output length.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Constrain the output to a named JSON schema.
    pub fn with_json_schema(mut self, name: impl Into<String>, schema: Value) -> Self {
        self.response_format = Some(ResponseFormat::JsonSchema {
            name: name.into(),
            schema,
        });
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Generation Response
// ─────────────────────────────────────────────────────────────────────────────

/// A generation response from the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// Unique ID for this response.
    pub id: String,

    /// The model that generated the response.
    pub model: String,

    /// The generated text.
    pub text: String,

    /// Token usage statistics.
    pub usage: Usage,
}

impl GenerationResponse {
    /// Create a new response.
    pub fn new(
        id: impl Into<String>,
        model: impl Into<String>,
        text: impl Into<String>,
        usage: Usage,
    ) -> Self {
        Self {
            id: id.into(),
            model: model.into(),
            text: text.into(),
            usage,
        }
    }

    /// Decode the response text as a typed structured-output payload.
    ///
    /// Callers that requested a JSON schema use this to recover the typed
    /// value; a mismatch between what the model produced and `T` surfaces as
    /// [`GenerationError::Decode`].
    pub fn decode<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.text).map_err(|e| {
            GenerationError::Decode(format!("response did not match expected shape: {}", e))
        })
    }
}

/// Token usage statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Usage {
    /// Tokens in the input.
    pub input_tokens: u32,
    /// Tokens in the output.
    pub output_tokens: u32,
}

impl Usage {
    /// Create new usage statistics.
    pub fn new(input_tokens: u32, output_tokens: u32) -> Self {
        Self {
            input_tokens,
            output_tokens,
        }
    }

    /// Total tokens used.
    pub fn total(&self) -> u32 {
        self.input_tokens + self.output_tokens
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = GenerationRequest::new("gpt-4o-mini", "You are helpful.", "Hello")
            .with_temperature(0.7)
            .with_max_tokens(1024);

        assert_eq!(request.model, "gpt-4o-mini");
        assert_eq!(request.system, "You are helpful.");
        assert_eq!(request.user, "Hello");
        assert_eq!(request.temperature, Some(0.7));
        assert_eq!(request.max_tokens, Some(1024));
        assert!(request.response_format.is_none());
    }

    #[test]
    fn test_request_with_json_schema() {
        let schema = serde_json::json!({
            "type": "object",
            "properties": { "queries": { "type": "array", "items": { "type": "string" } } },
            "required": ["queries"],
        });
        let request =
            GenerationRequest::new("gpt-4o-mini", "sys", "user").with_json_schema("queries", schema);

        match request.response_format {
            Some(ResponseFormat::JsonSchema { ref name, .. }) => assert_eq!(name, "queries"),
            _ => panic!("expected a json schema format"),
        }
    }

    #[test]
    fn test_serialize_deserialize_request() {
        let request = GenerationRequest::new("gpt-4o-mini", "sys", "user").with_temperature(0.2);

        let json = serde_json::to_string(&request).unwrap();
        let parsed: GenerationRequest = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.model, request.model);
        assert_eq!(parsed.temperature, request.temperature);
    }

    #[test]
    fn test_response_decode() {
        #[derive(serde::Deserialize)]
        struct Payload {
            queries: Vec<String>,
        }

        let response = GenerationResponse::new(
            "gen_1",
            "gpt-4o-mini",
            r#"{"queries": ["a", "b"]}"#,
            Usage::new(10, 5),
        );

        let payload: Payload = response.decode().unwrap();
        assert_eq!(payload.queries, vec!["a", "b"]);
    }

    #[test]
    fn test_response_decode_mismatch() {
        let response =
            GenerationResponse::new("gen_1", "gpt-4o-mini", "plain prose", Usage::default());

        let err = response.decode::<Vec<String>>().unwrap_err();
        assert!(matches!(err, GenerationError::Decode(_)));
    }

    #[test]
    fn test_usage() {
        let usage = Usage::new(100, 50);
        assert_eq!(usage.total(), 150);
    }
}
