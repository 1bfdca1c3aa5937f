//! Exa search API backend implementation.
//!
//! Exa (<https://exa.ai>) is a neural search engine whose `/search` endpoint
//! returns page text alongside each hit, which is what the research pipeline
//! feeds into compression.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::backend::{SearchBackend, SharedSearchBackend};
use crate::error::{Result, SearchError};
use crate::types::{SearchDocument, SearchOptions};

/// Default Exa API base URL.
const DEFAULT_EXA_BASE: &str = "https://api.exa.ai";

/// Default timeout for search requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration for the Exa backend.
#[derive(Debug, Clone)]
pub struct ExaConfig {
    /// API key for authentication.
    pub api_key: String,

    /// Base URL for the API.
    pub base_url: String,

    /// Request timeout.
    pub timeout: Duration,

    /// Name for this backend instance.
    pub name: String,
}

impl ExaConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_EXA_BASE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            name: "exa".to_string(),
        }
    }

    /// Create config from the `EXA_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("EXA_API_KEY").map_err(|_| {
            SearchError::Config("EXA_API_KEY environment variable not set".to_string())
        })?;
        Ok(Self::new(api_key))
    }

    /// Set a custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Exa Backend
// ─────────────────────────────────────────────────────────────────────────────

/// Exa search API backend.
pub struct ExaBackend {
    client: Client,
    config: ExaConfig,
}

impl ExaBackend {
    /// Create a new Exa backend with the given configuration.
    pub fn new(config: ExaConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SearchError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Create an Exa backend from environment.
    pub fn from_env() -> Result<Self> {
        Self::new(ExaConfig::from_env()?)
    }

    fn search_url(&self) -> String {
        format!("{}/search", self.config.base_url)
    }
}

#[async_trait]
impl SearchBackend for ExaBackend {
    async fn search(&self, query: &str, options: &SearchOptions) -> Result<Vec<SearchDocument>> {
        let request = ExaSearchRequest {
            query: query.to_string(),
            num_results: options.num_results,
            search_type: "auto".to_string(),
            contents: ExaContents {
                text: ExaTextConfig {
                    max_characters: options.max_characters,
                },
            },
        };

        tracing::debug!(
            backend = %self.config.name,
            query = %query,
            num_results = options.num_results,
            "Sending Exa search request"
        );

        let response = self
            .client
            .post(self.search_url())
            .header("x-api-key", &self.config.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Api(format!("HTTP {}: {}", status, body)));
        }

        let body = response.text().await?;
        let parsed: ExaSearchResponse = serde_json::from_str(&body)
            .map_err(|e| SearchError::Decode(format!("malformed Exa response: {}", e)))?;

        Ok(parsed.results.into_iter().map(SearchDocument::from).collect())
    }

    fn name(&self) -> &str {
        &self.config.name
    }
}

/// Create a shared Exa backend.
pub fn create_shared_backend(config: ExaConfig) -> Result<SharedSearchBackend> {
    Ok(std::sync::Arc::new(ExaBackend::new(config)?))
}

// ─────────────────────────────────────────────────────────────────────────────
// Exa API Types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct ExaSearchRequest {
    query: String,
    num_results: u32,
    #[serde(rename = "type")]
    search_type: String,
    contents: ExaContents,
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct ExaContents {
    text: ExaTextConfig,
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct ExaTextConfig {
    max_characters: u32,
}

#[derive(Debug, serde::Deserialize)]
struct ExaSearchResponse {
    results: Vec<ExaResult>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExaResult {
    title: Option<String>,
    url: String,
    text: Option<String>,
    published_date: Option<String>,
    author: Option<String>,
}

impl From<ExaResult> for SearchDocument {
    fn from(result: ExaResult) -> Self {
        SearchDocument {
            title: result.title.unwrap_or_else(|| "No title".to_string()),
            url: result.url,
            text: result.text.unwrap_or_default(),
            published_date: result.published_date,
            author: result.author,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
