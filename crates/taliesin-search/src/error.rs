//! Error types for the search crate.

use thiserror::Error;

/// Result type alias using the search error type.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Error type for search operations.
#[derive(Debug, Error)]
pub enum SearchError {
    /// API error reported by the provider.
    #[error("API error: {0}")]
    Api(String),

    /// Network/connectivity error.
    #[error("Network error: {0}")]
    Network(String),

    /// Configuration error (API key missing, etc.).
    #[error("Configuration error: {0}")]
    Config(String),

    /// The provider's payload did not match the expected structure.
    #[error("Decode error: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SearchError::Network(format!("Request timed out: {}", err))
        } else if err.is_connect() {
            SearchError::Network(format!("Connection failed: {}", err))
        } else {
            SearchError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for SearchError {
    fn from(err: serde_json::Error) -> Self {
        SearchError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SearchError::Api("quota exceeded".to_string());
        assert_eq!(err.to_string(), "API error: quota exceeded");

        let err = SearchError::Config("EXA_API_KEY not set".to_string());
        assert!(err.to_string().contains("Configuration"));
    }

    #[test]
    fn test_serde_error_maps_to_decode() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err: SearchError = parse_err.into();
        assert!(matches!(err, SearchError::Decode(_)));
    }
}
