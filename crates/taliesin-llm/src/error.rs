//! Error types for the generation crate.

use std::time::Duration;
use thiserror::Error;

/// Result type alias using the generation error type.
pub type Result<T> = std::result::Result<T, GenerationError>;

// ─────────────────────────────────────────────────────────────────────────────
// Rate Limit Info
// ─────────────────────────────────────────────────────────────────────────────

/// Information about a rate limit error.
#[derive(Debug, Clone)]
pub struct RateLimitInfo {
    /// The error message from the provider.
    pub message: String,
    /// How long to wait before retrying (if the provider specified).
    pub retry_after: Option<Duration>,
}

impl RateLimitInfo {
    /// Create a new rate limit info with just a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            retry_after: None,
        }
    }

    /// Create a rate limit info with a retry duration.
    pub fn with_retry_after(message: impl Into<String>, retry_after: Duration) -> Self {
        Self {
            message: message.into(),
            retry_after: Some(retry_after),
        }
    }

    /// Parse rate limit info from an OpenAI-style 429 body and headers.
    pub fn parse_openai(message: &str, retry_after_header: Option<&str>) -> Self {
        let retry_after = retry_after_header.and_then(parse_retry_after_header);

        Self {
            message: message.to_string(),
            retry_after,
        }
    }
}

impl std::fmt::Display for RateLimitInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(retry_after) = self.retry_after {
            write!(f, " (retry after {:.2}s)", retry_after.as_secs_f64())?;
        }
        Ok(())
    }
}

/// Parse a Retry-After header value.
///
/// Supports the seconds (integer) format; HTTP-date values are ignored.
fn parse_retry_after_header(value: &str) -> Option<Duration> {
    if let Ok(seconds) = value.trim().parse::<u64>() {
        return Some(Duration::from_secs(seconds));
    }

    None
}

// ─────────────────────────────────────────────────────────────────────────────
// Generation Error
// ─────────────────────────────────────────────────────────────────────────────

/// Error type for generation operations.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// API error reported by the provider.
    #[error("API error: {0}")]
    Api(String),

    /// Network/connectivity error (retryable).
    #[error("Network error: {0}")]
    Network(String),

    /// Configuration error (API key missing, etc.).
    #[error("Configuration error: {0}")]
    Config(String),

    /// The provider's output did not match the expected structure.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Rate limit exceeded (retryable with backoff).
    #[error("Rate limit exceeded: {0}")]
    RateLimit(RateLimitInfo),

    /// Authentication failed.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GenerationError {
    /// Create a rate limit error from a message string.
    ///
    /// Convenience for cases where the provider doesn't give structured
    /// rate limit information.
    pub fn rate_limit(message: impl Into<String>) -> Self {
        Self::RateLimit(RateLimitInfo::new(message))
    }

    /// Create a rate limit error with retry timing.
    pub fn rate_limit_with_retry(message: impl Into<String>, retry_after: Duration) -> Self {
        Self::RateLimit(RateLimitInfo::with_retry_after(message, retry_after))
    }

    /// Get the retry-after duration if this is a rate limit error.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimit(info) => info.retry_after,
            _ => None,
        }
    }

    /// Returns true if this error is retryable.
    ///
    /// Network errors and rate limit errors are retryable. Config, decode,
    /// and auth errors should not be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::RateLimit(_))
    }
}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GenerationError::Network(format!("Request timed out: {}", err))
        } else if err.is_connect() {
            GenerationError::Network(format!("Connection failed: {}", err))
        } else {
            GenerationError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for GenerationError {
    fn from(err: serde_json::Error) -> Self {
        GenerationError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_retryable() {
        assert!(GenerationError::Network("timeout".to_string()).is_retryable());
        assert!(GenerationError::rate_limit("rate limited").is_retryable());
        assert!(!GenerationError::Config("bad config".to_string()).is_retryable());
        assert!(!GenerationError::Auth("unauthorized".to_string()).is_retryable());
        assert!(!GenerationError::Api("server error".to_string()).is_retryable());
        assert!(!GenerationError::Decode("missing field".to_string()).is_retryable());
    }

    #[test]
    fn test_rate_limit_info_new() {
        let info = RateLimitInfo::new("Rate limited");
        assert_eq!(info.message, "Rate limited");
        assert!(info.retry_after.is_none());
    }

    #[test]
    fn test_rate_limit_info_with_retry() {
        let info = RateLimitInfo::with_retry_after("Rate limited", Duration::from_secs(5));
        assert_eq!(info.message, "Rate limited");
        assert_eq!(info.retry_after, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_parse_retry_after_header() {
        assert_eq!(parse_retry_after_header("5"), Some(Duration::from_secs(5)));
        assert_eq!(
            parse_retry_after_header(" 10 "),
            Some(Duration::from_secs(10))
        );
        assert_eq!(parse_retry_after_header("invalid"), None);
    }

    #[test]
    fn test_parse_openai() {
        let info = RateLimitInfo::parse_openai("Rate limit reached for gpt-4o-mini", Some("7"));
        assert_eq!(info.retry_after, Some(Duration::from_secs(7)));

        let info = RateLimitInfo::parse_openai("Rate limit reached", None);
        assert!(info.retry_after.is_none());
    }

    #[test]
    fn test_generation_error_retry_after() {
        let err = GenerationError::rate_limit_with_retry("limited", Duration::from_secs(5));
        assert_eq!(err.retry_after(), Some(Duration::from_secs(5)));

        let err = GenerationError::rate_limit("limited");
        assert_eq!(err.retry_after(), None);

        let err = GenerationError::Network("timeout".to_string());
        assert_eq!(err.retry_after(), None);
    }

    #[test]
    fn test_rate_limit_info_display() {
        let info = RateLimitInfo::new("Rate limited");
        assert_eq!(info.to_string(), "Rate limited");

        let info = RateLimitInfo::with_retry_after("Rate limited", Duration::from_secs_f64(6.5));
        assert!(info.to_string().contains("retry after 6.50s"));
    }

    #[test]
    fn test_serde_error_maps_to_decode() {
        let parse_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: GenerationError = parse_err.into();
        assert!(matches!(err, GenerationError::Decode(_)));
    }
}
