//! Core types for search requests and results.

use serde::{Deserialize, Serialize};

/// A single document returned by a search provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchDocument {
    /// Document title.
    pub title: String,
    /// Document URL.
    pub url: String,
    /// Extracted page text (may be truncated by the provider).
    pub text: String,
    /// Publication date, when the provider knows it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
    /// Author, when the provider knows it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

impl SearchDocument {
    /// Create a document with just the core fields.
    pub fn new(title: impl Into<String>, url: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            text: text.into(),
            published_date: None,
            author: None,
        }
    }
}

/// Options applied to every search call.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Number of results to request per query.
    pub num_results: u32,
    /// Maximum characters of page text per result.
    pub max_characters: u32,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            num_results: 5,
            max_characters: 2000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_new() {
        let doc = SearchDocument::new("Title", "https://example.com", "body text");
        assert_eq!(doc.title, "Title");
        assert!(doc.published_date.is_none());
        assert!(doc.author.is_none());
    }

    #[test]
    fn test_default_options() {
        let options = SearchOptions::default();
        assert_eq!(options.num_results, 5);
        assert_eq!(options.max_characters, 2000);
    }

    #[test]
    fn test_document_serialization_skips_empty_metadata() {
        let doc = SearchDocument::new("T", "https://example.com", "x");
        let json = serde_json::to_value(&doc).unwrap();
        let obj = json.as_object().unwrap();
        assert!(!obj.contains_key("published_date"));
        assert!(!obj.contains_key("author"));
    }
}
