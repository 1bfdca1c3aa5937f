//! Search backend trait and implementations.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::{Result, SearchError};
use crate::types::{SearchDocument, SearchOptions};

/// Trait for web search providers.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Run a single query and return matching documents.
    async fn search(&self, query: &str, options: &SearchOptions) -> Result<Vec<SearchDocument>>;

    /// Get the name of this backend.
    fn name(&self) -> &str;
}

/// A search backend that can be shared across threads.
pub type SharedSearchBackend = Arc<dyn SearchBackend>;

// ─────────────────────────────────────────────────────────────────────────────
// Mock Backend
// ─────────────────────────────────────────────────────────────────────────────

/// A scripted reply for [`MockSearchBackend`].
#[derive(Debug)]
pub enum MockSearchReply {
    /// Documents to return for one call.
    Results(Vec<SearchDocument>),
    /// A scripted failure for one call.
    Fail(SearchError),
}

/// A mock search backend for testing purposes.
///
/// Scripted replies are consumed in call order; once the script is exhausted
/// the backend returns its default result set for every further call.
#[derive(Debug, Default)]
pub struct MockSearchBackend {
    default_results: Vec<SearchDocument>,
    script: std::sync::Mutex<Vec<MockSearchReply>>,
    query_log: std::sync::Mutex<Vec<String>>,
}

impl MockSearchBackend {
    /// Create a backend that returns no results.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend that returns the given documents for every call.
    pub fn with_results(results: Vec<SearchDocument>) -> Self {
        Self {
            default_results: results,
            script: std::sync::Mutex::new(Vec::new()),
            query_log: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Queue scripted replies consumed before the default result set.
    pub fn script(self, replies: Vec<MockSearchReply>) -> Self {
        *self.script.lock().unwrap() = replies;
        self
    }

    /// Get all queries that were made to this backend.
    pub fn queries(&self) -> Vec<String> {
        self.query_log.lock().unwrap().clone()
    }

    /// Get the number of search calls made.
    pub fn call_count(&self) -> usize {
        self.query_log.lock().unwrap().len()
    }
}

#[async_trait]
impl SearchBackend for MockSearchBackend {
    async fn search(&self, query: &str, _options: &SearchOptions) -> Result<Vec<SearchDocument>> {
        self.query_log.lock().unwrap().push(query.to_string());

        let mut script = self.script.lock().unwrap();
        if !script.is_empty() {
            return match script.remove(0) {
                MockSearchReply::Results(results) => Ok(results),
                MockSearchReply::Fail(error) => Err(error),
            };
        }

        Ok(self.default_results.clone())
    }

    fn name(&self) -> &str {
        "mock"
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
