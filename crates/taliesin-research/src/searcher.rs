//! Concurrent search execution.
//!
//! Runs a query batch against the search backend concurrently and folds the
//! results back in query order. A failed query costs its own results and
//! nothing else; the round always completes.

use futures::future::join_all;
use taliesin_search::{SearchOptions, SharedSearchBackend};

use crate::session::SearchHit;

/// Executes query batches and tags results with their provenance.
pub struct Searcher {
    backend: SharedSearchBackend,
    options: SearchOptions,
}

impl Searcher {
    pub fn new(backend: SharedSearchBackend) -> Self {
        Self {
            backend,
            options: SearchOptions::default(),
        }
    }

    pub fn with_options(backend: SharedSearchBackend, options: SearchOptions) -> Self {
        Self { backend, options }
    }

    /// Run every query in the batch concurrently and collect the hits in
    /// query order. Failed queries are logged and skipped; an all-failed
    /// batch yields an empty result, never an error.
    pub async fn run_batch(&self, queries: &[String], iteration: u32) -> Vec<SearchHit> {
        let searches = queries.iter().map(|query| async move {
            let outcome = self.backend.search(query, &self.options).await;
            (query.clone(), outcome)
        });

        let outcomes = join_all(searches).await;

        let mut hits = Vec::new();
        for (query, outcome) in outcomes {
            match outcome {
                Ok(documents) => {
                    tracing::debug!(
                        query = %query,
                        results = documents.len(),
                        iteration,
                        "Search query completed"
                    );
                    hits.extend(documents.into_iter().map(|doc| SearchHit {
                        title: doc.title,
                        url: doc.url,
                        snippet: doc.text,
                        source_query: query.clone(),
                        iteration,
                    }));
                }
                Err(error) => {
                    tracing::warn!(
                        query = %query,
                        error = %error,
                        iteration,
                        "Search query failed, skipping"
                    );
                }
            }
        }
        hits
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use taliesin_search::{MockSearchBackend, MockSearchReply, SearchDocument, SearchError};

    fn doc(n: usize) -> SearchDocument {
        SearchDocument::new(
            format!("Title {n}"),
            format!("https://example.test/{n}"),
            format!("Text {n}"),
        )
    }

    fn queries(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_hits_are_tagged_and_ordered_by_query() {
        let backend = Arc::new(MockSearchBackend::new().script(vec![
            MockSearchReply::Results(vec![doc(1), doc(2)]),
            MockSearchReply::Results(vec![doc(3)]),
        ]));
        let searcher = Searcher::new(backend);

        let hits = searcher.run_batch(&queries(&["alpha", "beta"]), 2).await;

        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].source_query, "alpha");
        assert_eq!(hits[1].source_query, "alpha");
        assert_eq!(hits[2].source_query, "beta");
        assert!(hits.iter().all(|h| h.iteration == 2));
        assert_eq!(hits[2].snippet, "Text 3");
    }

    #[tokio::test]
    async fn test_failed_query_is_skipped() {
        let backend = Arc::new(MockSearchBackend::new().script(vec![
            MockSearchReply::Results(vec![doc(1)]),
            MockSearchReply::Fail(SearchError::Api("quota exceeded".to_string())),
            MockSearchReply::Results(vec![doc(2)]),
        ]));
        let searcher = Searcher::new(backend.clone());

        let hits = searcher
            .run_batch(&queries(&["alpha", "beta", "gamma"]), 0)
            .await;

        let sources: Vec<&str> = hits.iter().map(|h| h.source_query.as_str()).collect();
        assert_eq!(sources, vec!["alpha", "gamma"]);
        assert_eq!(backend.call_count(), 3);
    }

    #[tokio::test]
    async fn test_all_failed_batch_yields_empty() {
        let backend = Arc::new(MockSearchBackend::new().script(vec![
            MockSearchReply::Fail(SearchError::Network("dns".to_string())),
            MockSearchReply::Fail(SearchError::Network("dns".to_string())),
        ]));
        let searcher = Searcher::new(backend);

        let hits = searcher.run_batch(&queries(&["alpha", "beta"]), 1).await;
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_urls_are_kept() {
        let backend = Arc::new(MockSearchBackend::with_results(vec![doc(1)]));
        let searcher = Searcher::new(backend);

        let hits = searcher.run_batch(&queries(&["alpha", "beta"]), 0).await;

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].url, hits[1].url);
        assert_ne!(hits[0].source_query, hits[1].source_query);
    }

    #[tokio::test]
    async fn test_empty_batch_runs_no_searches() {
        let backend = Arc::new(MockSearchBackend::with_results(vec![doc(1)]));
        let searcher = Searcher::new(backend.clone());

        let hits = searcher.run_batch(&[], 0).await;

        assert!(hits.is_empty());
        assert_eq!(backend.call_count(), 0);
    }
}
