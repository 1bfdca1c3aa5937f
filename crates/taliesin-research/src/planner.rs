//! Search query planning.
//!
//! The first round produces a broad batch covering the whole brief; later
//! rounds target the gaps the most recent reflection pass named. A later
//! round with no gaps on record produces nothing, letting a forced round
//! pass through without spending a generation call.

use taliesin_llm::{GenerationRequest, SharedBackend};

use crate::error::Result;
use crate::models::SearchQueryBatch;
use crate::prompts;
use crate::session::ResearchSession;

/// Configuration for query planning.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Model used for query generation.
    pub model: String,
    /// Queries generated for the first, broad round.
    pub initial_batch: usize,
    /// Queries generated for each gap-targeted round.
    pub followup_batch: usize,
    /// Sampling temperature; query generation wants variety.
    pub temperature: f32,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            model: taliesin_llm::DEFAULT_MODEL.to_string(),
            initial_batch: 5,
            followup_batch: 3,
            temperature: 0.7,
        }
    }
}

/// Plans the next batch of web search queries.
pub struct QueryPlanner {
    backend: SharedBackend,
    config: PlannerConfig,
}

impl QueryPlanner {
    pub fn new(backend: SharedBackend, config: PlannerConfig) -> Self {
        Self { backend, config }
    }

    /// Batch size for gap-targeted rounds.
    pub fn followup_batch(&self) -> usize {
        self.config.followup_batch
    }

    /// Generate the next query batch from the session's brief, findings,
    /// and gaps. May return an empty batch on a gap-less later round.
    pub async fn plan(&self, session: &ResearchSession) -> Result<Vec<String>> {
        if session.iteration > 0 && session.gaps.is_empty() {
            tracing::debug!(
                iteration = session.iteration,
                "No gaps on record, planning an empty batch"
            );
            return Ok(Vec::new());
        }

        let batch = if session.iteration == 0 {
            self.config.initial_batch
        } else {
            self.config.followup_batch
        };

        let request = GenerationRequest::new(
            &self.config.model,
            prompts::queries_system(batch),
            prompts::queries_user(
                &session.brief,
                session.iteration,
                batch,
                session.findings.as_deref(),
                &session.gaps,
            ),
        )
        .with_temperature(self.config.temperature)
        .with_json_schema("search_queries", SearchQueryBatch::schema());

        let response = self.backend.generate(request).await?;
        let mut parsed: SearchQueryBatch = response.decode()?;
        parsed.queries.truncate(batch);

        tracing::debug!(
            iteration = session.iteration,
            queries = parsed.queries.len(),
            "Planned search batch"
        );
        Ok(parsed.queries)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
