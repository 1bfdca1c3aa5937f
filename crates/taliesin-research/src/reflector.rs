//! Reflection over the current findings.
//!
//! The reflector reads the findings, not the raw evidence, and returns a
//! structured verdict: named gaps, a continue-or-stop judgement, and the
//! follow-up queries that would close the gaps.

use taliesin_llm::{GenerationRequest, SharedBackend};

use crate::error::Result;
use crate::models::ReflectionVerdict;
use crate::prompts;
use crate::session::ResearchSession;

/// Configuration for reflection calls.
#[derive(Debug, Clone)]
pub struct ReflectorConfig {
    pub model: String,
    pub temperature: f32,
}

impl Default for ReflectorConfig {
    fn default() -> Self {
        Self {
            model: taliesin_llm::DEFAULT_MODEL.to_string(),
            temperature: 0.3,
        }
    }
}

/// Judges whether the findings suffice to answer the brief.
pub struct Reflector {
    backend: SharedBackend,
    config: ReflectorConfig,
}

impl Reflector {
    pub fn new(backend: SharedBackend, config: ReflectorConfig) -> Self {
        Self { backend, config }
    }

    pub async fn reflect(&self, session: &ResearchSession) -> Result<ReflectionVerdict> {
        let findings = session.findings.as_deref().unwrap_or("");

        let request = GenerationRequest::new(
            &self.config.model,
            prompts::reflect_system(session.iteration),
            prompts::reflection_user(&session.brief, findings, session.iteration),
        )
        .with_temperature(self.config.temperature)
        .with_json_schema("reflection_verdict", ReflectionVerdict::schema());

        let response = self.backend.generate(request).await?;
        let verdict: ReflectionVerdict = response.decode()?;

        tracing::debug!(
            iteration = session.iteration,
            needs_more = verdict.needs_more_context,
            gaps = verdict.knowledge_gaps.len(),
            follow_ups = verdict.follow_up_queries.len(),
            thought = %prompts::truncate(&verdict.thought, 200),
            "Reflection verdict"
        );
        Ok(verdict)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
