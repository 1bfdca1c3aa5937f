//! Clarification intake and research brief composition.
//!
//! Intake runs once per session, before the loop: ask 2-4 clarifying
//! questions, collect answers, then distill topic plus answers into the
//! brief that steers every later prompt.

use taliesin_llm::{GenerationRequest, SharedBackend};

use crate::error::Result;
use crate::models::ClarifyingQuestions;
use crate::prompts;

/// Answers clarifying questions on behalf of the user.
///
/// The CLI implements this over the console; tests script it.
pub trait Clarifier {
    /// Return one answer per question, in order.
    fn ask(&mut self, questions: &[String]) -> Result<Vec<String>>;
}

/// A clarifier that replays canned answers, for tests and non-interactive runs.
pub struct ScriptedClarifier {
    answers: std::collections::VecDeque<String>,
}

impl ScriptedClarifier {
    pub fn new(answers: Vec<String>) -> Self {
        Self {
            answers: answers.into(),
        }
    }

    /// A clarifier with no answers; every question gets a neutral reply.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}

impl Clarifier for ScriptedClarifier {
    fn ask(&mut self, questions: &[String]) -> Result<Vec<String>> {
        Ok(questions
            .iter()
            .map(|_| {
                self.answers
                    .pop_front()
                    .unwrap_or_else(|| "No preference.".to_string())
            })
            .collect())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Brief Builder
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration for intake generation calls.
#[derive(Debug, Clone)]
pub struct BriefConfig {
    /// Model used for both the questions and the brief.
    pub model: String,
    /// Sampling temperature for intake calls.
    pub temperature: f32,
}

impl Default for BriefConfig {
    fn default() -> Self {
        Self {
            model: taliesin_llm::DEFAULT_MODEL.to_string(),
            temperature: 0.5,
        }
    }
}

/// Generates clarifying questions and composes the research brief.
pub struct BriefBuilder {
    backend: SharedBackend,
    config: BriefConfig,
}

impl BriefBuilder {
    pub fn new(backend: SharedBackend, config: BriefConfig) -> Self {
        Self { backend, config }
    }

    /// Ask the model for clarifying questions about the topic.
    pub async fn clarifying_questions(&self, topic: &str) -> Result<Vec<String>> {
        let request = GenerationRequest::new(
            &self.config.model,
            prompts::CLARIFY_SYSTEM,
            prompts::clarify_user(topic),
        )
        .with_temperature(self.config.temperature)
        .with_json_schema("clarifying_questions", ClarifyingQuestions::schema());

        let response = self.backend.generate(request).await?;
        let parsed: ClarifyingQuestions = response.decode()?;

        tracing::debug!(count = parsed.questions.len(), "Generated clarifying questions");
        Ok(parsed.questions)
    }

    /// Distill the topic and the question/answer pairs into the brief.
    pub async fn compose_brief(
        &self,
        topic: &str,
        questions: &[String],
        answers: &[String],
    ) -> Result<String> {
        let request = GenerationRequest::new(
            &self.config.model,
            prompts::BRIEF_SYSTEM,
            prompts::brief_user(topic, questions, answers),
        )
        .with_temperature(self.config.temperature);

        let response = self.backend.generate(request).await?;
        Ok(response.text)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
