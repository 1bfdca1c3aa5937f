//! Final report generation.
//!
//! Produces the cited markdown report from the finished session, suggests a
//! file name for it, and extracts which evidence hits the report actually
//! cited.

use taliesin_llm::{GenerationRequest, SharedBackend};

use crate::error::Result;
use crate::prompts;
use crate::session::{ResearchSession, SearchHit};

/// Longest file name accepted from the model before falling back to a slug.
const MAX_FILENAME_CHARS: usize = 100;

/// Configuration for report generation calls.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub model: String,
    /// Temperature for the report body.
    pub temperature: f32,
    /// Temperature for the file name suggestion.
    pub filename_temperature: f32,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            model: taliesin_llm::DEFAULT_MODEL.to_string(),
            temperature: 0.4,
            filename_temperature: 0.2,
        }
    }
}

/// Writes the final report from a completed session.
pub struct ReportGenerator {
    backend: SharedBackend,
    config: ReportConfig,
}

impl ReportGenerator {
    pub fn new(backend: SharedBackend, config: ReportConfig) -> Self {
        Self { backend, config }
    }

    /// Generate the cited markdown report.
    pub async fn generate(&self, session: &ResearchSession) -> Result<String> {
        let findings = session.findings.as_deref().unwrap_or("");

        let request = GenerationRequest::new(
            &self.config.model,
            prompts::REPORT_SYSTEM,
            prompts::report_user(&session.topic, &session.brief, findings, session.evidence()),
        )
        .with_temperature(self.config.temperature);

        let response = self.backend.generate(request).await?;

        tracing::debug!(
            report_chars = response.text.len(),
            evidence = session.evidence().len(),
            "Generated final report"
        );
        Ok(response.text)
    }

    /// Suggest a file name for the report. Any failure falls back to a slug
    /// of the topic; this step never blocks persistence.
    pub async fn suggest_filename(&self, topic: &str) -> String {
        match self.ask_for_filename(topic).await {
            Ok(name) if !name.is_empty() => name,
            Ok(_) => slugify(topic),
            Err(error) => {
                tracing::warn!(error = %error, "File name suggestion failed, using topic slug");
                slugify(topic)
            }
        }
    }

    async fn ask_for_filename(&self, topic: &str) -> Result<String> {
        let request = GenerationRequest::new(
            &self.config.model,
            prompts::FILENAME_SYSTEM,
            prompts::filename_user(topic),
        )
        .with_temperature(self.config.filename_temperature);

        let response = self.backend.generate(request).await?;
        Ok(sanitize_filename(&response.text))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Citations
// ─────────────────────────────────────────────────────────────────────────────

/// Evidence hits whose URL appears in the report text, in evidence order.
/// A URL cited more than once, or retrieved more than once, is listed once.
pub fn citations_used(report: &str, evidence: &[SearchHit]) -> Vec<SearchHit> {
    let mut seen = std::collections::HashSet::new();
    evidence
        .iter()
        .filter(|hit| {
            !hit.url.is_empty() && report.contains(&hit.url) && seen.insert(hit.url.as_str())
        })
        .cloned()
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// File Names
// ─────────────────────────────────────────────────────────────────────────────

/// Reduce a model-suggested file name to a safe stem: no path separators,
/// no extension, bounded length.
fn sanitize_filename(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches(|c| c == '"' || c == '\'' || c == '`');
    let stem = trimmed
        .strip_suffix(".md")
        .or_else(|| trimmed.strip_suffix(".pdf"))
        .unwrap_or(trimmed);

    let mut name = String::new();
    for c in stem.chars() {
        match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' | '.' => name.push(c),
            ' ' | '\t' => name.push('_'),
            _ => {}
        }
    }

    let name = name.trim_matches(|c| c == '.' || c == '_').to_string();
    prompts::truncate(&name, MAX_FILENAME_CHARS)
        .trim_end_matches("...")
        .to_string()
}

/// Build a file name stem directly from the topic.
fn slugify(topic: &str) -> String {
    let mut slug = String::new();
    let mut last_was_sep = true;
    for c in topic.chars().take(80) {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_sep = false;
        } else if !last_was_sep {
            slug.push('_');
            last_was_sep = true;
        }
    }
    let slug = slug.trim_matches('_').to_string();
    if slug.is_empty() {
        "research_report".to_string()
    } else {
        slug
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
