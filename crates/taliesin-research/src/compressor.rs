//! Evidence compression.
//!
//! Each pass rereads the entire evidence sequence and rewrites the findings
//! from scratch. Earlier findings are never fed back into the prompt.

use taliesin_llm::{GenerationRequest, SharedBackend};

use crate::error::Result;
use crate::prompts;
use crate::session::ResearchSession;

/// Configuration for compression calls.
#[derive(Debug, Clone)]
pub struct CompressorConfig {
    pub model: String,
    /// Low temperature; compression wants faithful distillation.
    pub temperature: f32,
}

impl Default for CompressorConfig {
    fn default() -> Self {
        Self {
            model: taliesin_llm::DEFAULT_MODEL.to_string(),
            temperature: 0.2,
        }
    }
}

/// Distills accumulated evidence into the session findings.
pub struct Compressor {
    backend: SharedBackend,
    config: CompressorConfig,
}

impl Compressor {
    pub fn new(backend: SharedBackend, config: CompressorConfig) -> Self {
        Self { backend, config }
    }

    /// Produce fresh findings from the full evidence sequence.
    pub async fn compress(&self, session: &ResearchSession) -> Result<String> {
        let request = GenerationRequest::new(
            &self.config.model,
            prompts::COMPRESSION_SYSTEM,
            prompts::compression_user(&session.brief, session.evidence(), session.iteration),
        )
        .with_temperature(self.config.temperature);

        let response = self.backend.generate(request).await?;

        tracing::debug!(
            iteration = session.iteration,
            evidence = session.evidence().len(),
            findings_chars = response.text.len(),
            "Compressed evidence into findings"
        );
        Ok(response.text)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
