//! Research session state.
//!
//! A [`ResearchSession`] is the single mutable aggregate threaded through the
//! research loop. Evidence is append-only; findings and gaps are replaced
//! wholesale on every compression and reflection pass.

use serde::Serialize;

// ─────────────────────────────────────────────────────────────────────────────
// Iteration Bounds
// ─────────────────────────────────────────────────────────────────────────────

/// Minimum number of completed search rounds before a session may stop.
pub const MIN_ITERATIONS: u32 = 3;

/// Maximum number of search rounds, regardless of what reflection says.
pub const MAX_ITERATIONS: u32 = 5;

// ─────────────────────────────────────────────────────────────────────────────
// Evidence
// ─────────────────────────────────────────────────────────────────────────────

/// One retrieved web result, tagged with its provenance.
///
/// Hits are never deduplicated: the same URL surfacing under two different
/// queries is a signal about that source, not an accident to be scrubbed.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
    /// The query string that produced this hit.
    pub source_query: String,
    /// The search round (0-based) in which this hit was retrieved.
    pub iteration: u32,
}

// ─────────────────────────────────────────────────────────────────────────────
// Loop Phases
// ─────────────────────────────────────────────────────────────────────────────

/// The phase the research loop is currently executing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    Planning,
    Searching,
    Compressing,
    Reflecting,
    Done,
}

impl Phase {
    /// The transition taken at the end of a reflection pass.
    ///
    /// `iteration` is the count of completed search rounds, which is
    /// incremented before compression and reflection run. The floor wins over
    /// a stop verdict and the ceiling wins over a continue verdict.
    pub fn after_reflection(iteration: u32, needs_more: bool) -> Phase {
        if iteration < MIN_ITERATIONS {
            Phase::Planning
        } else if needs_more && iteration < MAX_ITERATIONS {
            Phase::Planning
        } else {
            Phase::Done
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Session
// ─────────────────────────────────────────────────────────────────────────────

/// Accumulated state of one research session.
#[derive(Debug, Clone, Serialize)]
pub struct ResearchSession {
    /// The user's original topic, verbatim.
    pub topic: String,
    /// The research brief steering all downstream prompts. Written once
    /// during intake and never revised afterwards.
    pub brief: String,
    /// Number of completed search rounds.
    pub iteration: u32,
    /// Everything retrieved so far, in arrival order.
    evidence: Vec<SearchHit>,
    /// The current compressed synthesis of the evidence, absent until the
    /// first compression pass has run.
    pub findings: Option<String>,
    /// Knowledge gaps named by the most recent reflection pass.
    pub gaps: Vec<String>,
    /// Follow-up queries queued by reflection for the next planning step.
    pub pending_queries: Vec<String>,
    /// Whether the loop intends to run another round.
    pub continuing: bool,
}

impl ResearchSession {
    /// Start a fresh session for the given topic.
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            brief: String::new(),
            iteration: 0,
            evidence: Vec::new(),
            findings: None,
            gaps: Vec::new(),
            pending_queries: Vec::new(),
            continuing: true,
        }
    }

    /// All evidence collected so far, in arrival order.
    pub fn evidence(&self) -> &[SearchHit] {
        &self.evidence
    }

    /// Append a batch of hits. Existing evidence is never reordered or
    /// removed; this is the only way the evidence sequence grows.
    pub fn append_evidence(&mut self, hits: Vec<SearchHit>) {
        self.evidence.extend(hits);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
