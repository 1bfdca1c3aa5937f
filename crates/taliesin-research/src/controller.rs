//! The research loop controller.
//!
//! Drives one session through repeated plan, search, compress, reflect
//! rounds until the transition rule says stop:
//!
//! ```text
//!   ┌────────────┐     ┌───────────┐     ┌────────────┐     ┌────────────┐
//!   │  Planning  │ ──▶ │ Searching │ ──▶ │ Compressing │ ──▶ │ Reflecting │
//!   └────────────┘     └───────────┘     └────────────┘     └─────┬──────┘
//!         ▲                                                       │
//!         └───────────────── another round needed ────────────────┤
//!                                                                 ▼
//!                                                              ┌──────┐
//!                                                              │ Done │
//!                                                              └──────┘
//! ```
//!
//! The iteration counter increments exactly once per completed search round,
//! before compression runs, so both compression and reflection see the
//! post-round count.

use crate::compressor::Compressor;
use crate::error::Result;
use crate::planner::QueryPlanner;
use crate::reflector::Reflector;
use crate::searcher::Searcher;
use crate::session::{Phase, ResearchSession};

/// Runs the bounded research loop over one session.
pub struct ResearchLoop {
    planner: QueryPlanner,
    searcher: Searcher,
    compressor: Compressor,
    reflector: Reflector,
}

impl ResearchLoop {
    pub fn new(
        planner: QueryPlanner,
        searcher: Searcher,
        compressor: Compressor,
        reflector: Reflector,
    ) -> Self {
        Self {
            planner,
            searcher,
            compressor,
            reflector,
        }
    }

    /// Run rounds until the transition rule reaches `Done`.
    ///
    /// On error the session is left exactly as the last completed step wrote
    /// it, so the caller can surface partial evidence and findings.
    pub async fn run(&self, session: &mut ResearchSession) -> Result<()> {
        session.continuing = true;

        loop {
            // Planning: a pending follow-up batch from the previous
            // reflection is consumed directly; the planner generates only
            // when reflection left nothing behind.
            let queries = if session.pending_queries.is_empty() {
                self.planner.plan(session).await?
            } else {
                let mut queries = std::mem::take(&mut session.pending_queries);
                queries.truncate(self.planner.followup_batch());
                tracing::debug!(
                    iteration = session.iteration,
                    queries = queries.len(),
                    "Consuming follow-up queries from reflection"
                );
                queries
            };

            // Searching: the only step that grows the evidence, and the only
            // place the iteration counter moves.
            let hits = self.searcher.run_batch(&queries, session.iteration).await;
            let new_hits = hits.len();
            session.append_evidence(hits);
            session.iteration += 1;
            tracing::info!(
                iteration = session.iteration,
                queries = queries.len(),
                new_hits,
                total_evidence = session.evidence().len(),
                "Search round complete"
            );

            // Compressing: findings are replaced wholesale.
            session.findings = Some(self.compressor.compress(session).await?);

            // Reflecting: gaps are replaced wholesale; follow-up queries are
            // queued only when the verdict itself says continue.
            let verdict = self.reflector.reflect(session).await?;
            session.gaps = verdict.knowledge_gaps;
            session.pending_queries = if verdict.needs_more_context {
                verdict.follow_up_queries
            } else {
                Vec::new()
            };

            let next = Phase::after_reflection(session.iteration, verdict.needs_more_context);
            tracing::info!(
                iteration = session.iteration,
                needs_more = verdict.needs_more_context,
                gaps = session.gaps.len(),
                next = ?next,
                "Reflection complete"
            );

            if next == Phase::Done {
                session.continuing = false;
                return Ok(());
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
