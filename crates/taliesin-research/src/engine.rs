//! Top-level research engine.
//!
//! One [`ResearchEngine::run`] call takes a topic through the whole
//! pipeline: clarification intake, the bounded research loop, report
//! generation, and persistence. Persistence failures degrade to an unsaved
//! report; loop failures surface the partial session.

use serde::Serialize;

use taliesin_llm::SharedBackend;
use taliesin_search::SharedSearchBackend;

use crate::clarify::{BriefBuilder, BriefConfig, Clarifier};
use crate::compressor::{Compressor, CompressorConfig};
use crate::controller::ResearchLoop;
use crate::error::{ResearchError, Result};
use crate::planner::{PlannerConfig, QueryPlanner};
use crate::reflector::{Reflector, ReflectorConfig};
use crate::report::{ReportConfig, ReportGenerator, citations_used};
use crate::searcher::Searcher;
use crate::session::{ResearchSession, SearchHit};
use crate::store::{ReportStore, SavedReport};

/// Engine-level configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Model used for every generation call in the pipeline.
    pub model: String,
    /// Whether to run clarification intake before the loop.
    pub clarify: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            model: taliesin_llm::DEFAULT_MODEL.to_string(),
            clarify: true,
        }
    }
}

/// Everything a finished session produced.
#[derive(Debug, Serialize)]
pub struct ResearchOutcome {
    /// The final markdown report.
    pub report: String,
    /// Evidence hits the report actually cited, in evidence order.
    pub citations_used: Vec<SearchHit>,
    /// Where the report landed, absent when persistence failed.
    pub saved: Option<SavedReport>,
    /// The completed session state.
    pub session: ResearchSession,
}

/// Runs complete research sessions.
pub struct ResearchEngine {
    brief_builder: BriefBuilder,
    research_loop: ResearchLoop,
    report_generator: ReportGenerator,
    store: Box<dyn ReportStore>,
    config: EngineConfig,
}

impl ResearchEngine {
    pub fn new(
        llm: SharedBackend,
        search: SharedSearchBackend,
        store: Box<dyn ReportStore>,
        config: EngineConfig,
    ) -> Self {
        let model = config.model.clone();
        let brief_builder = BriefBuilder::new(
            llm.clone(),
            BriefConfig {
                model: model.clone(),
                ..BriefConfig::default()
            },
        );
        let planner = QueryPlanner::new(
            llm.clone(),
            PlannerConfig {
                model: model.clone(),
                ..PlannerConfig::default()
            },
        );
        let searcher = Searcher::new(search);
        let compressor = Compressor::new(
            llm.clone(),
            CompressorConfig {
                model: model.clone(),
                ..CompressorConfig::default()
            },
        );
        let reflector = Reflector::new(
            llm.clone(),
            ReflectorConfig {
                model: model.clone(),
                ..ReflectorConfig::default()
            },
        );
        let report_generator = ReportGenerator::new(
            llm,
            ReportConfig {
                model,
                ..ReportConfig::default()
            },
        );

        Self {
            brief_builder,
            research_loop: ResearchLoop::new(planner, searcher, compressor, reflector),
            report_generator,
            store,
            config,
        }
    }

    /// Research the topic end to end and return the report with its
    /// supporting state.
    pub async fn run(&self, topic: &str, clarifier: &mut dyn Clarifier) -> Result<ResearchOutcome> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(ResearchError::input("research topic is empty"));
        }

        tracing::info!(topic, clarify = self.config.clarify, "Starting research session");

        let brief = if self.config.clarify {
            let questions = self.brief_builder.clarifying_questions(topic).await?;
            let answers = clarifier.ask(&questions)?;
            self.brief_builder
                .compose_brief(topic, &questions, &answers)
                .await?
        } else {
            self.brief_builder.compose_brief(topic, &[], &[]).await?
        };

        tracing::info!(
            brief = %crate::prompts::truncate(&brief, 200),
            "Research brief composed"
        );

        let mut session = ResearchSession::new(topic);
        session.brief = brief;

        if let Err(error) = self.research_loop.run(&mut session).await {
            return Err(ResearchError::aborted(error, session));
        }

        let report = match self.report_generator.generate(&session).await {
            Ok(report) => report,
            Err(error) => return Err(ResearchError::aborted(error, session)),
        };
        let citations = citations_used(&report, session.evidence());

        let stem = self.report_generator.suggest_filename(topic).await;
        let saved = match self.store.save(&report, &stem) {
            Ok(saved) => {
                tracing::info!(markdown = %saved.markdown_path.display(), "Report persisted");
                Some(saved)
            }
            Err(error) => {
                tracing::warn!(
                    error = %error,
                    "Report persistence failed, returning unsaved report"
                );
                None
            }
        };

        tracing::info!(
            iterations = session.iteration,
            evidence = session.evidence().len(),
            citations = citations.len(),
            "Research session complete"
        );

        Ok(ResearchOutcome {
            report,
            citations_used: citations,
            saved,
            session,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clarify::ScriptedClarifier;
    use crate::store::MockReportStore;
    use std::sync::Arc;
    use taliesin_llm::{GenerationError, MockBackend, MockReply};
    use taliesin_search::{MockSearchBackend, SearchDocument};

    fn queries_json(queries: &[&str]) -> MockReply {
        MockReply::json(serde_json::json!({ "queries": queries }))
    }

    fn verdict(needs_more: bool) -> MockReply {
        MockReply::json(serde_json::json!({
            "thought_process": "scripted",
            "knowledge_gaps": [],
            "needs_more_context": needs_more,
            "follow_up_queries": [],
        }))
    }

    fn questions_json() -> MockReply {
        MockReply::json(serde_json::json!({
            "questions": ["What scope?", "What audience?"]
        }))
    }

    /// Replies for a minimal three-round loop that stops at the floor.
    fn loop_replies() -> Vec<MockReply> {
        vec![
            queries_json(&["q1", "q2"]),
            MockReply::text("findings 1"),
            verdict(false),
            MockReply::text("findings 2"),
            verdict(false),
            MockReply::text("findings 3"),
            verdict(false),
        ]
    }

    fn search_backend() -> Arc<MockSearchBackend> {
        Arc::new(MockSearchBackend::with_results(vec![SearchDocument::new(
            "Title 1",
            "https://example.test/1",
            "Text 1",
        )]))
    }

    fn engine(
        llm: Arc<MockBackend>,
        store: MockReportStore,
        config: EngineConfig,
    ) -> ResearchEngine {
        ResearchEngine::new(llm, search_backend(), Box::new(store), config)
    }

    #[tokio::test]
    async fn test_full_run_produces_saved_cited_report() {
        let mut replies = vec![questions_json(), MockReply::text("the brief")];
        replies.extend(loop_replies());
        replies.push(MockReply::text(
            "# Report\n\nSee [Title 1](https://example.test/1).",
        ));
        replies.push(MockReply::text("example_report"));

        let llm = Arc::new(MockBackend::new(replies));
        let engine = engine(llm.clone(), MockReportStore::new(), EngineConfig::default());
        let mut clarifier = ScriptedClarifier::new(vec!["Broad".to_string(), "Engineers".to_string()]);

        let outcome = engine.run("example topic", &mut clarifier).await.unwrap();

        assert!(outcome.report.starts_with("# Report"));
        assert_eq!(outcome.citations_used.len(), 1);
        assert_eq!(outcome.citations_used[0].url, "https://example.test/1");
        assert_eq!(outcome.session.iteration, 3);
        assert!(!outcome.session.continuing);

        let saved = outcome.saved.unwrap();
        assert!(saved.markdown_path.to_string_lossy().ends_with("example_report.md"));

        // Intake, loop, report, filename.
        assert_eq!(llm.request_count(), 11);
        // The brief prompt carried the clarification answers.
        assert!(llm.requests()[1].user.contains("A: Broad"));
    }

    #[tokio::test]
    async fn test_clarification_can_be_disabled() {
        let mut replies = vec![MockReply::text("the brief")];
        replies.extend(loop_replies());
        replies.push(MockReply::text("# Report\n\nNo citations."));
        replies.push(MockReply::text("stem"));

        let llm = Arc::new(MockBackend::new(replies));
        let config = EngineConfig {
            clarify: false,
            ..EngineConfig::default()
        };
        let engine = engine(llm.clone(), MockReportStore::new(), config);
        let mut clarifier = ScriptedClarifier::empty();

        let outcome = engine.run("topic", &mut clarifier).await.unwrap();

        assert!(outcome.citations_used.is_empty());
        // First call goes straight to brief composition.
        assert!(llm.requests()[0].system.contains("research planning expert"));
        assert_eq!(llm.request_count(), 10);
    }

    #[tokio::test]
    async fn test_persistence_failure_still_returns_report() {
        let mut replies = vec![questions_json(), MockReply::text("the brief")];
        replies.extend(loop_replies());
        replies.push(MockReply::text("# Report\n\nBody."));
        replies.push(MockReply::text("stem"));

        let llm = Arc::new(MockBackend::new(replies));
        let engine = engine(llm, MockReportStore::failing(), EngineConfig::default());
        let mut clarifier = ScriptedClarifier::empty();

        let outcome = engine.run("topic", &mut clarifier).await.unwrap();

        assert!(outcome.saved.is_none());
        assert!(outcome.report.starts_with("# Report"));
    }

    #[tokio::test]
    async fn test_loop_failure_aborts_with_partial_session() {
        let replies = vec![
            questions_json(),
            MockReply::text("the brief"),
            queries_json(&["q1", "q2"]),
            // Compression dies after the first search round.
            MockReply::fail(GenerationError::Network("connection reset".to_string())),
        ];

        let llm = Arc::new(MockBackend::new(replies));
        let engine = engine(llm, MockReportStore::new(), EngineConfig::default());
        let mut clarifier = ScriptedClarifier::empty();

        let err = engine.run("topic", &mut clarifier).await.unwrap_err();

        let partial = err.partial_session().unwrap();
        assert_eq!(partial.iteration, 1);
        assert_eq!(partial.evidence().len(), 2);
        assert_eq!(partial.brief, "the brief");
    }

    #[tokio::test]
    async fn test_empty_topic_is_rejected_before_any_call() {
        let llm = Arc::new(MockBackend::new(vec![]));
        let engine = engine(llm.clone(), MockReportStore::new(), EngineConfig::default());
        let mut clarifier = ScriptedClarifier::empty();

        let err = engine.run("   ", &mut clarifier).await.unwrap_err();

        assert!(matches!(err, ResearchError::Input(_)));
        assert_eq!(llm.request_count(), 0);
    }
}
