//! Iterative deep-research pipeline.
//!
//! A session moves through clarification intake, a bounded research loop,
//! and report generation:
//!
//! ```text
//!   topic ──▶ clarify ──▶ brief ──▶ ┌─────────────────────────────┐
//!                                   │  plan ▶ search ▶ compress   │
//!                                   │    ▲               │        │
//!                                   │    └── reflect ◀───┘        │
//!                                   └──────────────┬──────────────┘
//!                                                  ▼
//!                                   report ──▶ citations ──▶ save
//! ```
//!
//! The loop runs at least [`session::MIN_ITERATIONS`] and at most
//! [`session::MAX_ITERATIONS`] search rounds. Evidence only accumulates;
//! findings and gaps are rewritten every round.

pub mod clarify;
pub mod compressor;
pub mod controller;
pub mod engine;
pub mod error;
pub mod models;
pub mod planner;
pub mod prompts;
pub mod reflector;
pub mod report;
pub mod searcher;
pub mod session;
pub mod store;

pub use clarify::{BriefBuilder, BriefConfig, Clarifier, ScriptedClarifier};
pub use compressor::{Compressor, CompressorConfig};
pub use controller::ResearchLoop;
pub use engine::{EngineConfig, ResearchEngine, ResearchOutcome};
pub use error::{PersistenceError, ResearchError, Result};
pub use models::{ClarifyingQuestions, ReflectionVerdict, SearchQueryBatch};
pub use planner::{PlannerConfig, QueryPlanner};
pub use reflector::{Reflector, ReflectorConfig};
pub use report::{ReportConfig, ReportGenerator, citations_used};
pub use searcher::Searcher;
pub use session::{MAX_ITERATIONS, MIN_ITERATIONS, Phase, ResearchSession, SearchHit};
pub use store::{FsReportStore, MockReportStore, ReportStore, SavedReport};
