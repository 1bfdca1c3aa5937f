//! Error types for the research pipeline.

use thiserror::Error;

use crate::session::ResearchSession;

pub type Result<T> = std::result::Result<T, ResearchError>;

/// Errors from persisting a finished report.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Render error: {0}")]
    Render(String),
}

/// Errors surfaced by the research pipeline.
#[derive(Debug, Error)]
pub enum ResearchError {
    #[error("Generation error: {0}")]
    Generation(#[from] taliesin_llm::GenerationError),

    #[error("Search error: {0}")]
    Search(#[from] taliesin_search::SearchError),

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    Input(String),

    /// A session failed mid-loop. Carries the session as it stood at the
    /// failure so callers can salvage accumulated evidence and findings.
    #[error("Session aborted: {source}")]
    Aborted {
        source: Box<ResearchError>,
        session: Box<ResearchSession>,
    },
}

impl ResearchError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn input(message: impl Into<String>) -> Self {
        Self::Input(message.into())
    }

    /// Wrap an error together with the partial session it interrupted.
    pub fn aborted(source: ResearchError, session: ResearchSession) -> Self {
        Self::Aborted {
            source: Box::new(source),
            session: Box::new(session),
        }
    }

    /// The partial session attached to an aborted run, if any.
    pub fn partial_session(&self) -> Option<&ResearchSession> {
        match self {
            Self::Aborted { session, .. } => Some(session),
            _ => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
