//! Web search abstraction for Taliesin.
//!
//! This crate provides the [`SearchBackend`] trait used by the research
//! pipeline to retrieve evidence, an [`ExaBackend`] implementation, and a
//! scriptable mock for tests.

pub mod backend;
pub mod error;
pub mod types;

// Provider implementations
pub mod exa;

pub use backend::{MockSearchBackend, MockSearchReply, SearchBackend, SharedSearchBackend};
pub use error::{Result, SearchError};
pub use types::{SearchDocument, SearchOptions};

// Re-export provider config
pub use exa::{ExaBackend, ExaConfig, create_shared_backend};
