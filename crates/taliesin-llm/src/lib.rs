//! Generation client abstraction for Taliesin.
//!
//! This crate provides a unified interface for text generation against
//! OpenAI-compatible providers, with typed structured outputs and retry
//! handling for transient failures.
//!
//! # Architecture
//!
//! The core abstraction is the [`GenerationBackend`] trait which all
//! providers implement. The research pipeline uses it through the
//! [`SharedBackend`] alias so every component can hold the same provider.
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  GenerationBackend trait                │
//! │  - generate() -> GenerationResponse     │
//! │  - health_check()                       │
//! └─────────────────────────────────────────┘
//!                    │
//!          ┌─────────┼─────────┐
//!          ▼         ▼         ▼
//!     ┌────────┐ ┌────────┐ ┌──────┐
//!     │ OpenAI │ │ Ollama │ │ Mock │
//!     └────────┘ └────────┘ └──────┘
//! ```

pub mod backend;
pub mod error;
pub mod types;

// Provider implementations
pub mod openai;

pub use backend::{GenerationBackend, MockBackend, MockReply, SharedBackend, with_retry};
pub use error::{GenerationError, RateLimitInfo, Result};
pub use types::{GenerationRequest, GenerationResponse, ResponseFormat, Usage};

// Re-export provider config
pub use openai::{DEFAULT_MODEL, OpenAiBackend, OpenAiConfig, create_shared_backend};
