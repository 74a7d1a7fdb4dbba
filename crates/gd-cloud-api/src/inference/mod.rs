//! Natural-language inference for dashboard preferences.
//!
//! Converts free-form prompts ("make it dark and use red accent") into a
//! preference candidate that the validator turns into a `PreferenceSet`.
//!
//! Two tiers:
//! - **OpenAI** (cloud): chat-completions API with a fixed schema prompt.
//! - **Rule-based** (local): ordered keyword tables, always available.
//!
//! The [`PreferenceOrchestrator`] composes them and owns persistence.

pub mod openai;
pub mod orchestrator;
pub mod rules;

use async_trait::async_trait;
use gd_protocol::Candidate;

/// Why an engine could not produce a usable candidate.
#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    /// Transport, auth, rate-limit, timeout, or non-2xx status.
    #[error("inference unavailable: {0}")]
    Unavailable(String),

    /// The service answered but the body is not a usable preference object.
    #[error("malformed inference output: {0}")]
    Malformed(String),
}

/// Trait for engines that turn a prompt into a preference candidate.
///
/// Candidates are untrusted; callers must run them through
/// [`gd_protocol::normalize`] before use.
#[async_trait]
pub trait PreferenceEngine: Send + Sync {
    async fn infer(&self, prompt: &str) -> Result<Candidate, InferenceError>;

    /// Name of this inference tier (for logging).
    fn tier_name(&self) -> &str;
}

pub use openai::{OpenAiConfig, OpenAiEngine};
pub use orchestrator::{InferenceMode, InterpretError, PreferenceOrchestrator};
pub use rules::RuleBasedEngine;
