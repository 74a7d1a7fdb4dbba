//! Preference orchestrator: LLM first, rule-based fallback, best-effort persist.
//!
//! Flow per request:
//! `validate prompt → primary engine → (fallback on any failure) → normalize → upsert → return`.
//! Only an empty prompt or a missing primary engine in `Llm` mode reach the
//! caller as errors. Which tier answered, and whether the write landed, is
//! visible in logs only.

use std::sync::Arc;

use gd_protocol::{Candidate, PreferenceSet, normalize, valid_fields};
use serde::Deserialize;

use super::{InferenceError, PreferenceEngine, RuleBasedEngine};
use crate::store::PreferenceStore;

/// Which tiers a deployment is expected to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InferenceMode {
    /// Completion service first, rules on failure. Requires credentials.
    #[default]
    Llm,
    /// Rules only. No external calls.
    Fallback,
}

impl std::str::FromStr for InferenceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "llm" => Ok(Self::Llm),
            "fallback" | "rules" => Ok(Self::Fallback),
            other => Err(format!("unknown inference mode '{other}'")),
        }
    }
}

/// Errors surfaced to the caller of [`PreferenceOrchestrator::interpret`].
#[derive(Debug, thiserror::Error)]
pub enum InterpretError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Configuration(String),
}

/// Composes the inference tiers with the preference store.
pub struct PreferenceOrchestrator {
    mode: InferenceMode,
    primary: Option<Arc<dyn PreferenceEngine>>,
    fallback: Box<dyn PreferenceEngine>,
    store: Arc<dyn PreferenceStore>,
}

impl PreferenceOrchestrator {
    pub fn new(
        mode: InferenceMode,
        primary: Option<Arc<dyn PreferenceEngine>>,
        store: Arc<dyn PreferenceStore>,
    ) -> Self {
        Self {
            mode,
            primary,
            fallback: Box::new(RuleBasedEngine::new()),
            store,
        }
    }

    /// Rules-only orchestrator.
    pub fn fallback_only(store: Arc<dyn PreferenceStore>) -> Self {
        Self::new(InferenceMode::Fallback, None, store)
    }

    pub fn mode(&self) -> InferenceMode {
        self.mode
    }

    pub fn store(&self) -> &Arc<dyn PreferenceStore> {
        &self.store
    }

    /// Turn a prompt into a complete `PreferenceSet` and cache it for `user_id`.
    pub async fn interpret(
        &self,
        prompt: &str,
        user_id: Option<&str>,
    ) -> Result<PreferenceSet, InterpretError> {
        if prompt.is_empty() {
            return Err(InterpretError::Validation("Prompt is required".into()));
        }

        let primary = match (self.mode, &self.primary) {
            (InferenceMode::Llm, None) => {
                tracing::error!("inference requested but completion service is not configured");
                return Err(InterpretError::Configuration(
                    "completion service API key is not configured".into(),
                ));
            }
            (InferenceMode::Llm, Some(engine)) => Some(engine),
            (InferenceMode::Fallback, _) => None,
        };

        let (candidate, tier) = match primary {
            Some(engine) => match try_engine(engine.as_ref(), prompt).await {
                Ok(candidate) => (candidate, engine.tier_name().to_string()),
                Err(e) => {
                    tracing::warn!(
                        tier = engine.tier_name(),
                        error = %e,
                        "primary inference failed, using rule-based fallback"
                    );
                    (self.fallback_candidate(prompt).await, self.fallback.tier_name().to_string())
                }
            },
            None => (
                self.fallback_candidate(prompt).await,
                self.fallback.tier_name().to_string(),
            ),
        };

        let preferences = normalize(&candidate);
        tracing::info!(tier = %tier, user_id = ?user_id, "preferences inferred");

        match user_id.filter(|id| !id.trim().is_empty()) {
            Some(user_id) => {
                if let Err(e) = self.store.upsert(user_id, &preferences).await {
                    tracing::error!(user_id = %user_id, error = %e, "failed to persist preferences");
                }
            }
            None => tracing::warn!("no userId on request, skipping persistence"),
        }

        Ok(preferences)
    }

    async fn fallback_candidate(&self, prompt: &str) -> Candidate {
        match self.fallback.infer(prompt).await {
            Ok(candidate) => candidate,
            Err(e) => {
                tracing::error!(error = %e, "rule-based inference failed, using defaults");
                Candidate::new()
            }
        }
    }
}

/// Run one engine and reject candidates with no in-domain preference value.
async fn try_engine(
    engine: &dyn PreferenceEngine,
    prompt: &str,
) -> Result<Candidate, InferenceError> {
    let candidate = engine.infer(prompt).await?;
    if valid_fields(&candidate) == 0 {
        return Err(InferenceError::Malformed(
            "object contains no valid preference fields".into(),
        ));
    }
    Ok(candidate)
}
