//! Shared application state for the Axum server.
//!
//! Supports two storage modes:
//! - **Database mode**: `PgStore` over a `PgPool` (production).
//! - **In-memory mode**: `MemoryStore` (tests and development).

use std::sync::Arc;

use sqlx::PgPool;

use crate::inference::{InferenceMode, PreferenceEngine, PreferenceOrchestrator};
use crate::store::{MemoryStore, PgStore, PreferenceStore};

/// Shared application state, wrapped in `Arc` for Axum handler sharing.
#[derive(Clone)]
pub struct AppState {
    /// Inference pipeline; also owns the preference store.
    pub orchestrator: Arc<PreferenceOrchestrator>,
}

impl AppState {
    pub fn new(orchestrator: PreferenceOrchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
        }
    }

    /// Create state backed by a PostgreSQL pool.
    pub fn with_pool(
        pool: PgPool,
        mode: InferenceMode,
        primary: Option<Arc<dyn PreferenceEngine>>,
    ) -> Self {
        Self::new(PreferenceOrchestrator::new(
            mode,
            primary,
            Arc::new(PgStore::new(pool)),
        ))
    }

    /// Create in-memory state with the given inference setup.
    pub fn in_memory(mode: InferenceMode, primary: Option<Arc<dyn PreferenceEngine>>) -> Self {
        Self::new(PreferenceOrchestrator::new(
            mode,
            primary,
            Arc::new(MemoryStore::new()),
        ))
    }

    /// Preference store used by both the write and read paths.
    pub fn store(&self) -> &Arc<dyn PreferenceStore> {
        self.orchestrator.store()
    }
}

impl Default for AppState {
    /// Rules-only, in-memory state (for tests and local development).
    fn default() -> Self {
        Self::in_memory(InferenceMode::Fallback, None)
    }
}
