//! GenDrive preference API: prompt-to-dashboard-preferences REST server.
//!
//! Interprets free-form dashboard descriptions via an OpenAI-compatible
//! completion service (with a rule-based fallback) and caches the result
//! per user.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use gd_cloud_api::config::ApiConfig;
use gd_cloud_api::db;
use gd_cloud_api::inference::{InferenceMode, OpenAiEngine, PreferenceEngine};
use gd_cloud_api::routes;
use gd_cloud_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "gd-cloud-api starting");

    let config = ApiConfig::load()?;

    let primary: Option<Arc<dyn PreferenceEngine>> = match config.inference_mode {
        InferenceMode::Llm => match OpenAiEngine::from_config(config.openai.clone())? {
            Some(engine) => {
                tracing::info!(model = %config.openai.model, "completion service configured");
                Some(Arc::new(engine))
            }
            None => {
                tracing::warn!(
                    "OPENAI_API_KEY not set: interpret requests will fail until it is configured"
                );
                None
            }
        },
        InferenceMode::Fallback => {
            tracing::info!("rule-based inference only");
            None
        }
    };

    // Connect to PostgreSQL if a database URL is configured, otherwise use in-memory state.
    let state = if let Some(database_url) = &config.database_url {
        tracing::info!("connecting to PostgreSQL");
        let pool = db::connect(database_url).await?;
        AppState::with_pool(pool, config.inference_mode, primary)
    } else {
        tracing::warn!("DATABASE_URL not set: using in-memory preference store");
        AppState::in_memory(config.inference_mode, primary)
    };

    let app = routes::build_router(state, &config.cors_origins);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "listening");

    axum::serve(listener, app).await?;

    Ok(())
}
