//! Shared test harness for E2E integration tests.
//!
//! Drives the real router through `tower::oneshot`, with the completion
//! service faked by a wiremock server when the LLM tier is under test.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use gd_cloud_api::inference::{
    InferenceMode, OpenAiConfig, OpenAiEngine, PreferenceEngine, PreferenceOrchestrator,
};
use gd_cloud_api::routes::build_router;
use gd_cloud_api::state::AppState;
use gd_cloud_api::store::{MemoryStore, PreferenceStore, StoreError};
use gd_protocol::{PreferenceSet, StoredPreferenceRecord};

/// End-to-end test harness around the API router.
pub struct TestHarness {
    /// Application state (in-memory store unless overridden).
    pub state: AppState,
    /// Axum router for HTTP requests via `tower::oneshot`.
    pub router: Router,
}

impl TestHarness {
    fn from_state(state: AppState) -> Self {
        let router = build_router(state.clone(), &[]);
        Self { state, router }
    }

    /// Rules-only deployment with an in-memory store.
    pub fn fallback() -> Self {
        Self::from_state(AppState::default())
    }

    /// LLM deployment whose completion service is the given mock server.
    pub fn with_llm(server: &MockServer) -> Self {
        Self::from_state(AppState::in_memory(
            InferenceMode::Llm,
            Some(openai_engine(server)),
        ))
    }

    /// LLM deployment with no API key.
    pub fn unconfigured() -> Self {
        Self::from_state(AppState::in_memory(InferenceMode::Llm, None))
    }

    /// LLM deployment backed by a custom store.
    pub fn with_llm_and_store(server: &MockServer, store: Arc<dyn PreferenceStore>) -> Self {
        Self::from_state(AppState::new(PreferenceOrchestrator::new(
            InferenceMode::Llm,
            Some(openai_engine(server)),
            store,
        )))
    }

    /// Rules-only deployment backed by a custom store.
    pub fn fallback_with_store(store: Arc<dyn PreferenceStore>) -> Self {
        Self::from_state(AppState::new(PreferenceOrchestrator::fallback_only(store)))
    }

    /// POST /api/interpret-prompt with `{prompt, userId}`.
    pub async fn interpret(&self, prompt: &str, user_id: &str) -> (StatusCode, Value) {
        self.interpret_body(json!({ "prompt": prompt, "userId": user_id }))
            .await
    }

    /// POST /api/interpret-prompt with an arbitrary JSON body.
    pub async fn interpret_body(&self, body: Value) -> (StatusCode, Value) {
        self.interpret_raw(&serde_json::to_vec(&body).unwrap()).await
    }

    /// POST /api/interpret-prompt with raw bytes.
    pub async fn interpret_raw(&self, body: &[u8]) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(
                Request::post("/api/interpret-prompt")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_vec()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        (status, json)
    }

    /// GET /api/preferences/{user_id}.
    pub async fn get_preferences(&self, user_id: &str) -> (StatusCode, Value) {
        let url = format!("/api/preferences/{user_id}");
        let response = self
            .router
            .clone()
            .oneshot(Request::get(&url).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        (status, json)
    }
}

/// Build an OpenAI engine pointed at the mock server.
pub fn openai_engine(server: &MockServer) -> Arc<dyn PreferenceEngine> {
    let engine = OpenAiEngine::from_config(OpenAiConfig {
        api_key: Some("sk-test".into()),
        base_url: server.uri(),
        model: "gpt-3.5-turbo".into(),
        timeout_secs: 2,
    })
    .unwrap()
    .expect("api key is set");
    Arc::new(engine)
}

/// Helper: build a chat-completions response body.
pub fn completion(content: &str) -> Value {
    json!({
        "id": "chatcmpl-e2e",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}

/// Mount a completion-service response for every request.
pub async fn mount_completion(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(response)
        .mount(server)
        .await;
}

/// Mount a successful completion whose message content is `content`.
pub async fn mount_content(server: &MockServer, content: &str) {
    mount_completion(
        server,
        ResponseTemplate::new(200).set_body_json(completion(content)),
    )
    .await;
}

/// Store that rejects every write but serves reads from memory.
#[derive(Default)]
pub struct WriteRejectingStore {
    inner: MemoryStore,
}

#[async_trait]
impl PreferenceStore for WriteRejectingStore {
    async fn upsert(
        &self,
        _user_id: &str,
        _preferences: &PreferenceSet,
    ) -> Result<StoredPreferenceRecord, StoreError> {
        Err(StoreError::Unavailable("write rejected".into()))
    }

    async fn get_latest(
        &self,
        user_id: &str,
    ) -> Result<Option<StoredPreferenceRecord>, StoreError> {
        self.inner.get_latest(user_id).await
    }
}
