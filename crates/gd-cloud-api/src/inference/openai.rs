//! OpenAI chat-completions engine for free-form preference prompts.
//!
//! Sends the fixed schema prompt plus the caller's text and treats the reply
//! as JSON. Works with any OpenAI-compatible endpoint (`base_url`). No retry:
//! every failure is reported to the orchestrator, which falls back to rules.

use std::time::Duration;

use async_trait::async_trait;
use gd_protocol::{Candidate, validate_shape};
use serde::{Deserialize, Serialize};

use super::{InferenceError, PreferenceEngine};

/// System prompt describing the exact preference schema and field domains.
const SYSTEM_PROMPT: &str = r##"You are a creative UI/UX designer specializing in modern, attractive dashboard interfaces. Analyze the user's prompt and return a JSON object with exactly this structure:

{
  "theme": "light" | "dark" | "modern" | "minimal" | "gradient" | "neon" | "pastel" | "monochrome",
  "fontSize": "small" | "medium" | "large" | "extraLarge",
  "layout": "minimal" | "standard" | "detailed" | "modern" | "grid" | "card" | "split",
  "colorScheme": "default" | "highContrast" | "calm" | "vibrant" | "professional" | "playful" | "elegant",
  "accessibility": {
    "highContrast": boolean,
    "reducedMotion": boolean
  },
  "accentColor": "#RRGGBB",
  "backgroundColor": "#RRGGBB",
  "fontFamily": "default" | "modern" | "elegant" | "playful" | "tech" | "italic" | "bold",
  "borderRadius": "small" | "medium" | "large" | "none",
  "shadow": "none" | "subtle" | "medium" | "strong",
  "backgroundImage": string (URL or description) | null,
  "iconStyle": "material" | "outlined" | "filled" | "rounded" | "sharp" | "two-tone",
  "iconColor": "#RRGGBB",
  "animationStyle": "none" | "subtle" | "moderate" | "dynamic"
}

Guidelines:
- For color requests (red, blue, etc.), use appropriate 6-digit hex codes.
- For font requests (italic, bold), set the matching fontFamily.
- For background requests, suggest an appropriate backgroundImage.
- For racing or sports themes, use dynamic animations and sharp icons.
- For elegant themes, use subtle animations and rounded icons.

Examples:
- "red color and italic font": accentColor "#FF0000" and fontFamily "italic".
- "racing background": a racing-themed backgroundImage with animationStyle "dynamic".
- "modern icons": iconStyle "material" or "sharp" with a matching iconColor.

Respond with ONLY the JSON object (no markdown, no explanation)."##;

/// Sampling temperature for every request.
const TEMPERATURE: f32 = 0.8;

/// Completion token budget for every request.
const MAX_TOKENS: u32 = 250;

/// Configuration for the OpenAI-compatible completion endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiConfig {
    /// Bearer token. `None` means the LLM tier is not configured.
    #[serde(default)]
    pub api_key: Option<String>,
    /// API base URL, without the `/chat/completions` suffix.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Chat model name.
    #[serde(default = "default_model")]
    pub model: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".into()
}
fn default_model() -> String {
    "gpt-3.5-turbo".into()
}
fn default_timeout_secs() -> u64 {
    10
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Chat-completions request body.
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Chat-completions response (only fields we need).
#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// OpenAI chat-completions inference engine.
pub struct OpenAiEngine {
    client: reqwest::Client,
    api_key: String,
    config: OpenAiConfig,
}

impl OpenAiEngine {
    /// Build an engine from config. Returns `Ok(None)` when no API key is set.
    pub fn from_config(config: OpenAiConfig) -> reqwest::Result<Option<Self>> {
        let Some(api_key) = config.api_key.clone().filter(|k| !k.trim().is_empty()) else {
            return Ok(None);
        };
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Some(Self {
            client,
            api_key,
            config,
        }))
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl PreferenceEngine for OpenAiEngine {
    async fn infer(&self, prompt: &str) -> Result<Candidate, InferenceError> {
        let body = ChatRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| InferenceError::Unavailable(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(InferenceError::Unavailable(format!(
                "completion service returned {status}"
            )));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| InferenceError::Malformed(format!("unreadable response body: {e}")))?;

        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| InferenceError::Malformed("response has no message content".into()))?;

        tracing::debug!(content = %content, "completion received");

        validate_shape(content.trim().as_bytes())
            .map_err(|e| InferenceError::Malformed(e.to_string()))
    }

    fn tier_name(&self) -> &str {
        "openai"
    }
}
