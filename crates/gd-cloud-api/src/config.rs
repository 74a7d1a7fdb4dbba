//! API server configuration, loadable from TOML and environment.

use serde::Deserialize;

use crate::inference::{InferenceMode, OpenAiConfig};

/// Environment variable naming an optional TOML config file.
pub const CONFIG_PATH_VAR: &str = "GENDRIVE_CONFIG";

/// Top-level API server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Listen address (e.g., "0.0.0.0").
    #[serde(default = "default_host")]
    pub host: String,
    /// Listen port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// PostgreSQL connection URL. None uses the in-memory store.
    #[serde(default)]
    pub database_url: Option<String>,
    /// Allowed CORS origins (e.g., ["http://localhost:3000"]). Empty allows any.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Whether the completion service is part of this deployment.
    #[serde(default)]
    pub inference_mode: InferenceMode,
    /// Completion service settings.
    #[serde(default)]
    pub openai: OpenAiConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

impl ApiConfig {
    /// Load from `GENDRIVE_CONFIG` (if set), then apply environment overrides.
    pub fn load() -> anyhow::Result<Self> {
        let mut config = match std::env::var(CONFIG_PATH_VAR) {
            Ok(path) => Self::from_file(&path)?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load config from a TOML file path.
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (the process environment in production).
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<()> {
        if let Some(host) = lookup("HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.port = port
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid PORT '{port}': {e}"))?;
        }
        if let Some(url) = lookup("DATABASE_URL") {
            self.database_url = Some(url);
        }
        if let Some(origins) = lookup("CORS_ORIGINS") {
            self.cors_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(mode) = lookup("INFERENCE_MODE") {
            self.inference_mode = mode.parse().map_err(|e: String| anyhow::anyhow!(e))?;
        }
        if let Some(key) = lookup("OPENAI_API_KEY") {
            self.openai.api_key = Some(key);
        }
        if let Some(url) = lookup("OPENAI_BASE_URL") {
            self.openai.base_url = url;
        }
        if let Some(model) = lookup("OPENAI_MODEL") {
            self.openai.model = model;
        }
        if let Some(secs) = lookup("OPENAI_TIMEOUT_SECS") {
            self.openai.timeout_secs = secs
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid OPENAI_TIMEOUT_SECS '{secs}': {e}"))?;
        }
        Ok(())
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database_url: None,
            cors_origins: vec![],
            inference_mode: InferenceMode::default(),
            openai: OpenAiConfig::default(),
        }
    }
}
