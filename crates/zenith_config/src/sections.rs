//! Configuration sections.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use zenith_error::ConfigError;

/// Azure OpenAI connection and sampling settings.
#[derive(Clone, PartialEq, Deserialize, Serialize)]
pub struct ModelConfig {
    /// Resource endpoint, e.g. `https://my-resource.openai.azure.com`
    pub endpoint: String,
    /// API key sent in the `api-key` header
    pub api_key: String,
    /// Deployment name
    pub deployment: String,
    /// `api-version` query parameter
    pub api_version: String,
    /// Lower bound of the sampling temperature
    pub temperature_min: f32,
    /// Upper bound of the sampling temperature
    pub temperature_max: f32,
    /// Token limit per reply
    pub max_tokens: u32,
    /// Per-call timeout
    pub timeout_secs: u64,
}

impl std::fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &if self.api_key.is_empty() { "" } else { "***" })
            .field("deployment", &self.deployment)
            .field("api_version", &self.api_version)
            .field("temperature_min", &self.temperature_min)
            .field("temperature_max", &self.temperature_max)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ModelConfig {
    /// Checks that endpoint, key and deployment are all set.
    ///
    /// # Errors
    ///
    /// Names every missing setting in one error.
    #[track_caller]
    pub fn require_credentials(&self) -> Result<(), ConfigError> {
        let missing: Vec<&str> = [
            ("model.endpoint (AZURE_OPENAI_ENDPOINT)", &self.endpoint),
            ("model.api_key (AZURE_OPENAI_API_KEY)", &self.api_key),
            (
                "model.deployment (AZURE_OPENAI_DEPLOYMENT_NAME)",
                &self.deployment,
            ),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::new(format!(
                "Missing model credentials: {}",
                missing.join(", ")
            )))
        }
    }

    /// Chat completions URL for the configured deployment.
    pub fn completions_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint.trim_end_matches('/'),
            self.deployment,
            self.api_version
        )
    }
}

/// Retry and batch settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct GenerationConfig {
    /// Ceiling on `count`
    pub max_count: u32,
    /// Attempts per record before it is reported as failed
    pub max_attempts: u32,
    /// Records generated concurrently within one batch
    pub batch_concurrency: usize,
}

/// Record directory settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Directory owned by the storage service
    pub directory: PathBuf,
    /// Also save each batch record as an individual file
    pub mirror_collections: bool,
}

/// HTTP adapter settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Socket address to listen on
    pub bind: String,
    /// Name reported by the health check
    pub service_name: String,
}

/// Topic adapter settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TopicsConfig {
    /// Topic the worker subscribes to
    pub request_topic: String,
    /// Default topic for responses
    pub response_topic: String,
    /// Buffered messages per topic
    pub capacity: usize,
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}
