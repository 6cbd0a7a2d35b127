use super::{ChatCompletionRequest, ChatCompletionResponse};
use async_trait::async_trait;
use std::time::Duration;
use tracing::instrument;
use zenith_config::ModelConfig;
use zenith_core::{CompletionRequest, CompletionResponse};
use zenith_error::{
    ConfigError, GenerationError, GenerationErrorKind, GenerationResult, ZenithError,
    ZenithResult,
};
use zenith_interface::CompletionDriver;

/// Longest slice of an error body kept in error messages.
const ERROR_BODY_PREVIEW: usize = 200;

/// Client for an Azure OpenAI chat completions deployment.
#[derive(Clone)]
pub struct AzureOpenAIClient {
    client: reqwest::Client,
    url: String,
    api_key: String,
    deployment: String,
}

impl std::fmt::Debug for AzureOpenAIClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureOpenAIClient")
            .field("url", &self.url)
            .field("deployment", &self.deployment)
            .finish_non_exhaustive()
    }
}

impl AzureOpenAIClient {
    /// Create a client for the configured deployment.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if endpoint, key or deployment is missing,
    /// or if the HTTP client cannot be built.
    #[instrument(skip(config), fields(endpoint = %config.endpoint, deployment = %config.deployment))]
    pub fn new(config: &ModelConfig) -> ZenithResult<Self> {
        tracing::debug!("Creating Azure OpenAI client");
        config.require_credentials()?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                ZenithError::from(ConfigError::new(format!(
                    "Failed to build HTTP client: {}",
                    e
                )))
            })?;

        Ok(Self {
            client,
            url: config.completions_url(),
            api_key: config.api_key.clone(),
            deployment: config.deployment.clone(),
        })
    }

    /// Full chat completions URL, including `api-version`.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send a chat completion request
    #[instrument(skip(self, request), fields(deployment = %self.deployment, temperature = %request.temperature))]
    pub async fn chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> GenerationResult<ChatCompletionResponse> {
        tracing::debug!("Sending chat completion request");

        let response = self
            .client
            .post(&self.url)
            .header("api-key", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Request failed: {}", e);
                GenerationError::new(classify_transport_error(&e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = if body.trim().is_empty() {
                status.to_string()
            } else {
                body.chars().take(ERROR_BODY_PREVIEW).collect()
            };
            tracing::error!(status = status.as_u16(), "Model API returned error: {}", message);
            return Err(GenerationError::new(GenerationErrorKind::from_status(
                status.as_u16(),
                message,
            )));
        }

        let result = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse response: {}", e);
            if e.is_timeout() {
                GenerationError::new(GenerationErrorKind::Timeout(e.to_string()))
            } else {
                GenerationError::malformed(format!("Failed to parse response: {}", e))
            }
        })?;

        tracing::debug!("Chat completion successful");
        Ok(result)
    }
}

fn classify_transport_error(error: &reqwest::Error) -> GenerationErrorKind {
    if error.is_timeout() {
        GenerationErrorKind::Timeout(format!("Request timed out: {}", error))
    } else {
        GenerationErrorKind::Network(format!("Request failed: {}", error))
    }
}

#[async_trait]
impl CompletionDriver for AzureOpenAIClient {
    #[instrument(skip(self, req), fields(provider = "azure-openai", deployment = %self.deployment))]
    async fn complete(&self, req: &CompletionRequest) -> GenerationResult<CompletionResponse> {
        let response = self.chat_completion(&ChatCompletionRequest::from(req)).await?;

        let text = response.first_text().ok_or_else(|| {
            let reason = response
                .choices
                .first()
                .and_then(|choice| choice.finish_reason.clone())
                .unwrap_or_else(|| "no choices".to_string());
            tracing::warn!(finish_reason = %reason, "Model reply had no content");
            GenerationError::malformed(format!("Model reply had no content ({})", reason))
        })?;

        Ok(CompletionResponse {
            text: text.to_string(),
            model: response.model.clone(),
        })
    }

    fn provider_name(&self) -> &'static str {
        "azure-openai"
    }

    fn model_name(&self) -> &str {
        &self.deployment
    }
}
