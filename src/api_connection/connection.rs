use reqwest::Client;
use std::env;
use thiserror::Error;
use tracing::{debug, warn};

use super::endpoints::{
    ChatCompletionRequest, ChatCompletionResponse, OpenRouterAvailableModel, Provider,
    OPENROUTER_MODELS,
};
use crate::config::AnalyzerConfig;

#[derive(Debug, Error)]
pub enum ApiConnectionError {
    #[error("API key not found in environment: {0}")]
    MissingApiKey(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("API error {status}: {error_body}")]
    ApiError {
        status: reqwest::StatusCode,
        error_body: String,
    },
}

impl Provider {
    pub fn openrouter(config: &AnalyzerConfig) -> Self {
        Self::OpenRouter {
            api_key_env_var: config.api_key_env_var.clone(),
            base_url: config.base_url.clone(),
            site_url: config.site_url.clone(),
            app_title: config.app_title.clone(),
        }
    }

    pub fn chat_completions_url(&self) -> String {
        match self {
            Provider::OpenRouter { base_url, .. } => format!("{}/chat/completions", base_url),
        }
    }

    pub fn get_available_models(&self) -> Vec<OpenRouterAvailableModel> {
        match self {
            Provider::OpenRouter { .. } => OPENROUTER_MODELS.to_vec(),
        }
    }

    pub fn supports_images(&self, model: &str) -> bool {
        self.get_available_models()
            .iter()
            .find(|m| m.model_name == model)
            // unknown models are assumed multimodal and left to the API to reject
            .map_or(true, |m| m.supports_images)
    }

    pub async fn call_chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, ApiConnectionError> {
        match self {
            Provider::OpenRouter {
                api_key_env_var,
                site_url,
                app_title,
                ..
            } => {
                let actual_api_key = env::var(api_key_env_var)
                    .ok()
                    .filter(|key| !key.trim().is_empty())
                    .ok_or_else(|| ApiConnectionError::MissingApiKey(api_key_env_var.clone()))?;

                let url = self.chat_completions_url();
                debug!(%url, model = %request.model, "sending chat completion request");

                let response = Client::new()
                    .post(&url)
                    .bearer_auth(actual_api_key)
                    .header("HTTP-Referer", site_url)
                    .header("X-Title", app_title)
                    .json(request)
                    .send()
                    .await?;

                let status = response.status();
                if status.is_success() {
                    let body = response.text().await?;
                    let chat_response: ChatCompletionResponse = serde_json::from_str(&body)?;
                    debug!(id = %chat_response.id, choices = chat_response.choices.len(), "chat completion received");
                    Ok(chat_response)
                } else {
                    let error_body = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Failed to read error body".to_string());
                    warn!(%status, "chat completion request rejected");
                    Err(ApiConnectionError::ApiError { status, error_body })
                }
            }
        }
    }
}
