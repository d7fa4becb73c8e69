use async_trait::async_trait;
use reqwest::Client;

use crate::config::OpenAiConfig;

use super::{
    error::GenerationError,
    generator::TextGenerator,
    inference::{CHAT_COMPLETIONS_PATH, build_request, parse_response},
};

/// Chat-completions client for OpenAI-compatible endpoints.
#[derive(Clone)]
pub struct OpenAiClient {
    http: Client,
    config: OpenAiConfig,
}

impl OpenAiClient {
    pub fn new(http: Client, config: OpenAiConfig) -> Self {
        Self { http, config }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}{}",
            self.config.base_url.trim_end_matches('/'),
            CHAT_COMPLETIONS_PATH
        )
    }
}

#[async_trait]
impl TextGenerator for OpenAiClient {
    async fn generate(&self, system: &str, prompt: &str) -> Result<String, GenerationError> {
        let api_key = self
            .config
            .api_key
            .as_ref()
            .ok_or(GenerationError::MissingApiKey)?;

        let request = build_request(&self.config.model, system, prompt);
        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(api_key)
            .timeout(self.config.timeout)
            .json(&request)
            .send()
            .await?;

        tracing::debug!(
            target: "inference",
            model = %self.config.model,
            status = response.status().as_u16(),
            "chat completion returned"
        );
        parse_response(response).await
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
