//! Anthropic messages API client.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::debug;

use super::{TextGenerator, check_status, http_client, non_empty};
use crate::config::LlmConfig;
use crate::error::{GenerationError, GenerationResult};
use crate::models::Provider;

/// Required `anthropic-version` header value.
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Client for the `/messages` endpoint.
pub struct ClaudeClient {
    client: Client,
    model: String,
    api_key: String,
    base_url: String,
    temperature: f32,
    max_tokens: u32,
}

impl ClaudeClient {
    /// Create a client; an API key is mandatory.
    pub fn new(config: LlmConfig) -> GenerationResult<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| GenerationError::missing_api_key("claude", "CLAUDE_API_KEY"))?;
        Ok(Self {
            client: http_client(&config)?,
            model: config.model,
            api_key,
            base_url: config.base_url,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    fn request_body(&self, prompt: &str, system_prompt: Option<&str>, max_tokens: u32) -> Value {
        let mut body = json!({
            "model": self.model,
            "max_tokens": max_tokens,
            "temperature": self.temperature,
            "messages": [{"role": "user", "content": prompt}],
        });
        if let Some(system) = system_prompt {
            body["system"] = json!(system);
        }
        body
    }
}

#[async_trait]
impl TextGenerator for ClaudeClient {
    fn provider(&self) -> Provider {
        Provider::Claude
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        max_tokens: Option<u32>,
    ) -> GenerationResult<String> {
        let url = format!("{}/messages", self.base_url);
        let body = self.request_body(prompt, system_prompt, max_tokens.unwrap_or(self.max_tokens));

        debug!(model = self.model.as_str(), url = url.as_str(), "Sending Anthropic request");

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await?;
        let response = check_status(Provider::Claude, response).await?;
        let value: Value = response.json().await?;

        // Concatenate text blocks; other block types are ignored.
        let text: String = value["content"]
            .as_array()
            .map(|blocks| {
                blocks
                    .iter()
                    .filter(|b| b["type"] == "text")
                    .filter_map(|b| b["text"].as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        non_empty(Provider::Claude, Some(&text))
    }
}

impl std::fmt::Debug for ClaudeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaudeClient")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}
