//! OpenAI chat completions client, also used for DeepSeek and vLLM.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::debug;

use super::{TextGenerator, check_status, http_client, non_empty};
use crate::config::LlmConfig;
use crate::error::GenerationResult;
use crate::models::Provider;

/// Client for `/chat/completions` endpoints.
pub struct OpenAiCompatibleClient {
    client: Client,
    provider: Provider,
    model: String,
    api_key: String,
    base_url: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiCompatibleClient {
    /// Create a client. vLLM falls back to the token `EMPTY` when no key is set.
    pub fn new(config: LlmConfig) -> GenerationResult<Self> {
        config.validate()?;
        Ok(Self {
            client: http_client(&config)?,
            provider: config.provider,
            model: config.model,
            api_key: config.api_key.unwrap_or_else(|| "EMPTY".to_string()),
            base_url: config.base_url,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    fn request_body(&self, prompt: &str, system_prompt: Option<&str>, max_tokens: u32) -> Value {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = system_prompt {
            messages.push(json!({"role": "system", "content": system}));
        }
        messages.push(json!({"role": "user", "content": prompt}));

        json!({
            "model": self.model,
            "messages": messages,
            "temperature": self.temperature,
            "max_tokens": max_tokens,
        })
    }
}

#[async_trait]
impl TextGenerator for OpenAiCompatibleClient {
    fn provider(&self) -> Provider {
        self.provider
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
        let url = format!("{}/chat/completions", self.base_url);
        let body = self.request_body(prompt, system_prompt, max_tokens.unwrap_or(self.max_tokens));

        debug!(provider = %self.provider, url = url.as_str(), "Sending chat completion request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        let response = check_status(self.provider, response).await?;
        let value: Value = response.json().await?;

        non_empty(self.provider, value["choices"][0]["message"]["content"].as_str())
    }
}

impl std::fmt::Debug for OpenAiCompatibleClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiCompatibleClient")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_with_system_prompt() {
        let config = LlmConfig::for_testing(Provider::DeepSeek, "http://localhost:1");
        let client = OpenAiCompatibleClient::new(config).unwrap();
        let body = client.request_body("hello", Some("be brief"), 50);

        assert_eq!(body["model"], "deepseek-chat");
        assert_eq!(body["max_tokens"], 50);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "hello");
    }

    #[test]
    fn test_vllm_without_key() {
        let mut config = LlmConfig::for_testing(Provider::Vllm, "http://localhost:8000/v1");
        config.api_key = None;
        let client = OpenAiCompatibleClient::new(config).unwrap();
        assert_eq!(client.api_key, "EMPTY");
    }
}
