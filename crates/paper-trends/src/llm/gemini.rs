//! Google Gemini `generateContent` client.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::{debug, warn};
use url::Url;

use super::{TextGenerator, check_status, http_client, non_empty};
use crate::config::LlmConfig;
use crate::error::{GenerationError, GenerationResult};
use crate::models::Provider;

/// Client for `models/{model}:generateContent`.
pub struct GeminiClient {
    client: Client,
    model: String,
    api_key: String,
    base_url: String,
    temperature: f32,
    max_tokens: u32,
}

impl GeminiClient {
    /// Create a client; an API key is mandatory.
    pub fn new(config: LlmConfig) -> GenerationResult<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| GenerationError::missing_api_key("gemini", "GEMINI_API_KEY"))?;
        Ok(Self {
            client: http_client(&config)?,
            model: config.model,
            api_key,
            base_url: config.base_url,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    /// `generateContent` endpoint with the key as a query parameter.
    fn endpoint(&self) -> GenerationResult<Url> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        Url::parse_with_params(&url, &[("key", self.api_key.as_str())])
            .map_err(|e| GenerationError::config(format!("invalid Gemini URL '{url}': {e}")))
    }

    /// Gemini has no separate system role here; the system prompt is prepended.
    fn request_body(&self, prompt: &str, system_prompt: Option<&str>, max_tokens: u32) -> Value {
        let text = match system_prompt {
            Some(system) => format!("{system}\n\n{prompt}"),
            None => prompt.to_string(),
        };
        json!({
            "contents": [{"role": "user", "parts": [{"text": text}]}],
            "generationConfig": {
                "temperature": self.temperature,
                "maxOutputTokens": max_tokens,
            },
        })
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    fn provider(&self) -> Provider {
        Provider::Gemini
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
        let url = self.endpoint()?;
        let body = self.request_body(prompt, system_prompt, max_tokens.unwrap_or(self.max_tokens));

        debug!(model = self.model.as_str(), "Sending Gemini request");

        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await?;
        let response = check_status(Provider::Gemini, response).await?;
        let value: Value = response.json().await?;

        let text: String = value["candidates"][0]["content"]["parts"]
            .as_array()
            .map(|parts| parts.iter().filter_map(|p| p["text"].as_str()).collect::<Vec<_>>().join(""))
            .unwrap_or_default();

        if text.trim().is_empty() {
            warn!(finish_reason = %value["candidates"][0]["finishReason"], "Gemini returned no text");
        }
        non_empty(Provider::Gemini, Some(&text))
    }
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}
