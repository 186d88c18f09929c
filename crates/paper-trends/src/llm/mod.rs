//! Generative-text provider clients.
//!
//! Every provider is a flat implementation of [`TextGenerator`]; the
//! concrete client is picked from [`LlmConfig::provider`] by
//! [`create_generator`]. Calls are made once; there is no retry layer.

mod claude;
mod gemini;
mod openai;

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{error, info};

pub use claude::ClaudeClient;
pub use gemini::GeminiClient;
pub use openai::OpenAiCompatibleClient;

use crate::config::LlmConfig;
use crate::error::{GenerationError, GenerationResult};
use crate::models::Provider;

/// Uniform text-generation capability.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Provider backing this client.
    fn provider(&self) -> Provider;

    /// Model name sent with each request.
    fn model(&self) -> &str;

    /// Generate a completion for `prompt`.
    ///
    /// `max_tokens` overrides the configured output budget for this call.
    async fn generate(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        max_tokens: Option<u32>,
    ) -> GenerationResult<String>;

    /// Generate completions for several prompts, one call each, in order.
    ///
    /// A failed prompt does not stop the rest.
    async fn generate_batch(
        &self,
        prompts: &[String],
        system_prompt: Option<&str>,
    ) -> Vec<GenerationResult<String>> {
        let mut results = Vec::with_capacity(prompts.len());
        for prompt in prompts {
            let result = self.generate(prompt, system_prompt, None).await;
            if let Err(e) = &result {
                error!(provider = %self.provider(), error = %e, "Batch generation failed");
            }
            results.push(result);
        }
        results
    }
}

/// Build the client for the configured provider.
pub fn create_generator(config: LlmConfig) -> GenerationResult<Arc<dyn TextGenerator>> {
    config.validate()?;
    let provider = config.provider;

    let generator: Arc<dyn TextGenerator> = match provider {
        Provider::OpenAi | Provider::DeepSeek | Provider::Vllm => {
            Arc::new(OpenAiCompatibleClient::new(config)?)
        }
        Provider::Claude => Arc::new(ClaudeClient::new(config)?),
        Provider::Gemini => Arc::new(GeminiClient::new(config)?),
    };

    info!(provider = %provider, model = generator.model(), "Created LLM client");
    Ok(generator)
}

/// Shared HTTP client with the configured timeouts.
fn http_client(config: &LlmConfig) -> GenerationResult<Client> {
    Ok(Client::builder()
        .timeout(config.request_timeout)
        .connect_timeout(config.connect_timeout)
        .gzip(true)
        .build()?)
}

/// Turn a non-success response into a provider error.
async fn check_status(
    provider: Provider,
    response: reqwest::Response,
) -> GenerationResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let text = response.text().await.unwrap_or_default();
    Err(GenerationError::api(provider.name(), status.as_u16(), text))
}

/// Trimmed text, or an error when nothing is left.
fn non_empty(provider: Provider, text: Option<&str>) -> GenerationResult<String> {
    match text.map(str::trim) {
        Some(t) if !t.is_empty() => Ok(t.to_string()),
        _ => Err(GenerationError::empty_response(provider.name())),
    }
}
