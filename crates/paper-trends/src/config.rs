//! Configuration for the analysis engine and its generative-text provider.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{AnalysisError, EngineResult, GenerationError, GenerationResult};
use crate::models::Provider;

/// Engine defaults.
pub mod defaults {
    use std::time::Duration;

    /// Keywords kept by the lexical weighter.
    pub const TOP_KEYWORDS: usize = 50;

    /// Latent topics fitted by the topic model.
    pub const NUM_TOPICS: usize = 5;

    /// Ranked terms reported per topic.
    pub const TERMS_PER_TOPIC: usize = 10;

    /// Gibbs sweeps over the corpus.
    pub const TOPIC_ITERATIONS: usize = 20;

    /// Seed for the topic model sampler.
    pub const TOPIC_SEED: u64 = 42;

    /// Vocabulary cap for the bag-of-words representation.
    pub const MAX_VOCABULARY: usize = 1000;

    /// A term must appear in at least this many documents.
    pub const MIN_DOCUMENT_FREQUENCY: usize = 2;

    /// A term may appear in at most this share of documents.
    pub const MAX_DOCUMENT_RATIO: f64 = 0.8;

    /// Categories kept in the statistics distribution.
    pub const TOP_CATEGORIES: usize = 10;

    /// Authors kept in the statistics distribution.
    pub const TOP_AUTHORS: usize = 10;

    /// Words kept in the statistics word counts.
    pub const TOP_WORDS: usize = 30;

    /// Minimum paper count for a prolific author.
    pub const PROLIFIC_THRESHOLD: usize = 2;

    /// Papers listed in the narrative prompt.
    pub const PROMPT_PAPERS: usize = 30;

    /// Keywords listed in the narrative prompt.
    pub const PROMPT_KEYWORDS: usize = 30;

    /// Terms listed per topic in the narrative prompt.
    pub const PROMPT_TOPIC_TERMS: usize = 8;

    /// Output token budget for the narrative request.
    pub const NARRATIVE_MAX_TOKENS: u32 = 3000;

    /// Words drawn in the word-frequency image.
    pub const WORDCLOUD_WORDS: usize = 100;

    /// Language the narrative is requested in.
    pub const RESPONSE_LANGUAGE: &str = "English";

    /// Directory artifacts are written to.
    pub const OUTPUT_DIR: &str = "data/analysis";

    /// Sampling temperature for providers.
    pub const TEMPERATURE: f32 = 0.7;

    /// Output token budget when a call does not set one.
    pub const MAX_TOKENS: u32 = 1500;

    /// Provider request timeout.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(180);

    /// Provider connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
}

/// Tunables for one analysis run.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Keywords returned by the lexical weighter.
    pub top_keywords: usize,

    /// Number of latent topics.
    pub num_topics: usize,

    /// Terms reported per topic.
    pub terms_per_topic: usize,

    /// Topic model iterations.
    pub topic_iterations: usize,

    /// Topic model seed.
    pub topic_seed: u64,

    /// Bag-of-words vocabulary cap.
    pub max_vocabulary: usize,

    /// Minimum document frequency (absolute).
    pub min_document_frequency: usize,

    /// Maximum document frequency (share of the corpus).
    pub max_document_ratio: f64,

    /// Top-K for category counts.
    pub top_categories: usize,

    /// Top-K for author counts.
    pub top_authors: usize,

    /// Top-K for word counts.
    pub top_words: usize,

    /// Papers rendered in the narrative prompt.
    pub prompt_papers: usize,

    /// Keywords rendered in the narrative prompt.
    pub prompt_keywords: usize,

    /// Terms rendered per topic in the narrative prompt.
    pub prompt_topic_terms: usize,

    /// Output token budget for the narrative.
    pub narrative_max_tokens: u32,

    /// Words drawn in the word-frequency image.
    pub wordcloud_words: usize,

    /// Narrative response language.
    pub response_language: String,
}

impl AnalysisConfig {
    /// Reject settings the algorithms cannot work with.
    pub fn validate(&self) -> EngineResult<()> {
        if self.num_topics == 0 {
            return Err(AnalysisError::invalid_config("num_topics", "must be at least 1"));
        }
        if self.min_document_frequency == 0 {
            return Err(AnalysisError::invalid_config(
                "min_document_frequency",
                "must be at least 1",
            ));
        }
        if !(self.max_document_ratio > 0.0 && self.max_document_ratio <= 1.0) {
            return Err(AnalysisError::invalid_config(
                "max_document_ratio",
                "must be in (0, 1]",
            ));
        }
        Ok(())
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            top_keywords: defaults::TOP_KEYWORDS,
            num_topics: defaults::NUM_TOPICS,
            terms_per_topic: defaults::TERMS_PER_TOPIC,
            topic_iterations: defaults::TOPIC_ITERATIONS,
            topic_seed: defaults::TOPIC_SEED,
            max_vocabulary: defaults::MAX_VOCABULARY,
            min_document_frequency: defaults::MIN_DOCUMENT_FREQUENCY,
            max_document_ratio: defaults::MAX_DOCUMENT_RATIO,
            top_categories: defaults::TOP_CATEGORIES,
            top_authors: defaults::TOP_AUTHORS,
            top_words: defaults::TOP_WORDS,
            prompt_papers: defaults::PROMPT_PAPERS,
            prompt_keywords: defaults::PROMPT_KEYWORDS,
            prompt_topic_terms: defaults::PROMPT_TOPIC_TERMS,
            narrative_max_tokens: defaults::NARRATIVE_MAX_TOKENS,
            wordcloud_words: defaults::WORDCLOUD_WORDS,
            response_language: defaults::RESPONSE_LANGUAGE.to_string(),
        }
    }
}

/// Generative-text provider configuration.
#[derive(Clone)]
pub struct LlmConfig {
    /// Selected provider.
    pub provider: Provider,

    /// Model name.
    pub model: String,

    /// API key (optional for vLLM).
    pub api_key: Option<String>,

    /// API base URL (for proxies, self-hosted servers and mock servers).
    pub base_url: String,

    /// Sampling temperature.
    pub temperature: f32,

    /// Default output token budget.
    pub max_tokens: u32,

    /// Request timeout.
    pub request_timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,
}

impl LlmConfig {
    /// Create a configuration with the provider's defaults.
    #[must_use]
    pub fn new(provider: Provider, api_key: Option<String>) -> Self {
        Self {
            provider,
            model: provider.default_model().to_string(),
            api_key,
            base_url: provider.default_base_url().to_string(),
            temperature: defaults::TEMPERATURE,
            max_tokens: defaults::MAX_TOKENS,
            request_timeout: defaults::REQUEST_TIMEOUT,
            connect_timeout: defaults::CONNECT_TIMEOUT,
        }
    }

    /// Create a test configuration pointing at a mock server.
    #[must_use]
    pub fn for_testing(provider: Provider, base_url: &str) -> Self {
        Self {
            api_key: Some("test-key".to_string()),
            base_url: base_url.trim_end_matches('/').to_string(),
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            ..Self::new(provider, None)
        }
    }

    /// Override the model name.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Create configuration from environment variables.
    ///
    /// Reads `LLM_PROVIDER`, the provider's API key variable(s), its base URL
    /// variable, and `LLM_MODEL` / `LLM_TEMPERATURE` / `LLM_MAX_TOKENS`.
    pub fn from_env() -> anyhow::Result<Self> {
        let provider = match std::env::var("LLM_PROVIDER") {
            Ok(p) => p.parse::<Provider>().map_err(|e| anyhow::anyhow!(e))?,
            Err(_) => Provider::default(),
        };
        Self::from_env_for(provider)
    }

    /// Create configuration for a specific provider from environment variables.
    pub fn from_env_for(provider: Provider) -> anyhow::Result<Self> {
        let api_key =
            provider.api_key_env_vars().iter().find_map(|var| std::env::var(var).ok());
        let mut config = Self::new(provider, api_key);

        if let Some(var) = provider.base_url_env_var() {
            if let Ok(url) = std::env::var(var) {
                config.base_url = url.trim_end_matches('/').to_string();
            }
        }

        let model_var = if provider == Provider::Vllm { "VLLM_MODEL" } else { "LLM_MODEL" };
        if let Ok(model) = std::env::var(model_var).or_else(|_| std::env::var("LLM_MODEL")) {
            config.model = model;
        }
        if let Ok(t) = std::env::var("LLM_TEMPERATURE") {
            config.temperature = t.parse()?;
        }
        if let Ok(m) = std::env::var("LLM_MAX_TOKENS") {
            config.max_tokens = m.parse()?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check the base URL parses and a key is present where required.
    pub fn validate(&self) -> GenerationResult<()> {
        url::Url::parse(&self.base_url).map_err(|e| {
            GenerationError::config(format!("invalid base URL '{}': {e}", self.base_url))
        })?;

        if self.provider.requires_api_key() && self.api_key.is_none() {
            let var = self.provider.api_key_env_vars().first().copied().unwrap_or("API_KEY");
            return Err(GenerationError::missing_api_key(self.provider.name(), var));
        }
        Ok(())
    }

    /// Check if an API key is configured.
    #[must_use]
    pub const fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("has_api_key", &self.has_api_key())
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish_non_exhaustive()
    }
}

/// Top-level configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Analysis tunables.
    pub analysis: AnalysisConfig,

    /// Provider settings; `None` runs the narrative step in degraded mode.
    pub llm: Option<LlmConfig>,

    /// Directory artifacts are written to.
    pub output_dir: PathBuf,
}

impl Config {
    /// Create a configuration with default analysis settings.
    #[must_use]
    pub fn new(llm: Option<LlmConfig>) -> Self {
        Self {
            analysis: AnalysisConfig::default(),
            llm,
            output_dir: PathBuf::from(defaults::OUTPUT_DIR),
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Loads `.env` first. Setting `LLM_PROVIDER=none` disables the provider,
    /// as does a provider that is missing its API key.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        let llm = match std::env::var("LLM_PROVIDER").as_deref() {
            Ok("none" | "") => None,
            _ => match LlmConfig::from_env() {
                Ok(llm) => Some(llm),
                Err(e) => {
                    tracing::warn!(error = %e, "LLM provider not configured, narrative disabled");
                    None
                }
            },
        };

        let mut config = Self::new(llm);
        if let Ok(dir) = std::env::var("ANALYSIS_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(dir);
        }
        if let Ok(lang) = std::env::var("ANALYSIS_LANGUAGE") {
            config.analysis.response_language = lang;
        }
        if let Ok(n) = std::env::var("ANALYSIS_TOP_KEYWORDS") {
            config.analysis.top_keywords = n.parse()?;
        }
        if let Ok(k) = std::env::var("ANALYSIS_NUM_TOPICS") {
            config.analysis.num_topics = k.parse()?;
        }
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_defaults() {
        let config = AnalysisConfig::default();
        assert_eq!(config.top_keywords, 50);
        assert_eq!(config.num_topics, 5);
        assert_eq!(config.topic_seed, 42);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_analysis_validate_rejects_zero_topics() {
        let config = AnalysisConfig { num_topics: 0, ..AnalysisConfig::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_llm_config_requires_key() {
        let config = LlmConfig::new(Provider::Claude, None);
        assert!(!config.has_api_key());
        assert!(matches!(config.validate(), Err(GenerationError::MissingApiKey { .. })));

        let vllm = LlmConfig::new(Provider::Vllm, None);
        assert!(vllm.validate().is_ok());
    }

    #[test]
    fn test_llm_config_rejects_bad_url() {
        let mut config = LlmConfig::new(Provider::OpenAi, Some("k".to_string()));
        config.base_url = "not a url".to_string();
        assert!(matches!(config.validate(), Err(GenerationError::Config(_))));
    }

    #[test]
    fn test_debug_hides_key() {
        let config = LlmConfig::new(Provider::OpenAi, Some("sk-secret".to_string()));
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("has_api_key: true"));
    }
}
