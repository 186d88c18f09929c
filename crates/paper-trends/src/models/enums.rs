//! Enumeration types for providers and narrative sections.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Generative-text provider backing the narrative step.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// OpenAI chat completions.
    #[default]
    #[value(name = "openai")]
    OpenAi,
    /// DeepSeek (OpenAI-compatible).
    #[value(name = "deepseek")]
    DeepSeek,
    /// Self-hosted vLLM (OpenAI-compatible).
    #[value(name = "vllm")]
    Vllm,
    /// Anthropic Claude messages API.
    #[value(name = "claude")]
    Claude,
    /// Google Gemini generateContent API.
    #[value(name = "gemini")]
    Gemini,
}

impl Provider {
    /// All supported providers.
    pub const ALL: [Self; 5] = [Self::OpenAi, Self::DeepSeek, Self::Vllm, Self::Claude, Self::Gemini];

    /// Lower-case provider name used in config and logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::DeepSeek => "deepseek",
            Self::Vllm => "vllm",
            Self::Claude => "claude",
            Self::Gemini => "gemini",
        }
    }

    /// Default API base URL.
    #[must_use]
    pub const fn default_base_url(self) -> &'static str {
        match self {
            Self::OpenAi => "https://api.openai.com/v1",
            Self::DeepSeek => "https://api.deepseek.com/v1",
            Self::Vllm => "http://localhost:8000/v1",
            Self::Claude => "https://api.anthropic.com/v1",
            Self::Gemini => "https://generativelanguage.googleapis.com/v1beta",
        }
    }

    /// Default model when none is configured.
    #[must_use]
    pub const fn default_model(self) -> &'static str {
        match self {
            Self::OpenAi => "gpt-4o-mini",
            Self::DeepSeek => "deepseek-chat",
            Self::Vllm => "default",
            Self::Claude => "claude-3-5-sonnet-20241022",
            Self::Gemini => "gemini-1.5-flash",
        }
    }

    /// Environment variables consulted for the API key, in priority order.
    #[must_use]
    pub const fn api_key_env_vars(self) -> &'static [&'static str] {
        match self {
            Self::OpenAi => &["OPENAI_API_KEY"],
            Self::DeepSeek => &["DEEPSEEK_API_KEY"],
            Self::Vllm => &["VLLM_API_KEY"],
            Self::Claude => &["CLAUDE_API_KEY", "ANTHROPIC_API_KEY"],
            Self::Gemini => &["GEMINI_API_KEY"],
        }
    }

    /// Environment variable overriding the base URL, if the provider has one.
    #[must_use]
    pub const fn base_url_env_var(self) -> Option<&'static str> {
        match self {
            Self::OpenAi => Some("OPENAI_BASE_URL"),
            Self::Vllm => Some("VLLM_BASE_URL"),
            _ => None,
        }
    }

    /// Whether a real API key is mandatory.
    ///
    /// vLLM servers usually accept any token, so it falls back to `EMPTY`.
    #[must_use]
    pub const fn requires_api_key(self) -> bool {
        !matches!(self, Self::Vllm)
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL.into_iter().find(|p| p.name() == wanted).ok_or_else(|| {
            let supported: Vec<_> = Self::ALL.iter().map(|p| p.name()).collect();
            format!("unsupported LLM provider '{s}' (supported: {})", supported.join(", "))
        })
    }
}

/// Labeled section of the generated narrative.
///
/// Declaration order is the heading-match priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NarrativeSection {
    /// Current research hotspots.
    Hotspots,
    /// Technical trends.
    Trends,
    /// Future directions.
    FutureDirections,
    /// Research ideas and innovation points.
    ResearchIdeas,
}

impl NarrativeSection {
    /// Sections in match priority and report order.
    pub const ALL: [Self; 4] =
        [Self::Hotspots, Self::Trends, Self::FutureDirections, Self::ResearchIdeas];

    /// Field name used in the persisted JSON.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Hotspots => "hotspots",
            Self::Trends => "trends",
            Self::FutureDirections => "future_directions",
            Self::ResearchIdeas => "research_ideas",
        }
    }

    /// Report heading for this section.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Hotspots => "Research Hotspots",
            Self::Trends => "Technical Trends",
            Self::FutureDirections => "Future Directions",
            Self::ResearchIdeas => "Research Ideas",
        }
    }

    /// Substrings that open this section when found in a response line.
    ///
    /// ASCII triggers are matched against the lower-cased line, the others verbatim.
    #[must_use]
    pub const fn triggers(self) -> &'static [&'static str] {
        match self {
            Self::Hotspots => &["研究热点", "hotspot"],
            Self::Trends => &["趋势", "trend"],
            Self::FutureDirections => &["未来", "future", "发展方向"],
            Self::ResearchIdeas => &["创新", "idea", "想法"],
        }
    }

    /// First section whose trigger occurs in `line`.
    #[must_use]
    pub fn detect(line: &str) -> Option<Self> {
        let lower = line.to_lowercase();
        Self::ALL.into_iter().find(|section| {
            section.triggers().iter().any(|t| {
                if t.is_ascii() { lower.contains(t) } else { line.contains(t) }
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_from_str() {
        assert_eq!("OpenAI".parse::<Provider>().unwrap(), Provider::OpenAi);
        assert_eq!(" claude ".parse::<Provider>().unwrap(), Provider::Claude);
        let err = "mistral".parse::<Provider>().unwrap_err();
        assert!(err.contains("gemini"));
    }

    #[test]
    fn test_provider_serde_names() {
        let json = serde_json::to_string(&Provider::DeepSeek).unwrap();
        assert_eq!(json, "\"deepseek\"");
        let parsed: Provider = serde_json::from_str("\"vllm\"").unwrap();
        assert_eq!(parsed, Provider::Vllm);
    }

    #[test]
    fn test_detect_priority() {
        assert_eq!(NarrativeSection::detect("### 1. Current Research Hotspots"), Some(NarrativeSection::Hotspots));
        // "hotspot" wins over "trend" on the same line
        assert_eq!(NarrativeSection::detect("Hotspot trends"), Some(NarrativeSection::Hotspots));
        assert_eq!(NarrativeSection::detect("## 未来发展方向"), Some(NarrativeSection::FutureDirections));
        assert_eq!(NarrativeSection::detect("- ordinary bullet"), None);
    }
}
