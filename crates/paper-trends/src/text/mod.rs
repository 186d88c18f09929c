//! Text preprocessing shared by the analysis components.
//!
//! Two tokenizers live here on purpose: the vectorizing one (`Tokenizer`)
//! matches runs of two or more word characters, while the statistics counter
//! splits on whitespace and strips punctuation (`clean_word`).

mod stopwords;
mod vocabulary;

use std::sync::LazyLock;

use regex::Regex;

pub use stopwords::{RESEARCH, StopWords};
pub use vocabulary::{FrequencyBounds, Vocabulary};

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("valid token regex"));

/// Lower-casing word tokenizer with stop-word removal.
#[derive(Debug, Clone, Default)]
pub struct Tokenizer {
    stop_words: StopWords,
}

impl Tokenizer {
    /// Create a tokenizer that drops the given stop words.
    #[must_use]
    pub fn new(stop_words: StopWords) -> Self {
        Self { stop_words }
    }

    /// Stop words in use.
    #[must_use]
    pub fn stop_words(&self) -> &StopWords {
        &self.stop_words
    }

    /// Lower-cased tokens of `text`, stop words removed.
    #[must_use]
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        TOKEN_RE
            .find_iter(&lower)
            .map(|m| m.as_str())
            .filter(|t| !self.stop_words.contains(t))
            .map(str::to_string)
            .collect()
    }

    /// Unigrams followed by space-joined bigrams of adjacent kept tokens.
    #[must_use]
    pub fn unigrams_and_bigrams(&self, text: &str) -> Vec<String> {
        let tokens = self.tokenize(text);
        let bigrams: Vec<String> = tokens.windows(2).map(|w| format!("{} {}", w[0], w[1])).collect();
        let mut terms = tokens;
        terms.extend(bigrams);
        terms
    }
}

/// Lower-case `word` and strip every non-word character.
#[must_use]
pub fn clean_word(word: &str) -> String {
    word.to_lowercase().chars().filter(|c| c.is_alphanumeric() || *c == '_').collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_lowercases_and_filters() {
        let tokenizer = Tokenizer::default();
        let tokens = tokenizer.tokenize("The Diffusion Model beats a GAN, e.g. on CIFAR-10.");
        assert_eq!(tokens, vec!["diffusion", "beats", "gan", "cifar", "10"]);
    }

    #[test]
    fn test_bigrams_skip_stop_words() {
        let tokenizer = Tokenizer::default();
        let terms = tokenizer.unigrams_and_bigrams("graph of neural networks");
        assert_eq!(
            terms,
            vec!["graph", "neural", "networks", "graph neural", "neural networks"]
        );
    }

    #[test]
    fn test_clean_word() {
        assert_eq!(clean_word("(Transformer-based),"), "transformerbased");
        assert_eq!(clean_word("..."), "");
    }
}
