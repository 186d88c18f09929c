//! Stop-word set: NLTK English function words plus research boilerplate.

use std::collections::HashSet;

use stop_words::{LANGUAGE, get};

/// Generic research-writing words that would otherwise dominate every corpus.
pub const RESEARCH: &[&str] = &[
    "paper", "study", "research", "approach", "method", "propose", "present", "show",
    "demonstrate", "arxiv", "preprint", "et", "al", "also", "based", "using", "used", "use",
    "new", "work", "results", "result", "performance", "model", "models",
];

/// Lower-case stop-word lookup.
#[derive(Debug, Clone)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    /// NLTK English list plus research boilerplate.
    #[must_use]
    pub fn new() -> Self {
        let mut stop = Self::from_words(get(LANGUAGE::English).iter());
        stop.words.extend(RESEARCH.iter().map(|w| (*w).to_string()));
        stop
    }

    /// Build from an arbitrary word list.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self { words: words.into_iter().map(|w| w.as_ref().to_lowercase()).collect() }
    }

    /// True if `word` (already lower-cased) is a stop word.
    #[must_use]
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    /// Number of stop words.
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// True when the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for StopWords {
    fn default() -> Self {
        Self::new()
    }
}
