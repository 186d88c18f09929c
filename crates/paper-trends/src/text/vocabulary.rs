//! Document-frequency filtered vocabulary shared by the weighter and the topic model.

use std::collections::HashMap;

/// Bounds applied when building a vocabulary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyBounds {
    /// Minimum number of documents a term must occur in.
    pub min_documents: usize,

    /// Maximum share of documents a term may occur in.
    pub max_ratio: f64,

    /// Keep only this many terms, most frequent across the corpus first.
    pub max_terms: Option<usize>,
}

/// Sorted term list with an index lookup.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    terms: Vec<String>,
    index: HashMap<String, usize>,
}

impl Vocabulary {
    /// Build from tokenized documents.
    ///
    /// A term survives when `df >= min_documents` and `df <= max_ratio * n`.
    /// The cap then keeps the terms with the highest corpus-wide count.
    /// Terms end up in lexical order.
    #[must_use]
    pub fn build(documents: &[Vec<String>], bounds: FrequencyBounds) -> Self {
        let mut doc_freq: HashMap<&str, usize> = HashMap::new();
        let mut total: HashMap<&str, usize> = HashMap::new();

        for doc in documents {
            let mut seen: Vec<&str> = doc.iter().map(String::as_str).collect();
            for term in &seen {
                *total.entry(*term).or_insert(0) += 1;
            }
            seen.sort_unstable();
            seen.dedup();
            for term in seen {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        let max_documents = bounds.max_ratio * documents.len() as f64;
        let mut kept: Vec<&str> = doc_freq
            .into_iter()
            .filter(|&(_, df)| df >= bounds.min_documents && df as f64 <= max_documents)
            .map(|(term, _)| term)
            .collect();

        if let Some(cap) = bounds.max_terms {
            if kept.len() > cap {
                kept.sort_unstable_by(|a, b| total[b].cmp(&total[a]).then_with(|| a.cmp(b)));
                kept.truncate(cap);
            }
        }

        kept.sort_unstable();
        Self::from_sorted(kept.into_iter().map(str::to_string).collect())
    }

    fn from_sorted(terms: Vec<String>) -> Self {
        let index = terms.iter().enumerate().map(|(i, t)| (t.clone(), i)).collect();
        Self { terms, index }
    }

    /// Position of `term`, if present.
    #[must_use]
    pub fn id(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }

    /// Term at position `id`.
    #[must_use]
    pub fn term(&self, id: usize) -> &str {
        &self.terms[id]
    }

    /// All terms in lexical order.
    #[must_use]
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Number of terms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// True when no term survived the bounds.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Sparse term counts of one document, restricted to the vocabulary.
    #[must_use]
    pub fn counts(&self, document: &[String]) -> Vec<(usize, usize)> {
        let mut counts: HashMap<usize, usize> = HashMap::new();
        for term in document {
            if let Some(id) = self.id(term) {
                *counts.entry(id).or_insert(0) += 1;
            }
        }
        let mut counts: Vec<_> = counts.into_iter().collect();
        counts.sort_unstable();
        counts
    }
}
