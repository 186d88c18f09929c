//! TF-IDF keyword extraction over unigrams and bigrams.

use tracing::{debug, info};

use crate::models::{Keyword, Paper};
use crate::text::{FrequencyBounds, Tokenizer, Vocabulary};

/// Ranks corpus terms by mean TF-IDF weight.
#[derive(Debug, Clone)]
pub struct KeywordExtractor {
    tokenizer: Tokenizer,
    bounds: FrequencyBounds,
}

impl KeywordExtractor {
    /// Create an extractor with the given tokenizer and document-frequency bounds.
    #[must_use]
    pub fn new(tokenizer: Tokenizer, min_documents: usize, max_ratio: f64) -> Self {
        Self { tokenizer, bounds: FrequencyBounds { min_documents, max_ratio, max_terms: None } }
    }

    /// Up to `top_n` keywords, highest mean weight first.
    ///
    /// Weights use raw term counts, smoothed idf `ln((1 + n) / (1 + df)) + 1`
    /// and per-document L2 normalization; the mean runs over every document.
    /// Corpora too small for the document-frequency bounds yield fewer
    /// keywords, possibly none.
    #[must_use]
    pub fn extract(&self, papers: &[Paper], top_n: usize) -> Vec<Keyword> {
        if papers.is_empty() || top_n == 0 {
            return Vec::new();
        }

        let documents: Vec<Vec<String>> =
            papers.iter().map(|p| self.tokenizer.unigrams_and_bigrams(&p.text())).collect();
        let vocab = Vocabulary::build(&documents, self.bounds);
        if vocab.is_empty() {
            debug!(papers = papers.len(), "No terms survive document-frequency bounds");
            return Vec::new();
        }

        let n = documents.len() as f64;
        let counts: Vec<Vec<(usize, usize)>> = documents.iter().map(|d| vocab.counts(d)).collect();

        let mut doc_freq = vec![0usize; vocab.len()];
        for doc in &counts {
            for &(id, _) in doc {
                doc_freq[id] += 1;
            }
        }
        let idf: Vec<f64> =
            doc_freq.iter().map(|&df| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0).collect();

        let mut sums = vec![0.0f64; vocab.len()];
        for doc in &counts {
            let weights: Vec<(usize, f64)> =
                doc.iter().map(|&(id, tf)| (id, tf as f64 * idf[id])).collect();
            let norm = weights.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
            if norm == 0.0 {
                continue;
            }
            for (id, w) in weights {
                sums[id] += w / norm;
            }
        }

        let mut keywords: Vec<Keyword> = sums
            .into_iter()
            .enumerate()
            .map(|(id, sum)| Keyword { keyword: vocab.term(id).to_string(), score: sum / n })
            .collect();
        keywords.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.keyword.cmp(&b.keyword)));
        keywords.truncate(top_n);

        info!(
            count = keywords.len(),
            top = %keywords.iter().take(10).map(|k| k.keyword.as_str()).collect::<Vec<_>>().join(", "),
            "Extracted keywords"
        );
        keywords
    }
}

impl Default for KeywordExtractor {
    fn default() -> Self {
        use crate::config::defaults;
        Self::new(
            Tokenizer::default(),
            defaults::MIN_DOCUMENT_FREQUENCY,
            defaults::MAX_DOCUMENT_RATIO,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paper(title: &str, abstract_: &str) -> Paper {
        Paper {
            id: title.to_string(),
            title: title.to_string(),
            r#abstract: abstract_.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_single_paper_returns_empty() {
        let keywords = KeywordExtractor::default()
            .extract(&[paper("Graph networks", "Graph networks for molecules.")], 10);
        assert!(keywords.is_empty());
    }

    #[test]
    fn test_shared_terms_rank_and_sort() {
        let papers = vec![
            paper("Graph neural networks", "Message passing on molecules."),
            paper("Graph neural networks at scale", "Sampling for large graphs."),
            paper("Protein folding", "Structure prediction with attention."),
            paper("Protein design", "Attention over residues."),
            paper("Speech recognition", "Streaming decoders."),
        ];
        let keywords = KeywordExtractor::default().extract(&papers, 50);

        let terms: Vec<&str> = keywords.iter().map(|k| k.keyword.as_str()).collect();
        assert!(terms.contains(&"graph neural"));
        assert!(terms.contains(&"protein"));
        assert!(terms.contains(&"attention"));
        assert!(!terms.contains(&"speech"));
        assert!(keywords.windows(2).all(|w| w[0].score >= w[1].score));
        assert!(keywords.iter().all(|k| k.score >= 0.0));
    }

    #[test]
    fn test_truncates_to_top_n() {
        let papers = vec![
            paper("alpha beta gamma", "delta epsilon"),
            paper("alpha beta gamma", "delta epsilon"),
            paper("zeta eta", "theta iota"),
        ];
        let keywords = KeywordExtractor::default().extract(&papers, 3);
        assert_eq!(keywords.len(), 3);
    }
}
