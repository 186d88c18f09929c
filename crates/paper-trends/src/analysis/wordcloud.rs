//! Word-frequency table behind the word-cloud image.

use std::collections::HashMap;

use crate::models::{Paper, RankedCounts};
use crate::text::Tokenizer;

/// Most frequent corpus words, stop words and bare numbers removed.
///
/// Ties are broken alphabetically so the image is stable across runs.
#[must_use]
pub fn word_frequencies(papers: &[Paper], tokenizer: &Tokenizer, limit: usize) -> RankedCounts {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for paper in papers {
        for token in tokenizer.tokenize(&paper.text()) {
            if token.chars().all(|c| c.is_ascii_digit()) {
                continue;
            }
            *counts.entry(token).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(limit);
    RankedCounts(ranked)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_exclude_numbers_and_stop_words() {
        let papers = vec![
            Paper {
                title: "Graph networks in 2024".into(),
                r#abstract: "We study graph pooling.".into(),
                ..Default::default()
            },
            Paper { title: "Pooling graph".into(), ..Default::default() },
        ];
        let table = word_frequencies(&papers, &Tokenizer::default(), 10);

        assert_eq!(table.0[0], ("graph".to_string(), 3));
        assert_eq!(table.get("pooling"), Some(2));
        assert_eq!(table.get("2024"), None);
        assert_eq!(table.get("we"), None);
    }

    #[test]
    fn test_limit_applies() {
        let papers = vec![Paper { title: "alpha beta gamma delta".into(), ..Default::default() }];
        let table = word_frequencies(&papers, &Tokenizer::default(), 2);
        assert_eq!(table.len(), 2);
        assert_eq!(table.0[0].0, "alpha");
    }
}
