//! Category, author, word and date distributions.

use std::collections::{BTreeMap, HashMap};

use crate::models::{Paper, PaperSummary, RankedCounts, Statistics};
use crate::text::{StopWords, clean_word};

/// Top-K limits for the truncated views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatisticsLimits {
    /// Categories kept.
    pub categories: usize,
    /// Authors kept.
    pub authors: usize,
    /// Words kept.
    pub words: usize,
    /// Minimum count for a prolific author.
    pub prolific_threshold: usize,
}

impl Default for StatisticsLimits {
    fn default() -> Self {
        use crate::config::defaults;
        Self {
            categories: defaults::TOP_CATEGORIES,
            authors: defaults::TOP_AUTHORS,
            words: defaults::TOP_WORDS,
            prolific_threshold: defaults::PROLIFIC_THRESHOLD,
        }
    }
}

/// Counter that remembers first-seen order for stable tie-breaking.
#[derive(Default)]
struct Tally {
    counts: HashMap<String, (usize, usize)>,
}

impl Tally {
    fn add(&mut self, key: &str) {
        let next = self.counts.len();
        self.counts.entry(key.to_string()).or_insert((0, next)).0 += 1;
    }

    fn len(&self) -> usize {
        self.counts.len()
    }

    /// Entries by descending count, ties in first-seen order.
    fn ranked(&self) -> Vec<(String, usize)> {
        let mut entries: Vec<(&String, &(usize, usize))> = self.counts.iter().collect();
        entries.sort_by(|a, b| b.1.0.cmp(&a.1.0).then_with(|| a.1.1.cmp(&b.1.1)));
        entries.into_iter().map(|(k, &(c, _))| (k.clone(), c)).collect()
    }

    fn top(&self, n: usize) -> RankedCounts {
        let mut ranked = self.ranked();
        ranked.truncate(n);
        RankedCounts(ranked)
    }

    fn at_least(&self, threshold: usize) -> RankedCounts {
        RankedCounts(self.ranked().into_iter().filter(|&(_, c)| c >= threshold).collect())
    }
}

/// Aggregates corpus statistics in a single pass.
#[derive(Debug, Clone, Default)]
pub struct StatisticsAggregator {
    stop_words: StopWords,
    limits: StatisticsLimits,
}

impl StatisticsAggregator {
    /// Create an aggregator.
    #[must_use]
    pub fn new(stop_words: StopWords, limits: StatisticsLimits) -> Self {
        Self { stop_words, limits }
    }

    /// Compute statistics; `summaries` only contributes its length.
    #[must_use]
    pub fn aggregate(&self, papers: &[Paper], summaries: Option<&[PaperSummary]>) -> Statistics {
        let mut categories = Tally::default();
        let mut authors = Tally::default();
        let mut words = Tally::default();
        let mut days: BTreeMap<String, usize> = BTreeMap::new();

        for paper in papers {
            for category in &paper.categories {
                categories.add(category);
            }
            for author in &paper.authors {
                authors.add(author);
            }
            for raw in paper.title.split_whitespace().chain(paper.r#abstract.split_whitespace()) {
                let word = clean_word(raw);
                if word.chars().count() > 3 && !self.stop_words.contains(&word) {
                    words.add(&word);
                }
            }
            if let Some(day) = paper.published_date() {
                *days.entry(day.format("%Y-%m-%d").to_string()).or_insert(0) += 1;
            }
        }

        Statistics {
            total_papers: papers.len(),
            total_authors: authors.len(),
            total_categories: categories.len(),
            summarized_papers: summaries.map_or(0, <[PaperSummary]>::len),
            category_distribution: categories.top(self.limits.categories),
            top_authors: authors.top(self.limits.authors),
            top_words: words.top(self.limits.words),
            time_distribution: days,
            prolific_authors: authors.at_least(self.limits.prolific_threshold),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone, Utc};

    use super::*;

    fn paper(categories: &[&str], authors: &[&str], day: Option<u32>) -> Paper {
        Paper {
            id: "x".to_string(),
            title: "Efficient transformers".to_string(),
            r#abstract: "Efficient attention, revisited!".to_string(),
            categories: categories.iter().map(|c| (*c).to_string()).collect(),
            authors: authors.iter().map(|a| (*a).to_string()).collect(),
            published: day
                .map(|d| Utc.with_ymd_and_hms(2024, 3, d, 12, 0, 0).unwrap().fixed_offset()),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_corpus_is_all_zero() {
        let stats = StatisticsAggregator::default().aggregate(&[], None);
        assert_eq!(stats, Statistics::default());
    }

    #[test]
    fn test_single_category_corpus() {
        let papers = vec![
            paper(&["X"], &["A"], Some(1)),
            paper(&["X"], &["B"], Some(1)),
            paper(&["X"], &["A"], Some(2)),
        ];
        let stats = StatisticsAggregator::default().aggregate(&papers, None);
        assert_eq!(stats.total_categories, 1);
        assert_eq!(stats.category_distribution, RankedCounts(vec![("X".into(), 3)]));
        assert_eq!(stats.total_authors, 2);
        assert_eq!(stats.prolific_authors, RankedCounts(vec![("A".into(), 2)]));
        assert_eq!(stats.time_distribution.get("2024-03-01"), Some(&2));
        assert_eq!(stats.time_distribution.keys().cloned().collect::<Vec<_>>(), vec!["2024-03-01", "2024-03-02"]);
    }

    #[test]
    fn test_days_bucket_in_record_offset() {
        let eastern = FixedOffset::west_opt(5 * 3600).unwrap();
        let late_evening = Paper {
            published: Some(eastern.with_ymd_and_hms(2024, 3, 1, 23, 30, 0).unwrap()),
            ..paper(&["X"], &["A"], None)
        };
        let stats = StatisticsAggregator::default().aggregate(&[late_evening], None);

        assert_eq!(stats.time_distribution.get("2024-03-01"), Some(&1));
        assert_eq!(stats.time_distribution.len(), 1);
    }

    #[test]
    fn test_word_counts_strip_punctuation() {
        let stats = StatisticsAggregator::default().aggregate(&[paper(&[], &[], None)], None);
        assert_eq!(stats.top_words.get("efficient"), Some(2));
        assert_eq!(stats.top_words.get("attention"), Some(1));
        assert_eq!(stats.top_words.get("revisited"), Some(1));
        assert!(stats.time_distribution.is_empty());
    }

    #[test]
    fn test_summaries_only_counted() {
        let summaries = vec![PaperSummary::default(), PaperSummary::default()];
        let stats =
            StatisticsAggregator::default().aggregate(&[paper(&["X"], &[], None)], Some(&summaries));
        assert_eq!(stats.summarized_papers, 2);
    }

    #[test]
    fn test_top_k_truncates_but_prolific_does_not() {
        let limits = StatisticsLimits { authors: 1, ..StatisticsLimits::default() };
        let papers = vec![paper(&["X"], &["A", "B"], None), paper(&["Y"], &["A", "B"], None)];
        let stats = StatisticsAggregator::new(StopWords::new(), limits).aggregate(&papers, None);
        assert_eq!(stats.top_authors.len(), 1);
        assert_eq!(stats.top_authors.get("A"), Some(2));
        assert_eq!(stats.prolific_authors.len(), 2);
    }
}
