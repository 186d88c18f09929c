//! Analysis records produced by the engine.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::NarrativeSection;

/// A weighted unigram or bigram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    /// Surface form of the term.
    pub keyword: String,

    /// Mean TF-IDF weight (non-negative).
    pub score: f64,
}

/// One latent topic with its ranked terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    /// 1-based topic index.
    pub topic_id: usize,

    /// Terms, highest weight first.
    pub keywords: Vec<String>,

    /// Weights parallel to `keywords`.
    pub weights: Vec<f64>,
}

/// Counts in a fixed order, serialized as a JSON object.
///
/// Order is descending count; serde_json objects would otherwise sort keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankedCounts(pub Vec<(String, usize)>);

impl RankedCounts {
    /// Count recorded for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<usize> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, c)| *c)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate entries in rank order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(k, c)| (k.as_str(), *c))
    }

    /// Sum of all counts.
    #[must_use]
    pub fn total(&self) -> usize {
        self.0.iter().map(|(_, c)| c).sum()
    }
}

impl Serialize for RankedCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for RankedCounts {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RankedVisitor;

        impl<'de> Visitor<'de> for RankedVisitor {
            type Value = RankedCounts;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of term to count")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((k, v)) = access.next_entry::<String, usize>()? {
                    entries.push((k, v));
                }
                Ok(RankedCounts(entries))
            }
        }

        deserializer.deserialize_map(RankedVisitor)
    }
}

/// Corpus statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    /// Papers in the corpus.
    pub total_papers: usize,

    /// Distinct author names.
    pub total_authors: usize,

    /// Distinct category tags.
    pub total_categories: usize,

    /// Per-paper summaries supplied with the corpus.
    #[serde(default)]
    pub summarized_papers: usize,

    /// Top-K categories by paper count.
    pub category_distribution: RankedCounts,

    /// Top-K authors by paper count.
    pub top_authors: RankedCounts,

    /// Top-K title/abstract words.
    pub top_words: RankedCounts,

    /// Papers per publication day, chronological.
    pub time_distribution: BTreeMap<String, usize>,

    /// Every author with at least two papers.
    pub prolific_authors: RankedCounts,
}

/// Generated narrative split into labeled sections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Narrative {
    /// Current research hotspots.
    pub hotspots: String,

    /// Technical trends.
    pub trends: String,

    /// Future directions.
    pub future_directions: String,

    /// Research ideas.
    pub research_ideas: String,

    /// Raw provider response.
    #[serde(alias = "full_analysis")]
    pub full_text: String,
}

impl Narrative {
    /// Narrative with the same text in every section and no raw response.
    #[must_use]
    pub fn uniform(text: &str) -> Self {
        Self {
            hotspots: text.to_string(),
            trends: text.to_string(),
            future_directions: text.to_string(),
            research_ideas: text.to_string(),
            full_text: String::new(),
        }
    }

    /// Text of one section.
    #[must_use]
    pub fn section(&self, section: NarrativeSection) -> &str {
        match section {
            NarrativeSection::Hotspots => &self.hotspots,
            NarrativeSection::Trends => &self.trends,
            NarrativeSection::FutureDirections => &self.future_directions,
            NarrativeSection::ResearchIdeas => &self.research_ideas,
        }
    }

    /// Mutable text of one section.
    pub fn section_mut(&mut self, section: NarrativeSection) -> &mut String {
        match section {
            NarrativeSection::Hotspots => &mut self.hotspots,
            NarrativeSection::Trends => &mut self.trends,
            NarrativeSection::FutureDirections => &mut self.future_directions,
            NarrativeSection::ResearchIdeas => &mut self.research_ideas,
        }
    }
}

/// The complete result of one analysis run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Snapshot date (YYYY-MM-DD).
    pub date: String,

    /// Papers analyzed.
    pub paper_count: usize,

    /// Top TF-IDF keywords.
    pub keywords: Vec<Keyword>,

    /// Latent topics.
    pub topics: Vec<Topic>,

    /// Corpus statistics.
    pub statistics: Statistics,

    /// Generated narrative.
    #[serde(rename = "llm_analysis")]
    pub narrative: Narrative,

    /// Location of the word-frequency image.
    #[serde(default)]
    pub wordcloud_path: String,

    /// When the result was assembled.
    #[serde(default)]
    pub generated_at: Option<DateTime<Utc>>,
}

impl AnalysisReport {
    /// True for the placeholder result returned on empty input.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paper_count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranked_counts_preserve_order() {
        let counts = RankedCounts(vec![("zeta".into(), 5), ("alpha".into(), 2)]);
        let json = serde_json::to_string(&counts).unwrap();
        assert_eq!(json, r#"{"zeta":5,"alpha":2}"#);

        let back: RankedCounts = serde_json::from_str(&json).unwrap();
        assert_eq!(back, counts);
        assert_eq!(back.get("alpha"), Some(2));
        assert_eq!(back.total(), 7);
    }

    #[test]
    fn test_narrative_accepts_legacy_field() {
        let json = serde_json::json!({
            "hotspots": "h",
            "trends": "t",
            "future_directions": "f",
            "research_ideas": "r",
            "full_analysis": "everything"
        });
        let narrative: Narrative = serde_json::from_value(json).unwrap();
        assert_eq!(narrative.full_text, "everything");
        assert_eq!(narrative.section(NarrativeSection::Trends), "t");
    }

    #[test]
    fn test_uniform_narrative() {
        let narrative = Narrative::uniform("n/a");
        for section in NarrativeSection::ALL {
            assert_eq!(narrative.section(section), "n/a");
        }
        assert!(narrative.full_text.is_empty());
    }
}
