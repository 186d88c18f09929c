//! Compact JSON summaries of an analysis.

use serde_json::{Value, json};

use crate::models::{AnalysisReport, NarrativeSection, Topic};

/// Condensed view of a report for terminal or pipeline output.
///
/// Carries the counts, the top 15 keywords, every topic's first five terms
/// and which narrative sections were produced, but no narrative text.
#[must_use]
pub fn compact_report(report: &AnalysisReport) -> Value {
    let stats = &report.statistics;
    let sections: Vec<&str> = NarrativeSection::ALL
        .iter()
        .filter(|s| !report.narrative.section(**s).trim().is_empty())
        .map(|s| s.key())
        .collect();

    let mut obj = json!({
        "date": report.date,
        "papers": report.paper_count,
        "authors": stats.total_authors,
        "categories": stats.total_categories,
        "keywords": report.keywords.iter().take(15).map(|k| &k.keyword).collect::<Vec<_>>(),
        "topics": report.topics.iter().map(compact_topic).collect::<Vec<_>>(),
        "sections": sections,
    });

    if !report.wordcloud_path.is_empty() {
        obj["wordcloud"] = json!(report.wordcloud_path);
    }

    obj
}

fn compact_topic(topic: &Topic) -> Value {
    json!({
        "id": topic.topic_id,
        "terms": topic.keywords.iter().take(5).collect::<Vec<_>>(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Keyword, Narrative};

    #[test]
    fn test_compact_report_lists_produced_sections() {
        let report = AnalysisReport {
            date: "2024-03-01".into(),
            paper_count: 2,
            keywords: vec![Keyword { keyword: "agents".into(), score: 0.3 }],
            topics: vec![Topic {
                topic_id: 1,
                keywords: (0..8).map(|i| format!("t{i}")).collect(),
                weights: vec![1.0; 8],
            }],
            narrative: Narrative { trends: "something".into(), ..Narrative::default() },
            ..AnalysisReport::default()
        };

        let value = compact_report(&report);
        assert_eq!(value["papers"], 2);
        assert_eq!(value["keywords"][0], "agents");
        assert_eq!(value["topics"][0]["terms"].as_array().unwrap().len(), 5);
        assert_eq!(value["sections"], json!(["trends"]));
        assert!(value.get("wordcloud").is_none());
    }
}
