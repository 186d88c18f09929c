//! Paper and per-paper summary records as written by the fetch and summarize stages.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

/// A research paper from the fetch stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paper {
    /// Unique paper identifier (arXiv ID).
    pub id: String,

    /// Paper title.
    #[serde(default)]
    pub title: String,

    /// Paper abstract.
    #[serde(default)]
    pub r#abstract: String,

    /// Authors in byline order.
    #[serde(default)]
    pub authors: Vec<String>,

    /// Category tags (e.g., "cs.AI", "cs.CL").
    #[serde(default)]
    pub categories: Vec<String>,

    /// Primary category tag.
    #[serde(default)]
    pub primary_category: Option<String>,

    /// First publication timestamp, with the offset it was recorded in.
    #[serde(default)]
    pub published: Option<DateTime<FixedOffset>>,

    /// Last update timestamp.
    #[serde(default)]
    pub updated: Option<DateTime<FixedOffset>>,

    /// Direct PDF link.
    #[serde(default)]
    pub pdf_url: Option<String>,

    /// Abstract page link.
    #[serde(default)]
    pub entry_url: Option<String>,

    /// Author comment (page count, venue, ...).
    #[serde(default)]
    pub comment: Option<String>,

    /// Journal reference.
    #[serde(default)]
    pub journal_ref: Option<String>,

    /// Digital Object Identifier.
    #[serde(default)]
    pub doi: Option<String>,
}

impl Paper {
    /// Title and abstract joined by a space, the unit of text analysis.
    #[must_use]
    pub fn text(&self) -> String {
        format!("{} {}", self.title, self.r#abstract)
    }

    /// Calendar day of publication in the timestamp's own offset, if known.
    #[must_use]
    pub fn published_date(&self) -> Option<NaiveDate> {
        self.published.map(|ts| ts.date_naive())
    }

    /// Up to `n` category tags joined by commas.
    #[must_use]
    pub fn category_list(&self, n: usize) -> String {
        self.categories.iter().take(n).map(String::as_str).collect::<Vec<_>>().join(", ")
    }
}

/// A per-paper summary from the summarize stage.
///
/// Records are matched to papers by position; the remaining paper fields the
/// summarizer copies along are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperSummary {
    /// Summary body.
    #[serde(default)]
    pub summary: Option<SummaryContent>,
}

impl PaperSummary {
    /// Structured fields, when the summary has them.
    #[must_use]
    pub fn structured(&self) -> Option<&StructuredSummary> {
        match self.summary.as_ref()? {
            SummaryContent::Structured(s) => Some(s),
            SummaryContent::Text(_) => None,
        }
    }
}

/// Summary body: either structured fields or free Markdown text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SummaryContent {
    /// Structured summary with named fields.
    Structured(StructuredSummary),
    /// Free text summary.
    Text(String),
}

/// Structured summary fields used to enrich the narrative prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredSummary {
    /// Key innovation of the paper.
    #[serde(default)]
    pub key_innovation: String,

    /// Main method used.
    #[serde(default)]
    pub main_method: String,
}
