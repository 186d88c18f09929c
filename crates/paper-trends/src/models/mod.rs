//! Data models for papers, summaries and analysis results.
//!
//! Input models use `#[serde(default)]` for optional fields and keep the
//! snake_case field names the fetch and summarize stages write.

mod analysis;
mod enums;
mod paper;

pub use analysis::{AnalysisReport, Keyword, Narrative, RankedCounts, Statistics, Topic};
pub use enums::{NarrativeSection, Provider};
pub use paper::{Paper, PaperSummary, StructuredSummary, SummaryContent};
