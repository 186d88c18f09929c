//! Output formatters for analysis results.

mod json;
mod markdown;
mod svg;

pub use json::compact_report;
pub use markdown::{format_report_markdown, format_run_summary};
pub use svg::render_word_cloud;
