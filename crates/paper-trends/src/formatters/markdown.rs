//! Markdown output formatting.

use std::borrow::Cow;

use crate::models::{AnalysisReport, NarrativeSection};

/// Keywords listed in the report.
const REPORT_KEYWORDS: usize = 20;

/// Shown for an empty narrative section.
const NOT_GENERATED: &str = "_Not generated._";

/// Render the full analysis report.
#[must_use]
pub fn format_report_markdown(report: &AnalysisReport) -> String {
    let stats = &report.statistics;
    let mut output = format!("# Research Trend Report: {}\n\n", report.date);

    // Header
    let mut meta = vec![format!("**Papers analyzed**: {}", report.paper_count)];
    if let Some(at) = report.generated_at {
        meta.push(format!("**Generated**: {}", at.format("%Y-%m-%d %H:%M UTC")));
    }
    output.push_str(&format!("{}\n\n", meta.join(" | ")));

    // Statistics overview
    output.push_str("## Statistics\n\n");
    output.push_str("| Metric | Value |\n|---|---|\n");
    output.push_str(&format!("| Papers | {} |\n", stats.total_papers));
    output.push_str(&format!("| Authors | {} |\n", stats.total_authors));
    output.push_str(&format!("| Categories | {} |\n", stats.total_categories));
    if stats.summarized_papers > 0 {
        output.push_str(&format!("| Summarized papers | {} |\n", stats.summarized_papers));
    }
    output.push('\n');

    if !stats.category_distribution.is_empty() {
        output.push_str("### Top Categories\n\n| Category | Papers |\n|---|---|\n");
        for (category, count) in stats.category_distribution.iter() {
            output.push_str(&format!("| {category} | {count} |\n"));
        }
        output.push('\n');
    }

    // Keywords
    output.push_str("## Top Keywords\n\n");
    if report.keywords.is_empty() {
        output.push_str("No keywords extracted.\n\n");
    } else {
        for (i, kw) in report.keywords.iter().take(REPORT_KEYWORDS).enumerate() {
            output.push_str(&format!("{}. **{}** ({:.4})\n", i + 1, kw.keyword, kw.score));
        }
        output.push('\n');
    }

    if !report.wordcloud_path.is_empty() {
        output.push_str(&format!("![Word cloud]({})\n\n", file_name(&report.wordcloud_path)));
    }

    // Narrative, fixed order
    for section in NarrativeSection::ALL {
        let text = report.narrative.section(section);
        let body = if text.trim().is_empty() { NOT_GENERATED } else { text };
        output.push_str(&format!("## {}\n\n{body}\n\n", section.title()));
    }

    output.push_str("---\n\n*Generated by paper-trends*\n");
    output
}

/// Plain-text run summary written to the log after each analysis.
#[must_use]
pub fn format_run_summary(report: &AnalysisReport, report_location: Option<&str>) -> String {
    let stats = &report.statistics;
    let mut output = format!(
        "Analysis {}: {} papers, {} authors, {} categories\n",
        report.date, stats.total_papers, stats.total_authors, stats.total_categories
    );

    let keywords: Vec<&str> = report.keywords.iter().take(15).map(|k| k.keyword.as_str()).collect();
    output.push_str(&format!("Top keywords: {}\n", keywords.join(", ")));

    let categories: Vec<String> = stats
        .category_distribution
        .iter()
        .take(8)
        .map(|(c, n)| format!("{c} ({n})"))
        .collect();
    output.push_str(&format!("Top categories: {}\n", categories.join(", ")));

    let preview = preview(&report.narrative.full_text, 500);
    if !preview.is_empty() {
        output.push_str(&format!("Narrative preview: {preview}\n"));
    }

    if let Some(location) = report_location {
        output.push_str(&format!("Report: {location}\n"));
    }
    output
}

/// At most `max_chars` characters, with an ellipsis when cut.
fn preview(text: &str, max_chars: usize) -> Cow<'_, str> {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => Cow::Owned(format!("{}...", &text[..idx])),
        None => Cow::Borrowed(text),
    }
}

/// Reports sit next to the image, so a relative link is enough.
fn file_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}
