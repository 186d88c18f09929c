//! SVG word-frequency image.
//!
//! Words are laid out left to right in rows, largest first, with font size
//! scaled linearly between [`MIN_FONT`] and [`MAX_FONT`] by frequency.

use quick_xml::escape::escape;

use crate::models::RankedCounts;

const WIDTH: f64 = 800.0;
const MIN_FONT: f64 = 12.0;
const MAX_FONT: f64 = 64.0;
const PADDING: f64 = 10.0;
/// Average glyph width relative to font size.
const GLYPH_RATIO: f64 = 0.6;

const PALETTE: [&str; 6] = ["#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b"];

struct Placed<'a> {
    word: &'a str,
    x: f64,
    baseline: f64,
    size: f64,
}

/// Render `frequencies` (highest first) as a standalone SVG document.
#[must_use]
pub fn render_word_cloud(frequencies: &RankedCounts) -> String {
    let max = frequencies.iter().map(|(_, c)| c).max().unwrap_or(0);
    let min = frequencies.iter().map(|(_, c)| c).min().unwrap_or(0);

    let mut placed = Vec::with_capacity(frequencies.len());
    let (mut x, mut row_top, mut row_height) = (PADDING, PADDING, 0.0_f64);

    for (word, count) in frequencies.iter() {
        let size = font_size(count, min, max);
        let width = word.chars().count() as f64 * size * GLYPH_RATIO;
        if x + width > WIDTH - PADDING && x > PADDING {
            row_top += row_height + PADDING;
            x = PADDING;
            row_height = 0.0;
        }
        row_height = row_height.max(size);
        placed.push(Placed { word, x, baseline: row_top + size, size });
        x += width + PADDING;
    }

    let height = (row_top + row_height + PADDING).max(2.0 * PADDING);
    let mut svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{WIDTH}\" height=\"{height}\" \
         viewBox=\"0 0 {WIDTH} {height}\">\n\
         <rect width=\"100%\" height=\"100%\" fill=\"white\"/>\n"
    );
    for (i, p) in placed.iter().enumerate() {
        svg.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" font-family=\"sans-serif\" font-size=\"{:.1}\" fill=\"{}\">{}</text>\n",
            p.x,
            p.baseline,
            p.size,
            PALETTE[i % PALETTE.len()],
            escape(p.word)
        ));
    }
    svg.push_str("</svg>\n");
    svg
}

fn font_size(count: usize, min: usize, max: usize) -> f64 {
    if max == min {
        return MAX_FONT;
    }
    MIN_FONT + (MAX_FONT - MIN_FONT) * (count - min) as f64 / (max - min) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_table_renders_blank_canvas() {
        let svg = render_word_cloud(&RankedCounts::default());
        assert!(svg.starts_with("<svg"));
        assert!(!svg.contains("<text"));
    }

    #[test]
    fn test_sizes_follow_frequency() {
        let counts = RankedCounts(vec![("transformer".into(), 10), ("graph".into(), 1)]);
        let svg = render_word_cloud(&counts);
        assert!(svg.contains("font-size=\"64.0\" fill=\"#1f77b4\">transformer<"));
        assert!(svg.contains("font-size=\"12.0\" fill=\"#ff7f0e\">graph<"));
    }

    #[test]
    fn test_words_are_escaped() {
        let svg = render_word_cloud(&RankedCounts(vec![("a<b".into(), 2), ("r&d".into(), 1)]));
        assert!(svg.contains(">a&lt;b<"));
        assert!(svg.contains(">r&amp;d<"));
    }
}
