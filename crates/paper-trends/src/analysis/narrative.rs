//! Trend narrative: prompt construction, the provider call and section parsing.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::llm::TextGenerator;
use crate::models::{Keyword, Narrative, NarrativeSection, Paper, PaperSummary, Topic};

/// Section text used when no provider is configured.
pub const PLACEHOLDER: &str = "LLM client required";

/// Prefix of the section text used when the provider call fails.
pub const FAILURE_PREFIX: &str = "Generation failed";

/// Limits applied while building the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptOptions {
    /// Papers listed.
    pub max_papers: usize,
    /// Keywords listed.
    pub max_keywords: usize,
    /// Terms listed per topic.
    pub terms_per_topic: usize,
    /// Language the response is requested in.
    pub language: String,
    /// Output token budget.
    pub max_tokens: u32,
}

impl Default for PromptOptions {
    fn default() -> Self {
        use crate::config::defaults;
        Self {
            max_papers: defaults::PROMPT_PAPERS,
            max_keywords: defaults::PROMPT_KEYWORDS,
            terms_per_topic: defaults::PROMPT_TOPIC_TERMS,
            language: defaults::RESPONSE_LANGUAGE.to_string(),
            max_tokens: defaults::NARRATIVE_MAX_TOKENS,
        }
    }
}

/// Produces the four-section narrative from corpus artifacts.
#[derive(Clone, Default)]
pub struct NarrativeSynthesizer {
    generator: Option<Arc<dyn TextGenerator>>,
    options: PromptOptions,
}

impl NarrativeSynthesizer {
    /// Create a synthesizer; without a generator it runs in degraded mode.
    #[must_use]
    pub fn new(generator: Option<Arc<dyn TextGenerator>>, options: PromptOptions) -> Self {
        Self { generator, options }
    }

    /// True when a provider is attached.
    #[must_use]
    pub fn has_generator(&self) -> bool {
        self.generator.is_some()
    }

    /// Build the prompt and call the provider.
    ///
    /// Never fails: a missing provider yields [`PLACEHOLDER`] sections and an
    /// empty `full_text`; a provider error yields failure text in each section.
    pub async fn synthesize(
        &self,
        papers: &[Paper],
        summaries: Option<&[PaperSummary]>,
        keywords: &[Keyword],
        topics: &[Topic],
    ) -> Narrative {
        let Some(generator) = &self.generator else {
            warn!("No LLM client configured, skipping narrative");
            return Narrative::uniform(PLACEHOLDER);
        };

        let prompt = build_prompt(papers, summaries, keywords, topics, &self.options);
        info!(
            provider = %generator.provider(),
            model = generator.model(),
            prompt_chars = prompt.chars().count(),
            "Generating trend narrative"
        );

        match generator.generate(&prompt, None, Some(self.options.max_tokens)).await {
            Ok(response) => {
                let narrative = parse_response(&response);
                let found = NarrativeSection::ALL
                    .iter()
                    .filter(|s| !narrative.section(**s).is_empty())
                    .count();
                info!(sections = found, chars = response.chars().count(), "Narrative generated");
                narrative
            }
            Err(e) => {
                error!(error = %e, "Narrative generation failed");
                Narrative::uniform(&format!("{FAILURE_PREFIX}: {e}"))
            }
        }
    }
}

impl std::fmt::Debug for NarrativeSynthesizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NarrativeSynthesizer")
            .field("provider", &self.generator.as_ref().map(|g| g.provider()))
            .field("options", &self.options)
            .finish()
    }
}

/// Build the analysis prompt.
///
/// Deterministic for identical inputs. Summaries are matched to papers by
/// position and only structured summaries add detail.
#[must_use]
pub fn build_prompt(
    papers: &[Paper],
    summaries: Option<&[PaperSummary]>,
    keywords: &[Keyword],
    topics: &[Topic],
    options: &PromptOptions,
) -> String {
    let listed = papers.len().min(options.max_papers);

    let paper_lines: Vec<String> = papers
        .iter()
        .take(options.max_papers)
        .enumerate()
        .map(|(i, paper)| {
            let mut entry =
                format!("{}. {}\n  Categories: {}", i + 1, paper.title, paper.category_list(3));
            if let Some(s) = summaries.and_then(|s| s.get(i)).and_then(PaperSummary::structured) {
                entry.push_str(&format!(
                    "\n  Key innovation: {}\n  Main method: {}",
                    s.key_innovation, s.main_method
                ));
            }
            entry
        })
        .collect();

    let keyword_line = keywords
        .iter()
        .take(options.max_keywords)
        .map(|k| k.keyword.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let topic_lines: Vec<String> = topics
        .iter()
        .map(|t| {
            let terms: Vec<&str> =
                t.keywords.iter().take(options.terms_per_topic).map(String::as_str).collect();
            format!("Topic {}: {}", t.topic_id, terms.join(", "))
        })
        .collect();

    format!(
        "As a senior AI research expert, analyze the following {count} recent arXiv papers in depth.

## Papers (first {listed}):
{papers}

## Frequent keywords:
{keywords}

## Main research topics:
{topics}

Structure your analysis as follows (answer in {language}):

### 1. Current Research Hotspots
Identify the 3-5 most active research directions in this field and explain why they attract attention.

### 2. Technical Trends
Identify how the techniques are developing, including:
- mainstream methods and architectures
- emerging techniques
- the evolution path visible in the papers

### 3. Future Directions
Predict likely research directions for the next 6-12 months, including:
- natural extensions of current hotspots
- promising directions that remain underexplored
- possible technical breakthroughs

### 4. Research Ideas & Innovation Points
Propose 5-8 novel and feasible research ideas. For each idea give:
- the core innovation
- why it is valuable
- a possible implementation path
- potential applications

Make sure the analysis:
- is grounded in the listed papers
- offers depth and insight
- gives actionable research directions
- emphasizes novelty and foresight

Format the answer as Markdown with clear headings and lists.",
        count = papers.len(),
        listed = listed,
        papers = paper_lines.join("\n"),
        keywords = keyword_line,
        topics = topic_lines.join("\n"),
        language = options.language,
    )
}

/// Split a provider response into narrative sections.
///
/// Walks the response line by line. A line containing a section trigger
/// (see [`NarrativeSection::detect`]) closes the open section and starts a
/// new one with that line; other lines extend the open section and are
/// dropped while none is open. A section seen twice keeps its last text.
/// `full_text` is always the unmodified response.
#[must_use]
pub fn parse_response(response: &str) -> Narrative {
    let mut narrative = Narrative { full_text: response.to_string(), ..Narrative::default() };
    let mut current: Option<NarrativeSection> = None;
    let mut buffer: Vec<&str> = Vec::new();

    for line in response.split('\n') {
        if let Some(section) = NarrativeSection::detect(line) {
            if let Some(open) = current {
                *narrative.section_mut(open) = buffer.join("\n").trim().to_string();
            }
            current = Some(section);
            buffer.clear();
            buffer.push(line);
        } else if current.is_some() {
            buffer.push(line);
        }
    }

    if let Some(open) = current {
        *narrative.section_mut(open) = buffer.join("\n").trim().to_string();
    }
    narrative
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{StructuredSummary, SummaryContent};

    fn paper(i: usize) -> Paper {
        Paper {
            id: format!("p{i}"),
            title: format!("Paper {i}"),
            categories: vec!["cs.AI".into(), "cs.LG".into(), "cs.CL".into(), "stat.ML".into()],
            ..Default::default()
        }
    }

    #[test]
    fn test_prompt_limits_papers_and_categories() {
        let papers: Vec<Paper> = (1..=40).map(paper).collect();
        let prompt = build_prompt(&papers, None, &[], &[], &PromptOptions::default());
        assert!(prompt.contains("following 40 recent arXiv papers"));
        assert!(prompt.contains("30. Paper 30"));
        assert!(!prompt.contains("31. Paper 31"));
        assert!(prompt.contains("Categories: cs.AI, cs.LG, cs.CL\n"));
        assert!(!prompt.contains("stat.ML"));
    }

    #[test]
    fn test_prompt_includes_structured_summary() {
        let papers = vec![paper(1), paper(2)];
        let summaries = vec![
            PaperSummary {
                summary: Some(SummaryContent::Structured(StructuredSummary {
                    key_innovation: "sparse routing".into(),
                    main_method: "mixture of experts".into(),
                })),
            },
            PaperSummary { summary: Some(SummaryContent::Text("free text".into())) },
        ];
        let prompt =
            build_prompt(&papers, Some(&summaries), &[], &[], &PromptOptions::default());
        assert!(prompt.contains("Key innovation: sparse routing"));
        assert!(prompt.contains("Main method: mixture of experts"));
        assert!(!prompt.contains("free text"));
    }

    #[test]
    fn test_prompt_lists_keywords_and_topic_terms() {
        let keywords: Vec<Keyword> =
            (0..35).map(|i| Keyword { keyword: format!("kw{i}"), score: 1.0 }).collect();
        let topics = vec![Topic {
            topic_id: 1,
            keywords: (0..10).map(|i| format!("t{i}")).collect(),
            weights: vec![1.0; 10],
        }];
        let prompt = build_prompt(&[paper(1)], None, &keywords, &topics, &PromptOptions::default());
        assert!(prompt.contains("kw0, kw1"));
        assert!(prompt.contains("kw29"));
        assert!(!prompt.contains("kw30"));
        assert!(prompt.contains("Topic 1: t0, t1, t2, t3, t4, t5, t6, t7\n"));
    }

    #[test]
    fn test_parse_well_formed_response() {
        let response = "Intro line that is dropped\n\
                        ### 1. Current Research Hotspots\n- agents\n\
                        ### 2. Technical Trends\n- scaling\n\
                        ### 3. Future Directions\n- robotics\n\
                        ### 4. Research Ideas & Innovation Points\n- benchmark";
        let narrative = parse_response(response);
        assert_eq!(narrative.hotspots, "### 1. Current Research Hotspots\n- agents");
        assert_eq!(narrative.trends, "### 2. Technical Trends\n- scaling");
        assert_eq!(narrative.future_directions, "### 3. Future Directions\n- robotics");
        assert_eq!(narrative.research_ideas, "### 4. Research Ideas & Innovation Points\n- benchmark");
        assert_eq!(narrative.full_text, response);
    }

    #[test]
    fn test_parse_without_headings() {
        let narrative = parse_response("nothing recognizable here\nat all");
        for section in NarrativeSection::ALL {
            assert!(narrative.section(section).is_empty());
        }
        assert_eq!(narrative.full_text, "nothing recognizable here\nat all");
    }

    #[test]
    fn test_parse_mixed_language_headings() {
        let narrative = parse_response("## 研究热点\n内容\n## 未来发展方向\n更多内容");
        assert_eq!(narrative.hotspots, "## 研究热点\n内容");
        assert_eq!(narrative.future_directions, "## 未来发展方向\n更多内容");
    }

    #[tokio::test]
    async fn test_no_generator_gives_placeholders() {
        let narrative =
            NarrativeSynthesizer::default().synthesize(&[paper(1)], None, &[], &[]).await;
        assert_eq!(narrative, Narrative::uniform(PLACEHOLDER));
        assert!(narrative.full_text.is_empty());
    }
}
