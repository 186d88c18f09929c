//! Corpus analysis pipeline.
//!
//! [`TrendAnalyzer`] runs the keyword extractor, the topic model and the
//! statistics aggregator over a paper snapshot, asks the narrative
//! synthesizer for the written analysis, then persists the combined
//! [`AnalysisReport`], a Markdown report and a word-frequency image through
//! an [`ArtifactStore`].

mod keywords;
mod narrative;
mod statistics;
mod topics;
mod wordcloud;

use std::sync::Arc;

use chrono::{DateTime, Local, Utc};
use tracing::{Instrument, info, info_span, warn};

pub use keywords::KeywordExtractor;
pub use narrative::{
    FAILURE_PREFIX, NarrativeSynthesizer, PLACEHOLDER, PromptOptions, build_prompt, parse_response,
};
pub use statistics::{StatisticsAggregator, StatisticsLimits};
pub use topics::{TopicModeler, TopicParams};
pub use wordcloud::word_frequencies;

use crate::config::{AnalysisConfig, Config};
use crate::error::{EngineResult, StoreResult};
use crate::formatters::{format_report_markdown, format_run_summary, render_word_cloud};
use crate::llm::{TextGenerator, create_generator};
use crate::models::{AnalysisReport, Paper, PaperSummary};
use crate::store::{ArtifactStore, FsStore, get_json, keys, put_json};
use crate::text::{FrequencyBounds, StopWords, Tokenizer};

/// Runs the full analysis and persists its artifacts.
pub struct TrendAnalyzer {
    config: AnalysisConfig,
    tokenizer: Tokenizer,
    keywords: KeywordExtractor,
    topics: TopicModeler,
    statistics: StatisticsAggregator,
    narrative: NarrativeSynthesizer,
    store: Arc<dyn ArtifactStore>,
}

impl TrendAnalyzer {
    /// Create an analyzer; `generator` may be absent (degraded narrative).
    pub fn new(
        config: AnalysisConfig,
        generator: Option<Arc<dyn TextGenerator>>,
        store: Arc<dyn ArtifactStore>,
    ) -> EngineResult<Self> {
        config.validate()?;

        let tokenizer = Tokenizer::new(StopWords::new());
        let keywords = KeywordExtractor::new(
            tokenizer.clone(),
            config.min_document_frequency,
            config.max_document_ratio,
        );
        let topics = TopicModeler::new(
            tokenizer.clone(),
            FrequencyBounds {
                min_documents: config.min_document_frequency,
                max_ratio: config.max_document_ratio,
                max_terms: Some(config.max_vocabulary),
            },
            TopicParams {
                num_topics: config.num_topics,
                terms_per_topic: config.terms_per_topic,
                iterations: config.topic_iterations,
                seed: config.topic_seed,
            },
        );
        let statistics = StatisticsAggregator::new(
            tokenizer.stop_words().clone(),
            StatisticsLimits {
                categories: config.top_categories,
                authors: config.top_authors,
                words: config.top_words,
                ..StatisticsLimits::default()
            },
        );
        let narrative = NarrativeSynthesizer::new(
            generator,
            PromptOptions {
                max_papers: config.prompt_papers,
                max_keywords: config.prompt_keywords,
                terms_per_topic: config.prompt_topic_terms,
                language: config.response_language.clone(),
                max_tokens: config.narrative_max_tokens,
            },
        );

        Ok(Self { config, tokenizer, keywords, topics, statistics, narrative, store })
    }

    /// Create an analyzer writing to `config.output_dir`.
    ///
    /// A provider that cannot be constructed is logged and skipped; the run
    /// then produces placeholder narrative text.
    pub fn from_config(config: Config) -> EngineResult<Self> {
        let generator = match config.llm {
            Some(llm) => match create_generator(llm) {
                Ok(generator) => Some(generator),
                Err(e) => {
                    warn!(error = %e, "LLM client unavailable, narrative will be skipped");
                    None
                }
            },
            None => None,
        };
        let store: Arc<dyn ArtifactStore> = Arc::new(FsStore::new(config.output_dir));
        Self::new(config.analysis, generator, store)
    }

    /// Analysis settings.
    #[must_use]
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// True if a generative provider is attached.
    #[must_use]
    pub fn has_generator(&self) -> bool {
        self.narrative.has_generator()
    }

    /// Store the artifacts are written to.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn ArtifactStore> {
        &self.store
    }

    /// Analyze `papers` dated today (local time).
    pub async fn analyze(
        &self,
        papers: &[Paper],
        summaries: Option<&[PaperSummary]>,
    ) -> EngineResult<AnalysisReport> {
        self.analyze_at(Local::now(), papers, summaries).await
    }

    /// Analyze `papers` as of `now`.
    ///
    /// Empty input returns [`AnalysisReport::default`] and writes nothing.
    /// Re-running on the same date replaces that date's artifacts.
    pub async fn analyze_at(
        &self,
        now: DateTime<Local>,
        papers: &[Paper],
        summaries: Option<&[PaperSummary]>,
    ) -> EngineResult<AnalysisReport> {
        if papers.is_empty() {
            warn!("No papers to analyze");
            return Ok(AnalysisReport::default());
        }

        let date = now.format("%Y-%m-%d").to_string();
        let span = info_span!("analysis", run_id = %uuid::Uuid::new_v4(), date = date.as_str());
        self.run(date, now.with_timezone(&Utc), papers, summaries).instrument(span).await
    }

    async fn run(
        &self,
        date: String,
        generated_at: DateTime<Utc>,
        papers: &[Paper],
        summaries: Option<&[PaperSummary]>,
    ) -> EngineResult<AnalysisReport> {
        info!(
            papers = papers.len(),
            summaries = summaries.map_or(0, <[PaperSummary]>::len),
            "Starting analysis"
        );

        let keywords = self.keywords.extract(papers, self.config.top_keywords);
        let topics = self.topics.fit(papers);
        let statistics = self.statistics.aggregate(papers, summaries);
        let narrative = self.narrative.synthesize(papers, summaries, &keywords, &topics).await;

        let frequencies = word_frequencies(papers, &self.tokenizer, self.config.wordcloud_words);
        let wordcloud_path =
            self.store.put(&keys::wordcloud(&date), render_word_cloud(&frequencies).as_bytes())?;

        let report = AnalysisReport {
            date,
            paper_count: papers.len(),
            keywords,
            topics,
            statistics,
            narrative,
            wordcloud_path,
            generated_at: Some(generated_at),
        };

        let report_location = self.persist(&report)?;
        info!("{}", format_run_summary(&report, Some(&report_location)));
        Ok(report)
    }

    /// Write the JSON result and the Markdown report; returns the report location.
    fn persist(&self, report: &AnalysisReport) -> StoreResult<String> {
        let store = self.store.as_ref();

        let dated = put_json(store, &keys::analysis(&report.date), report)?;
        put_json(store, keys::LATEST, report)?;

        let markdown = format_report_markdown(report);
        let report_location = store.put(&keys::report(&report.date), markdown.as_bytes())?;
        store.put(keys::LATEST_REPORT, markdown.as_bytes())?;

        info!(analysis = dated.as_str(), report = report_location.as_str(), "Saved analysis");
        Ok(report_location)
    }

    /// The most recently persisted result, if any.
    pub fn load_latest(&self) -> EngineResult<Option<AnalysisReport>> {
        if !self.store.exists(keys::LATEST) {
            return Ok(None);
        }
        Ok(Some(get_json(self.store.as_ref(), keys::LATEST)?))
    }
}

impl std::fmt::Debug for TrendAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrendAnalyzer")
            .field("config", &self.config)
            .field("narrative", &self.narrative)
            .finish_non_exhaustive()
    }
}
