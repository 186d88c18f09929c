//! Research Trend Analysis Engine
//!
//! Turns a snapshot of research papers into a trend analysis: TF-IDF
//! keywords, LDA topics, corpus statistics and an LLM-written narrative,
//! persisted as JSON, a Markdown report and a word-frequency image.
//!
//! # Features
//!
//! - **Lexical weighting**: unigram and bigram TF-IDF ranked by mean weight
//! - **Topic modeling**: seeded collapsed Gibbs LDA, deterministic per seed
//! - **Five providers**: OpenAI, DeepSeek, vLLM, Claude and Gemini behind one trait
//! - **Degrades gracefully**: no provider or a failed call only affects the narrative
//!
//! # Example
//!
//! ```no_run
//! use paper_trends::{Config, TrendAnalyzer, store::load_papers};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let analyzer = TrendAnalyzer::from_config(config)?;
//!
//!     let papers = load_papers("data/papers/latest.json")?;
//!     let report = analyzer.analyze(&papers, None).await?;
//!     println!("{} keywords", report.keywords.len());
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod config;
pub mod error;
pub mod formatters;
pub mod llm;
pub mod models;
pub mod store;
pub mod text;

pub use analysis::TrendAnalyzer;
pub use config::Config;
pub use error::{AnalysisError, GenerationError, StoreError};
