//! Research trend analysis - Entry Point
//!
//! Reads the fetch stage's paper snapshot (and optionally the summarize
//! stage's output), runs the analysis and writes the artifacts.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use paper_trends::config::LlmConfig;
use paper_trends::formatters::compact_report;
use paper_trends::models::Provider;
use paper_trends::store::{load_papers, load_summaries};
use paper_trends::{Config, TrendAnalyzer};

#[derive(Parser, Debug)]
#[command(name = "paper-trends")]
#[command(about = "Keyword, topic and trend analysis over a research paper snapshot")]
#[command(version)]
struct Cli {
    /// Paper snapshot written by the fetch stage
    #[arg(long, default_value = "data/papers/latest.json", env = "PAPERS_PATH")]
    papers: PathBuf,

    /// Summary snapshot written by the summarize stage
    #[arg(long, env = "SUMMARIES_PATH")]
    summaries: Option<PathBuf>,

    /// Directory for analysis artifacts
    #[arg(long, env = "ANALYSIS_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// LLM provider (overrides LLM_PROVIDER)
    #[arg(long)]
    provider: Option<Provider>,

    /// Model name (overrides the provider default)
    #[arg(long)]
    model: Option<String>,

    /// Skip the LLM narrative
    #[arg(long, conflicts_with = "provider")]
    no_llm: bool,

    /// Print a compact JSON summary to stdout
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    // Logs go to stderr so `--json` output stays clean.
    let subscriber = tracing_subscriber::registry().with(filter);
    if json {
        subscriber.with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)).init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        papers = %cli.papers.display(),
        "Starting paper-trends"
    );

    let mut config = Config::from_env()?;
    if cli.no_llm {
        config.llm = None;
    } else if let Some(provider) = cli.provider {
        config.llm = Some(LlmConfig::from_env_for(provider)?);
    }
    if let Some(model) = cli.model {
        config.llm = config.llm.map(|llm| llm.with_model(model));
    }
    if let Some(dir) = cli.output_dir {
        config.output_dir = dir;
    }

    let papers = load_papers(&cli.papers)?;
    let summaries = match &cli.summaries {
        Some(path) => Some(load_summaries(path)?),
        None => None,
    };

    let analyzer = TrendAnalyzer::from_config(config)?;
    let report = analyzer.analyze(&papers, summaries.as_deref()).await?;

    if report.is_empty() {
        tracing::warn!("Nothing analyzed");
    }
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&compact_report(&report))?);
    }

    Ok(())
}
