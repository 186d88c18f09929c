//! Narrative synthesis tests: section parsing and provider-backed generation.

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use paper_trends::analysis::{
    FAILURE_PREFIX, NarrativeSynthesizer, PromptOptions, build_prompt, parse_response,
};
use paper_trends::config::LlmConfig;
use paper_trends::llm::create_generator;
use paper_trends::models::{Keyword, NarrativeSection, Paper, Provider, Topic};

fn papers() -> Vec<Paper> {
    vec![
        Paper {
            id: "2401.00001".into(),
            title: "Sparse mixture of experts at scale".into(),
            categories: vec!["cs.LG".into()],
            ..Default::default()
        },
        Paper {
            id: "2401.00002".into(),
            title: "Tool-using language agents".into(),
            categories: vec!["cs.CL".into(), "cs.AI".into()],
            ..Default::default()
        },
    ]
}

// =============================================================================
// Parser
// =============================================================================

#[test]
fn test_only_future_directions_heading() {
    let response = "Some preamble.\n### Future Directions\n- embodied agents\n- world models\n";
    let narrative = parse_response(response);

    assert!(narrative.hotspots.is_empty());
    assert!(narrative.trends.is_empty());
    assert!(narrative.research_ideas.is_empty());
    assert_eq!(
        narrative.future_directions,
        "### Future Directions\n- embodied agents\n- world models"
    );
    assert_eq!(narrative.full_text, response);
}

#[test]
fn test_first_matching_trigger_wins() {
    // "trend" is checked before "future", so this line opens the trends section.
    let narrative = parse_response("## Future trends\ncontent");
    assert_eq!(narrative.trends, "## Future trends\ncontent");
    assert!(narrative.future_directions.is_empty());
}

#[test]
fn test_repeated_section_keeps_last_block() {
    let narrative = parse_response("## Hotspots\nfirst\n## Trends\nmid\n## Hotspots again\nsecond");
    assert_eq!(narrative.hotspots, "## Hotspots again\nsecond");
    assert_eq!(narrative.trends, "## Trends\nmid");
}

#[test]
fn test_uppercase_ascii_heading_matches() {
    let narrative = parse_response("# RESEARCH IDEAS\n1. something");
    assert_eq!(narrative.section(NarrativeSection::ResearchIdeas), "# RESEARCH IDEAS\n1. something");
}

#[test]
fn test_chinese_headings() {
    let narrative = parse_response("### 1. 当前研究热点\n内容A\n### 2. 技术发展趋势\n内容B\n### 4. 研究想法与创新点\n内容C");
    assert_eq!(narrative.hotspots, "### 1. 当前研究热点\n内容A");
    assert_eq!(narrative.trends, "### 2. 技术发展趋势\n内容B");
    assert_eq!(narrative.research_ideas, "### 4. 研究想法与创新点\n内容C");
}

// =============================================================================
// Prompt
// =============================================================================

#[test]
fn test_prompt_is_deterministic() {
    let keywords = vec![Keyword { keyword: "mixture of".into(), score: 0.2 }];
    let topics = vec![Topic { topic_id: 1, keywords: vec!["experts".into()], weights: vec![3.0] }];
    let options = PromptOptions::default();

    let first = build_prompt(&papers(), None, &keywords, &topics, &options);
    let second = build_prompt(&papers(), None, &keywords, &topics, &options);
    assert_eq!(first, second);
    assert!(first.contains("1. Sparse mixture of experts at scale"));
    assert!(first.contains("Categories: cs.CL, cs.AI"));
    assert!(first.contains("Topic 1: experts"));
    assert!(first.contains("answer in English"));
}

#[test]
fn test_prompt_language_is_configurable() {
    let options = PromptOptions { language: "Chinese".into(), ..PromptOptions::default() };
    let prompt = build_prompt(&papers(), None, &[], &[], &options);
    assert!(prompt.contains("answer in Chinese"));
}

// =============================================================================
// Provider-backed synthesis
// =============================================================================

#[tokio::test]
async fn test_synthesize_with_mock_provider() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("Tool-using language agents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant",
                "content": "### 1. Current Research Hotspots\n- agents\n### 2. Technical Trends\n- MoE"}}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let generator =
        create_generator(LlmConfig::for_testing(Provider::OpenAi, &mock_server.uri())).unwrap();
    let synthesizer = NarrativeSynthesizer::new(Some(generator), PromptOptions::default());

    let narrative = synthesizer.synthesize(&papers(), None, &[], &[]).await;

    assert_eq!(narrative.hotspots, "### 1. Current Research Hotspots\n- agents");
    assert_eq!(narrative.trends, "### 2. Technical Trends\n- MoE");
    assert!(narrative.future_directions.is_empty());
}

#[tokio::test]
async fn test_synthesize_provider_error_becomes_failure_text() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid key"))
        .mount(&mock_server)
        .await;

    let generator =
        create_generator(LlmConfig::for_testing(Provider::DeepSeek, &mock_server.uri())).unwrap();
    let synthesizer = NarrativeSynthesizer::new(Some(Arc::clone(&generator)), PromptOptions::default());

    let narrative = synthesizer.synthesize(&papers(), None, &[], &[]).await;

    for section in NarrativeSection::ALL {
        let text = narrative.section(section);
        assert!(text.starts_with(FAILURE_PREFIX), "{section:?}: {text}");
        assert!(text.contains("401"));
    }
    assert!(narrative.full_text.is_empty());
}
