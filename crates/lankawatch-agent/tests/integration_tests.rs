//! Integration tests for lankawatch-agent
//!
//! These tests run upstream-shaped JSON through the full agent and check the
//! serialized report shape.

use chrono::{TimeZone, Utc};
use lankawatch_agent::{AgentConfig, ExecutiveSummaryBuilder, ReActLoop};
use lankawatch_domain::{Article, RiskLevel};
use lankawatch_llm::{LlmError, MockProvider};

const UPSTREAM_BATCH: &str = r#"[
    {
        "title": "Mass protests erupt in Colombo over economic crisis",
        "url": "https://www.adaderana.lk/news/100",
        "source": "Ada Derana",
        "published_at": "2024-02-09T10:30:00Z",
        "sentiment": "negative",
        "entities": [{"text": "Colombo", "kind": "GPE"}],
        "topic": "Politics & Government"
    },
    {
        "title": "Local bakery wins regional award",
        "url": "https://www.dailymirror.lk/200",
        "source": "Daily Mirror",
        "published_at": "2024-02-09T11:00:00Z",
        "sentiment": "positive",
        "entities": [],
        "topic": null
    },
    {
        "title": "Minister remanded over bribery and money laundering charges",
        "url": "https://www.newsfirst.lk/300",
        "source": "News First",
        "published_at": "2024-02-09T12:00:00Z",
        "entities": [{"text": "CIABOC", "kind": "ORG"}],
        "topic": "Crime & Law"
    }
]"#;

fn load_batch() -> Vec<Article> {
    serde_json::from_str(UPSTREAM_BATCH).expect("fixture should parse")
}

#[test]
fn test_keyword_batch_end_to_end() {
    let agent = ReActLoop::<MockProvider>::new(AgentConfig::default(), None).unwrap();
    let articles = load_batch();
    let assessments = agent.assess_batch(&articles);

    assert_eq!(assessments.len(), 3);
    assert_eq!(assessments[0].risk_level, RiskLevel::High);
    assert_eq!(assessments[1].risk_level, RiskLevel::None);
    assert!(assessments[2]
        .risk_categories
        .contains(&"Corruption".to_string()));
    // bribery + money laundering + remanded: 3 + 3 + 2
    assert_eq!(assessments[2].risk_level, RiskLevel::Critical);
    assert!(assessments[2].recommended_actions[0].starts_with("ESCALATE"));
    assert_eq!(assessments[0].key_entities, vec!["Colombo".to_string()]);
}

#[test]
fn test_report_shape() {
    let agent = ReActLoop::<MockProvider>::new(AgentConfig::default(), None).unwrap();
    let assessments = agent.assess_batch(&load_batch());
    let at = Utc.with_ymd_and_hms(2024, 2, 10, 0, 0, 0).unwrap();
    let summary = ExecutiveSummaryBuilder::new()
        .with_timestamp(at)
        .summarize(&assessments);

    let report = serde_json::json!({
        "summary": summary,
        "assessments": assessments,
    });

    assert_eq!(report["summary"]["total_articles"], 3);
    assert_eq!(report["summary"]["risk_distribution"]["None"], 1);
    assert_eq!(report["summary"]["generated_at"], "2024-02-10T00:00:00Z");

    let first = &report["assessments"][0];
    assert_eq!(first["risk_level"], "High");
    assert_eq!(first["geographic_scope"], "Sri Lanka");
    assert_eq!(first["reasoning_trace"][0]["step"], 1);
    assert_eq!(first["reasoning_trace"][0]["action"], "ANALYZE_KEYWORDS");
    assert_eq!(first["reasoning_trace"][1]["action"], "CONCLUDE");
}

#[test]
fn test_llm_outage_degrades_gracefully() {
    let config = AgentConfig {
        use_llm: true,
        ..AgentConfig::default()
    };
    let provider = MockProvider::failing(LlmError::Communication("connection refused".into()));
    let agent = ReActLoop::new(config, Some(provider.clone())).unwrap();

    let keyword_agent = ReActLoop::<MockProvider>::new(AgentConfig::default(), None).unwrap();
    let articles = load_batch();

    let with_outage = agent.assess_batch(&articles);
    let baseline = keyword_agent.assess_batch(&articles);

    assert_eq!(provider.call_count(), 3);
    for (degraded, expected) in with_outage.iter().zip(&baseline) {
        assert!(degraded.used_fallback());
        assert_eq!(degraded.risk_level, expected.risk_level);
        assert_eq!(degraded.risk_categories, expected.risk_categories);
        assert_eq!(degraded.confidence, expected.confidence);
    }
}
