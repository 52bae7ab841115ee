//! Risk assessment module - the verdict for one article

use crate::{Article, ReasoningAction, ReasoningTrace, RiskLevel};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Geographic scope stamped on every assessment
pub const GEOGRAPHIC_SCOPE: &str = "Sri Lanka";

/// The structured risk verdict for one article
///
/// Created exactly once per article by the risk agent and never modified
/// afterwards. `risk_level` is `None` exactly when `risk_categories` is
/// empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Stable identifier derived from the article URL
    pub article_id: Uuid,

    /// Headline of the assessed article
    pub article_title: String,

    /// URL of the assessed article
    pub article_url: String,

    /// Severity label
    pub risk_level: RiskLevel,

    /// Matched category names, in catalog order
    pub risk_categories: Vec<String>,

    /// Confidence in [0.0, 1.0]
    pub confidence: f64,

    /// Short summary of why the verdict was reached
    pub reasoning: String,

    /// Recommended follow-ups, most urgent first
    pub recommended_actions: Vec<String>,

    /// Entity texts copied from the article
    pub key_entities: Vec<String>,

    /// Region the assessment applies to
    pub geographic_scope: String,

    /// Thought → Action → Observation steps, never empty
    pub reasoning_trace: ReasoningTrace,
}

impl RiskAssessment {
    /// Start an assessment for an article with an empty verdict
    ///
    /// Callers fill in the verdict fields and the trace before handing the
    /// assessment out.
    pub fn for_article(article: &Article) -> Self {
        Self {
            article_id: article.id(),
            article_title: article.title.clone(),
            article_url: article.url.clone(),
            risk_level: RiskLevel::None,
            risk_categories: Vec::new(),
            confidence: 0.0,
            reasoning: String::new(),
            recommended_actions: Vec::new(),
            key_entities: article.entity_texts(),
            geographic_scope: GEOGRAPHIC_SCOPE.to_string(),
            reasoning_trace: ReasoningTrace::new(),
        }
    }

    /// Whether the keyword scan had to stand in for a failed model call
    pub fn used_fallback(&self) -> bool {
        self.reasoning_trace.contains_action(ReasoningAction::Fallback)
    }

    /// Whether the assessment belongs in the high-priority list
    pub fn is_high_priority(&self) -> bool {
        self.risk_level.is_high_priority()
    }

    /// Render the reasoning trace for humans
    pub fn format_trace(&self) -> String {
        let mut out = String::from("=== Agent Reasoning Trace ===\n");
        for step in self.reasoning_trace.steps() {
            out.push_str(&format!("\n--- Step {} ---\n", step.index));
            out.push_str(&format!("Thought: {}\n", step.thought));
            out.push_str(&format!("Action: {}\n", step.action));
            out.push_str(&format!("Observation: {}\n", step.observation));
        }
        out
    }
}
