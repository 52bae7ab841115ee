//! Deterministic keyword scoring strategy

use crate::catalog::RiskCategoryCatalog;
use crate::config::AgentConfig;
use crate::types::{compose_thought, Verdict};
use lankawatch_domain::traits::RiskStrategy;
use lankawatch_domain::{Article, ReasoningAction, ReasoningTrace, RiskAssessment, RiskLevel};
use std::sync::Arc;
use tracing::debug;

/// Observation recorded when the headline matches nothing
pub const NO_INDICATORS: &str = "no risk indicators found";

/// Scores headlines against the catalog's trigger terms
///
/// Never fails and never calls out of process.
#[derive(Debug, Clone)]
pub struct KeywordRiskStrategy {
    catalog: Arc<RiskCategoryCatalog>,
    config: Arc<AgentConfig>,
}

impl KeywordRiskStrategy {
    /// Create a keyword strategy
    pub fn new(catalog: Arc<RiskCategoryCatalog>, config: Arc<AgentConfig>) -> Self {
        Self { catalog, config }
    }

    /// Score an article without building a trace
    ///
    /// score = sum of base_weight × match_count over matched categories;
    /// confidence = min(1, score / normalizing_constant).
    pub fn score(&self, article: &Article) -> Verdict {
        let hits = self.catalog.match_text(&article.title);

        if hits.is_empty() {
            return Verdict {
                level: RiskLevel::None,
                categories: Vec::new(),
                confidence: 0.0,
                reasoning: "Keyword analysis found no risk indicators in the headline".to_string(),
                actions: self.config.recommended_actions(RiskLevel::None, &[]),
                observation: NO_INDICATORS.to_string(),
            };
        }

        let score: f64 = hits.iter().map(|h| h.score()).sum();
        let indicator_count: usize = hits.iter().map(|h| h.count).sum();
        let level = self.config.thresholds.level_for(score);
        let confidence = (score / self.config.normalizing_constant).min(1.0);
        let categories: Vec<String> = hits.iter().map(|h| h.category.name.clone()).collect();

        debug!(score, ?level, categories = categories.len(), "Keyword scan complete");

        let matched = hits
            .iter()
            .map(|h| format!("{} x{}", h.category.name, h.count))
            .collect::<Vec<_>>()
            .join(", ");

        Verdict {
            level,
            actions: self.config.recommended_actions(level, &categories),
            reasoning: format!(
                "Keyword analysis found {} risk indicator(s) across {} categor{}, score {:.1}",
                indicator_count,
                categories.len(),
                if categories.len() == 1 { "y" } else { "ies" },
                score
            ),
            observation: format!("Matched {}; score {:.1} -> {}", matched, score, level),
            categories,
            confidence,
        }
    }

    /// Shared catalog
    pub fn catalog(&self) -> &RiskCategoryCatalog {
        &self.catalog
    }
}

impl RiskStrategy for KeywordRiskStrategy {
    fn name(&self) -> &'static str {
        "keyword"
    }

    fn evaluate(&self, article: &Article) -> RiskAssessment {
        let verdict = self.score(article);
        let mut trace = ReasoningTrace::new();
        trace.record(
            compose_thought(article),
            ReasoningAction::AnalyzeKeywords,
            verdict.observation.clone(),
        );
        verdict.into_assessment(article, trace, self.config.degraded_confidence_factor)
    }
}
