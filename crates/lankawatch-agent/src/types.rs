//! Intermediate verdict type shared by the strategies and the loop

use lankawatch_domain::{Article, ReasoningTrace, RiskAssessment, RiskLevel};

/// What one strategy decided about an article, before assembly
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    /// Severity label
    pub level: RiskLevel,

    /// Matched category names, in catalog order
    pub categories: Vec<String>,

    /// Confidence in [0.0, 1.0]
    pub confidence: f64,

    /// Summary of why the verdict was reached
    pub reasoning: String,

    /// Recommended follow-ups, most urgent first
    pub actions: Vec<String>,

    /// Text for the observation step that produced the verdict
    pub observation: String,
}

impl Verdict {
    /// Turn the verdict into the final assessment
    ///
    /// An article without a headline gets its confidence scaled by
    /// `degraded_factor`.
    pub fn into_assessment(
        self,
        article: &Article,
        trace: ReasoningTrace,
        degraded_factor: f64,
    ) -> RiskAssessment {
        let confidence = if article.has_title() {
            self.confidence
        } else {
            self.confidence * degraded_factor
        };

        RiskAssessment {
            risk_level: self.level,
            risk_categories: self.categories,
            confidence: confidence.clamp(0.0, 1.0),
            reasoning: self.reasoning,
            recommended_actions: self.actions,
            reasoning_trace: trace,
            ..RiskAssessment::for_article(article)
        }
    }
}

/// One-line rationale for looking at an article, noting annotation gaps
pub fn compose_thought(article: &Article) -> String {
    let mut thought = if article.has_title() {
        format!("Assess \"{}\" from {}", article.title.trim(), article.source)
    } else {
        format!(
            "Assess untitled article from {} (headline missing, confidence will be reduced)",
            article.source
        )
    };

    match article.topic {
        Some(topic) => thought.push_str(&format!("; topic {}", topic)),
        None => thought.push_str("; topic unclassified"),
    }
    match article.sentiment {
        Some(sentiment) => thought.push_str(&format!(", {} sentiment", sentiment.as_str())),
        None => thought.push_str(", sentiment unscored"),
    }
    if article.entities.is_empty() {
        thought.push_str(", no entities");
    } else {
        thought.push_str(&format!(", entities: {}", article.entity_texts().join(", ")));
    }
    thought
}
