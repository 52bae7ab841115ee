//! Executive summary over a batch of assessments

use chrono::{DateTime, Utc};
use lankawatch_domain::{CategoryCount, ExecutiveSummary, RiskAssessment, RiskDistribution};
use std::collections::BTreeMap;

/// Aggregates assessments into an [`ExecutiveSummary`]
#[derive(Debug, Clone, Default)]
pub struct ExecutiveSummaryBuilder {
    generated_at: Option<DateTime<Utc>>,
}

impl ExecutiveSummaryBuilder {
    /// Create a builder stamping summaries with the current time
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp summaries with a fixed time instead of the clock
    pub fn with_timestamp(mut self, generated_at: DateTime<Utc>) -> Self {
        self.generated_at = Some(generated_at);
        self
    }

    /// Summarize a batch
    ///
    /// Categories are ranked by count descending then name ascending.
    /// High-priority items are ordered by level descending, keeping input
    /// order among equals.
    pub fn summarize(&self, assessments: &[RiskAssessment]) -> ExecutiveSummary {
        let mut distribution = RiskDistribution::default();
        let mut category_counts: BTreeMap<&str, usize> = BTreeMap::new();

        for assessment in assessments {
            distribution.increment(assessment.risk_level);
            for category in &assessment.risk_categories {
                *category_counts.entry(category.as_str()).or_insert(0) += 1;
            }
        }

        // BTreeMap iteration is name-ascending; the stable sort keeps that for ties
        let mut top_risk_categories: Vec<CategoryCount> = category_counts
            .into_iter()
            .map(|(category, count)| CategoryCount {
                category: category.to_string(),
                count,
            })
            .collect();
        top_risk_categories.sort_by(|a, b| b.count.cmp(&a.count));

        let mut high_priority_articles: Vec<RiskAssessment> = assessments
            .iter()
            .filter(|a| a.is_high_priority())
            .cloned()
            .collect();
        high_priority_articles.sort_by(|a, b| b.risk_level.cmp(&a.risk_level));

        let average_confidence = if assessments.is_empty() {
            0.0
        } else {
            assessments.iter().map(|a| a.confidence).sum::<f64>() / assessments.len() as f64
        };

        ExecutiveSummary {
            generated_at: self.generated_at.unwrap_or_else(Utc::now),
            total_articles: assessments.len(),
            risk_distribution: distribution,
            top_risk_categories,
            high_priority_count: high_priority_articles.len(),
            high_priority_articles,
            average_confidence,
        }
    }
}
