//! Executive summary module - batch-level aggregation of assessments

use crate::{RiskAssessment, RiskLevel};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of assessments per risk level
///
/// Every level is always present, zero or not.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskDistribution {
    /// Critical assessments
    #[serde(rename = "Critical")]
    pub critical: usize,
    /// High assessments
    #[serde(rename = "High")]
    pub high: usize,
    /// Medium assessments
    #[serde(rename = "Medium")]
    pub medium: usize,
    /// Low assessments
    #[serde(rename = "Low")]
    pub low: usize,
    /// Assessments with no risk
    #[serde(rename = "None")]
    pub none: usize,
}

impl RiskDistribution {
    /// Count for one level
    pub fn count(&self, level: RiskLevel) -> usize {
        match level {
            RiskLevel::Critical => self.critical,
            RiskLevel::High => self.high,
            RiskLevel::Medium => self.medium,
            RiskLevel::Low => self.low,
            RiskLevel::None => self.none,
        }
    }

    /// Add one assessment at the given level
    pub fn increment(&mut self, level: RiskLevel) {
        match level {
            RiskLevel::Critical => self.critical += 1,
            RiskLevel::High => self.high += 1,
            RiskLevel::Medium => self.medium += 1,
            RiskLevel::Low => self.low += 1,
            RiskLevel::None => self.none += 1,
        }
    }

    /// Sum over all levels
    pub fn total(&self) -> usize {
        RiskLevel::ALL.iter().map(|l| self.count(*l)).sum()
    }
}

/// How many assessments matched a category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    /// Category name
    pub category: String,
    /// Number of assessments listing it
    pub count: usize,
}

/// Aggregate view over a batch of assessments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutiveSummary {
    /// When the summary was produced
    pub generated_at: DateTime<Utc>,

    /// Number of assessments summarised
    pub total_articles: usize,

    /// Per-level counts
    pub risk_distribution: RiskDistribution,

    /// Categories by count descending, then name ascending
    pub top_risk_categories: Vec<CategoryCount>,

    /// Number of High and Critical assessments
    pub high_priority_count: usize,

    /// High and Critical assessments, most severe first
    pub high_priority_articles: Vec<RiskAssessment>,

    /// Mean confidence, 0.0 for an empty batch
    pub average_confidence: f64,
}
