//! Risk category module

use serde::{Deserialize, Serialize};

/// A named class of adverse event
///
/// Categories are keyed by `name`. A category's trigger terms are matched
/// case-insensitively against article text; every occurrence adds
/// `base_weight` to the article's risk score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskCategory {
    /// Unique category name (e.g. "Civil Unrest")
    pub name: String,

    /// Trigger keywords and phrases
    pub trigger_terms: Vec<String>,

    /// Severity weight, strictly positive
    pub base_weight: f64,
}

impl RiskCategory {
    /// Create a category from borrowed term literals
    pub fn new(name: impl Into<String>, trigger_terms: &[&str], base_weight: f64) -> Self {
        Self {
            name: name.into(),
            trigger_terms: trigger_terms.iter().map(|t| t.to_string()).collect(),
            base_weight,
        }
    }
}
