//! Configuration for the risk agent

use crate::catalog::RiskCategoryCatalog;
use crate::error::AgentError;
use lankawatch_domain::{RiskCategory, RiskLevel};
use lankawatch_llm::openai;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Minimum scores for each risk level
///
/// A score at or above a threshold maps to that level; equal thresholds
/// resolve toward the higher level. Low has no threshold of its own: any
/// positive score below `medium` is Low.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Minimum score for Medium
    pub medium: f64,
    /// Minimum score for High
    pub high: f64,
    /// Minimum score for Critical
    pub critical: f64,
}

impl Thresholds {
    /// Map a risk score to a level
    pub fn level_for(&self, score: f64) -> RiskLevel {
        if score.is_nan() || score <= 0.0 {
            RiskLevel::None
        } else if score >= self.critical {
            RiskLevel::Critical
        } else if score >= self.high {
            RiskLevel::High
        } else if score >= self.medium {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    fn validate(&self) -> Result<(), String> {
        let all = [self.medium, self.high, self.critical];
        if all.iter().any(|t| !t.is_finite()) {
            return Err("thresholds must be finite numbers".to_string());
        }
        if self.medium <= 0.0 {
            return Err("thresholds.medium must be greater than 0".to_string());
        }
        if !(self.medium <= self.high && self.high <= self.critical) {
            return Err("thresholds must satisfy medium <= high <= critical".to_string());
        }
        Ok(())
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            medium: 3.0,
            high: 5.0,
            critical: 8.0,
        }
    }
}

/// Recommended actions per risk level, most urgent first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionTable {
    /// Actions for Critical
    pub critical: Vec<String>,
    /// Actions for High
    pub high: Vec<String>,
    /// Actions for Medium
    pub medium: Vec<String>,
    /// Actions for Low
    pub low: Vec<String>,
    /// Actions for None
    pub none: Vec<String>,
}

impl ActionTable {
    /// Actions configured for a level
    pub fn for_level(&self, level: RiskLevel) -> &[String] {
        match level {
            RiskLevel::Critical => &self.critical,
            RiskLevel::High => &self.high,
            RiskLevel::Medium => &self.medium,
            RiskLevel::Low => &self.low,
            RiskLevel::None => &self.none,
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for ActionTable {
    fn default() -> Self {
        Self {
            critical: strings(&[
                "ESCALATE: Notify senior analysts immediately",
                "Create detailed intelligence report",
                "Brief relevant stakeholders",
            ]),
            high: strings(&[
                "MONITOR: Set up continuous monitoring",
                "INVESTIGATE: Gather additional intelligence",
                "Document for compliance review",
            ]),
            medium: strings(&["WATCH: Add to monitoring watchlist", "Log in risk register"]),
            low: strings(&["RECORD: Add to intelligence database"]),
            none: strings(&["No immediate action required"]),
        }
    }
}

fn default_category_actions() -> BTreeMap<String, String> {
    BTreeMap::from([
        (
            "Corruption".to_string(),
            "Cross-reference with sanctions databases".to_string(),
        ),
        (
            "Political Instability".to_string(),
            "Check international response and implications".to_string(),
        ),
    ])
}

/// Remote language model settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// OpenAI-compatible API base URL
    pub endpoint: String,

    /// Model name
    pub model: String,

    /// Environment variable holding the API key
    pub api_key_env: String,

    /// Maximum time for one model call, retries included (seconds)
    pub timeout_secs: u64,

    /// Maximum attempts per call
    pub max_retries: u32,

    /// Sampling temperature
    pub temperature: f32,
}

impl LlmConfig {
    /// Get the call timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: openai::DEFAULT_ENDPOINT.to_string(),
            model: openai::DEFAULT_MODEL.to_string(),
            api_key_env: openai::DEFAULT_API_KEY_ENV.to_string(),
            timeout_secs: openai::DEFAULT_TIMEOUT_SECS,
            max_retries: openai::DEFAULT_MAX_RETRIES,
            temperature: openai::DEFAULT_TEMPERATURE,
        }
    }
}

/// Configuration for the risk agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Ask the language model first when a provider is available
    pub use_llm: bool,

    /// Score at which confidence reaches 1.0
    pub normalizing_constant: f64,

    /// Maximum number of recommended actions per assessment
    pub max_actions: usize,

    /// Confidence multiplier applied when the headline is empty
    pub degraded_confidence_factor: f64,

    /// Level thresholds
    pub thresholds: Thresholds,

    /// Per-level action table
    pub actions: ActionTable,

    /// Extra action per matched category, appended after level actions
    pub category_actions: BTreeMap<String, String>,

    /// Language model settings
    pub llm: LlmConfig,

    /// Categories replacing the built-in catalog
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog: Option<Vec<RiskCategory>>,
}

impl AgentConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), AgentError> {
        self.thresholds.validate().map_err(AgentError::Config)?;

        if !(self.normalizing_constant.is_finite() && self.normalizing_constant > 0.0) {
            return Err(AgentError::Config(
                "normalizing_constant must be greater than 0".to_string(),
            ));
        }
        if self.max_actions == 0 {
            return Err(AgentError::Config(
                "max_actions must be greater than 0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.degraded_confidence_factor) {
            return Err(AgentError::Config(
                "degraded_confidence_factor must be within [0, 1]".to_string(),
            ));
        }
        if self.llm.timeout_secs == 0 {
            return Err(AgentError::Config(
                "llm.timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.llm.max_retries == 0 {
            return Err(AgentError::Config(
                "llm.max_retries must be greater than 0".to_string(),
            ));
        }
        if self.llm.endpoint.trim().is_empty() || self.llm.model.trim().is_empty() {
            return Err(AgentError::Config(
                "llm.endpoint and llm.model cannot be empty".to_string(),
            ));
        }
        if let Some(categories) = &self.catalog {
            RiskCategoryCatalog::new(categories.clone())?;
        }
        Ok(())
    }

    /// Build the active catalog: the configured one, or the built-in one
    pub fn build_catalog(&self) -> Result<RiskCategoryCatalog, AgentError> {
        match &self.catalog {
            Some(categories) => RiskCategoryCatalog::new(categories.clone()),
            None => Ok(RiskCategoryCatalog::builtin()),
        }
    }

    /// Recommended actions for a verdict
    ///
    /// Level actions come first, then one extra action per matched category
    /// that has one, capped at `max_actions`.
    pub fn recommended_actions(&self, level: RiskLevel, categories: &[String]) -> Vec<String> {
        let extras = categories
            .iter()
            .filter_map(|name| self.category_actions.get(name));

        self.actions
            .for_level(level)
            .iter()
            .chain(extras)
            .take(self.max_actions)
            .cloned()
            .collect()
    }

    /// Conservative preset: lower thresholds, flags more articles
    pub fn conservative() -> Self {
        Self {
            thresholds: Thresholds {
                medium: 2.0,
                high: 4.0,
                critical: 6.0,
            },
            normalizing_constant: 8.0,
            ..Self::default()
        }
    }

    /// Lenient preset: higher thresholds, fewer escalations
    pub fn lenient() -> Self {
        Self {
            thresholds: Thresholds {
                medium: 5.0,
                high: 8.0,
                critical: 12.0,
            },
            normalizing_constant: 15.0,
            ..Self::default()
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, AgentError> {
        toml::from_str(toml_str)
            .map_err(|e| AgentError::Config(format!("Failed to parse TOML: {}", e)))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, AgentError> {
        toml::to_string_pretty(self)
            .map_err(|e| AgentError::Config(format!("Failed to serialize to TOML: {}", e)))
    }
}

impl Default for AgentConfig {
    /// Default configuration with balanced settings
    fn default() -> Self {
        Self {
            use_llm: false,
            normalizing_constant: 10.0,
            max_actions: 3,
            degraded_confidence_factor: 0.5,
            thresholds: Thresholds::default(),
            actions: ActionTable::default(),
            category_actions: default_category_actions(),
            llm: LlmConfig::default(),
            catalog: None,
        }
    }
}
