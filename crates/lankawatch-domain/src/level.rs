//! Risk level module - severity labels for assessments

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of the risk carried by an article
///
/// Levels are totally ordered: `Critical > High > Medium > Low > None`.
/// The derived `Ord` follows declaration order, so variants must stay
/// listed from least to most severe.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum RiskLevel {
    /// No significant risk identified
    #[default]
    None,

    /// Minor risk, informational
    Low,

    /// Moderate risk, monitor closely
    Medium,

    /// Significant risk, requires attention
    High,

    /// Immediate threat, major impact
    Critical,
}

impl RiskLevel {
    /// All levels, most severe first
    pub const ALL: [RiskLevel; 5] = [
        RiskLevel::Critical,
        RiskLevel::High,
        RiskLevel::Medium,
        RiskLevel::Low,
        RiskLevel::None,
    ];

    /// Get the level name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::None => "None",
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
            RiskLevel::Critical => "Critical",
        }
    }

    /// Parse a level from free text (case-insensitive)
    ///
    /// "moderate" is accepted as a synonym for Medium since language models
    /// use both.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "none" => Some(RiskLevel::None),
            "low" => Some(RiskLevel::Low),
            "medium" | "moderate" => Some(RiskLevel::Medium),
            "high" => Some(RiskLevel::High),
            "critical" => Some(RiskLevel::Critical),
            _ => None,
        }
    }

    /// High and Critical assessments are surfaced in the executive summary
    pub fn is_high_priority(&self) -> bool {
        matches!(self, RiskLevel::High | RiskLevel::Critical)
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid risk level: {}", s))
    }
}
