//! Reasoning trace module - Thought → Action → Observation records

use serde::{Deserialize, Serialize};
use std::fmt;

/// Actions the risk agent can take in one reasoning step
///
/// The vocabulary is fixed; the agent is not a general tool-using loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReasoningAction {
    /// Deterministic keyword scan against the catalog
    AnalyzeKeywords,

    /// Remote language model call
    AnalyzeWithLlm,

    /// Keyword scan after a failed language model call
    Fallback,

    /// Final verdict
    Conclude,
}

impl ReasoningAction {
    /// Wire name of the action
    pub fn as_str(&self) -> &'static str {
        match self {
            ReasoningAction::AnalyzeKeywords => "ANALYZE_KEYWORDS",
            ReasoningAction::AnalyzeWithLlm => "ANALYZE_WITH_LLM",
            ReasoningAction::Fallback => "FALLBACK",
            ReasoningAction::Conclude => "CONCLUDE",
        }
    }
}

impl fmt::Display for ReasoningAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One step of a reasoning trace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasoningStep {
    /// Position in the trace, starting at 1
    #[serde(rename = "step")]
    pub index: usize,

    /// Why the step is being taken
    pub thought: String,

    /// What was done
    pub action: ReasoningAction,

    /// What came back
    pub observation: String,
}

/// Append-only sequence of reasoning steps
///
/// Indices are assigned on insertion, so they are always contiguous from 1
/// and match causal order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReasoningTrace {
    steps: Vec<ReasoningStep>,
}

impl ReasoningTrace {
    /// Create an empty trace
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step and return its index
    pub fn record(
        &mut self,
        thought: impl Into<String>,
        action: ReasoningAction,
        observation: impl Into<String>,
    ) -> usize {
        let index = self.steps.len() + 1;
        self.steps.push(ReasoningStep {
            index,
            thought: thought.into(),
            action,
            observation: observation.into(),
        });
        index
    }

    /// Steps in causal order
    pub fn steps(&self) -> &[ReasoningStep] {
        &self.steps
    }

    /// Number of steps
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether no step was recorded yet
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Whether any step took the given action
    pub fn contains_action(&self, action: ReasoningAction) -> bool {
        self.steps.iter().any(|s| s.action == action)
    }

    /// Most recent step
    pub fn last(&self) -> Option<&ReasoningStep> {
        self.steps.last()
    }
}
