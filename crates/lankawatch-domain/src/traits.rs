//! Trait definitions for external interactions
//!
//! These traits define the seams between the risk agent and the things it
//! can be plugged with. Implementations live in other crates.

use crate::{Article, RiskAssessment};

/// Trait for remote text-completion providers
///
/// Implemented by the infrastructure layer (lankawatch-llm). Calls are
/// synchronous; implementations are responsible for bounding them in time.
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Generate a completion for a system instruction and a user prompt
    fn generate(&self, system: &str, prompt: &str) -> Result<String, Self::Error>;

    /// Generate a completion constrained to JSON (if supported)
    ///
    /// `schema` is a human-readable description of the expected object.
    fn generate_structured(
        &self,
        system: &str,
        prompt: &str,
        schema: &str,
    ) -> Result<String, Self::Error>;

    /// Name of the model answering the calls
    fn model_name(&self) -> &str;
}

/// Trait for risk decision strategies
///
/// Implemented by the application layer (lankawatch-agent). A strategy never
/// fails: whatever goes wrong internally is recorded in the returned trace.
pub trait RiskStrategy {
    /// Short strategy name used in logs
    fn name(&self) -> &'static str;

    /// Produce a complete assessment for one article
    fn evaluate(&self, article: &Article) -> RiskAssessment;
}
