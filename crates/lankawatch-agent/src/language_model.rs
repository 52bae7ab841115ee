//! Remote language model strategy with keyword fallback

use crate::catalog::RiskCategoryCatalog;
use crate::config::AgentConfig;
use crate::error::LlmFailure;
use crate::keyword::KeywordRiskStrategy;
use crate::parser::parse_llm_response;
use crate::prompt::{PromptBuilder, RESPONSE_SCHEMA};
use crate::types::{compose_thought, Verdict};
use lankawatch_domain::traits::{LlmProvider, RiskStrategy};
use lankawatch_domain::{Article, ReasoningAction, ReasoningTrace, RiskAssessment};
use lankawatch_llm::LlmError;
use std::sync::Arc;
use tracing::{debug, warn};

/// Asks a language model for the verdict, falling back to keywords
pub struct LanguageModelRiskStrategy<P> {
    provider: P,
    catalog: Arc<RiskCategoryCatalog>,
    config: Arc<AgentConfig>,
    fallback: KeywordRiskStrategy,
}

impl<P> LanguageModelRiskStrategy<P>
where
    P: LlmProvider<Error = LlmError>,
{
    /// Create a language model strategy
    pub fn new(provider: P, catalog: Arc<RiskCategoryCatalog>, config: Arc<AgentConfig>) -> Self {
        let fallback = KeywordRiskStrategy::new(Arc::clone(&catalog), Arc::clone(&config));
        Self {
            provider,
            catalog,
            config,
            fallback,
        }
    }

    /// Call the model once and validate its answer
    pub fn query(&self, article: &Article) -> Result<Verdict, LlmFailure> {
        let builder = PromptBuilder::new(article, &self.catalog);
        let system = builder.system();
        let prompt = builder.build();

        debug!("Prompt length: {} chars", prompt.len());

        let response = self
            .provider
            .generate_structured(&system, &prompt, RESPONSE_SCHEMA)?;

        debug!("LLM response length: {} chars", response.len());

        let parsed = parse_llm_response(&response, &self.catalog)?;

        let actions = if parsed.actions.is_empty() {
            self.config
                .recommended_actions(parsed.level, &parsed.categories)
        } else {
            parsed
                .actions
                .into_iter()
                .take(self.config.max_actions)
                .collect()
        };

        let observation = format!(
            "{} rated {} ({:.0}% confidence): {}",
            self.provider.model_name(),
            parsed.level,
            parsed.confidence * 100.0,
            if parsed.categories.is_empty() {
                "no risk categories".to_string()
            } else {
                parsed.categories.join(", ")
            }
        );

        Ok(Verdict {
            level: parsed.level,
            categories: parsed.categories,
            confidence: parsed.confidence,
            reasoning: parsed.reasoning,
            actions,
            observation,
        })
    }

    /// The keyword strategy used after a failed call
    pub fn fallback(&self) -> &KeywordRiskStrategy {
        &self.fallback
    }

    /// Name of the model behind the provider
    pub fn model_name(&self) -> &str {
        self.provider.model_name()
    }
}

/// Observation text for a FALLBACK step
pub(crate) fn fallback_observation(failure: &LlmFailure, verdict: &Verdict) -> String {
    format!("Model unavailable ({}); keyword scan: {}", failure, verdict.observation)
}

impl<P> RiskStrategy for LanguageModelRiskStrategy<P>
where
    P: LlmProvider<Error = LlmError>,
{
    fn name(&self) -> &'static str {
        "language-model"
    }

    fn evaluate(&self, article: &Article) -> RiskAssessment {
        let thought = compose_thought(article);
        let mut trace = ReasoningTrace::new();

        let verdict = match self.query(article) {
            Ok(verdict) => {
                trace.record(thought, ReasoningAction::AnalyzeWithLlm, verdict.observation.clone());
                verdict
            }
            Err(failure) => {
                warn!("LLM analysis failed for '{}': {}", article.url, failure);
                trace.record(
                    thought,
                    ReasoningAction::AnalyzeWithLlm,
                    format!("Model call failed: {}", failure),
                );
                let verdict = self.fallback.score(article);
                trace.record(
                    "Fall back to keyword scan",
                    ReasoningAction::Fallback,
                    fallback_observation(&failure, &verdict),
                );
                verdict
            }
        };

        verdict.into_assessment(article, trace, self.config.degraded_confidence_factor)
    }
}
