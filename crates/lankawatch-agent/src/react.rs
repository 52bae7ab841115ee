//! The ReAct reasoning loop
//!
//! Each assessment walks a small, fixed state machine:
//!
//! ```text
//! THOUGHT → ACTION → OBSERVATION ─┬─> CONCLUDE
//!    ^                            │
//!    └──── (model call failed) ───┘
//! ```
//!
//! The first ACTION runs the configured strategy. A second iteration only
//! happens after a failed language model call, and its ACTION is always the
//! keyword FALLBACK, so the loop runs at most twice before concluding.

use crate::catalog::RiskCategoryCatalog;
use crate::config::AgentConfig;
use crate::error::{AgentError, LlmFailure};
use crate::keyword::KeywordRiskStrategy;
use crate::language_model::{fallback_observation, LanguageModelRiskStrategy};
use crate::types::{compose_thought, Verdict};
use lankawatch_domain::traits::{LlmProvider, RiskStrategy};
use lankawatch_domain::{Article, ReasoningAction, ReasoningTrace, RiskAssessment};
use lankawatch_llm::LlmError;
use std::sync::Arc;
use tracing::{info, warn};

/// Upper bound on THOUGHT → ACTION → OBSERVATION iterations
pub const MAX_ITERATIONS: usize = 2;

/// The decision strategy selected by configuration
pub enum Strategy<P> {
    /// Deterministic keyword scoring
    Keyword(KeywordRiskStrategy),
    /// Remote language model with keyword fallback
    LanguageModel(LanguageModelRiskStrategy<P>),
}

impl<P> Strategy<P>
where
    P: LlmProvider<Error = LlmError>,
{
    /// Pick the language model when asked for and available, else keywords
    pub fn select(
        config: Arc<AgentConfig>,
        catalog: Arc<RiskCategoryCatalog>,
        provider: Option<P>,
    ) -> Self {
        match provider {
            Some(provider) if config.use_llm => {
                Strategy::LanguageModel(LanguageModelRiskStrategy::new(provider, catalog, config))
            }
            provider => {
                if config.use_llm && provider.is_none() {
                    warn!("LLM analysis requested but no provider is available, using keyword analysis");
                }
                Strategy::Keyword(KeywordRiskStrategy::new(catalog, config))
            }
        }
    }

    /// Action taken on the first iteration
    pub fn first_action(&self) -> ReasoningAction {
        match self {
            Strategy::Keyword(_) => ReasoningAction::AnalyzeKeywords,
            Strategy::LanguageModel(_) => ReasoningAction::AnalyzeWithLlm,
        }
    }

    /// The keyword strategy, directly or as the fallback
    pub fn keyword(&self) -> &KeywordRiskStrategy {
        match self {
            Strategy::Keyword(s) => s,
            Strategy::LanguageModel(s) => s.fallback(),
        }
    }

    /// Run one action
    fn act(&self, action: ReasoningAction, article: &Article) -> Result<Verdict, LlmFailure> {
        match (action, self) {
            (ReasoningAction::AnalyzeWithLlm, Strategy::LanguageModel(s)) => s.query(article),
            _ => Ok(self.keyword().score(article)),
        }
    }
}

impl<P> RiskStrategy for Strategy<P>
where
    P: LlmProvider<Error = LlmError>,
{
    fn name(&self) -> &'static str {
        match self {
            Strategy::Keyword(s) => s.name(),
            Strategy::LanguageModel(s) => s.name(),
        }
    }

    fn evaluate(&self, article: &Article) -> RiskAssessment {
        match self {
            Strategy::Keyword(s) => s.evaluate(article),
            Strategy::LanguageModel(s) => s.evaluate(article),
        }
    }
}

/// Loop phases; each carries what the next one needs
enum Phase {
    Thought,
    Action {
        thought: String,
    },
    Observation {
        thought: String,
        action: ReasoningAction,
        outcome: Result<Verdict, LlmFailure>,
    },
    Conclude(Verdict),
}

/// Orchestrates reasoning steps around the selected strategy
///
/// Holds configuration only; every `assess` call builds a fresh trace.
pub struct ReActLoop<P> {
    strategy: Strategy<P>,
    config: Arc<AgentConfig>,
}

impl<P> ReActLoop<P>
where
    P: LlmProvider<Error = LlmError>,
{
    /// Create a loop from a validated configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration or its catalog is invalid.
    pub fn new(config: AgentConfig, provider: Option<P>) -> Result<Self, AgentError> {
        config.validate()?;
        let catalog = Arc::new(config.build_catalog()?);
        let config = Arc::new(config);
        let strategy = Strategy::select(Arc::clone(&config), catalog, provider);

        info!(strategy = strategy.name(), "Risk agent ready");

        Ok(Self { strategy, config })
    }

    /// The selected strategy
    pub fn strategy(&self) -> &Strategy<P> {
        &self.strategy
    }

    /// Active configuration
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Active catalog
    pub fn catalog(&self) -> &RiskCategoryCatalog {
        self.strategy.keyword().catalog()
    }

    /// Assess one article
    pub fn assess(&self, article: &Article) -> RiskAssessment {
        let mut trace = ReasoningTrace::new();
        let mut iteration = 0;
        let mut last_failure: Option<LlmFailure> = None;
        let mut phase = Phase::Thought;

        let verdict = loop {
            phase = match phase {
                Phase::Thought => {
                    iteration += 1;
                    let thought = match &last_failure {
                        None => compose_thought(article),
                        Some(failure) => {
                            format!("Model analysis failed ({}); fall back to keyword scan", failure)
                        }
                    };
                    Phase::Action { thought }
                }
                Phase::Action { thought } => {
                    let action = if last_failure.is_some() {
                        ReasoningAction::Fallback
                    } else {
                        self.strategy.first_action()
                    };
                    let outcome = self.strategy.act(action, article);
                    Phase::Observation {
                        thought,
                        action,
                        outcome,
                    }
                }
                Phase::Observation {
                    thought,
                    action,
                    outcome: Ok(verdict),
                } => {
                    let observation = match &last_failure {
                        Some(failure) if action == ReasoningAction::Fallback => {
                            fallback_observation(failure, &verdict)
                        }
                        _ => verdict.observation.clone(),
                    };
                    trace.record(thought, action, observation);
                    Phase::Conclude(verdict)
                }
                Phase::Observation {
                    thought,
                    action,
                    outcome: Err(failure),
                } => {
                    warn!("LLM analysis failed for '{}': {}", article.url, failure);
                    trace.record(thought, action, format!("Model call failed: {}", failure));
                    last_failure = Some(failure);
                    if iteration < MAX_ITERATIONS {
                        Phase::Thought
                    } else {
                        Phase::Conclude(self.strategy.keyword().score(article))
                    }
                }
                Phase::Conclude(verdict) => break verdict,
            };
        };

        trace.record(
            "Combine observations into the final verdict",
            ReasoningAction::Conclude,
            format!(
                "Risk level {} with {} categor{} at {:.0}% confidence{}",
                verdict.level,
                verdict.categories.len(),
                if verdict.categories.len() == 1 { "y" } else { "ies" },
                verdict.confidence * 100.0,
                if last_failure.is_some() {
                    " (keyword fallback)"
                } else {
                    ""
                }
            ),
        );

        verdict.into_assessment(article, trace, self.config.degraded_confidence_factor)
    }

    /// Assess a batch, one assessment per article in input order
    pub fn assess_batch(&self, articles: &[Article]) -> Vec<RiskAssessment> {
        info!("Assessing {} articles with {} strategy", articles.len(), self.strategy.name());

        let assessments: Vec<RiskAssessment> = articles
            .iter()
            .enumerate()
            .map(|(i, article)| {
                info!("Processing article {}/{}: {}", i + 1, articles.len(), article.url);
                self.assess(article)
            })
            .collect();

        let fallbacks = assessments.iter().filter(|a| a.used_fallback()).count();
        if fallbacks > 0 {
            warn!("{} of {} assessments used the keyword fallback", fallbacks, assessments.len());
        }
        info!("Batch complete: {} assessments", assessments.len());

        assessments
    }
}

impl<P> RiskStrategy for ReActLoop<P>
where
    P: LlmProvider<Error = LlmError>,
{
    fn name(&self) -> &'static str {
        "react"
    }

    fn evaluate(&self, article: &Article) -> RiskAssessment {
        self.assess(article)
    }
}
