//! LankaWatch Risk Agent
//!
//! Turns annotated news articles into structured risk verdicts through an
//! explicit Thought → Action → Observation reasoning trace.
//!
//! # Overview
//!
//! Two interchangeable strategies decide the verdict: a deterministic
//! keyword scorer driven by the risk category catalog, and a remote
//! language model whose answer is parsed and validated. Any model failure
//! (network, timeout, rate limit, malformed answer) falls back to the
//! keyword scorer and is recorded in the trace; no error ever reaches the
//! caller once the agent is built.
//!
//! # Architecture
//!
//! ```text
//! Article → ReActLoop → Strategy (keyword | language model) → RiskAssessment
//!                                                   ↓
//!                      ExecutiveSummaryBuilder ← batch of assessments
//! ```
//!
//! # Example Usage
//!
//! ```
//! use chrono::Utc;
//! use lankawatch_agent::{AgentConfig, ExecutiveSummaryBuilder, ReActLoop};
//! use lankawatch_domain::{Article, NewsSource, RiskLevel};
//! use lankawatch_llm::MockProvider;
//!
//! let agent = ReActLoop::<MockProvider>::new(AgentConfig::default(), None)?;
//!
//! let article = Article::new(
//!     "Mass protests erupt in Colombo over economic crisis",
//!     "https://www.adaderana.lk/news/1",
//!     NewsSource::AdaDerana,
//!     Utc::now(),
//! );
//!
//! let assessments = agent.assess_batch(&[article]);
//! assert_eq!(assessments[0].risk_level, RiskLevel::High);
//!
//! let summary = ExecutiveSummaryBuilder::new().summarize(&assessments);
//! assert_eq!(summary.high_priority_count, 1);
//! # Ok::<(), lankawatch_agent::AgentError>(())
//! ```

#![warn(missing_docs)]

mod catalog;
mod config;
mod error;
mod keyword;
mod language_model;
mod parser;
mod prompt;
mod react;
mod summary;
mod types;


pub use catalog::{builtin_categories, CategoryHit, RiskCategoryCatalog};
pub use config::{ActionTable, AgentConfig, LlmConfig, Thresholds};
pub use error::{AgentError, LlmFailure};
pub use keyword::{KeywordRiskStrategy, NO_INDICATORS};
pub use language_model::LanguageModelRiskStrategy;
pub use parser::{parse_llm_response, ParsedResponse};
pub use prompt::{PromptBuilder, RESPONSE_SCHEMA};
pub use react::{ReActLoop, Strategy, MAX_ITERATIONS};
pub use summary::ExecutiveSummaryBuilder;
pub use types::Verdict;
