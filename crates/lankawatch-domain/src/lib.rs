//! LankaWatch Domain Layer
//!
//! This crate contains the data model shared by every other LankaWatch crate:
//! the annotated news articles handed over by the upstream analysis pipeline,
//! the risk vocabulary, and the verdicts produced by the risk agent.
//!
//! ## Key Concepts
//!
//! - **Article**: An immutable, already-annotated news headline
//! - **Risk Level**: Totally ordered severity (None < Low < Medium < High < Critical)
//! - **Risk Category**: A named class of adverse event with trigger terms and a weight
//! - **Reasoning Trace**: Ordered Thought → Action → Observation steps
//! - **Risk Assessment**: The verdict for one article, trace included
//! - **Executive Summary**: Batch-level aggregation of assessments
//!
//! ## Architecture
//!
//! Only plain data types and the seam traits live here. Infrastructure
//! (LLM providers) and application logic (strategies, the ReAct loop) live in
//! other crates and depend on this one.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod article;
pub mod assessment;
pub mod category;
pub mod level;
pub mod reasoning;
pub mod summary;
pub mod traits;

// Re-exports for convenience
pub use article::{Article, Entity, EntityKind, NewsSource, Sentiment, Topic};
pub use assessment::{RiskAssessment, GEOGRAPHIC_SCOPE};
pub use category::RiskCategory;
pub use level::RiskLevel;
pub use reasoning::{ReasoningAction, ReasoningStep, ReasoningTrace};
pub use summary::{CategoryCount, ExecutiveSummary, RiskDistribution};
