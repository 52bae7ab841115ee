//! LLM prompt engineering for risk assessment

use crate::catalog::RiskCategoryCatalog;
use lankawatch_domain::Article;

/// Builds the system and user prompts for one article
pub struct PromptBuilder<'a> {
    article: &'a Article,
    catalog: &'a RiskCategoryCatalog,
}

impl<'a> PromptBuilder<'a> {
    /// Create a new prompt builder
    pub fn new(article: &'a Article, catalog: &'a RiskCategoryCatalog) -> Self {
        Self { article, catalog }
    }

    /// Build the system prompt: analyst role plus the enumerated categories
    pub fn system(&self) -> String {
        let mut prompt = String::from(SYSTEM_INSTRUCTIONS);
        prompt.push_str("\n\nRisk categories to consider (use these exact names):\n");
        for category in self.catalog.categories() {
            prompt.push_str(&format!("- {}\n", category.name));
        }
        prompt
    }

    /// Build the user prompt describing the article
    pub fn build(&self) -> String {
        let article = self.article;
        let mut prompt = String::from("Analyze this news article for risk assessment:\n\n");

        // 1. The article itself
        prompt.push_str(&format!("Title: {}\n", article.title.trim()));
        prompt.push_str(&format!("Source: {}\n", article.source));
        prompt.push_str(&format!("URL: {}\n", article.url));
        prompt.push_str(&format!(
            "Published: {}\n",
            article.published_at.format("%Y-%m-%d %H:%M UTC")
        ));
        if let Some(description) = article.description.as_deref().filter(|d| !d.trim().is_empty()) {
            prompt.push_str(&format!("Content: {}\n", description.trim()));
        }

        // 2. Upstream annotations, when present
        if let Some(topic) = article.topic {
            prompt.push_str(&format!("Topic: {}\n", topic));
        }
        if let Some(sentiment) = article.sentiment {
            prompt.push_str(&format!("Sentiment: {}\n", sentiment.as_str()));
        }
        if !article.entities.is_empty() {
            prompt.push_str("Entities:\n");
            for entity in &article.entities {
                prompt.push_str(&format!("- {} ({:?})\n", entity.text, entity.kind));
            }
        }
        prompt.push('\n');

        // 3. Output format reminder
        prompt.push_str(OUTPUT_FORMAT_REMINDER);

        prompt
    }
}

/// Shape of the expected answer, handed to structured-output providers
pub const RESPONSE_SCHEMA: &str = r#"{
  "risk_level": "Critical | High | Medium | Low | None",
  "categories": ["category name", "..."],
  "confidence": 0.0-1.0,
  "reasoning": "one or two sentences of evidence",
  "actions": ["most urgent next step", "..."]
}"#;

const SYSTEM_INSTRUCTIONS: &str = r#"You are an expert risk analyst for a risk intelligence team.
Your task is to analyze news articles from Sri Lanka and identify potential risks.

Reason step by step before answering:
- THOUGHT: what risks might this article indicate?
- ACTION: what should an analyst do with this information?
- OBSERVATION: what specific evidence in the article supports the assessment?

When analyzing:
1. Look for specific indicators of each risk type
2. Consider severity and potential impact
3. Assess how certain you are
4. Recommend 2-3 specific next steps (monitor, investigate, escalate)

Rules:
- Only use category names from the list below; use an empty list when no risk applies
- risk_level "None" must come with an empty category list, and any other level with at least one category
- confidence is a number between 0.0 and 1.0"#;

const OUTPUT_FORMAT_REMINDER: &str = r#"Output format (JSON object only, no additional text):
{
  "risk_level": "Critical | High | Medium | Low | None",
  "categories": ["category name"],
  "confidence": 0.0-1.0,
  "reasoning": "evidence",
  "actions": ["next step"]
}

Remember: Return ONLY valid JSON, no markdown code blocks, no explanations."#;
