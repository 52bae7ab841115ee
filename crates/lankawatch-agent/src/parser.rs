//! Parse LLM output into a risk verdict

use crate::catalog::RiskCategoryCatalog;
use crate::error::LlmFailure;
use lankawatch_domain::RiskLevel;
use serde_json::{Map, Value};
use tracing::warn;

/// Fields read from a model answer, validated against the catalog
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedResponse {
    /// Severity label
    pub level: RiskLevel,
    /// Known category names in catalog order
    pub categories: Vec<String>,
    /// Confidence in [0.0, 1.0]
    pub confidence: f64,
    /// Model's evidence summary
    pub reasoning: String,
    /// Model's suggested next steps
    pub actions: Vec<String>,
}

/// Parse an LLM response into a validated verdict
///
/// Unknown category names are dropped with a warning. A level of `None`
/// with categories, or any other level without, is rejected.
pub fn parse_llm_response(
    response: &str,
    catalog: &RiskCategoryCatalog,
) -> Result<ParsedResponse, LlmFailure> {
    let json_str = extract_json(response)?;

    let json: Value = serde_json::from_str(json_str)?;

    let obj = json
        .as_object()
        .ok_or_else(|| LlmFailure::Malformed("Expected JSON object".to_string()))?;

    let level_str = required_str(obj, "risk_level")?;
    let level = RiskLevel::parse(level_str).ok_or_else(|| LlmFailure::InvalidField {
        field: "risk_level",
        reason: format!("unknown level '{}'", level_str),
    })?;

    let categories = resolve_categories(required_str_list(obj, "categories")?, catalog);
    let confidence = normalize_confidence(
        obj.get("confidence")
            .and_then(|v| v.as_f64())
            .ok_or(LlmFailure::MissingField("confidence"))?,
    )?;
    let reasoning = required_str(obj, "reasoning")?.trim().to_string();
    let actions: Vec<String> = required_str_list(obj, "actions")?
        .into_iter()
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
        .collect();

    if (level == RiskLevel::None) != categories.is_empty() {
        return Err(LlmFailure::InvalidField {
            field: "risk_level",
            reason: format!(
                "level {} is inconsistent with {} known categor{}",
                level,
                categories.len(),
                if categories.len() == 1 { "y" } else { "ies" }
            ),
        });
    }

    Ok(ParsedResponse {
        level,
        categories,
        confidence,
        reasoning,
        actions,
    })
}

/// Extract the JSON object from a response
///
/// Handles `<think>` blocks, markdown code fences and prose around the
/// object.
fn extract_json(response: &str) -> Result<&str, LlmFailure> {
    let cleaned = strip_think_blocks(response);
    let mut body = cleaned.trim();

    // Check if wrapped in markdown code block
    if let Some(start) = body.find("```") {
        let after_fence = &body[start + 3..];
        let content_start = after_fence.find('\n').map(|i| i + 1).unwrap_or(0);
        let content = &after_fence[content_start..];
        body = match content.find("```") {
            Some(end) => &content[..end],
            None => content,
        };
    }

    match (body.find('{'), body.rfind('}')) {
        (Some(start), Some(end)) if end > start => Ok(&body[start..=end]),
        _ => Err(LlmFailure::Malformed(
            "No JSON object found in response".to_string(),
        )),
    }
}

/// Drop reasoning-model scratchpads; an unterminated block drops the rest
fn strip_think_blocks(response: &str) -> &str {
    match response.rfind("</think>") {
        Some(end) => &response[end + "</think>".len()..],
        None => match response.find("<think>") {
            Some(start) => &response[..start],
            None => response,
        },
    }
}

fn required_str<'a>(obj: &'a Map<String, Value>, field: &'static str) -> Result<&'a str, LlmFailure> {
    obj.get(field)
        .and_then(|v| v.as_str())
        .ok_or(LlmFailure::MissingField(field))
}

fn required_str_list<'a>(
    obj: &'a Map<String, Value>,
    field: &'static str,
) -> Result<Vec<&'a str>, LlmFailure> {
    let items = obj
        .get(field)
        .and_then(|v| v.as_array())
        .ok_or(LlmFailure::MissingField(field))?;

    items
        .iter()
        .map(|item| {
            item.as_str().ok_or_else(|| LlmFailure::InvalidField {
                field,
                reason: format!("expected a list of strings, found {}", item),
            })
        })
        .collect()
}

/// Map names onto the catalog, dropping unknown ones and duplicates
fn resolve_categories(names: Vec<&str>, catalog: &RiskCategoryCatalog) -> Vec<String> {
    let mut known = Vec::new();
    for name in names {
        match catalog.get(name) {
            Some(category) => known.push(category.name.as_str()),
            None => warn!("Dropping unknown category from LLM response: '{}'", name),
        }
    }

    catalog
        .categories()
        .iter()
        .filter(|c| known.contains(&c.name.as_str()))
        .map(|c| c.name.clone())
        .collect()
}

/// Accept 0-1 fractions and 1-100 percentages
fn normalize_confidence(raw: f64) -> Result<f64, LlmFailure> {
    if !(0.0..=100.0).contains(&raw) {
        return Err(LlmFailure::InvalidField {
            field: "confidence",
            reason: format!("{} is outside [0, 100]", raw),
        });
    }
    Ok(if raw > 1.0 { raw / 100.0 } else { raw })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> RiskCategoryCatalog {
        RiskCategoryCatalog::builtin()
    }

    const VALID: &str = r#"{
        "risk_level": "High",
        "categories": ["Civil Unrest", "Economic Crisis"],
        "confidence": 0.82,
        "reasoning": "Mass protests tied to economic hardship",
        "actions": ["Monitor protest locations", "Brief stakeholders"]
    }"#;

    #[test]
    fn test_parse_valid_json() {
        let parsed = parse_llm_response(VALID, &catalog()).unwrap();
        assert_eq!(parsed.level, RiskLevel::High);
        assert_eq!(parsed.categories, vec!["Civil Unrest", "Economic Crisis"]);
        assert_eq!(parsed.confidence, 0.82);
        assert_eq!(parsed.actions.len(), 2);
    }

    #[test]
    fn test_parse_json_with_markdown_wrapper() {
        let response = format!("Here is my analysis:\n```json\n{}\n```\nHope this helps.", VALID);
        let parsed = parse_llm_response(&response, &catalog()).unwrap();
        assert_eq!(parsed.level, RiskLevel::High);
    }

    #[test]
    fn test_parse_json_with_think_block() {
        let response = format!(
            "<think>The user wants {{ json }}... protests are serious.</think>\n{}",
            VALID
        );
        let parsed = parse_llm_response(&response, &catalog()).unwrap();
        assert_eq!(parsed.categories.len(), 2);
    }

    #[test]
    fn test_parse_json_with_surrounding_prose() {
        let response = format!("THOUGHT: risky.\n{}\nThat is all.", VALID);
        assert!(parse_llm_response(&response, &catalog()).is_ok());
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(matches!(
            parse_llm_response("This is not JSON", &catalog()),
            Err(LlmFailure::Malformed(_))
        ));
        assert!(matches!(
            parse_llm_response("{ risk_level: High }", &catalog()),
            Err(LlmFailure::Malformed(_))
        ));
    }

    #[test]
    fn test_parse_missing_field() {
        let response = r#"{"risk_level": "Low", "categories": ["Social Issues"], "confidence": 0.3, "reasoning": "x"}"#;
        assert_eq!(
            parse_llm_response(response, &catalog()),
            Err(LlmFailure::MissingField("actions"))
        );
    }

    #[test]
    fn test_parse_unknown_level() {
        let response = r#"{"risk_level": "Severe", "categories": ["Terrorism"], "confidence": 0.9, "reasoning": "x", "actions": []}"#;
        assert!(matches!(
            parse_llm_response(response, &catalog()),
            Err(LlmFailure::InvalidField { field: "risk_level", .. })
        ));
    }

    #[test]
    fn test_percent_confidence_is_normalized() {
        let response = r#"{"risk_level": "Medium", "categories": ["Corruption"], "confidence": 75, "reasoning": "x", "actions": []}"#;
        let parsed = parse_llm_response(response, &catalog()).unwrap();
        assert_eq!(parsed.confidence, 0.75);
    }

    #[test]
    fn test_out_of_range_confidence() {
        let response = r#"{"risk_level": "Medium", "categories": ["Corruption"], "confidence": 150, "reasoning": "x", "actions": []}"#;
        match parse_llm_response(response, &catalog()) {
            Err(LlmFailure::InvalidField { field, reason }) => {
                assert_eq!(field, "confidence");
                assert_eq!(reason, "150 is outside [0, 100]");
            }
            other => panic!("Expected InvalidField, got {:?}", other),
        }

        let response = r#"{"risk_level": "Medium", "categories": ["Corruption"], "confidence": -0.1, "reasoning": "x", "actions": []}"#;
        assert!(parse_llm_response(response, &catalog()).is_err());
    }

    #[test]
    fn test_unknown_categories_dropped() {
        let response = r#"{"risk_level": "Low", "categories": ["natural disaster", "Weather Woes", "Natural Disaster"], "confidence": 0.4, "reasoning": "x", "actions": ["Log it"]}"#;
        let parsed = parse_llm_response(response, &catalog()).unwrap();
        assert_eq!(parsed.categories, vec!["Natural Disaster"]);
    }

    #[test]
    fn test_invariant_violation_rejected() {
        // Level without any known category
        let response = r#"{"risk_level": "High", "categories": ["Weather Woes"], "confidence": 0.4, "reasoning": "x", "actions": []}"#;
        assert!(matches!(
            parse_llm_response(response, &catalog()),
            Err(LlmFailure::InvalidField { field: "risk_level", .. })
        ));

        // None with categories
        let response = r#"{"risk_level": "None", "categories": ["Terrorism"], "confidence": 0.4, "reasoning": "x", "actions": []}"#;
        assert!(parse_llm_response(response, &catalog()).is_err());
    }

    #[test]
    fn test_none_verdict() {
        let response = r#"{"risk_level": "None", "categories": [], "confidence": 0.9, "reasoning": "Human interest story", "actions": []}"#;
        let parsed = parse_llm_response(response, &catalog()).unwrap();
        assert_eq!(parsed.level, RiskLevel::None);
        assert!(parsed.categories.is_empty());
    }

    #[test]
    fn test_non_string_category() {
        let response = r#"{"risk_level": "Low", "categories": [3], "confidence": 0.4, "reasoning": "x", "actions": []}"#;
        assert!(matches!(
            parse_llm_response(response, &catalog()),
            Err(LlmFailure::InvalidField { field: "categories", .. })
        ));
    }

    #[test]
    fn test_extract_json_from_markdown_without_language() {
        let response = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(extract_json(response).unwrap(), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_unterminated_think() {
        assert_eq!(strip_think_blocks("{\"a\":1}<think>partial"), "{\"a\":1}");
        assert_eq!(strip_think_blocks("plain"), "plain");
    }
}
