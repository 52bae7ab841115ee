//! Error types for the risk agent

use lankawatch_llm::LlmError;
use thiserror::Error;

/// Errors raised while setting the agent up
///
/// These are fatal: they are reported before any article is processed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AgentError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid risk category catalog
    #[error("Invalid catalog: {0}")]
    Catalog(String),
}

/// Why a language model verdict could not be used
///
/// Every variant is recovered locally by falling back to the keyword scan.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LlmFailure {
    /// Network, HTTP or provider-side error
    #[error("provider error: {0}")]
    Provider(String),

    /// The call did not finish in time
    #[error("timed out after {0}s")]
    Timeout(u64),

    /// The provider refused the call for rate limiting
    #[error("rate limited by provider")]
    RateLimited,

    /// No JSON object could be read from the response
    #[error("malformed response: {0}")]
    Malformed(String),

    /// A required field is absent or has the wrong JSON type
    #[error("missing field '{0}'")]
    MissingField(&'static str),

    /// A field is present but its value is unusable
    #[error("invalid value for '{field}': {reason}")]
    InvalidField {
        /// Offending field
        field: &'static str,
        /// What was wrong with it
        reason: String,
    },
}

impl From<LlmError> for LlmFailure {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::Timeout(secs) => LlmFailure::Timeout(secs),
            LlmError::RateLimitExceeded => LlmFailure::RateLimited,
            LlmError::InvalidResponse(msg) => LlmFailure::Malformed(msg),
            other => LlmFailure::Provider(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for LlmFailure {
    fn from(e: serde_json::Error) -> Self {
        LlmFailure::Malformed(format!("JSON parse error: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_llm_error_mapping() {
        assert_eq!(LlmFailure::from(LlmError::Timeout(7)), LlmFailure::Timeout(7));
        assert_eq!(
            LlmFailure::from(LlmError::RateLimitExceeded),
            LlmFailure::RateLimited
        );
        assert!(matches!(
            LlmFailure::from(LlmError::Communication("refused".into())),
            LlmFailure::Provider(msg) if msg.contains("refused")
        ));
    }

    #[test]
    fn test_failure_messages() {
        let failure = LlmFailure::InvalidField {
            field: "confidence",
            reason: "150 is outside [0, 100]".to_string(),
        };
        assert_eq!(
            failure.to_string(),
            "invalid value for 'confidence': 150 is outside [0, 100]"
        );
        assert_eq!(
            LlmFailure::MissingField("risk_level").to_string(),
            "missing field 'risk_level'"
        );
    }
}
