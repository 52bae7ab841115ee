//! LankaWatch LLM Provider Layer
//!
//! Pluggable LLM provider implementations for the risk agent.
//!
//! # Architecture
//!
//! This crate provides implementations of the `LlmProvider` trait from
//! `lankawatch-domain`. Calls are synchronous from the caller's point of view
//! and bounded in time by the provider.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing, with scriptable failures
//! - `OpenAiProvider`: OpenAI-compatible chat-completions API
//!
//! # Examples
//!
//! ```
//! use lankawatch_llm::MockProvider;
//! use lankawatch_domain::traits::LlmProvider;
//!
//! let provider = MockProvider::new("Hello from LLM!");
//! let result = provider.generate("system", "test prompt").unwrap();
//! assert_eq!(result, "Hello from LLM!");
//! ```

#![warn(missing_docs)]

pub mod openai;

use lankawatch_domain::traits::LlmProvider as LlmProviderTrait;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

pub use openai::OpenAiProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// The call did not complete within the configured bound
    #[error("Request timed out after {0}s")]
    Timeout(u64),

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// No API key in the named environment variable
    #[error("API key not set: environment variable {0} is empty or missing")]
    MissingApiKey(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

#[derive(Debug, Default)]
struct MockState {
    // (trigger, reply); first trigger contained in the prompt wins
    replies: Vec<(String, Result<String, LlmError>)>,
    call_count: usize,
    last_prompt: Option<String>,
}

/// Mock LLM provider for deterministic testing
///
/// This provider returns pre-configured responses without making any network
/// calls. Replies are keyed by a trigger substring: the first registered
/// trigger found in the user prompt decides the reply, otherwise the default
/// applies.
///
/// # Examples
///
/// ```
/// use lankawatch_llm::{LlmError, MockProvider};
/// use lankawatch_domain::traits::LlmProvider;
///
/// // Simple fixed response
/// let provider = MockProvider::new("Fixed response");
/// assert_eq!(provider.generate("sys", "any prompt").unwrap(), "Fixed response");
///
/// // Responses keyed by what the prompt mentions
/// let mut provider = MockProvider::default();
/// provider.add_response("protest", "response1");
/// provider.add_error("flood", LlmError::RateLimitExceeded);
/// assert_eq!(provider.generate("sys", "Title: protest in Colombo").unwrap(), "response1");
/// assert!(provider.generate("sys", "Title: flood warning").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_reply: Result<String, LlmError>,
    model: String,
    state: Arc<Mutex<MockState>>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_reply: Ok(response.into()),
            model: "mock".to_string(),
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    /// Create a MockProvider whose every call fails with `error`
    pub fn failing(error: LlmError) -> Self {
        Self {
            default_reply: Err(error),
            ..Self::default()
        }
    }

    /// Add a response for prompts containing `trigger`
    pub fn add_response(&mut self, trigger: impl Into<String>, response: impl Into<String>) {
        self.lock().replies.push((trigger.into(), Ok(response.into())));
    }

    /// Configure to return an error for prompts containing `trigger`
    pub fn add_error(&mut self, trigger: impl Into<String>, error: LlmError) {
        self.lock().replies.push((trigger.into(), Err(error)));
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> usize {
        self.lock().call_count
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        self.lock().call_count = 0;
    }

    /// The most recent user prompt received
    pub fn last_prompt(&self) -> Option<String> {
        self.lock().last_prompt.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl LlmProviderTrait for MockProvider {
    type Error = LlmError;

    fn generate(&self, _system: &str, prompt: &str) -> Result<String, Self::Error> {
        let mut state = self.lock();
        state.call_count += 1;
        state.last_prompt = Some(prompt.to_string());

        state
            .replies
            .iter()
            .find(|(trigger, _)| prompt.contains(trigger.as_str()))
            .map(|(_, reply)| reply.clone())
            .unwrap_or_else(|| self.default_reply.clone())
    }

    fn generate_structured(
        &self,
        system: &str,
        prompt: &str,
        _schema: &str,
    ) -> Result<String, Self::Error> {
        self.generate(system, prompt)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_provider_default() {
        let provider = MockProvider::new("Test response");
        let result = provider.generate("sys", "any prompt");
        assert_eq!(result.unwrap(), "Test response");
    }

    #[test]
    fn test_mock_provider_triggered_responses() {
        let mut provider = MockProvider::default();
        provider.add_response("hello", "world");
        provider.add_response("foo", "bar");

        assert_eq!(provider.generate("s", "say hello").unwrap(), "world");
        assert_eq!(provider.generate("s", "foo!").unwrap(), "bar");
        assert_eq!(provider.generate("s", "unknown").unwrap(), "Default mock response");
    }

    #[test]
    fn test_mock_provider_call_count() {
        let provider = MockProvider::new("test");

        assert_eq!(provider.call_count(), 0);

        provider.generate("s", "prompt1").unwrap();
        assert_eq!(provider.call_count(), 1);

        provider.generate("s", "prompt2").unwrap();
        assert_eq!(provider.call_count(), 2);
        assert_eq!(provider.last_prompt().as_deref(), Some("prompt2"));

        provider.reset_call_count();
        assert_eq!(provider.call_count(), 0);
    }

    #[test]
    fn test_mock_provider_error() {
        let mut provider = MockProvider::default();
        provider.add_error("bad prompt", LlmError::Timeout(5));

        let result = provider.generate("s", "a bad prompt");
        assert_eq!(result, Err(LlmError::Timeout(5)));
    }

    #[test]
    fn test_mock_provider_failing() {
        let provider = MockProvider::failing(LlmError::RateLimitExceeded);
        assert_eq!(
            provider.generate("s", "anything"),
            Err(LlmError::RateLimitExceeded)
        );
        assert_eq!(provider.call_count(), 1);
    }

    #[test]
    fn test_mock_provider_structured() {
        let provider = MockProvider::new("{\"ok\": true}");
        let result = provider.generate_structured("s", "prompt", "schema");
        assert_eq!(result.unwrap(), "{\"ok\": true}");
        assert_eq!(provider.model_name(), "mock");
    }

    #[test]
    fn test_mock_provider_clone() {
        let provider1 = MockProvider::new("test");
        let provider2 = provider1.clone();

        provider1.generate("s", "test").unwrap();

        // Both should share the same call count due to Arc
        assert_eq!(provider1.call_count(), 1);
        assert_eq!(provider2.call_count(), 1);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            LlmError::MissingApiKey("OPENAI_API_KEY".into()).to_string(),
            "API key not set: environment variable OPENAI_API_KEY is empty or missing"
        );
        assert_eq!(LlmError::Timeout(30).to_string(), "Request timed out after 30s");
    }
}
