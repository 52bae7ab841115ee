//! OpenAI-compatible Provider Implementation
//!
//! Talks to any server exposing `POST {endpoint}/chat/completions` in the
//! OpenAI wire format (OpenAI itself, OpenRouter, vLLM, LM Studio, ...).
//!
//! # Features
//!
//! - Bearer token read from a configurable environment variable
//! - Retry logic with exponential backoff
//! - Whole-call timeout, retries included
//! - JSON mode for structured output
//!
//! The `LlmProvider` trait is synchronous. The provider owns a current-thread
//! tokio runtime and blocks on it for each call, so it must not be used from
//! inside another tokio runtime.
//!
//! # Examples
//!
//! ```no_run
//! use lankawatch_llm::OpenAiProvider;
//! use lankawatch_domain::traits::LlmProvider;
//!
//! let provider = OpenAiProvider::from_env(
//!     "https://api.openai.com/v1",
//!     "gpt-4o-mini",
//!     "OPENAI_API_KEY",
//! )?;
//! let reply = provider.generate("You are terse.", "Say hello")?;
//! # Ok::<(), lankawatch_llm::LlmError>(())
//! ```

use crate::LlmError;
use lankawatch_domain::traits::LlmProvider as LlmProviderTrait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Default API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1";

/// Default model
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default environment variable holding the API key
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Default timeout for a whole call (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default number of attempts
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default sampling temperature; low keeps verdicts focused
pub const DEFAULT_TEMPERATURE: f32 = 0.3;

/// Upper bound on completion length
const MAX_TOKENS: u32 = 1000;

/// Chat-completions provider
pub struct OpenAiProvider {
    endpoint: String,
    model: String,
    api_key: String,
    temperature: f32,
    timeout_secs: u64,
    max_retries: u32,
    client: reqwest::Client,
    runtime: tokio::runtime::Runtime,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

/// Request body for the chat-completions API
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

/// Response from the chat-completions API
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiProvider {
    /// Create a new provider
    ///
    /// # Parameters
    ///
    /// - `endpoint`: API base URL without the `/chat/completions` suffix
    /// - `model`: Model to use (e.g., "gpt-4o-mini")
    /// - `api_key`: Bearer token
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Other` if the HTTP client or the runtime cannot be
    /// built.
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| LlmError::Other(format!("Failed to build HTTP client: {}", e)))?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| LlmError::Other(format!("Failed to build runtime: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.into(),
            temperature: DEFAULT_TEMPERATURE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            client,
            runtime,
        })
    }

    /// Create a provider reading the API key from an environment variable
    ///
    /// # Errors
    ///
    /// Returns `LlmError::MissingApiKey` when the variable is unset or blank.
    pub fn from_env(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key_env: &str,
    ) -> Result<Self, LlmError> {
        let api_key = std::env::var(api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| LlmError::MissingApiKey(api_key_env.to_string()))?;
        Self::new(endpoint, model, api_key)
    }

    /// Set the whole-call timeout in seconds
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Set the maximum number of attempts
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Send one chat completion, retrying transient failures
    async fn complete(&self, system: &str, prompt: &str, json_mode: bool) -> Result<String, LlmError> {
        let url = format!("{}/chat/completions", self.endpoint);

        let request_body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.temperature,
            max_tokens: MAX_TOKENS,
            response_format: json_mode.then_some(ResponseFormat {
                kind: "json_object",
            }),
        };

        debug!(
            model = %self.model,
            prompt_chars = prompt.len(),
            json_mode,
            "Sending chat completion"
        );

        // Retry logic with exponential backoff
        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.max_retries.max(1) {
            match self
                .client
                .post(&url)
                .bearer_auth(&self.api_key)
                .timeout(Duration::from_secs(self.timeout_secs))
                .json(&request_body)
                .send()
                .await
            {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let body = response.text().await.map_err(|e| {
                            LlmError::InvalidResponse(format!("Failed to read response: {}", e))
                        })?;
                        return extract_content(&body);
                    } else if status == reqwest::StatusCode::NOT_FOUND {
                        return Err(LlmError::ModelNotAvailable(self.model.clone()));
                    } else if status == reqwest::StatusCode::UNAUTHORIZED
                        || status == reqwest::StatusCode::FORBIDDEN
                    {
                        return Err(LlmError::Communication(format!(
                            "HTTP {}: API key rejected",
                            status
                        )));
                    } else if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        last_error = Some(LlmError::RateLimitExceeded);
                    } else {
                        let error_text = response
                            .text()
                            .await
                            .unwrap_or_else(|_| "Unknown error".to_string());
                        last_error = Some(LlmError::Communication(format!(
                            "HTTP {}: {}",
                            status, error_text
                        )));
                    }
                }
                Err(e) if e.is_timeout() => {
                    last_error = Some(LlmError::Timeout(self.timeout_secs));
                }
                Err(e) => {
                    last_error = Some(LlmError::Communication(format!("Request failed: {}", e)));
                }
            }

            attempts += 1;
            if attempts < self.max_retries {
                // Exponential backoff: 1s, 2s, 4s, etc.
                let delay = Duration::from_secs(2u64.pow(attempts - 1));
                warn!(attempt = attempts, ?delay, "Chat completion failed, retrying");
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error
            .unwrap_or_else(|| LlmError::Communication("Max retries exceeded".to_string())))
    }

    /// Run one call on the owned runtime, bounded by the timeout
    fn call(&self, system: &str, prompt: &str, json_mode: bool) -> Result<String, LlmError> {
        let limit = Duration::from_secs(self.timeout_secs);
        self.runtime.block_on(async {
            tokio::time::timeout(limit, self.complete(system, prompt, json_mode))
                .await
                .unwrap_or(Err(LlmError::Timeout(self.timeout_secs)))
        })
    }
}

/// Pull the first choice's text out of a chat-completions body
fn extract_content(body: &str) -> Result<String, LlmError> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| LlmError::InvalidResponse("Response has no message content".to_string()))?;

    debug!(response_chars = content.len(), "Received chat completion");
    Ok(content)
}

impl LlmProviderTrait for OpenAiProvider {
    type Error = LlmError;

    fn generate(&self, system: &str, prompt: &str) -> Result<String, Self::Error> {
        self.call(system, prompt, false)
    }

    fn generate_structured(
        &self,
        system: &str,
        prompt: &str,
        schema: &str,
    ) -> Result<String, Self::Error> {
        // JSON mode needs the word "JSON" and the shape in the instructions
        let system = format!("{}\n\nRespond with a JSON object of this shape:\n{}", system, schema);
        self.call(&system, prompt, true)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_creation() {
        let provider = OpenAiProvider::new("https://example.test/v1/", "gpt-4o-mini", "k").unwrap();
        assert_eq!(provider.endpoint, "https://example.test/v1");
        assert_eq!(provider.model_name(), "gpt-4o-mini");
        assert_eq!(provider.max_retries, DEFAULT_MAX_RETRIES);
        assert_eq!(provider.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_builder_settings() {
        let provider = OpenAiProvider::new(DEFAULT_ENDPOINT, DEFAULT_MODEL, "k")
            .unwrap()
            .with_max_retries(5)
            .with_timeout(10)
            .with_temperature(0.0);
        assert_eq!(provider.max_retries, 5);
        assert_eq!(provider.timeout_secs, 10);
        assert_eq!(provider.temperature, 0.0);
    }

    #[test]
    fn test_from_env_missing_key() {
        let result = OpenAiProvider::from_env(
            DEFAULT_ENDPOINT,
            DEFAULT_MODEL,
            "LANKAWATCH_TEST_KEY_THAT_IS_NEVER_SET",
        );
        assert!(matches!(result, Err(LlmError::MissingApiKey(_))));
    }

    #[test]
    fn test_request_shape() {
        let request = ChatRequest {
            model: "m",
            messages: vec![ChatMessage {
                role: "user",
                content: "hi",
            }],
            temperature: 0.3,
            max_tokens: MAX_TOKENS,
            response_format: Some(ResponseFormat {
                kind: "json_object",
            }),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["response_format"]["type"], "json_object");

        let plain = ChatRequest {
            response_format: None,
            ..request
        };
        let value = serde_json::to_value(&plain).unwrap();
        assert!(value.get("response_format").is_none());
    }

    #[test]
    fn test_extract_content() {
        let body = r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"{\"risk_level\":\"Low\"}"}}]}"#;
        assert_eq!(extract_content(body).unwrap(), "{\"risk_level\":\"Low\"}");
    }

    #[test]
    fn test_extract_content_errors() {
        assert!(matches!(
            extract_content("not json"),
            Err(LlmError::InvalidResponse(_))
        ));
        assert!(matches!(
            extract_content(r#"{"choices":[]}"#),
            Err(LlmError::InvalidResponse(_))
        ));
        assert!(matches!(
            extract_content(r#"{"choices":[{"message":{"content":null}}]}"#),
            Err(LlmError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_error_handling() {
        // Use invalid endpoint to trigger error
        let provider = OpenAiProvider::new("http://localhost:99999", "m", "k")
            .unwrap()
            .with_max_retries(1);

        match provider.generate("sys", "test") {
            Err(LlmError::Communication(_)) => {} // Expected
            other => panic!("Expected Communication error, got {:?}", other),
        }
    }

    // Integration tests (requires a reachable endpoint and OPENAI_API_KEY)
    #[test]
    #[ignore]
    fn test_generate_integration() {
        let provider =
            OpenAiProvider::from_env(DEFAULT_ENDPOINT, DEFAULT_MODEL, DEFAULT_API_KEY_ENV).unwrap();
        let response = provider.generate("Be terse.", "Say 'hello' and nothing else");
        assert!(response.map(|r| !r.is_empty()).unwrap_or(false));
    }
}
