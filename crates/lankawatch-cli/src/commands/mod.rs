//! Command implementations.

pub mod assess;
pub mod catalog;
pub mod config;
pub mod trace;

pub use self::assess::execute_assess;
pub use self::catalog::execute_catalog;
pub use self::config::execute_config;
pub use self::trace::execute_trace;

use crate::cli::InputArgs;
use crate::error::{CliError, Result};
use lankawatch_agent::{AgentConfig, ReActLoop};
use lankawatch_domain::Article;
use lankawatch_llm::{LlmError, OpenAiProvider};
use std::fs;
use std::io::{self, Read};
use tracing::{info, warn};

/// Read the annotated article array from a file or stdin.
pub fn read_articles(input: &InputArgs) -> Result<Vec<Article>> {
    let json_data = if input.stdin {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else if let Some(file_path) = &input.file {
        fs::read_to_string(file_path)?
    } else {
        return Err(CliError::InvalidInput(
            "Must specify either --file or --stdin".to_string(),
        ));
    };

    parse_articles(&json_data)
}

/// Parse a JSON array of annotated articles.
pub fn parse_articles(json_data: &str) -> Result<Vec<Article>> {
    let articles: Vec<Article> = serde_json::from_str(json_data)?;
    info!("Loaded {} articles", articles.len());
    Ok(articles)
}

/// Build the agent, wiring in the OpenAI-compatible provider when enabled.
///
/// A missing API key downgrades to keyword analysis instead of failing.
pub fn build_agent(config: AgentConfig) -> Result<ReActLoop<OpenAiProvider>> {
    let provider = if config.use_llm {
        let llm = &config.llm;
        match OpenAiProvider::from_env(&llm.endpoint, &llm.model, &llm.api_key_env) {
            Ok(provider) => Some(
                provider
                    .with_timeout(llm.timeout_secs)
                    .with_max_retries(llm.max_retries)
                    .with_temperature(llm.temperature),
            ),
            Err(LlmError::MissingApiKey(var)) => {
                warn!("{} is not set, using keyword analysis", var);
                None
            }
            Err(e) => {
                return Err(CliError::Config(format!(
                    "Failed to create LLM provider: {}",
                    e
                )))
            }
        }
    } else {
        None
    };

    Ok(ReActLoop::new(config, provider)?)
}
