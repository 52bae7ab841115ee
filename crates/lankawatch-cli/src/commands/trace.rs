//! Trace command implementation.

use crate::cli::TraceArgs;
use crate::commands::{build_agent, read_articles};
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use lankawatch_domain::Article;

/// Execute the trace command.
pub fn execute_trace(args: TraceArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let articles = read_articles(&args.input)?;
    let article = select_article(&articles, args.index)?;
    let agent = build_agent(args.agent.apply(config.agent.clone()))?;

    let assessment = agent.assess(article);
    println!("{}", formatter.format_trace(&assessment)?);
    Ok(())
}

/// Pick an article by its 1-based position.
fn select_article(articles: &[Article], index: usize) -> Result<&Article> {
    index
        .checked_sub(1)
        .and_then(|i| articles.get(i))
        .ok_or_else(|| {
            CliError::InvalidInput(format!(
                "Index {} is out of range, input has {} article(s)",
                index,
                articles.len()
            ))
        })
}
