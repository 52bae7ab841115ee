//! Assess command implementation.

use crate::cli::AssessArgs;
use crate::commands::{build_agent, read_articles};
use crate::config::{Config, OutputFormat};
use crate::error::Result;
use crate::output::Formatter;
use crate::report::RiskReport;
use lankawatch_agent::ExecutiveSummaryBuilder;

/// Execute the assess command.
pub fn execute_assess(args: AssessArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let articles = read_articles(&args.input)?;
    let agent = build_agent(args.agent.apply(config.agent.clone()))?;

    let assessments = agent.assess_batch(&articles);
    let summary = ExecutiveSummaryBuilder::new().summarize(&assessments);
    let report = RiskReport::new(&summary, &assessments);

    let written = if args.no_report {
        None
    } else {
        let dir = args
            .output_dir
            .unwrap_or_else(|| config.report.output_dir.clone());
        Some(report.write(&dir)?)
    };

    println!("{}", formatter.format_report(&report)?);

    if formatter.format() == OutputFormat::Table {
        let fallbacks = assessments.iter().filter(|a| a.used_fallback()).count();
        if fallbacks > 0 {
            println!(
                "{}",
                formatter.warning(&format!(
                    "{} of {} assessments fell back to keyword analysis",
                    fallbacks,
                    assessments.len()
                ))
            );
        }
        if let Some(path) = written {
            println!(
                "{}",
                formatter.info(&format!("Report written to {}", path.display()))
            );
        }
    }

    Ok(())
}
