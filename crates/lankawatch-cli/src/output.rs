//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use crate::report::RiskReport;
use colored::*;
use lankawatch_agent::RiskCategoryCatalog;
use lankawatch_domain::{ExecutiveSummary, RiskAssessment, RiskLevel};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

const TITLE_WIDTH: usize = 60;

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format a batch report.
    pub fn format_report(&self, report: &RiskReport<'_>) -> Result<String> {
        match self.format {
            OutputFormat::Json => report.to_json(),
            OutputFormat::Table => Ok(format!(
                "{}\n\n{}",
                self.format_assessments_table(report.assessments),
                self.format_summary_table(report.summary)
            )),
            OutputFormat::Quiet => Ok(self.format_assessments_quiet(report.assessments)),
        }
    }

    fn format_assessments_table(&self, assessments: &[RiskAssessment]) -> String {
        if assessments.is_empty() {
            return self.colorize("No articles assessed.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["#", "Level", "Confidence", "Categories", "Title"]);

        for (i, assessment) in assessments.iter().enumerate() {
            let categories = if assessment.risk_categories.is_empty() {
                "-".to_string()
            } else {
                assessment.risk_categories.join(", ")
            };
            let mut confidence = format!("{:.0}%", assessment.confidence * 100.0);
            if assessment.used_fallback() {
                confidence.push_str(" (fallback)");
            }
            builder.push_record([
                (i + 1).to_string(),
                self.level_label(assessment.risk_level),
                confidence,
                categories,
                truncate(&assessment.article_title, TITLE_WIDTH),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    fn format_summary_table(&self, summary: &ExecutiveSummary) -> String {
        let mut out = String::new();
        out.push_str(&self.colorize("Executive Summary", "cyan"));
        out.push('\n');
        out.push_str(&format!(
            "Articles: {}  High priority: {}  Average confidence: {:.0}%\n",
            summary.total_articles,
            summary.high_priority_count,
            summary.average_confidence * 100.0
        ));

        let mut levels = Builder::default();
        levels.push_record(["Level", "Articles"]);
        for level in RiskLevel::ALL {
            levels.push_record([
                self.level_label(level),
                summary.risk_distribution.count(level).to_string(),
            ]);
        }
        let mut levels = levels.build();
        levels.with(Style::rounded());
        out.push_str(&levels.to_string());

        if !summary.top_risk_categories.is_empty() {
            let mut categories = Builder::default();
            categories.push_record(["Category", "Articles"]);
            for entry in &summary.top_risk_categories {
                categories.push_record([entry.category.clone(), entry.count.to_string()]);
            }
            let mut categories = categories.build();
            categories.with(Style::rounded());
            out.push('\n');
            out.push_str(&categories.to_string());
        }

        if !summary.high_priority_articles.is_empty() {
            out.push('\n');
            out.push_str(&self.colorize("High priority", "red"));
            for assessment in &summary.high_priority_articles {
                out.push_str(&format!(
                    "\n  [{}] {}\n      {}",
                    assessment.risk_level, assessment.article_title, assessment.article_url
                ));
            }
        }

        out
    }

    fn format_assessments_quiet(&self, assessments: &[RiskAssessment]) -> String {
        assessments
            .iter()
            .map(|a| format!("{}\t{}", a.risk_level, a.article_url))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Format the reasoning trace of one assessment.
    pub fn format_trace(&self, assessment: &RiskAssessment) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(assessment)?),
            OutputFormat::Table => Ok(format!(
                "{}\n{} at {:.0}% confidence\n\n{}",
                self.colorize(&assessment.article_title, "cyan"),
                self.level_label(assessment.risk_level),
                assessment.confidence * 100.0,
                assessment.format_trace()
            )),
            OutputFormat::Quiet => Ok(assessment
                .reasoning_trace
                .steps()
                .iter()
                .map(|s| s.action.to_string())
                .collect::<Vec<_>>()
                .join(" -> ")),
        }
    }

    /// Format the active risk category catalog.
    pub fn format_catalog(&self, catalog: &RiskCategoryCatalog) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(catalog.categories())?),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Category", "Weight", "Trigger terms"]);
                for category in catalog.categories() {
                    builder.push_record([
                        category.name.clone(),
                        format!("{:.1}", category.base_weight),
                        category.trigger_terms.join(", "),
                    ]);
                }
                let mut table = builder.build();
                table
                    .with(Style::rounded())
                    .with(Modify::new(Rows::first()).with(Alignment::center()));
                Ok(table.to_string())
            }
            OutputFormat::Quiet => Ok(catalog
                .categories()
                .iter()
                .map(|c| c.name.as_str())
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Risk level, colored by severity.
    fn level_label(&self, level: RiskLevel) -> String {
        let color = match level {
            RiskLevel::Critical => "red",
            RiskLevel::High => "magenta",
            RiskLevel::Medium => "yellow",
            RiskLevel::Low => "blue",
            RiskLevel::None => "green",
        };
        self.colorize(level.as_str(), color)
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            "magenta" => text.magenta().to_string(),
            _ => text.to_string(),
        }
    }
}

/// Shorten to `width` characters, marking the cut with an ellipsis.
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut short: String = text.chars().take(width.saturating_sub(1)).collect();
    short.push('…');
    short
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use lankawatch_agent::{AgentConfig, ExecutiveSummaryBuilder, ReActLoop};
    use lankawatch_domain::{Article, NewsSource};
    use lankawatch_llm::MockProvider;

    fn assess(titles: &[&str]) -> Vec<RiskAssessment> {
        let agent = ReActLoop::<MockProvider>::new(AgentConfig::default(), None).unwrap();
        let articles: Vec<Article> = titles
            .iter()
            .enumerate()
            .map(|(i, t)| {
                Article::new(*t, format!("https://x.lk/{}", i), NewsSource::AdaDerana, Utc::now())
            })
            .collect();
        agent.assess_batch(&articles)
    }

    #[test]
    fn test_table_report() {
        let assessments = assess(&["Mass protests erupt in Colombo over economic crisis", "Cricket"]);
        let summary = ExecutiveSummaryBuilder::new().summarize(&assessments);
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter
            .format_report(&RiskReport::new(&summary, &assessments))
            .unwrap();

        assert!(output.contains("Confidence"));
        assert!(output.contains("Civil Unrest, Economic Crisis"));
        assert!(output.contains("Executive Summary"));
        assert!(output.contains("High priority"));
    }

    #[test]
    fn test_json_report() {
        let assessments = assess(&["Cricket"]);
        let summary = ExecutiveSummaryBuilder::new().summarize(&assessments);
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter
            .format_report(&RiskReport::new(&summary, &assessments))
            .unwrap();

        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["summary"]["total_articles"], 1);
        assert_eq!(json["assessments"][0]["risk_level"], "None");
    }

    #[test]
    fn test_quiet_report() {
        let assessments = assess(&["Cricket", "Bomb blast in Kandy"]);
        let summary = ExecutiveSummaryBuilder::new().summarize(&assessments);
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let output = formatter
            .format_report(&RiskReport::new(&summary, &assessments))
            .unwrap();

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "None\thttps://x.lk/0");
    }

    #[test]
    fn test_empty_report() {
        let summary = ExecutiveSummaryBuilder::new().summarize(&[]);
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_report(&RiskReport::new(&summary, &[])).unwrap();
        assert!(output.contains("No articles assessed"));
    }

    #[test]
    fn test_trace_formats() {
        let assessments = assess(&["Cricket"]);
        let table = Formatter::new(OutputFormat::Table, false)
            .format_trace(&assessments[0])
            .unwrap();
        assert!(table.contains("=== Agent Reasoning Trace ==="));
        assert!(table.contains("--- Step 2 ---"));

        let quiet = Formatter::new(OutputFormat::Quiet, false)
            .format_trace(&assessments[0])
            .unwrap();
        assert_eq!(quiet, "ANALYZE_KEYWORDS -> CONCLUDE");
    }

    #[test]
    fn test_catalog_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_catalog(&RiskCategoryCatalog::builtin()).unwrap();
        assert!(output.contains("Trigger terms"));
        assert!(output.contains("Terrorism"));

        let quiet = Formatter::new(OutputFormat::Quiet, false)
            .format_catalog(&RiskCategoryCatalog::builtin())
            .unwrap();
        assert_eq!(quiet.lines().count(), RiskCategoryCatalog::builtin().len());
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("test"), "✓ test");
        assert_eq!(formatter.level_label(RiskLevel::High), "High");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
    }
}
