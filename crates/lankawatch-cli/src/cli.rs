//! CLI command definitions and argument parsing.

use clap::{Args, Parser, Subcommand};
use lankawatch_agent::AgentConfig;
use std::path::PathBuf;

/// LankaWatch - Risk assessment for Sri Lankan news headlines.
#[derive(Debug, Parser)]
#[command(name = "lankawatch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "LANKAWATCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (one line per article)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Assess a batch of annotated articles and write the risk report
    Assess(AssessArgs),

    /// List the active risk categories
    Catalog,

    /// Show the reasoning trace for one article
    Trace(TraceArgs),

    /// Show or initialize the configuration file
    Config(ConfigArgs),
}

/// Where to read the article array from.
#[derive(Debug, Args)]
pub struct InputArgs {
    /// JSON file containing an array of annotated articles
    #[arg(long, required_unless_present = "stdin")]
    pub file: Option<PathBuf>,

    /// Read the JSON article array from stdin
    #[arg(long, conflicts_with = "file")]
    pub stdin: bool,
}

/// Flags overriding the `[agent]` configuration section.
#[derive(Debug, Args)]
pub struct AgentArgs {
    /// Ask the language model first, with keyword fallback
    #[arg(long)]
    pub use_llm: bool,

    /// Language model to use
    #[arg(short, long)]
    pub model: Option<String>,
}

impl AgentArgs {
    /// Apply the flags on top of a loaded configuration.
    pub fn apply(&self, mut config: AgentConfig) -> AgentConfig {
        if self.use_llm {
            config.use_llm = true;
        }
        if let Some(model) = &self.model {
            config.llm.model = model.clone();
        }
        config
    }
}

/// Arguments for the assess command.
#[derive(Debug, Parser)]
pub struct AssessArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub agent: AgentArgs,

    /// Directory for risk_analysis_report.json
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Skip writing the report file
    #[arg(long)]
    pub no_report: bool,
}

/// Arguments for the trace command.
#[derive(Debug, Parser)]
pub struct TraceArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub agent: AgentArgs,

    /// Position of the article in the input, starting at 1
    #[arg(short = 'n', long, default_value = "1")]
    pub index: usize,
}

/// Arguments for configuration management.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}
