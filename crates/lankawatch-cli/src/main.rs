//! LankaWatch CLI - Risk assessment for annotated Sri Lankan news articles.

use clap::Parser;
use lankawatch_cli::cli::{ConfigAction, ConfigArgs};
use lankawatch_cli::commands;
use lankawatch_cli::{Cli, Command, Config, Formatter};
use tracing::warn;
use tracing_subscriber::EnvFilter;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> lankawatch_cli::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    // Load config, writing the defaults on first run
    let path = match cli.config.clone() {
        Some(path) => path,
        None => Config::default_path()?,
    };
    let first_run = !path.exists();
    let initializing = matches!(
        cli.command,
        Command::Config(ConfigArgs {
            action: ConfigAction::Init { .. }
        })
    );
    let config = match Config::load(&path) {
        Ok(config) => config,
        // A broken file must not block `config init --force`
        Err(e) if initializing => {
            warn!("Ignoring unreadable config {}: {}", path.display(), e);
            Config::default()
        }
        Err(e) => return Err(e),
    };
    if first_run && !initializing {
        if let Err(e) = config.save(&path) {
            warn!("Could not write default config to {}: {}", path.display(), e);
        }
    }

    // Determine output format
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Assess(args) => commands::execute_assess(args, &config, &formatter)?,
        Command::Catalog => commands::execute_catalog(&config, &formatter)?,
        Command::Trace(args) => commands::execute_trace(args, &config, &formatter)?,
        Command::Config(args) => commands::execute_config(args, &config, &path, &formatter)?,
    }

    Ok(())
}

/// Log to stderr; `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
