mod render;
mod viewer;

use anyhow::{Context, Result};
use chrono::Datelike;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use wrapped_analytics::{Aggregator, ReportGenerator};
use wrapped_core::config::AppConfig;
use wrapped_core::types::ConversationRecord;

#[derive(Parser)]
#[command(
    name = "chat-wrapped",
    about = "A year-in-review story for your chat assistant history",
    version,
    author
)]
struct Cli {
    /// Path to config file (default: ~/.config/chat-wrapped/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the statistics report for an export
    Summary {
        /// Export file (conversations.json)
        export: PathBuf,
        /// Emit the summary as JSON instead of markdown
        #[arg(long)]
        json: bool,
        /// Only include conversations started in this year
        #[arg(long)]
        year: Option<i32>,
    },

    /// Step through the story in the terminal
    Story {
        /// Export file (conversations.json)
        export: PathBuf,
        /// Only include conversations started in this year
        #[arg(long)]
        year: Option<i32>,
    },

    /// Show or manage configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Initialize default configuration file
    Init,
    /// Print config file path
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up tracing.
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new(std::env::var("RUST_LOG").unwrap_or_else(|_| "chat_wrapped=info,warn".into()))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Load config.
    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => AppConfig::load()?,
    };

    match cli.command {
        Commands::Summary { export, json, year } => {
            let records = load_records(&export, &config, year).await?;
            let summary = Aggregator::from_config(&config).aggregate(&records);
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print!("{}", ReportGenerator::markdown_report(&summary, &heading(year)));
            }
        }
        Commands::Story { export, year } => {
            let records = load_records(&export, &config, year).await?;
            let summary = Arc::new(Aggregator::from_config(&config).aggregate(&records));
            viewer::run(summary, &config.story, &heading(year))?;
        }
        Commands::Config { action } => {
            handle_config_command(action, &config)?;
        }
    }

    Ok(())
}

async fn load_records(
    export: &Path,
    config: &AppConfig,
    year: Option<i32>,
) -> Result<Vec<ConversationRecord>> {
    let ingested = wrapped_core::load_export_async(export, &config.timezone)
        .await
        .with_context(|| format!("reading export {}", export.display()))?;
    if ingested.skipped > 0 {
        tracing::warn!("Skipped {} malformed entries", ingested.skipped);
    }

    let records = filter_year(ingested.records, year);
    tracing::info!("Loaded {} conversations", records.len());
    Ok(records)
}

/// Keep records started in `year`; undated records only survive without a filter.
fn filter_year(records: Vec<ConversationRecord>, year: Option<i32>) -> Vec<ConversationRecord> {
    match year {
        Some(year) => records
            .into_iter()
            .filter(|r| r.date().is_some_and(|d| d.year() == year))
            .collect(),
        None => records,
    }
}

fn heading(year: Option<i32>) -> String {
    match year {
        Some(year) => format!("Your {} Chat Wrapped", year),
        None => "Your Chat Wrapped".to_string(),
    }
}

fn handle_config_command(action: Option<ConfigAction>, config: &AppConfig) -> Result<()> {
    match action {
        Some(ConfigAction::Show) | None => {
            let toml_str = toml::to_string_pretty(config)?;
            println!("{}", toml_str);
        }
        Some(ConfigAction::Init) => {
            let path = AppConfig::default_path();
            if path.exists() {
                println!("Config already exists at: {}", path.display());
            } else {
                config.save()?;
                println!("Created default config at: {}", path.display());
            }
        }
        Some(ConfigAction::Path) => {
            println!("{}", AppConfig::default_path().display());
        }
    }
    Ok(())
}
