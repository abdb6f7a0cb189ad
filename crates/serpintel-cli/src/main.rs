use std::io::Write;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use serpintel_engine::{AnalysisRequest, Analyzer};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "serpintel")]
#[command(about = "Competitive search-result intelligence for a keyword")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Analyze the competitors ranking for a keyword
    Analyze {
        /// Keyword or phrase to analyze
        keyword: String,
        /// Your own site; its pages are left out of the competitor list
        #[arg(long)]
        domain: Option<String>,
        /// Print the report on a single line
        #[arg(long)]
        compact: bool,
    },
    /// Show which providers are configured and how their last call went
    Status {
        /// Print the snapshot on a single line
        #[arg(long)]
        compact: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = serpintel_core::load_app_config().context("failed to load configuration")?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(
        env = %config.env,
        timeout_ms = config.provider_timeout_ms,
        "configuration loaded"
    );

    let analyzer = Analyzer::from_config(&config).context("failed to build provider adapters")?;

    match cli.command {
        Commands::Analyze {
            keyword,
            domain,
            compact,
        } => {
            let report = analyzer
                .analyze(&AnalysisRequest { keyword, domain })
                .await?;
            print_json(&report, compact)?;
        }
        Commands::Status { compact } => print_json(&analyzer.status(), compact)?,
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T, compact: bool) -> anyhow::Result<()> {
    let rendered = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{rendered}")?;
    Ok(())
}

#[cfg(test)]
mod tests;
