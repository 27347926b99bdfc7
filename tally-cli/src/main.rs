//! Tally CLI
//!
//! Runs a marketplace scraper on the job-execution service, waits for it to
//! finish, and prints its listings as a leaderboard ranked by units sold.
//!
//! Architecture:
//! - Configuration: flags and environment, validated up front
//! - Scheduler: submits a run and polls it to a terminal status
//! - Services: the pipeline from run to leaderboard
//! - Output: terminal table and CSV export

mod commands;
mod config;
mod error;
mod output;
mod scheduler;
mod service;

#[cfg(test)]
mod testing;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use error::PipelineError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Marketplace top-seller leaderboards from scraper runs", long_about = None)]
struct Cli {
    /// Base URL of the job-execution service API
    #[arg(
        long,
        global = true,
        env = "APIFY_API_URL",
        default_value = tally_client::DEFAULT_BASE_URL
    )]
    api_url: String,

    /// API token
    #[arg(long, global = true, env = "APIFY_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so the leaderboard on stdout stays clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tally_cli=info,tally_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config {
        api_url: cli.api_url,
        token: cli.token,
    };
    config.validate()?;

    let result = handle_command(cli.command, &config).await;

    if let Err(e) = &result {
        let status = e
            .downcast_ref::<PipelineError>()
            .and_then(PipelineError::status_code);
        if matches!(status, Some(401) | Some(403)) {
            tracing::error!("The service rejected the API token; check APIFY_TOKEN");
        }
    }

    result
}
