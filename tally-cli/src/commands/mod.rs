//! Commands module
//!
//! Defines all CLI commands, the argument groups they share, and their
//! handlers.

mod dataset;
mod run;
mod status;

pub use dataset::DatasetArgs;
pub use run::RunArgs;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Args, Subcommand};
use tally_client::{ApifyClient, FetchOptions};
use tally_core::domain::filter::FilterSpec;
use tally_core::domain::run::Credentials;
use tally_core::normalize::PriceScale;
use tracing::debug;

use crate::config::Config;
use crate::error::PipelineError;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Run the scraper actor, wait for it and print the leaderboard
    Run(RunArgs),
    /// Show the current status of a run
    Status {
        /// Run identifier
        run_id: String,
    },
    /// Rank the items of an existing dataset without starting a run
    Dataset(DatasetArgs),
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Run(args) => run::handle_run_command(args, config).await,
        Commands::Status { run_id } => status::handle_status_command(&run_id, config).await,
        Commands::Dataset(args) => dataset::handle_dataset_command(args, config).await,
    }
}

/// Leaderboard filters
#[derive(Args, Debug, Clone)]
pub struct FilterArgs {
    /// Minimum historical units sold
    #[arg(long, default_value_t = 0)]
    pub min_sold: u64,

    /// Minimum rating (0.0 - 5.0)
    #[arg(long, default_value_t = 0.0, value_parser = parse_rating)]
    pub min_rating: f64,

    /// Minimum price, in whole currency units
    #[arg(long, default_value_t = 0.0)]
    pub min_price: f64,

    /// Maximum price, in whole currency units (0 = unbounded)
    #[arg(long, default_value_t = 0.0)]
    pub max_price: f64,

    /// Number of listings to show
    #[arg(long, default_value_t = 100)]
    pub top: usize,
}

impl FilterArgs {
    pub fn to_spec(&self) -> FilterSpec {
        FilterSpec {
            min_sold: self.min_sold,
            min_rating: self.min_rating,
            min_price: self.min_price,
            max_price: self.max_price,
            top_n: self.top,
        }
    }
}

fn parse_rating(raw: &str) -> Result<f64, String> {
    let value: f64 = raw.parse().map_err(|_| format!("`{}` is not a number", raw))?;
    if !(0.0..=5.0).contains(&value) {
        return Err("rating must be between 0.0 and 5.0".to_string());
    }
    Ok(value)
}

/// Dataset retrieval and price rescaling
#[derive(Args, Debug, Clone)]
pub struct DatasetOptions {
    /// Do not ask the service to strip empty fields
    #[arg(long)]
    pub no_clean: bool,

    /// Fetch at most this many items
    #[arg(long)]
    pub fetch_limit: Option<u32>,

    /// Prices above this are divided by --micro-divisor
    #[arg(long, default_value_t = 1e9)]
    pub micro_threshold: f64,

    #[arg(long, default_value_t = 100_000.0)]
    pub micro_divisor: f64,

    /// Prices above this (up to --micro-threshold) are divided by --milli-divisor
    #[arg(long, default_value_t = 1e6)]
    pub milli_threshold: f64,

    #[arg(long, default_value_t = 1_000.0)]
    pub milli_divisor: f64,

    /// Also write the leaderboard to this CSV file
    #[arg(long, value_name = "PATH")]
    pub csv: Option<PathBuf>,
}

impl DatasetOptions {
    pub fn fetch(&self) -> FetchOptions {
        FetchOptions {
            clean: !self.no_clean,
            limit: self.fetch_limit,
        }
    }

    pub fn price_scale(&self) -> PriceScale {
        PriceScale {
            micro_threshold: self.micro_threshold,
            micro_divisor: self.micro_divisor,
            milli_threshold: self.milli_threshold,
            milli_divisor: self.milli_divisor,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.micro_divisor <= 0.0 || self.milli_divisor <= 0.0 {
            anyhow::bail!("price divisors must be greater than 0");
        }
        if self.milli_threshold > self.micro_threshold {
            anyhow::bail!("--milli-threshold cannot exceed --micro-threshold");
        }
        Ok(())
    }
}

/// Fails fast, before any client is built, when no token was given
pub(crate) fn require_credentials(config: &Config) -> Result<Credentials, PipelineError> {
    let credentials = Credentials::new(config.token.clone().unwrap_or_default());
    if credentials.is_blank() {
        return Err(PipelineError::MissingCredentials);
    }
    Ok(credentials)
}

pub(crate) fn client(config: &Config) -> Arc<ApifyClient> {
    let client = ApifyClient::new(&config.api_url);
    debug!("Using job service at {}", client.base_url());
    Arc::new(client)
}
