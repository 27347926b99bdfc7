//! Dataset command handler
//!
//! Re-ranks the items of a dataset left behind by an earlier run.

use anyhow::Result;
use clap::Args;
use colored::*;

use super::{DatasetOptions, FilterArgs, client, require_credentials};
use crate::config::{Config, PollConfig};
use crate::output;
use crate::service::{Pipeline, PipelineOptions};

/// Arguments of `tally dataset`
#[derive(Args, Debug, Clone)]
pub struct DatasetArgs {
    /// Dataset identifier
    pub dataset_id: String,

    #[command(flatten)]
    pub filter: FilterArgs,

    #[command(flatten)]
    pub options: DatasetOptions,
}

/// Handle `tally dataset`
pub async fn handle_dataset_command(args: DatasetArgs, config: &Config) -> Result<()> {
    let credentials = require_credentials(config)?;
    args.options.validate()?;

    let pipeline = Pipeline::new(
        client(config),
        PipelineOptions {
            poll: PollConfig::default(),
            fetch: args.options.fetch(),
            price_scale: args.options.price_scale(),
        },
    );

    println!(
        "{} {}",
        "▸ Ranking dataset".cyan(),
        args.dataset_id.as_str().bold()
    );

    let board = pipeline
        .rank_dataset(&credentials, &args.dataset_id, &args.filter.to_spec())
        .await?;

    output::print_leaderboard(&board);

    if let Some(path) = &args.options.csv {
        output::write_csv(path, &board)?;
    }

    Ok(())
}
