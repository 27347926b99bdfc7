//! Run command handler
//!
//! Submits the actor run, waits for it, and prints the resulting leaderboard.

use anyhow::Result;
use clap::Args;
use colored::*;
use tally_core::domain::run::ActorSpec;
use tally_core::domain::search::SearchParameters;

use super::{DatasetOptions, FilterArgs, client, require_credentials};
use crate::config::{Config, PollConfig};
use crate::output;
use crate::service::{Pipeline, PipelineOptions};

/// Marketplace countries the actor supports
const COUNTRIES: [&str; 6] = ["ID", "MY", "SG", "TH", "PH", "VN"];

/// Arguments of `tally run`
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Actor to run (`username/actor-name`)
    #[arg(
        long,
        env = "TALLY_ACTOR_ID",
        default_value = "apify/actor-shopee-scraper"
    )]
    pub actor: String,

    #[command(flatten)]
    pub search: SearchArgs,

    #[command(flatten)]
    pub filter: FilterArgs,

    /// Seconds between two status queries
    #[arg(long, env = "TALLY_POLL_INTERVAL", default_value_t = 5)]
    pub poll_interval: u64,

    /// Seconds to wait for the run before giving up
    #[arg(long, env = "TALLY_MAX_WAIT", default_value_t = 300)]
    pub max_wait: u64,

    #[command(flatten)]
    pub options: DatasetOptions,
}

/// Search parameters forwarded to the actor
#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    /// Marketplace country code
    #[arg(long, default_value = "ID", value_parser = COUNTRIES)]
    pub country: String,

    /// Keyword or product name
    #[arg(long)]
    pub keyword: Option<String>,

    /// Marketplace category id (digits only; anything else is ignored)
    #[arg(long)]
    pub category_id: Option<String>,

    /// Lower price bound sent to the actor (digits only)
    #[arg(long)]
    pub price_min: Option<String>,

    /// Upper price bound sent to the actor (digits only)
    #[arg(long)]
    pub price_max: Option<String>,

    /// Number of items the actor should scrape
    #[arg(long, default_value_t = 120, value_parser = clap::value_parser!(u32).range(1..))]
    pub limit: u32,
}

impl SearchArgs {
    pub fn to_params(&self) -> SearchParameters {
        SearchParameters {
            country: self.country.clone(),
            keyword: self.keyword.clone(),
            category_id: self.category_id.clone(),
            price_min: self.price_min.clone(),
            price_max: self.price_max.clone(),
            limit: self.limit,
        }
    }
}

/// Handle `tally run`
pub async fn handle_run_command(args: RunArgs, config: &Config) -> Result<()> {
    let credentials = require_credentials(config)?;

    if args.actor.trim().is_empty() {
        anyhow::bail!("actor id cannot be empty");
    }

    let poll = PollConfig::from_secs(args.poll_interval, args.max_wait);
    poll.validate()?;
    args.options.validate()?;

    let pipeline = Pipeline::new(
        client(config),
        PipelineOptions {
            poll,
            fetch: args.options.fetch(),
            price_scale: args.options.price_scale(),
        },
    );

    let actor = ActorSpec::new(args.actor.trim());
    let params = args.search.to_params();

    println!(
        "{} {}",
        "▸ Running actor".cyan(),
        actor.id.as_str().bold()
    );
    println!(
        "{}",
        format!(
            "  Waiting up to {}s (polling every {}s)...",
            args.max_wait, args.poll_interval
        )
        .dimmed()
    );

    let board = pipeline
        .run(&credentials, &actor, &params, &args.filter.to_spec())
        .await?;

    output::print_leaderboard(&board);

    if let Some(path) = &args.options.csv {
        output::write_csv(path, &board)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        run: RunArgs,
    }

    #[test]
    fn test_defaults() {
        let cli = TestCli::try_parse_from(["tally"]).unwrap();

        assert_eq!(cli.run.search.country, "ID");
        assert_eq!(cli.run.search.limit, 120);
        assert_eq!(cli.run.filter.top, 100);
        assert_eq!(cli.run.filter.max_price, 0.0);
        assert!(!cli.run.options.no_clean);
        assert_eq!(cli.run.options.price_scale(), Default::default());
    }

    #[test]
    fn test_search_flags() {
        let cli = TestCli::try_parse_from([
            "tally",
            "--country",
            "MY",
            "--keyword",
            "kasut",
            "--price-min",
            "abc",
            "--limit",
            "40",
            "--min-sold",
            "100",
        ])
        .unwrap();

        let params = cli.run.search.to_params();
        assert_eq!(params.country, "MY");
        assert_eq!(params.keyword.as_deref(), Some("kasut"));
        assert_eq!(params.to_input().min_price, None);
        assert_eq!(cli.run.filter.to_spec().min_sold, 100);
    }

    #[test]
    fn test_rejects_unknown_country_and_zero_limit() {
        assert!(TestCli::try_parse_from(["tally", "--country", "US"]).is_err());
        assert!(TestCli::try_parse_from(["tally", "--limit", "0"]).is_err());
    }
}
