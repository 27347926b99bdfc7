//! Status command handler

use anyhow::Result;
use colored::*;
use tally_client::JobClient;
use tally_core::domain::run::{RunInfo, RunStatus};

use super::{client, require_credentials};
use crate::config::Config;
use crate::error::PipelineError;

/// Handle `tally status`
pub async fn handle_status_command(run_id: &str, config: &Config) -> Result<()> {
    let credentials = require_credentials(config)?;

    let run = client(config)
        .get_run(&credentials, run_id)
        .await
        .map_err(|source| PipelineError::StatusQuery {
            run_id: run_id.to_string(),
            source,
        })?;

    print_run_details(&run);

    Ok(())
}

/// Print detailed run information
fn print_run_details(run: &RunInfo) {
    println!("{}", "Run Details:".bold());
    println!("  ID:          {}", run.run_id.cyan());
    println!("  Status:      {}", colorize_status(&run.status));

    match &run.dataset_id {
        Some(dataset) => println!("  Dataset:     {}", dataset),
        None => println!("  Dataset:     {}", "(not yet available)".dimmed()),
    }

    if let Some(started) = run.started_at {
        println!("  Started:     {}", started.format("%Y-%m-%d %H:%M:%S"));
    }

    if let Some(finished) = run.finished_at {
        println!("  Finished:    {}", finished.format("%Y-%m-%d %H:%M:%S"));

        if let Some(started) = run.started_at {
            let seconds = finished.signed_duration_since(started).num_seconds();
            println!("  Duration:    {}s", seconds);
        }
    }
}

/// Colorize run status for display
fn colorize_status(status: &RunStatus) -> colored::ColoredString {
    let status_str = status.to_string();
    match status {
        RunStatus::Submitted => status_str.yellow(),
        RunStatus::Running => status_str.cyan(),
        RunStatus::Succeeded => status_str.green(),
        RunStatus::Failed => status_str.red(),
        RunStatus::TimedOut | RunStatus::PollTimeout => status_str.red(),
        RunStatus::Aborted => status_str.dimmed(),
    }
}
