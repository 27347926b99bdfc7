//! Run orchestrator
//!
//! Submits a run and polls it until the service reports a terminal status or
//! the local wait ceiling is reached. Polling is sequential: one status query
//! at a time, with a sleep in between.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tally_client::JobClient;
use tally_core::domain::run::{ActorSpec, Credentials, RunHandle, RunStatus};
use tally_core::domain::search::SearchParameters;
use tracing::{debug, info, warn};

use crate::config::{MIN_POLL_INTERVAL, PollConfig};
use crate::error::PipelineError;

/// Drives the submit → poll → terminal lifecycle of a run
pub struct RunOrchestrator {
    client: Arc<dyn JobClient>,
    config: PollConfig,
}

impl RunOrchestrator {
    /// Creates a new orchestrator
    pub fn new(client: Arc<dyn JobClient>, config: PollConfig) -> Self {
        Self { client, config }
    }

    /// Submits a run and returns its handle
    ///
    /// Absent or invalid optional search fields are left out of the payload.
    /// The returned handle may not have a dataset id yet.
    pub async fn submit(
        &self,
        credentials: &Credentials,
        actor: &ActorSpec,
        params: &SearchParameters,
    ) -> Result<RunHandle, PipelineError> {
        let input = params.to_input();

        let run = self
            .client
            .submit_run(credentials, actor, &input)
            .await
            .map_err(PipelineError::submission)?;

        info!(
            "Run {} started for actor {} (status: {})",
            run.run_id, actor.id, run.status
        );

        Ok(RunHandle::new(run.run_id, run.status, run.dataset_id))
    }

    /// Polls the run until it reaches a terminal status
    ///
    /// Returns the terminal status and the last known dataset id. When the
    /// wait ceiling is hit first, the status is [`RunStatus::PollTimeout`];
    /// that is not an error at this level. A handle that is already terminal
    /// is returned as-is without querying.
    pub async fn poll(
        &self,
        credentials: &Credentials,
        handle: &mut RunHandle,
    ) -> Result<(RunStatus, Option<String>), PipelineError> {
        let interval = if self.config.poll_interval < MIN_POLL_INTERVAL {
            warn!(
                "Poll interval {:?} is below the minimum, using {:?}",
                self.config.poll_interval, MIN_POLL_INTERVAL
            );
            MIN_POLL_INTERVAL
        } else {
            self.config.poll_interval
        };

        let started = Instant::now();

        while !handle.status().is_terminal() {
            let run = self
                .client
                .get_run(credentials, handle.run_id())
                .await
                .map_err(|source| PipelineError::StatusQuery {
                    run_id: handle.run_id().to_string(),
                    source,
                })?;

            debug!("Run {} status: {}", handle.run_id(), run.status);
            handle.observe(run.status, run.dataset_id);

            if handle.status().is_terminal() {
                info!(
                    "Run {} finished with status {}",
                    handle.run_id(),
                    handle.status()
                );
                break;
            }

            if started.elapsed() >= self.config.max_wait {
                warn!(
                    "Run {} still {} after {:?}, giving up",
                    handle.run_id(),
                    handle.status(),
                    started.elapsed()
                );
                handle.observe(RunStatus::PollTimeout, None);
                break;
            }

            tokio::time::sleep(interval).await;
        }

        Ok((handle.status(), handle.dataset_id().map(str::to_string)))
    }

    /// Wall-clock ceiling applied by [`RunOrchestrator::poll`]
    pub fn max_wait(&self) -> Duration {
        self.config.max_wait
    }
}
