//! Run-related API endpoints

use std::time::Duration;

use tally_core::domain::run::{ActorSpec, Credentials, RunInfo, RunStatus};
use tally_core::dto::run::{Envelope, RunData, RunInput};
use tracing::{debug, warn};

use crate::ApifyClient;
use crate::error::Result;

const SUBMIT_TIMEOUT: Duration = Duration::from_secs(60);
const STATUS_TIMEOUT: Duration = Duration::from_secs(30);

impl ApifyClient {
    // =============================================================================
    // Run Lifecycle
    // =============================================================================

    /// Start a run of an actor
    ///
    /// # Arguments
    /// * `credentials` - API token, sent as the `token` query parameter
    /// * `actor` - The actor to run
    /// * `input` - JSON input passed to the actor
    ///
    /// # Returns
    /// The run as first reported; its dataset id may still be missing
    pub async fn start_run(
        &self,
        credentials: &Credentials,
        actor: &ActorSpec,
        input: &RunInput,
    ) -> Result<RunInfo> {
        let url = format!("{}/acts/{}/runs", self.base_url, actor.path_segment());
        debug!("Submitting run for actor {}", actor.id);

        let response = self
            .client
            .post(&url)
            .query(&[("token", credentials.token())])
            .timeout(SUBMIT_TIMEOUT)
            .json(input)
            .send()
            .await?;

        let envelope: Envelope<RunData> = self.handle_response(response).await?;
        Ok(into_run_info(envelope.data))
    }

    /// Get the current state of a run
    ///
    /// # Arguments
    /// * `credentials` - API token
    /// * `run_id` - The run identifier
    pub async fn run_status(&self, credentials: &Credentials, run_id: &str) -> Result<RunInfo> {
        let url = format!("{}/actor-runs/{}", self.base_url, run_id);

        let response = self
            .client
            .get(&url)
            .query(&[("token", credentials.token())])
            .timeout(STATUS_TIMEOUT)
            .send()
            .await?;

        let envelope: Envelope<RunData> = self.handle_response(response).await?;
        Ok(into_run_info(envelope.data))
    }
}

/// Converts the wire run object, treating unknown statuses as still running
fn into_run_info(data: RunData) -> RunInfo {
    let status = RunStatus::from_remote(&data.status).unwrap_or_else(|| {
        warn!(
            "Run {} reported unknown status {:?}, treating it as running",
            data.id, data.status
        );
        RunStatus::Running
    });

    RunInfo {
        run_id: data.id,
        status,
        dataset_id: data.default_dataset_id.filter(|id| !id.is_empty()),
        started_at: data.started_at,
        finished_at: data.finished_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_data(status: &str, dataset: Option<&str>) -> RunData {
        serde_json::from_value(serde_json::json!({
            "id": "run-1",
            "status": status,
            "defaultDatasetId": dataset,
        }))
        .unwrap()
    }

    #[test]
    fn test_into_run_info_maps_status() {
        let info = into_run_info(run_data("SUCCEEDED", Some("ds-1")));
        assert_eq!(info.run_id, "run-1");
        assert_eq!(info.status, RunStatus::Succeeded);
        assert_eq!(info.dataset_id.as_deref(), Some("ds-1"));
    }

    #[test]
    fn test_unknown_status_is_running() {
        let info = into_run_info(run_data("SOMETHING-NEW", None));
        assert_eq!(info.status, RunStatus::Running);
        assert_eq!(info.dataset_id, None);
    }

    #[test]
    fn test_empty_dataset_id_is_absent() {
        let info = into_run_info(run_data("READY", Some("")));
        assert_eq!(info.status, RunStatus::Submitted);
        assert_eq!(info.dataset_id, None);
    }
}
