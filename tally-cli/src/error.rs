//! Pipeline error taxonomy
//!
//! Every failure of a pipeline run maps to exactly one variant. None of them
//! is retried here; retry policy belongs to the caller.

use std::time::Duration;

use tally_client::ClientError;
use tally_core::domain::run::RunStatus;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// No API token; raised before any network call
    #[error("missing API token: set APIFY_TOKEN or pass --token")]
    MissingCredentials,

    /// The service refused to start the run
    #[error("job submission failed (HTTP {}): {body}", display_status(.status))]
    JobSubmission { status: Option<u16>, body: String },

    /// A status query failed while waiting for the run
    #[error("status query for run {run_id} failed: {source}")]
    StatusQuery {
        run_id: String,
        #[source]
        source: ClientError,
    },

    /// The service reported a terminal status other than success
    #[error("run {run_id} ended with status {status}")]
    RunFailed { run_id: String, status: RunStatus },

    /// The local wait ceiling was reached before the run finished
    #[error("run {run_id} did not finish within {waited:?}; stopped waiting")]
    PollTimeout { run_id: String, waited: Duration },

    /// Dataset items could not be retrieved or had an unexpected shape
    #[error("fetching dataset {dataset_id} failed: {source}")]
    DatasetFetch {
        dataset_id: String,
        #[source]
        source: ClientError,
    },

    /// The run succeeded but never reported a dataset
    #[error("run {run_id} succeeded but no dataset id was returned")]
    MissingDataset { run_id: String },
}

impl PipelineError {
    /// Wraps a failed submission, keeping the HTTP status and body
    pub fn submission(err: ClientError) -> Self {
        let status = err.status();
        let body = match err {
            ClientError::ApiError { message, .. } => message,
            other => other.to_string(),
        };
        Self::JobSubmission { status, body }
    }

    /// HTTP status code behind the failure, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::JobSubmission { status, .. } => *status,
            Self::StatusQuery { source, .. } | Self::DatasetFetch { source, .. } => source.status(),
            _ => None,
        }
    }
}

fn display_status(status: &Option<u16>) -> String {
    match status {
        Some(code) => code.to_string(),
        None => "n/a".to_string(),
    }
}
