//! Run domain types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Bearer token for the job-execution service
///
/// Never persisted. The `Debug` output is redacted so the token cannot leak
/// through logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials(String);

impl Credentials {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, as sent to the service
    pub fn token(&self) -> &str {
        self.0.trim()
    }

    /// True when no usable token was supplied
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credentials(***)")
    }
}

/// Identifier of the remote job definition (actor) to run
///
/// Accepts both `username/actor-name` and `username~actor-name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorSpec {
    pub id: String,
}

impl ActorSpec {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// Form used in URL paths: the `/` separator becomes `~`
    pub fn path_segment(&self) -> String {
        self.id.trim().replace('/', "~")
    }
}

/// Run lifecycle status
///
/// `PollTimeout` is produced locally when the caller's wait ceiling is hit;
/// it is distinct from the service reporting `TimedOut` on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    Submitted,
    Running,
    Succeeded,
    Failed,
    TimedOut,
    Aborted,
    PollTimeout,
}

impl RunStatus {
    /// Maps a status string reported by the service
    ///
    /// Transitional states (`TIMING-OUT`, `ABORTING`) are still running.
    /// Returns `None` for strings the service is not known to send.
    pub fn from_remote(status: &str) -> Option<Self> {
        match status.trim().to_ascii_uppercase().as_str() {
            "READY" => Some(Self::Submitted),
            "RUNNING" | "TIMING-OUT" | "TIMING_OUT" | "ABORTING" => Some(Self::Running),
            "SUCCEEDED" => Some(Self::Succeeded),
            "FAILED" => Some(Self::Failed),
            "TIMED-OUT" | "TIMED_OUT" => Some(Self::TimedOut),
            "ABORTED" => Some(Self::Aborted),
            _ => None,
        }
    }

    /// Terminal states are absorbing and are never queried again
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Submitted | Self::Running)
    }

    /// Only a successful run yields a leaderboard
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Submitted => "SUBMITTED",
            Self::Running => "RUNNING",
            Self::Succeeded => "SUCCEEDED",
            Self::Failed => "FAILED",
            Self::TimedOut => "TIMED_OUT",
            Self::Aborted => "ABORTED",
            Self::PollTimeout => "POLL_TIMEOUT",
        };
        f.write_str(s)
    }
}

/// Snapshot of a run as reported by the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunInfo {
    pub run_id: String,
    pub status: RunStatus,
    pub dataset_id: Option<String>,
    pub started_at: Option<chrono::DateTime<chrono::Utc>>,
    pub finished_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Handle to a submitted run
///
/// Created on submit and only mutated by polling. Once a terminal status is
/// observed, [`RunHandle::observe`] leaves it untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunHandle {
    run_id: String,
    dataset_id: Option<String>,
    status: RunStatus,
}

impl RunHandle {
    pub fn new(run_id: impl Into<String>, status: RunStatus, dataset_id: Option<String>) -> Self {
        Self {
            run_id: run_id.into(),
            dataset_id,
            status,
        }
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn dataset_id(&self) -> Option<&str> {
        self.dataset_id.as_deref()
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    /// Records a freshly queried status
    ///
    /// A dataset id already known is kept when the new report carries none.
    pub fn observe(&mut self, status: RunStatus, dataset_id: Option<String>) {
        if self.status.is_terminal() {
            return;
        }
        self.status = status;
        if dataset_id.is_some() {
            self.dataset_id = dataset_id;
        }
    }
}
