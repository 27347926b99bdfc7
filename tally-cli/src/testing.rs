//! Scripted job client for orchestrator and pipeline tests

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tally_client::{ClientError, FetchOptions, JobClient, Result};
use tally_core::domain::record::RawRecord;
use tally_core::domain::run::{ActorSpec, Credentials, RunInfo, RunStatus};
use tally_core::dto::run::RunInput;

/// Replays a fixed sequence of run statuses and serves canned dataset items
#[derive(Default)]
pub struct ScriptedClient {
    statuses: Mutex<VecDeque<RunStatus>>,
    seed_dataset: Option<String>,
    final_dataset: Option<String>,
    items: Vec<RawRecord>,
    submit_error: Option<(u16, String)>,
    status_error: Option<u16>,
    fetch_error: Option<u16>,
    submissions: AtomicUsize,
    status_queries: AtomicUsize,
    submitted_input: Mutex<Option<RunInput>>,
    fetched_dataset: Mutex<Option<String>>,
}

impl ScriptedClient {
    /// Status queries return `statuses` in order, then `Running` forever
    pub fn new(statuses: Vec<RunStatus>) -> Self {
        Self {
            statuses: Mutex::new(statuses.into()),
            ..Default::default()
        }
    }

    /// Dataset id reported by the submission response
    pub fn with_seed_dataset(mut self, id: &str) -> Self {
        self.seed_dataset = Some(id.to_string());
        self
    }

    /// Dataset id reported by every status query
    pub fn with_final_dataset(mut self, id: &str) -> Self {
        self.final_dataset = Some(id.to_string());
        self
    }

    pub fn with_items(mut self, items: Vec<RawRecord>) -> Self {
        self.items = items;
        self
    }

    pub fn failing_submit(mut self, status: u16, body: &str) -> Self {
        self.submit_error = Some((status, body.to_string()));
        self
    }

    pub fn failing_status(mut self, status: u16) -> Self {
        self.status_error = Some(status);
        self
    }

    pub fn failing_fetch(mut self, status: u16) -> Self {
        self.fetch_error = Some(status);
        self
    }

    pub fn submissions(&self) -> usize {
        self.submissions.load(Ordering::SeqCst)
    }

    pub fn status_queries(&self) -> usize {
        self.status_queries.load(Ordering::SeqCst)
    }

    pub fn submitted_input(&self) -> Option<RunInput> {
        self.submitted_input.lock().unwrap().clone()
    }

    pub fn fetched_dataset(&self) -> Option<String> {
        self.fetched_dataset.lock().unwrap().clone()
    }
}

#[async_trait]
impl JobClient for ScriptedClient {
    async fn submit_run(
        &self,
        _credentials: &Credentials,
        _actor: &ActorSpec,
        input: &RunInput,
    ) -> Result<RunInfo> {
        self.submissions.fetch_add(1, Ordering::SeqCst);
        *self.submitted_input.lock().unwrap() = Some(input.clone());

        if let Some((status, body)) = &self.submit_error {
            return Err(ClientError::api_error(*status, body.clone()));
        }

        Ok(RunInfo {
            run_id: "run-1".to_string(),
            status: RunStatus::Running,
            dataset_id: self.seed_dataset.clone(),
            started_at: None,
            finished_at: None,
        })
    }

    async fn get_run(&self, _credentials: &Credentials, run_id: &str) -> Result<RunInfo> {
        self.status_queries.fetch_add(1, Ordering::SeqCst);

        if let Some(status) = self.status_error {
            return Err(ClientError::api_error(status, "status unavailable"));
        }

        let status = self
            .statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(RunStatus::Running);

        Ok(RunInfo {
            run_id: run_id.to_string(),
            status,
            dataset_id: self.final_dataset.clone(),
            started_at: None,
            finished_at: None,
        })
    }

    async fn fetch_items(
        &self,
        _credentials: &Credentials,
        dataset_id: &str,
        _options: &FetchOptions,
    ) -> Result<Vec<RawRecord>> {
        *self.fetched_dataset.lock().unwrap() = Some(dataset_id.to_string());

        if let Some(status) = self.fetch_error {
            return Err(ClientError::api_error(status, "dataset unavailable"));
        }

        Ok(self.items.clone())
    }
}
