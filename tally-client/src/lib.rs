//! Tally HTTP Client
//!
//! A small, type-safe client for the job-execution service (Apify API v2).
//! It submits actor runs, queries their status and retrieves dataset items.
//!
//! Callers depend on the [`JobClient`] trait so the HTTP implementation can be
//! swapped for a scripted one in tests.
//!
//! # Example
//!
//! ```no_run
//! use tally_client::{ApifyClient, JobClient};
//! use tally_core::domain::run::{ActorSpec, Credentials};
//! use tally_core::domain::search::SearchParameters;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ApifyClient::new("https://api.apify.com/v2");
//!     let credentials = Credentials::new("my-token");
//!
//!     let run = client
//!         .submit_run(
//!             &credentials,
//!             &ActorSpec::new("apify/actor-shopee-scraper"),
//!             &SearchParameters::new("ID", 120).to_input(),
//!         )
//!         .await?;
//!
//!     println!("Started run: {}", run.run_id);
//!     Ok(())
//! }
//! ```

mod datasets;
pub mod error;
mod runs;

// Re-export commonly used types
pub use datasets::{FetchOptions, parse_items};
pub use error::{ClientError, Result};

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tally_core::domain::record::RawRecord;
use tally_core::domain::run::{ActorSpec, Credentials, RunInfo};
use tally_core::dto::run::RunInput;

/// Default base URL of the job-execution service
pub const DEFAULT_BASE_URL: &str = "https://api.apify.com/v2";

/// Operations against the job-execution service
///
/// No business logic lives behind this trait; it only moves data.
#[async_trait]
pub trait JobClient: Send + Sync {
    /// Starts a run of `actor` with the given input
    async fn submit_run(
        &self,
        credentials: &Credentials,
        actor: &ActorSpec,
        input: &RunInput,
    ) -> Result<RunInfo>;

    /// Queries the current status of a run
    async fn get_run(&self, credentials: &Credentials, run_id: &str) -> Result<RunInfo>;

    /// Retrieves the items currently stored in a dataset
    async fn fetch_items(
        &self,
        credentials: &Credentials,
        dataset_id: &str,
        options: &FetchOptions,
    ) -> Result<Vec<RawRecord>>;
}

/// HTTP client for the job-execution service
#[derive(Debug, Clone)]
pub struct ApifyClient {
    /// Base URL of the API (e.g., "https://api.apify.com/v2")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl ApifyClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the API (e.g., "https://api.apify.com/v2")
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new client with a custom HTTP client
    ///
    /// This allows you to configure proxies, TLS settings, etc. Per-request
    /// timeouts are still applied on top.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the API
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Check the status code and return the body text
    async fn read_body(&self, response: reqwest::Response) -> Result<String> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        Ok(response.text().await?)
    }

    /// Handle an API response and deserialize JSON
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let body = self.read_body(response).await?;

        serde_json::from_str(&body)
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }
}

#[async_trait]
impl JobClient for ApifyClient {
    async fn submit_run(
        &self,
        credentials: &Credentials,
        actor: &ActorSpec,
        input: &RunInput,
    ) -> Result<RunInfo> {
        self.start_run(credentials, actor, input).await
    }

    async fn get_run(&self, credentials: &Credentials, run_id: &str) -> Result<RunInfo> {
        self.run_status(credentials, run_id).await
    }

    async fn fetch_items(
        &self,
        credentials: &Credentials,
        dataset_id: &str,
        options: &FetchOptions,
    ) -> Result<Vec<RawRecord>> {
        self.dataset_items(credentials, dataset_id, options).await
    }
}
