//! Dataset-related API endpoints

use std::time::Duration;

use serde_json::Value;
use tally_core::domain::record::RawRecord;
use tally_core::domain::run::Credentials;
use tracing::info;

use crate::ApifyClient;
use crate::error::{ClientError, Result};

const FETCH_TIMEOUT: Duration = Duration::from_secs(60);

/// Options for dataset item retrieval
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOptions {
    /// Ask the service to drop empty fields and hidden items
    pub clean: bool,
    /// Maximum number of items, `None` for everything available
    pub limit: Option<u32>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            clean: true,
            limit: None,
        }
    }
}

impl FetchOptions {
    fn query(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if self.clean {
            params.push(("clean", "true".to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        params
    }
}

impl ApifyClient {
    // =============================================================================
    // Dataset Items
    // =============================================================================

    /// Get the items stored in a dataset
    ///
    /// # Arguments
    /// * `credentials` - API token
    /// * `dataset_id` - The dataset identifier
    /// * `options` - `clean` / `limit` hints forwarded to the service
    ///
    /// # Returns
    /// The items in dataset order
    pub async fn dataset_items(
        &self,
        credentials: &Credentials,
        dataset_id: &str,
        options: &FetchOptions,
    ) -> Result<Vec<RawRecord>> {
        let url = format!("{}/datasets/{}/items", self.base_url, dataset_id);

        let response = self
            .client
            .get(&url)
            .query(&[("token", credentials.token())])
            .query(&options.query())
            .timeout(FETCH_TIMEOUT)
            .send()
            .await?;

        let body: Value = self.handle_response(response).await?;
        let items = parse_items(body)?;

        info!("Fetched {} item(s) from dataset {}", items.len(), dataset_id);

        Ok(items)
    }
}

/// Extracts the records from a dataset items response
///
/// Accepts a bare array of objects, or an object whose `items` field is an
/// array of objects. Any other shape is an error.
pub fn parse_items(body: Value) -> Result<Vec<RawRecord>> {
    let items = match body {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("items") {
            Some(Value::Array(items)) => items,
            Some(_) => {
                return Err(ClientError::MalformedBody(
                    "`items` is not an array".to_string(),
                ));
            }
            None => {
                return Err(ClientError::MalformedBody(
                    "object response has no `items` array".to_string(),
                ));
            }
        },
        other => {
            return Err(ClientError::MalformedBody(format!(
                "expected an array of items, got {}",
                kind(&other)
            )));
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| match item {
            Value::Object(record) => Ok(record),
            other => Err(ClientError::MalformedBody(format!(
                "item {} is {}, expected an object",
                idx,
                kind(&other)
            ))),
        })
        .collect()
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
