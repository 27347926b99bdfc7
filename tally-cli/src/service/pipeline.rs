//! Leaderboard pipeline
//!
//! Sequences run orchestration, dataset retrieval, schema normalization,
//! metric normalization and rank/filter into one call. Every invocation owns
//! its run handle and record buffers; nothing is cached between runs.

use std::sync::Arc;

use tally_client::{FetchOptions, JobClient};
use tally_core::domain::filter::FilterSpec;
use tally_core::domain::leaderboard::Leaderboard;
use tally_core::domain::record::RawRecord;
use tally_core::domain::run::{ActorSpec, Credentials, RunStatus};
use tally_core::domain::search::SearchParameters;
use tally_core::normalize::{self, MetricNormalizer, PriceScale, schema};
use tally_core::rank;
use tracing::info;

use crate::config::PollConfig;
use crate::error::PipelineError;
use crate::scheduler::RunOrchestrator;

/// Tunables for one pipeline
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    pub poll: PollConfig,
    pub fetch: FetchOptions,
    pub price_scale: PriceScale,
}

/// Composition root: run → fetch → normalize → rank
pub struct Pipeline {
    client: Arc<dyn JobClient>,
    orchestrator: RunOrchestrator,
    fetch: FetchOptions,
    metrics: MetricNormalizer,
}

impl Pipeline {
    pub fn new(client: Arc<dyn JobClient>, options: PipelineOptions) -> Self {
        Self {
            orchestrator: RunOrchestrator::new(Arc::clone(&client), options.poll),
            client,
            fetch: options.fetch,
            metrics: MetricNormalizer::new(options.price_scale),
        }
    }

    /// Runs the actor, waits for it and ranks its dataset
    pub async fn run(
        &self,
        credentials: &Credentials,
        actor: &ActorSpec,
        params: &SearchParameters,
        filter: &FilterSpec,
    ) -> Result<Leaderboard, PipelineError> {
        ensure_credentials(credentials)?;

        let mut handle = self.orchestrator.submit(credentials, actor, params).await?;
        let seed_dataset = handle.dataset_id().map(str::to_string);

        let (status, dataset_id) = self.orchestrator.poll(credentials, &mut handle).await?;

        if status == RunStatus::PollTimeout {
            return Err(PipelineError::PollTimeout {
                run_id: handle.run_id().to_string(),
                waited: self.orchestrator.max_wait(),
            });
        }
        if !status.is_success() {
            return Err(PipelineError::RunFailed {
                run_id: handle.run_id().to_string(),
                status,
            });
        }

        let dataset_id = dataset_id
            .or(seed_dataset)
            .ok_or_else(|| PipelineError::MissingDataset {
                run_id: handle.run_id().to_string(),
            })?;

        self.rank_dataset(credentials, &dataset_id, filter).await
    }

    /// Ranks the items of an existing dataset without starting a run
    pub async fn rank_dataset(
        &self,
        credentials: &Credentials,
        dataset_id: &str,
        filter: &FilterSpec,
    ) -> Result<Leaderboard, PipelineError> {
        ensure_credentials(credentials)?;

        let items = self
            .client
            .fetch_items(credentials, dataset_id, &self.fetch)
            .await
            .map_err(|source| PipelineError::DatasetFetch {
                dataset_id: dataset_id.to_string(),
                source,
            })?;

        Ok(self.build_leaderboard(&items, filter))
    }

    /// Pure part of the pipeline: normalize, coerce, rank, filter, truncate
    pub fn build_leaderboard(&self, items: &[RawRecord], filter: &FilterSpec) -> Leaderboard {
        let flat: Vec<RawRecord> = items.iter().map(normalize::flatten).collect();
        let normalized = schema::normalize(&flat);
        let table = self.metrics.apply(&normalized);

        info!(
            "Normalized {} record(s); resolved fields: {}",
            table.len(),
            table
                .fields
                .iter()
                .map(|f| f.name())
                .collect::<Vec<_>>()
                .join(", ")
        );

        let board = rank::leaderboard(table, filter);
        info!("Leaderboard has {} row(s)", board.len());
        board
    }
}

fn ensure_credentials(credentials: &Credentials) -> Result<(), PipelineError> {
    if credentials.is_blank() {
        return Err(PipelineError::MissingCredentials);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedClient;
    use serde_json::{Value, json};
    use std::time::Duration;
    use tally_core::domain::record::CanonicalField;

    fn items(value: Value) -> Vec<RawRecord> {
        value
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_object().unwrap().clone())
            .collect()
    }

    fn pipeline(client: Arc<ScriptedClient>, max_wait: Duration) -> Pipeline {
        Pipeline::new(
            client,
            PipelineOptions {
                poll: PollConfig {
                    poll_interval: Duration::ZERO,
                    max_wait,
                },
                ..Default::default()
            },
        )
    }

    fn top(n: usize) -> FilterSpec {
        FilterSpec {
            top_n: n,
            ..Default::default()
        }
    }

    async fn run(client: Arc<ScriptedClient>) -> Result<Leaderboard, PipelineError> {
        pipeline(client, Duration::from_secs(60))
            .run(
                &Credentials::new("token"),
                &ActorSpec::new("apify/actor-shopee-scraper"),
                &SearchParameters::new("ID", 120),
                &top(10),
            )
            .await
    }

    #[tokio::test]
    async fn test_end_to_end_leaderboard() {
        let client = Arc::new(
            ScriptedClient::new(vec![RunStatus::Running, RunStatus::Succeeded])
                .with_final_dataset("ds-1")
                .with_items(items(json!([
                    { "item_title": "A", "historical_sold_count": "150" },
                    { "item_title": "B", "historical_sold_count": "300" }
                ]))),
        );

        let board = run(client.clone()).await.unwrap();

        let rows: Vec<_> = board
            .rows()
            .iter()
            .map(|r| (r.title.as_deref().unwrap(), r.historical_sold.unwrap()))
            .collect();
        assert_eq!(rows, vec![("B", 300), ("A", 150)]);
        assert_eq!(
            board.fields(),
            &[CanonicalField::Title, CanonicalField::HistoricalSold]
        );
        assert_eq!(client.fetched_dataset().as_deref(), Some("ds-1"));
    }

    #[tokio::test]
    async fn test_missing_credentials_short_circuits() {
        let client = Arc::new(ScriptedClient::new(vec![RunStatus::Succeeded]));

        let err = pipeline(client.clone(), Duration::from_secs(60))
            .run(
                &Credentials::new(""),
                &ActorSpec::new("a/b"),
                &SearchParameters::new("ID", 20),
                &top(10),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::MissingCredentials));
        assert_eq!(client.submissions(), 0);
        assert_eq!(client.status_queries(), 0);
    }

    #[tokio::test]
    async fn test_remote_failure_is_run_failed() {
        let client = Arc::new(ScriptedClient::new(vec![RunStatus::Aborted]));

        let err = run(client.clone()).await.unwrap_err();

        assert!(matches!(
            err,
            PipelineError::RunFailed {
                status: RunStatus::Aborted,
                ..
            }
        ));
        assert_eq!(client.fetched_dataset(), None);
    }

    #[tokio::test]
    async fn test_local_timeout_is_poll_timeout() {
        let client = Arc::new(ScriptedClient::new(vec![]));

        let err = pipeline(client, Duration::ZERO)
            .run(
                &Credentials::new("token"),
                &ActorSpec::new("a/b"),
                &SearchParameters::new("ID", 20),
                &top(10),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::PollTimeout { .. }));
    }

    #[tokio::test]
    async fn test_dataset_falls_back_to_submission() {
        let client = Arc::new(
            ScriptedClient::new(vec![RunStatus::Succeeded])
                .with_seed_dataset("ds-seed")
                .with_items(items(json!([{ "title": "x" }]))),
        );

        let board = run(client.clone()).await.unwrap();

        assert_eq!(board.len(), 1);
        assert_eq!(client.fetched_dataset().as_deref(), Some("ds-seed"));
    }

    #[tokio::test]
    async fn test_missing_dataset() {
        let client = Arc::new(ScriptedClient::new(vec![RunStatus::Succeeded]));

        let err = run(client).await.unwrap_err();
        assert!(matches!(err, PipelineError::MissingDataset { .. }));
    }

    #[tokio::test]
    async fn test_dataset_fetch_error() {
        let client = Arc::new(
            ScriptedClient::new(vec![RunStatus::Succeeded])
                .with_final_dataset("ds-1")
                .failing_fetch(404),
        );

        let err = run(client).await.unwrap_err();
        assert!(matches!(err, PipelineError::DatasetFetch { .. }));
        assert_eq!(err.status_code(), Some(404));
    }

    #[tokio::test]
    async fn test_submission_error() {
        let client = Arc::new(ScriptedClient::new(vec![]).failing_submit(400, "invalid input"));

        let err = run(client.clone()).await.unwrap_err();
        assert!(matches!(
            err,
            PipelineError::JobSubmission {
                status: Some(400),
                ..
            }
        ));
        assert_eq!(client.status_queries(), 0);
    }

    #[test]
    fn test_build_leaderboard_with_nested_items() {
        let client = Arc::new(ScriptedClient::new(vec![]));
        let pipeline = pipeline(client, Duration::from_secs(60));

        let raw = items(json!([
            {
                "name": "Sepatu",
                "price_min": 15_000_000_000u64,
                "price_max": 25_000_000_000u64,
                "item_rating": { "rating_star": 4.2, "rating_count": [10, 5] },
                "historical_sold": 40
            },
            {
                "name": "Tas",
                "price_min": 9_000_000_000u64,
                "price_max": 9_500_000_000u64,
                "item_rating": { "rating_star": 4.9 },
                "historical_sold": 900
            },
            {
                "name": "Topi",
                "price_min": 1_000_000_000u64,
                "item_rating": { "rating_star": "3.1" }
            }
        ]));

        let filter = FilterSpec {
            min_rating: 4.0,
            max_price: 200_000.0,
            top_n: 5,
            ..Default::default()
        };
        let board = pipeline.build_leaderboard(&raw, &filter);

        let titles: Vec<_> = board.rows().iter().filter_map(|r| r.title.as_deref()).collect();
        assert_eq!(titles, vec!["Tas"]);
        assert_eq!(board.rows()[0].price_min, Some(90_000.0));
        assert_eq!(board.rows()[0].rating, Some(4.9));
        assert!(board.fields().contains(&CanonicalField::Rating));
    }

    #[tokio::test]
    async fn test_rank_existing_dataset() {
        let client = Arc::new(ScriptedClient::new(vec![]).with_items(items(json!([
            { "title": "a", "sold": 1 },
            { "title": "b", "sold": 2 },
            { "title": "c", "sold": 3 }
        ]))));

        let board = pipeline(client.clone(), Duration::from_secs(60))
            .rank_dataset(&Credentials::new("token"), "ds-old", &top(2))
            .await
            .unwrap();

        let titles: Vec<_> = board.rows().iter().filter_map(|r| r.title.as_deref()).collect();
        assert_eq!(titles, vec!["c", "b"]);
        assert_eq!(client.submissions(), 0);
        assert_eq!(client.fetched_dataset().as_deref(), Some("ds-old"));
    }
}
