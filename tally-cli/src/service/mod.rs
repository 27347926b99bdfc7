//! Service layer
//!
//! Composes the orchestrator, the job client and the pure normalization and
//! ranking passes into a leaderboard.

mod pipeline;

pub use pipeline::{Pipeline, PipelineOptions};
