//! Scheduler layer
//!
//! Drives a run from submission to a terminal status. The orchestrator owns
//! the run handle for the whole lifecycle.

pub mod poller;

pub use poller::RunOrchestrator;
