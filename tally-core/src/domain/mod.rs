//! Core domain types
//!
//! These types are shared between the HTTP client (which produces runs and
//! raw records) and the CLI (which orchestrates runs and renders leaderboards).

pub mod filter;
pub mod leaderboard;
pub mod record;
pub mod run;
pub mod search;
