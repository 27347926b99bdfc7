//! Tally Core
//!
//! Core types and algorithms for the Tally leaderboard tool.
//!
//! This crate contains:
//! - Domain types: runs, search parameters, records, filters, leaderboards
//! - DTOs: wire shapes exchanged with the job-execution service
//! - Normalization: column inference and typed coercion of raw dataset items
//! - Ranking: sort, filter and truncate into a leaderboard
//!
//! Nothing in here performs I/O.

pub mod domain;
pub mod dto;
pub mod normalize;
pub mod rank;
