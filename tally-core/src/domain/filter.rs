//! Leaderboard filter parameters

use serde::{Deserialize, Serialize};

/// Query parameters applied after ranking
///
/// A `max_price` of 0 means unbounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub min_sold: u64,
    pub min_rating: f64,
    pub min_price: f64,
    pub max_price: f64,
    pub top_n: usize,
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self {
            min_sold: 0,
            min_rating: 0.0,
            min_price: 0.0,
            max_price: 0.0,
            top_n: 100,
        }
    }
}

impl FilterSpec {
    /// Whether the upper price bound applies at all
    pub fn has_max_price(&self) -> bool {
        self.max_price > 0.0
    }
}
