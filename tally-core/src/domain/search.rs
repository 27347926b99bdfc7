//! Search parameters supplied to the scraping actor

use serde::{Deserialize, Serialize};

use crate::dto::run::RunInput;

/// Search parameters as collected from the user
///
/// Optional fields hold the raw text the user typed. They are validated when
/// the run input is built: anything that does not parse is left out of the
/// payload instead of being sent as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParameters {
    /// Marketplace country code (e.g. "ID", "MY")
    pub country: String,
    pub keyword: Option<String>,
    pub category_id: Option<String>,
    pub price_min: Option<String>,
    pub price_max: Option<String>,
    /// Number of items to scrape
    pub limit: u32,
}

impl SearchParameters {
    pub fn new(country: impl Into<String>, limit: u32) -> Self {
        Self {
            country: country.into(),
            keyword: None,
            category_id: None,
            price_min: None,
            price_max: None,
            limit,
        }
    }

    /// Builds the run payload, dropping absent or invalid optional fields
    pub fn to_input(&self) -> RunInput {
        RunInput {
            country: self.country.trim().to_string(),
            keyword: self
                .keyword
                .as_deref()
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_string),
            category_id: parse_digits(self.category_id.as_deref()),
            min_price: parse_digits(self.price_min.as_deref()),
            max_price: parse_digits(self.price_max.as_deref()),
            limit: self.limit,
        }
    }
}

/// Accepts only non-empty all-digit input (after trimming)
fn parse_digits(raw: Option<&str>) -> Option<u64> {
    let raw = raw?.trim();
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}
