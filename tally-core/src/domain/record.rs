//! Record domain types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Untyped dataset item: provider column name to value
///
/// Key order is preserved, so the raw schema keeps the provider's column order.
pub type RawRecord = serde_json::Map<String, serde_json::Value>;

/// Fixed set of leaderboard columns
///
/// Declaration order is the display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    Title,
    PriceMin,
    PriceMax,
    Rating,
    Reviews,
    HistoricalSold,
    Shop,
    Location,
    Url,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 9] = [
        Self::Title,
        Self::PriceMin,
        Self::PriceMax,
        Self::Rating,
        Self::Reviews,
        Self::HistoricalSold,
        Self::Shop,
        Self::Location,
        Self::Url,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::PriceMin => "price_min",
            Self::PriceMax => "price_max",
            Self::Rating => "rating",
            Self::Reviews => "reviews",
            Self::HistoricalSold => "historical_sold",
            Self::Shop => "shop",
            Self::Location => "location",
            Self::Url => "url",
        }
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Normalized leaderboard row
///
/// A field is `None` when the raw schema had no column for it, or when the
/// raw value could not be coerced. Values are never fabricated, with one
/// exception: `historical_sold` is 0 for rows missing it whenever the column
/// itself exists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviews: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub historical_sold: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shop: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl CanonicalRecord {
    /// Renders one field as display text, `None` when absent
    pub fn cell(&self, field: CanonicalField) -> Option<String> {
        match field {
            CanonicalField::Title => self.title.clone(),
            CanonicalField::PriceMin => self.price_min.map(|v| v.to_string()),
            CanonicalField::PriceMax => self.price_max.map(|v| v.to_string()),
            CanonicalField::Rating => self.rating.map(|v| v.to_string()),
            CanonicalField::Reviews => self.reviews.map(|v| v.to_string()),
            CanonicalField::HistoricalSold => self.historical_sold.map(|v| v.to_string()),
            CanonicalField::Shop => self.shop.clone(),
            CanonicalField::Location => self.location.clone(),
            CanonicalField::Url => self.url.clone(),
        }
    }
}
