//! Typed coercion and price rescaling
//!
//! Providers store prices at inconsistent magnitudes: whole currency units,
//! thousandths, or hundred-thousandths. [`PriceScale`] guesses the encoding
//! from the magnitude alone. It is a best-effort heuristic, not a guaranteed
//! unit conversion; when it disagrees with real provider data, adjust the
//! thresholds rather than the code.

use serde_json::Value;

use crate::domain::leaderboard::Table;
use crate::domain::record::{CanonicalField, CanonicalRecord};
use crate::normalize::schema::{ColumnMapping, Normalized, PartialRecord};

/// Magnitude thresholds used to rescale raw prices
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceScale {
    /// Values above this are treated as hundred-thousandths
    pub micro_threshold: f64,
    pub micro_divisor: f64,
    /// Values above this (up to `micro_threshold`) are treated as thousandths
    pub milli_threshold: f64,
    pub milli_divisor: f64,
}

impl Default for PriceScale {
    fn default() -> Self {
        Self {
            micro_threshold: 1e9,
            micro_divisor: 100_000.0,
            milli_threshold: 1e6,
            milli_divisor: 1_000.0,
        }
    }
}

impl PriceScale {
    /// Rescales a numeric price
    pub fn rescale(&self, value: f64) -> f64 {
        if value > self.micro_threshold {
            value / self.micro_divisor
        } else if value > self.milli_threshold {
            value / self.milli_divisor
        } else {
            value
        }
    }

    /// Parses and rescales a raw price; absent, negative or non-numeric input
    /// stays absent
    pub fn normalize(&self, raw: Option<&Value>) -> Option<f64> {
        raw.and_then(parse_number)
            .filter(|v| *v >= 0.0)
            .map(|v| self.rescale(v))
    }
}

/// Parses a JSON number or numeric string
///
/// Non-finite results are rejected.
pub fn parse_number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

/// Parses a rating without rescaling
pub fn parse_rating(raw: Option<&Value>) -> Option<f64> {
    raw.and_then(parse_number)
}

/// Parses a non-negative count, truncating any fraction
fn parse_count(raw: Option<&Value>) -> Option<u64> {
    raw.and_then(parse_number)
        .filter(|v| *v >= 0.0)
        .map(|v| v.trunc() as u64)
}

fn parse_text(raw: Option<&Value>) -> Option<String> {
    match raw? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Converts projected records into typed canonical records
#[derive(Debug, Clone, Default)]
pub struct MetricNormalizer {
    scale: PriceScale,
}

impl MetricNormalizer {
    pub fn new(scale: PriceScale) -> Self {
        Self { scale }
    }

    /// Coerces one projected record
    ///
    /// `historical_sold` defaults to 0 when the column exists in the schema
    /// but this record has no usable value for it.
    pub fn coerce(&self, mapping: &ColumnMapping, record: &PartialRecord) -> CanonicalRecord {
        let historical_sold = parse_count(record.get(CanonicalField::HistoricalSold))
            .or_else(|| mapping.contains(CanonicalField::HistoricalSold).then_some(0));

        CanonicalRecord {
            title: parse_text(record.get(CanonicalField::Title)),
            price_min: self.scale.normalize(record.get(CanonicalField::PriceMin)),
            price_max: self.scale.normalize(record.get(CanonicalField::PriceMax)),
            rating: parse_rating(record.get(CanonicalField::Rating)),
            reviews: parse_count(record.get(CanonicalField::Reviews)),
            historical_sold,
            shop: parse_text(record.get(CanonicalField::Shop)),
            location: parse_text(record.get(CanonicalField::Location)),
            url: parse_text(record.get(CanonicalField::Url)),
        }
    }

    /// Coerces a whole batch into a table
    pub fn apply(&self, normalized: &Normalized) -> Table {
        let records = normalized
            .records
            .iter()
            .map(|r| self.coerce(&normalized.mapping, r))
            .collect();

        Table::new(normalized.mapping.fields(), records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::schema::{RawSchema, normalize};
    use serde_json::json;

    #[test]
    fn test_price_rescaling() {
        let scale = PriceScale::default();

        assert_eq!(scale.normalize(Some(&json!(2_000_000_000u64))), Some(20_000.0));
        assert_eq!(scale.normalize(Some(&json!(5_000_000))), Some(5_000.0));
        assert_eq!(scale.normalize(Some(&json!(50_000))), Some(50_000.0));
    }

    #[test]
    fn test_price_boundaries_are_inclusive_below() {
        let scale = PriceScale::default();

        assert_eq!(scale.rescale(1e6), 1e6);
        assert_eq!(scale.rescale(1e9), 1e6);
        assert_eq!(scale.rescale(1e9 + 100_000.0), (1e9 + 100_000.0) / 100_000.0);
    }

    #[test]
    fn test_absent_or_non_numeric_price_is_absent() {
        let scale = PriceScale::default();

        assert_eq!(scale.normalize(None), None);
        assert_eq!(scale.normalize(Some(&Value::Null)), None);
        assert_eq!(scale.normalize(Some(&json!("n/a"))), None);
        assert_eq!(scale.normalize(Some(&json!(true))), None);
        assert_eq!(scale.normalize(Some(&json!("NaN"))), None);
        assert_eq!(scale.normalize(Some(&json!(-5_000_000))), None);
        assert_eq!(scale.normalize(Some(&json!("-12"))), None);
    }

    #[test]
    fn test_numeric_strings_are_parsed() {
        let scale = PriceScale::default();
        assert_eq!(scale.normalize(Some(&json!(" 15000000 "))), Some(15_000.0));
    }

    #[test]
    fn test_custom_scale() {
        let scale = PriceScale {
            micro_threshold: 1e12,
            micro_divisor: 1e6,
            milli_threshold: 1e4,
            milli_divisor: 100.0,
        };
        assert_eq!(scale.rescale(50_000.0), 500.0);
    }

    #[test]
    fn test_rating_is_not_rescaled() {
        assert_eq!(parse_rating(Some(&json!("4.75"))), Some(4.75));
        assert_eq!(parse_rating(Some(&json!("great"))), None);
    }

    #[test]
    fn test_coerce_record() {
        let raw = json!({
            "name": "Kaos",
            "price": 2_500_000_000u64,
            "rating_star": "4.9",
            "rating_count": 12.0,
            "historical_sold": "150",
            "shop_name": "Toko A",
            "url": "https://example.com/a"
        });
        let records = vec![raw.as_object().unwrap().clone()];

        let table = MetricNormalizer::default().apply(&normalize(&records));
        let record = &table.records[0];

        assert_eq!(record.title.as_deref(), Some("Kaos"));
        assert_eq!(record.price_min, Some(25_000.0));
        assert_eq!(record.price_max, None);
        assert_eq!(record.rating, Some(4.9));
        assert_eq!(record.reviews, Some(12));
        assert_eq!(record.historical_sold, Some(150));
        assert_eq!(record.shop.as_deref(), Some("Toko A"));
        assert_eq!(record.url.as_deref(), Some("https://example.com/a"));
        assert!(!table.has_field(CanonicalField::PriceMax));
    }

    #[test]
    fn test_sold_defaults_to_zero_only_when_column_exists() {
        let normalizer = MetricNormalizer::default();

        let with_column = ColumnMapping::resolve(&RawSchema::new(vec!["sold".to_string()]));
        let coerced = normalizer.coerce(&with_column, &PartialRecord::default());
        assert_eq!(coerced.historical_sold, Some(0));

        let without_column = ColumnMapping::resolve(&RawSchema::new(vec!["title".to_string()]));
        let coerced = normalizer.coerce(&without_column, &PartialRecord::default());
        assert_eq!(coerced.historical_sold, None);
    }

    #[test]
    fn test_text_fields_render_non_strings() {
        assert_eq!(parse_text(Some(&json!(42))), Some("42".to_string()));
        assert_eq!(parse_text(Some(&Value::Null)), None);
    }
}
