//! Rank, filter and truncate
//!
//! Turns a normalized [`Table`] into a [`Leaderboard`]. Ordering is
//! deterministic: sorting is stable and filtering never reorders.

use crate::domain::filter::FilterSpec;
use crate::domain::leaderboard::{Leaderboard, Table};
use crate::domain::record::{CanonicalField, CanonicalRecord};

/// Sorts by `historical_sold`, highest first
///
/// Missing values count as 0 and ties keep their prior relative order. When
/// the schema has no `historical_sold` column the retrieval order is kept.
pub fn rank(mut table: Table) -> Table {
    if table.has_field(CanonicalField::HistoricalSold) {
        table.records.sort_by(|a, b| sold(b).cmp(&sold(a)));
    }
    table
}

/// Keeps the records satisfying every predicate in `spec`
///
/// A predicate whose field is not part of the schema is skipped. Missing
/// values on individual records count as 0.
pub fn filter(mut table: Table, spec: &FilterSpec) -> Table {
    let check_sold = table.has_field(CanonicalField::HistoricalSold);
    let check_rating = table.has_field(CanonicalField::Rating);
    let check_min_price = table.has_field(CanonicalField::PriceMin);
    let check_max_price = table.has_field(CanonicalField::PriceMax) && spec.has_max_price();

    table.records.retain(|record| {
        (!check_sold || sold(record) >= spec.min_sold)
            && (!check_rating || record.rating.unwrap_or(0.0) >= spec.min_rating)
            && (!check_min_price || record.price_min.unwrap_or(0.0) >= spec.min_price)
            && (!check_max_price || record.price_max.unwrap_or(0.0) <= spec.max_price)
    });
    table
}

/// Keeps the first `top_n` records
pub fn truncate(mut table: Table, top_n: usize) -> Leaderboard {
    table.records.truncate(top_n);
    Leaderboard::new(table.fields, table.records)
}

/// Rank, filter and truncate in one pass
pub fn leaderboard(table: Table, spec: &FilterSpec) -> Leaderboard {
    truncate(filter(rank(table), spec), spec.top_n)
}

fn sold(record: &CanonicalRecord) -> u64 {
    record.historical_sold.unwrap_or(0)
}
