//! Column inference
//!
//! Maps a provider-defined column layout onto the canonical fields. Resolution
//! looks only at column names, never at values, so the same raw schema always
//! yields the same mapping.

use serde_json::Value;
use std::collections::{BTreeMap, HashSet};

use crate::domain::record::{CanonicalField, RawRecord};

/// Column names of a batch of raw records, in order of first appearance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSchema {
    columns: Vec<String>,
}

impl RawSchema {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }

    pub fn from_records(records: &[RawRecord]) -> Self {
        let mut seen = HashSet::new();
        let mut columns = Vec::new();

        for record in records {
            for key in record.keys() {
                if seen.insert(key.as_str()) {
                    columns.push(key.clone());
                }
            }
        }

        Self { columns }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }
}

/// Which raw column feeds each canonical field
///
/// A canonical field with no matching column is simply absent. Each raw
/// column feeds at most one canonical field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMapping {
    sources: BTreeMap<CanonicalField, String>,
}

/// Order in which fields claim columns; a claimed column is not reused
const CLAIM_ORDER: [CanonicalField; 9] = [
    CanonicalField::Url,
    CanonicalField::Location,
    CanonicalField::Shop,
    CanonicalField::PriceMax,
    CanonicalField::PriceMin,
    CanonicalField::Reviews,
    CanonicalField::Rating,
    CanonicalField::HistoricalSold,
    CanonicalField::Title,
];

impl ColumnMapping {
    /// Resolves every canonical field against the schema
    ///
    /// Fields claim columns in [`CLAIM_ORDER`]. For each field the first
    /// unclaimed column (in schema order) satisfying its predicate wins, so
    /// `shop_location` feeds `location` and never `shop` as well. Matching is
    /// case-insensitive.
    pub fn resolve(schema: &RawSchema) -> Self {
        let lowered: Vec<String> = schema.columns.iter().map(|c| c.to_lowercase()).collect();
        let mut claimed = vec![false; lowered.len()];
        let mut sources = BTreeMap::new();

        for field in CLAIM_ORDER {
            let found = (0..lowered.len())
                .find(|&idx| !claimed[idx] && column_matches(field, &lowered[idx]));

            if let Some(idx) = found {
                claimed[idx] = true;
                sources.insert(field, schema.columns[idx].clone());
            }
        }

        Self { sources }
    }

    /// Raw column resolved for `field`
    pub fn source(&self, field: CanonicalField) -> Option<&str> {
        self.sources.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: CanonicalField) -> bool {
        self.sources.contains_key(&field)
    }

    /// Resolved canonical fields, in display order
    pub fn fields(&self) -> Vec<CanonicalField> {
        self.sources.keys().copied().collect()
    }

    /// Projects one raw record onto the canonical fields
    ///
    /// Unmapped raw columns are dropped.
    pub fn project(&self, record: &RawRecord) -> PartialRecord {
        let values = self
            .sources
            .iter()
            .filter_map(|(field, column)| record.get(column).map(|v| (*field, v.clone())))
            .collect();

        PartialRecord { values }
    }
}

fn column_matches(field: CanonicalField, name: &str) -> bool {
    match field {
        CanonicalField::Title => name.contains("title") || name.contains("name"),
        CanonicalField::HistoricalSold => {
            name.contains("historical_sold") || name == "sold" || name.contains("sold")
        }
        CanonicalField::Rating => name.contains("rating_star") || name == "rating",
        CanonicalField::Reviews => name.contains("rating_count") || name.contains("review"),
        CanonicalField::PriceMin => name.contains("price_min") || name == "price",
        CanonicalField::PriceMax => name.contains("price_max"),
        CanonicalField::Shop => {
            name.contains("shop_name") || name.contains("seller") || name.contains("shop")
        }
        CanonicalField::Location => name.contains("shop_location") || name == "location",
        CanonicalField::Url => name.contains("url") || name.contains("link"),
    }
}

/// Raw values keyed by canonical field, before typed coercion
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialRecord {
    values: BTreeMap<CanonicalField, Value>,
}

impl PartialRecord {
    pub fn get(&self, field: CanonicalField) -> Option<&Value> {
        self.values.get(&field)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Result of schema normalization over one batch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Normalized {
    pub mapping: ColumnMapping,
    pub records: Vec<PartialRecord>,
}

/// Resolves the batch's schema and projects every record onto it
pub fn normalize(records: &[RawRecord]) -> Normalized {
    let schema = RawSchema::from_records(records);
    let mapping = ColumnMapping::resolve(&schema);
    let records = records.iter().map(|r| mapping.project(r)).collect();

    Normalized { mapping, records }
}
