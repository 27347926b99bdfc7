//! Record tables and the final leaderboard

use serde::Serialize;

use super::record::{CanonicalField, CanonicalRecord};

/// Canonical records together with the fields the raw schema provided
///
/// `fields` is schema-level: a field listed here was resolved to a raw column,
/// even if individual records lack a value for it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub fields: Vec<CanonicalField>,
    pub records: Vec<CanonicalRecord>,
}

impl Table {
    pub fn new(fields: Vec<CanonicalField>, records: Vec<CanonicalRecord>) -> Self {
        Self { fields, records }
    }

    pub fn has_field(&self, field: CanonicalField) -> bool {
        self.fields.contains(&field)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Ranked, filtered, size-bounded result of one pipeline run
///
/// Read-only once produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Leaderboard {
    fields: Vec<CanonicalField>,
    rows: Vec<CanonicalRecord>,
}

impl Leaderboard {
    pub(crate) fn new(fields: Vec<CanonicalField>, rows: Vec<CanonicalRecord>) -> Self {
        Self { fields, rows }
    }

    /// Canonical fields populated by the source schema, in display order
    pub fn fields(&self) -> &[CanonicalField] {
        &self.fields
    }

    pub fn rows(&self) -> &[CanonicalRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
