//! Normalization of raw dataset items
//!
//! Raw items go through three passes:
//! - [`flatten`]: nested objects become dotted column names
//! - [`schema`]: canonical fields are resolved against the raw column names
//!   and each item is projected onto them
//! - [`metric`]: projected values are coerced into typed canonical records,
//!   with prices rescaled to whole currency units

pub mod flatten;
pub mod metric;
pub mod schema;

pub use flatten::flatten;
pub use metric::{MetricNormalizer, PriceScale};
pub use schema::{ColumnMapping, Normalized, PartialRecord, RawSchema};
