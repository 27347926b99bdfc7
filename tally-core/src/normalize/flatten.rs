//! Flattening of nested dataset items

use serde_json::Value;

use crate::domain::record::RawRecord;

/// Flattens nested objects into dotted column names
///
/// `{"shop": {"name": "x"}}` becomes `{"shop.name": "x"}`. Arrays, scalars and
/// empty objects are kept as leaf values. Key order is preserved.
pub fn flatten(record: &RawRecord) -> RawRecord {
    let mut out = RawRecord::new();
    flatten_into(&mut out, None, record);
    out
}

fn flatten_into(out: &mut RawRecord, prefix: Option<&str>, map: &RawRecord) {
    for (key, value) in map {
        let column = match prefix {
            Some(prefix) => format!("{}.{}", prefix, key),
            None => key.clone(),
        };

        match value {
            Value::Object(inner) if !inner.is_empty() => flatten_into(out, Some(&column), inner),
            _ => {
                out.insert(column, value.clone());
            }
        }
    }
}
