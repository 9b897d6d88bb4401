//! Passthrough mapper for sources without a specialized mapping.

use crate::record::{PassthroughRecord, RawRow};
use serde_json::{Map, Value};

/// Identifier given to the row at 1-based `row_index`.
pub fn row_id(row_index: usize) -> String {
    format!("row_{row_index}")
}

/// Copy every non-blank header (trimmed) with its trimmed cell.
///
/// Empty or absent cells become `null`. A whitespace-only cell is not
/// empty and becomes `""`. When two headers trim to the same key the
/// rightmost value is kept at the position of the first.
pub fn map_row(row_index: usize, row: &RawRow) -> PassthroughRecord {
    let mut fields = Map::new();
    for (header, value) in row.iter() {
        let key = header.trim();
        if key.is_empty() {
            continue;
        }
        let value = match value {
            Some(v) if !v.is_empty() => Value::String(v.trim().to_owned()),
            _ => Value::Null,
        };
        fields.insert(key.to_owned(), value);
    }

    PassthroughRecord {
        id: row_id(row_index),
        fields,
    }
}
