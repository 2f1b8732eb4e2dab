//! Value binding and row mapping between SQLite cells and core types.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::ValueRef;
use strata_core::{FieldType, RecordData, RecordId, StorageError, StrataError, Timestamp, Value};

/// Render a timestamp the way the store persists it.
pub(crate) fn format_timestamp(ts: Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a persisted timestamp column.
pub(crate) fn parse_timestamp(text: &str) -> Result<Timestamp, StrataError> {
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StorageError::failure(format!("bad timestamp '{text}': {e}")).into())
}

/// Convert a core value into an owned SQLite value for binding.
///
/// Booleans become 0/1 integers, JSON values become their serialized text.
pub(crate) fn bind_value(value: &Value) -> rusqlite::types::Value {
    match value {
        Value::Null => rusqlite::types::Value::Null,
        Value::Boolean(b) => rusqlite::types::Value::Integer(i64::from(*b)),
        Value::Integer(i) => rusqlite::types::Value::Integer(*i),
        Value::Real(r) => rusqlite::types::Value::Real(*r),
        Value::Text(s) => rusqlite::types::Value::Text(s.clone()),
        Value::Json(j) => rusqlite::types::Value::Text(j.to_string()),
    }
}

/// Interpret a native-table cell, refined by the declared field type.
///
/// SQLite cells are dynamically typed, so the cell's own type wins and the
/// declared type only disambiguates the lossy encodings: integer cells in
/// boolean columns and text cells in json columns.
pub(crate) fn column_value(cell: ValueRef<'_>, declared: Option<FieldType>) -> Value {
    match cell {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => {
            if declared == Some(FieldType::Boolean) {
                Value::Boolean(i != 0)
            } else {
                Value::Integer(i)
            }
        }
        ValueRef::Real(r) => Value::Real(r),
        ValueRef::Text(bytes) => {
            let text = String::from_utf8_lossy(bytes).into_owned();
            if declared == Some(FieldType::Json) {
                match serde_json::from_str::<serde_json::Value>(&text) {
                    Ok(parsed) => Value::from_json(parsed),
                    Err(_) => Value::Text(text),
                }
            } else {
                Value::Text(text)
            }
        }
        ValueRef::Blob(bytes) => Value::Text(String::from_utf8_lossy(bytes).into_owned()),
    }
}

/// Deserialize a generic-mode document column back into record data.
pub(crate) fn map_generic_document(id: RecordId, doc: &str) -> Result<RecordData, StrataError> {
    let parsed: serde_json::Value = serde_json::from_str(doc)
        .map_err(|e| StorageError::failure(format!("record {id} has a corrupt document: {e}")))?;
    let serde_json::Value::Object(map) = parsed else {
        return Err(StorageError::failure(format!("record {id} document is not an object")).into());
    };
    Ok(map
        .into_iter()
        .map(|(k, v)| (k, Value::from_json(v)))
        .collect())
}

/// SQLite column type for a declared field type.
pub(crate) fn sql_column_type(field_type: FieldType) -> &'static str {
    match field_type {
        FieldType::Text | FieldType::Json => "TEXT",
        FieldType::Integer | FieldType::Boolean => "INTEGER",
        FieldType::Real => "REAL",
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_roundtrip() {
        let now = Utc::now();
        let parsed = parse_timestamp(&format_timestamp(now)).unwrap();
        // Micros precision is preserved end to end.
        assert_eq!(parsed.timestamp_micros(), now.timestamp_micros());
    }

    #[test]
    fn test_bind_boolean_as_integer() {
        assert_eq!(
            bind_value(&Value::Boolean(true)),
            rusqlite::types::Value::Integer(1)
        );
    }

    #[test]
    fn test_column_value_boolean_refinement() {
        let v = column_value(ValueRef::Integer(1), Some(FieldType::Boolean));
        assert_eq!(v, Value::Boolean(true));
        let v = column_value(ValueRef::Integer(1), Some(FieldType::Integer));
        assert_eq!(v, Value::Integer(1));
    }

    #[test]
    fn test_column_value_json_refinement() {
        let v = column_value(ValueRef::Text(b"{\"a\":1}"), Some(FieldType::Json));
        assert_eq!(v, Value::Json(serde_json::json!({"a": 1})));
        // Unparsable json cells fall back to text rather than erroring.
        let v = column_value(ValueRef::Text(b"not json"), Some(FieldType::Json));
        assert_eq!(v, Value::Text("not json".to_string()));
    }

    #[test]
    fn test_sql_column_types() {
        assert_eq!(sql_column_type(FieldType::Text), "TEXT");
        assert_eq!(sql_column_type(FieldType::Json), "TEXT");
        assert_eq!(sql_column_type(FieldType::Integer), "INTEGER");
        assert_eq!(sql_column_type(FieldType::Boolean), "INTEGER");
        assert_eq!(sql_column_type(FieldType::Real), "REAL");
    }
}
