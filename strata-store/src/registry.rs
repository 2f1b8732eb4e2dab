//! Schema registry: table name to declared field list.
//!
//! Pure metadata with last-write-wins semantics. The registry never
//! performs physical DDL; it is kept in sync by the evolution engine and
//! is never treated as authoritative over the physical table check.

use crate::row::format_timestamp;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use strata_core::FieldSpec;

/// Read the declared field list for a table, if any.
pub fn get(conn: &Connection, table_name: &str) -> rusqlite::Result<Option<Vec<FieldSpec>>> {
    let fields_json: Option<String> = conn
        .query_row(
            "SELECT fields_json FROM table_schemas WHERE table_name = ?1",
            params![table_name],
            |row| row.get(0),
        )
        .optional()?;
    match fields_json {
        None => Ok(None),
        Some(json) => {
            let fields = serde_json::from_str(&json).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    0,
                    rusqlite::types::Type::Text,
                    Box::new(e),
                )
            })?;
            Ok(Some(fields))
        }
    }
}

/// Write a registry entry, replacing any previous one for the name.
pub fn put(conn: &Connection, table_name: &str, fields: &[FieldSpec]) -> rusqlite::Result<()> {
    let now = format_timestamp(Utc::now());
    let fields_json = serde_json::to_string(fields).expect("field specs serialize");
    conn.execute(
        "INSERT OR REPLACE INTO table_schemas (table_name, fields_json, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?3)",
        params![table_name, fields_json, now],
    )?;
    Ok(())
}

/// Overwrite only the field list of an existing entry, preserving its
/// creation timestamp. Returns whether an entry was updated.
pub fn replace_fields(
    conn: &Connection,
    table_name: &str,
    fields: &[FieldSpec],
) -> rusqlite::Result<bool> {
    let now = format_timestamp(Utc::now());
    let fields_json = serde_json::to_string(fields).expect("field specs serialize");
    let changed = conn.execute(
        "UPDATE table_schemas SET fields_json = ?2, updated_at = ?3 WHERE table_name = ?1",
        params![table_name, fields_json, now],
    )?;
    Ok(changed > 0)
}

/// Remove the entry for a table. Idempotent.
pub fn remove(conn: &Connection, table_name: &str) -> rusqlite::Result<()> {
    conn.execute(
        "DELETE FROM table_schemas WHERE table_name = ?1",
        params![table_name],
    )?;
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::FieldType;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        crate::store::init_schema(&conn).unwrap();
        conn
    }

    #[test]
    fn test_get_missing_is_none() {
        let conn = test_conn();
        assert_eq!(get(&conn, "users").unwrap(), None);
    }

    #[test]
    fn test_put_then_get_preserves_order() {
        let conn = test_conn();
        let fields = vec![
            FieldSpec::text("name"),
            FieldSpec::new("age", FieldType::Integer),
        ];
        put(&conn, "users", &fields).unwrap();
        assert_eq!(get(&conn, "users").unwrap(), Some(fields));
    }

    #[test]
    fn test_put_is_last_write_wins() {
        let conn = test_conn();
        put(&conn, "users", &[FieldSpec::text("name")]).unwrap();
        let newer = vec![FieldSpec::text("email")];
        put(&conn, "users", &newer).unwrap();
        assert_eq!(get(&conn, "users").unwrap(), Some(newer));
    }

    #[test]
    fn test_replace_fields_requires_existing_entry() {
        let conn = test_conn();
        let fields = vec![FieldSpec::text("name")];
        assert!(!replace_fields(&conn, "ghost", &fields).unwrap());
        put(&conn, "users", &fields).unwrap();
        assert!(replace_fields(&conn, "users", &[FieldSpec::text("email")]).unwrap());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let conn = test_conn();
        put(&conn, "users", &[FieldSpec::text("name")]).unwrap();
        remove(&conn, "users").unwrap();
        remove(&conn, "users").unwrap();
        assert_eq!(get(&conn, "users").unwrap(), None);
    }
}
