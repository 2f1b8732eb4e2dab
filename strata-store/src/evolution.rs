//! Schema evolution engine.
//!
//! Creates, alters (rewrite-and-migrate), and drops the native
//! representation of a table, keeping the registry consistent with the
//! physical structure. Every operation runs inside one transaction, so a
//! failure leaves either the fully-old or fully-new structure in place,
//! never neither.

use crate::registry;
use crate::row::sql_column_type;
use crate::store::{native_table_exists, storage, RecordStore};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use strata_core::{
    sanitize_field_name, sanitize_table_name, FieldSpec, FieldSpecError, SchemaError, StrataResult,
};
use tracing::info;

/// Acknowledgement returned by schema creation and alteration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaAck {
    pub table_name: String,
    pub fields: Vec<FieldSpec>,
}

/// Acknowledgement returned by a table drop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropAck {
    pub table_name: String,
    /// Rows removed across both representations.
    pub records_deleted: usize,
    pub dropped: bool,
}

impl RecordStore {
    /// Declare a schema, switching the table to native mode.
    ///
    /// Destructive by design: any pre-existing native structure for the
    /// name is dropped and recreated, discarding its data. Generic rows
    /// under the name are left where they are and simply stop being
    /// visible while the native table exists.
    pub fn create_schema(
        &self,
        table_name: &str,
        fields: Vec<FieldSpec>,
    ) -> StrataResult<SchemaAck> {
        let mut conn = self.lock()?;
        let safe = sanitize_table_name(table_name)?.to_string();
        if fields.is_empty() {
            return Err(FieldSpecError::NoFields.into());
        }
        let create_sql = create_table_sql(&safe, &fields)?;

        let tx = conn.transaction().map_err(storage)?;
        if native_table_exists(&tx, &safe)? {
            tx.execute(&format!("DROP TABLE \"{safe}\""), [])
                .map_err(storage)?;
        }
        tx.execute(&create_sql, []).map_err(storage)?;
        registry::put(&tx, &safe, &fields).map_err(storage)?;
        tx.commit().map_err(storage)?;

        info!(table = %safe, fields = fields.len(), "native table created");
        Ok(SchemaAck {
            table_name: safe,
            fields,
        })
    }

    /// Replace a table's schema wholesale, migrating data for the fields
    /// present in both the old and new lists (matched by name, values
    /// copied as-is). Dropped fields lose their data; added fields
    /// default to null.
    pub fn alter_schema(
        &self,
        table_name: &str,
        new_fields: Vec<FieldSpec>,
    ) -> StrataResult<SchemaAck> {
        let mut conn = self.lock()?;
        let safe = sanitize_table_name(table_name)?.to_string();
        if new_fields.is_empty() {
            return Err(FieldSpecError::NoFields.into());
        }
        let old_fields = registry::get(&conn, &safe)
            .map_err(storage)?
            .ok_or_else(|| SchemaError::NoSchema {
                table: safe.clone(),
            })?;

        let tx = conn.transaction().map_err(storage)?;
        if native_table_exists(&tx, &safe)? {
            migrate_native(&tx, &safe, &old_fields, &new_fields)?;
        }
        registry::replace_fields(&tx, &safe, &new_fields).map_err(storage)?;
        tx.commit().map_err(storage)?;

        info!(table = %safe, fields = new_fields.len(), "schema altered");
        Ok(SchemaAck {
            table_name: safe,
            fields: new_fields,
        })
    }

    /// Remove a table entirely: native structure if present, generic rows
    /// under the name, and the registry entry. A table can carry residual
    /// rows in the representation it left behind, so both are always
    /// cleaned. Idempotent — dropping an unknown name succeeds.
    pub fn drop_table(&self, table_name: &str) -> StrataResult<DropAck> {
        let mut conn = self.lock()?;
        let mut records_deleted = 0usize;

        let tx = conn.transaction().map_err(storage)?;
        if native_table_exists(&tx, table_name)? {
            let safe = sanitize_table_name(table_name)?;
            let count: i64 = tx
                .query_row(&format!("SELECT COUNT(*) FROM \"{safe}\""), [], |row| {
                    row.get(0)
                })
                .map_err(storage)?;
            records_deleted += count as usize;
            tx.execute(&format!("DROP TABLE \"{safe}\""), [])
                .map_err(storage)?;
        }
        records_deleted += tx
            .execute(
                "DELETE FROM records WHERE table_name = ?1",
                params![table_name],
            )
            .map_err(storage)?;
        registry::remove(&tx, table_name).map_err(storage)?;
        tx.commit().map_err(storage)?;

        info!(table = table_name, records_deleted, "table dropped");
        Ok(DropAck {
            table_name: table_name.to_string(),
            records_deleted,
            dropped: true,
        })
    }

    /// The declared field list, if any. A registry read only — says
    /// nothing about which representation currently holds data.
    pub fn get_schema(&self, table_name: &str) -> StrataResult<Option<Vec<FieldSpec>>> {
        let conn = self.lock()?;
        registry::get(&conn, table_name).map_err(storage)
    }
}

fn create_table_sql(safe_name: &str, fields: &[FieldSpec]) -> StrataResult<String> {
    let mut columns = vec!["id INTEGER PRIMARY KEY AUTOINCREMENT".to_string()];
    for field in fields {
        let col = sanitize_field_name(&field.name)?;
        columns.push(format!("\"{col}\" {}", sql_column_type(field.field_type)));
    }
    columns.push("created_at TEXT NOT NULL".to_string());
    columns.push("updated_at TEXT NOT NULL".to_string());
    Ok(format!(
        "CREATE TABLE \"{safe_name}\" ({})",
        columns.join(", ")
    ))
}

/// Rewrite-and-migrate: build the new structure under a scratch name,
/// copy the columns common to both field lists, then swap it into place.
fn migrate_native(
    tx: &Connection,
    safe_name: &str,
    old_fields: &[FieldSpec],
    new_fields: &[FieldSpec],
) -> StrataResult<()> {
    let scratch = format!("_alter_{safe_name}");
    tx.execute(&format!("DROP TABLE IF EXISTS \"{scratch}\""), [])
        .map_err(storage)?;
    tx.execute(&create_table_sql(&scratch, new_fields)?, [])
        .map_err(storage)?;

    let old_names: Vec<&str> = old_fields.iter().map(|f| f.name.as_str()).collect();
    let mut common = Vec::new();
    for field in new_fields {
        if old_names.contains(&field.name.as_str()) {
            common.push(format!("\"{}\"", sanitize_field_name(&field.name)?));
        }
    }
    let copy_sql = if common.is_empty() {
        format!(
            "INSERT INTO \"{scratch}\" (id, created_at, updated_at) \
             SELECT id, created_at, updated_at FROM \"{safe_name}\""
        )
    } else {
        let cols = common.join(", ");
        format!(
            "INSERT INTO \"{scratch}\" (id, {cols}, created_at, updated_at) \
             SELECT id, {cols}, created_at, updated_at FROM \"{safe_name}\""
        )
    };
    tx.execute(&copy_sql, []).map_err(storage)?;
    tx.execute(&format!("DROP TABLE \"{safe_name}\""), [])
        .map_err(storage)?;
    tx.execute(
        &format!("ALTER TABLE \"{scratch}\" RENAME TO \"{safe_name}\""),
        [],
    )
    .map_err(storage)?;
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
