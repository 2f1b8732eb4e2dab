//! Dual-mode CRUD engine.
//!
//! Mode resolution happens once per operation: a physical `sqlite_master`
//! lookup decides whether the logical table is native or generic. Registry
//! entries can exist without a physical table (mid-recreation, after a
//! drop), so the physical check is the only ground truth for where data
//! lives.

use crate::config::{StoreConfig, BUSY_TIMEOUT_MS};
use crate::registry;
use crate::row::{bind_value, column_value, format_timestamp, map_generic_document, parse_timestamp};
use chrono::Utc;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use std::collections::{BTreeSet, HashMap};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use strata_core::{
    sanitize_field_name, sanitize_table_name, FieldSpec, FieldType, Record, RecordData, RecordId,
    SchemaError, StorageError, StrataError, StrataResult, Value, INTERNAL_TABLES, SYSTEM_COLUMNS,
};
use tracing::debug;

/// Default bound on `list` result size.
pub const DEFAULT_LIST_LIMIT: usize = 100;

/// Effectively-unbounded limit used when `find_by_field` scans candidates.
/// A scan, not an index: the store targets small tool-driven workloads.
pub const FIND_SCAN_LIMIT: usize = 500;

/// Map a driver error into the storage failure variant.
pub(crate) fn storage(e: rusqlite::Error) -> StrataError {
    StorageError::failure(e.to_string()).into()
}

/// Create the store's own physical tables if absent.
pub(crate) fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS records (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            table_name TEXT NOT NULL,
            data TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_records_table ON records(table_name);
        CREATE TABLE IF NOT EXISTS table_schemas (
            table_name TEXT PRIMARY KEY,
            fields_json TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );",
    )
}

/// True if a native table with this name exists and is not one of the
/// store's own bookkeeping tables.
pub(crate) fn native_table_exists(conn: &Connection, table_name: &str) -> StrataResult<bool> {
    if INTERNAL_TABLES.contains(&table_name) {
        return Ok(false);
    }
    let found: Option<String> = conn
        .query_row(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1",
            params![table_name],
            |row| row.get(0),
        )
        .optional()
        .map_err(storage)?;
    Ok(found.is_some())
}

// ============================================================================
// STORE HANDLE
// ============================================================================

/// Handle to one backing database.
///
/// Every operation acquires the connection for its full duration, so
/// structural changes are serialized against concurrent reads and writes
/// on the same store. All work is synchronous relative to the caller.
#[derive(Debug)]
pub struct RecordStore {
    conn: Mutex<Connection>,
}

impl RecordStore {
    /// Open (creating if necessary) the database at the configured path.
    pub fn open(config: &StoreConfig) -> StrataResult<Self> {
        let conn = Connection::open(&config.path).map_err(storage)?;
        conn.query_row("PRAGMA journal_mode = WAL", [], |_row| Ok(()))
            .map_err(storage)?;
        Self::from_connection(conn)
    }

    /// Open a private in-memory store, used by tests and ephemeral tooling.
    pub fn open_in_memory() -> StrataResult<Self> {
        let conn = Connection::open_in_memory().map_err(storage)?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> StrataResult<Self> {
        conn.busy_timeout(Duration::from_millis(BUSY_TIMEOUT_MS))
            .map_err(storage)?;
        init_schema(&conn).map_err(storage)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Close the store, flushing the underlying connection.
    pub fn close(self) -> StrataResult<()> {
        let conn = self
            .conn
            .into_inner()
            .map_err(|_| StrataError::from(StorageError::LockPoisoned))?;
        conn.close().map_err(|(_conn, e)| storage(e))
    }

    pub(crate) fn lock(&self) -> StrataResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StorageError::LockPoisoned.into())
    }

    // ========================================================================
    // CRUD OPERATIONS
    // ========================================================================

    /// Insert a record, assigning its id and timestamps.
    ///
    /// Native mode maps `data` onto declared columns and rejects keys
    /// outside the schema; generic mode serializes `data` wholesale.
    pub fn create(&self, table_name: &str, data: RecordData) -> StrataResult<Record> {
        let conn = self.lock()?;
        create_locked(&conn, table_name, data)
    }

    /// Look up one record by id. `None` when absent — not an error.
    pub fn get(&self, table_name: &str, id: RecordId) -> StrataResult<Option<Record>> {
        let conn = self.lock()?;
        get_locked(&conn, table_name, id)
    }

    /// List records newest-first. `None` limit applies the default bound.
    pub fn list(&self, table_name: &str, limit: Option<usize>) -> StrataResult<Vec<Record>> {
        let conn = self.lock()?;
        list_locked(&conn, table_name, limit.unwrap_or(DEFAULT_LIST_LIMIT))
    }

    /// Records whose `data[field]` equals `value`. String comparison is
    /// case-insensitive; every other type uses exact equality.
    pub fn find_by_field(
        &self,
        table_name: &str,
        field: &str,
        value: &Value,
    ) -> StrataResult<Vec<Record>> {
        let conn = self.lock()?;
        find_locked(&conn, table_name, field, value)
    }

    /// Shallow-merge `patch` into an existing record. `None` when the id
    /// does not exist; callers treat that as not-found, not as an error.
    pub fn update(
        &self,
        table_name: &str,
        id: RecordId,
        patch: RecordData,
    ) -> StrataResult<Option<Record>> {
        let conn = self.lock()?;
        update_locked(&conn, table_name, id, patch)
    }

    /// Remove one record; returns whether a row was actually removed.
    pub fn delete(&self, table_name: &str, id: RecordId) -> StrataResult<bool> {
        let conn = self.lock()?;
        let deleted = if native_table_exists(&conn, table_name)? {
            let safe = sanitize_table_name(table_name)?;
            conn.execute(&format!("DELETE FROM \"{safe}\" WHERE id = ?1"), params![id])
                .map_err(storage)?
        } else {
            conn.execute(
                "DELETE FROM records WHERE table_name = ?1 AND id = ?2",
                params![table_name, id],
            )
            .map_err(storage)?
        };
        Ok(deleted > 0)
    }

    /// Find the first (newest) record matching `field == value`, apply
    /// `patch` to it, and return the refreshed record. `None` when no
    /// record matched, with nothing mutated.
    pub fn find_update_and_get(
        &self,
        table_name: &str,
        field: &str,
        value: &Value,
        patch: RecordData,
    ) -> StrataResult<Option<Record>> {
        let conn = self.lock()?;
        let matches = find_locked(&conn, table_name, field, value)?;
        let Some(hit) = matches.first() else {
            return Ok(None);
        };
        update_locked(&conn, table_name, hit.id, patch)
    }

    /// All logical table names: the union, deduplicated, of names with
    /// generic rows, names with registry entries, and native tables. The
    /// store's own bookkeeping tables are never surfaced.
    pub fn list_tables(&self) -> StrataResult<BTreeSet<String>> {
        let conn = self.lock()?;
        let mut names = BTreeSet::new();
        collect_names(
            &conn,
            "SELECT DISTINCT table_name FROM records",
            &mut names,
        )?;
        collect_names(&conn, "SELECT table_name FROM table_schemas", &mut names)?;
        collect_names(
            &conn,
            "SELECT name FROM sqlite_master WHERE type = 'table'",
            &mut names,
        )?;
        names.retain(|n| !INTERNAL_TABLES.contains(&n.as_str()));
        Ok(names)
    }
}

fn collect_names(
    conn: &Connection,
    sql: &str,
    out: &mut BTreeSet<String>,
) -> StrataResult<()> {
    let mut stmt = conn.prepare(sql).map_err(storage)?;
    let mut rows = stmt.query([]).map_err(storage)?;
    while let Some(row) = rows.next().map_err(storage)? {
        out.insert(row.get(0).map_err(storage)?);
    }
    Ok(())
}

// ============================================================================
// LOCKED OPERATION BODIES
// ============================================================================
// Shared by the public methods and by composite operations that must run
// under a single lock acquisition.

pub(crate) fn create_locked(
    conn: &Connection,
    table_name: &str,
    data: RecordData,
) -> StrataResult<Record> {
    let now = format_timestamp(Utc::now());
    let id = if native_table_exists(conn, table_name)? {
        native_insert(conn, table_name, &data, &now)?
    } else {
        let doc = serialize_document(&data);
        conn.execute(
            "INSERT INTO records (table_name, data, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?3)",
            params![table_name, doc, now],
        )
        .map_err(storage)?;
        conn.last_insert_rowid()
    };
    debug!(table = table_name, id, "record created");
    get_locked(conn, table_name, id)?.ok_or_else(|| {
        StorageError::failure(format!("record {id} vanished after insert into '{table_name}'"))
            .into()
    })
}

fn native_insert(
    conn: &Connection,
    table_name: &str,
    data: &RecordData,
    now: &str,
) -> StrataResult<RecordId> {
    let safe = sanitize_table_name(table_name)?;
    let schema = registry::get(conn, table_name)
        .map_err(storage)?
        .ok_or_else(|| SchemaError::NoSchema {
            table: table_name.to_string(),
        })?;
    reject_unknown_keys(table_name, &schema, data)?;

    let mut columns = Vec::with_capacity(schema.len() + 2);
    let mut placeholders = Vec::with_capacity(schema.len() + 2);
    let mut values: Vec<rusqlite::types::Value> = Vec::with_capacity(schema.len() + 2);
    for field in &schema {
        let col = sanitize_field_name(&field.name)?;
        values.push(bind_value(data.get(&field.name).unwrap_or(&Value::Null)));
        columns.push(format!("\"{col}\""));
        placeholders.push(format!("?{}", values.len()));
    }
    for col in ["created_at", "updated_at"] {
        values.push(rusqlite::types::Value::Text(now.to_string()));
        columns.push(col.to_string());
        placeholders.push(format!("?{}", values.len()));
    }
    let sql = format!(
        "INSERT INTO \"{safe}\" ({}) VALUES ({})",
        columns.join(", "),
        placeholders.join(", ")
    );
    conn.execute(&sql, params_from_iter(values)).map_err(storage)?;
    Ok(conn.last_insert_rowid())
}

pub(crate) fn get_locked(
    conn: &Connection,
    table_name: &str,
    id: RecordId,
) -> StrataResult<Option<Record>> {
    if native_table_exists(conn, table_name)? {
        let safe = sanitize_table_name(table_name)?;
        let types = declared_types(conn, table_name)?;
        let sql = format!("SELECT * FROM \"{safe}\" WHERE id = ?1");
        let mut stmt = conn.prepare(&sql).map_err(storage)?;
        let columns: Vec<String> = stmt.column_names().iter().map(|s| s.to_string()).collect();
        let mut rows = stmt.query(params![id]).map_err(storage)?;
        match rows.next().map_err(storage)? {
            Some(row) => Ok(Some(map_native_row(row, &columns, table_name, &types)?)),
            None => Ok(None),
        }
    } else {
        let mut stmt = conn
            .prepare(
                "SELECT id, table_name, data, created_at, updated_at \
                 FROM records WHERE table_name = ?1 AND id = ?2",
            )
            .map_err(storage)?;
        let mut rows = stmt.query(params![table_name, id]).map_err(storage)?;
        match rows.next().map_err(storage)? {
            Some(row) => Ok(Some(map_generic_row(row)?)),
            None => Ok(None),
        }
    }
}

pub(crate) fn list_locked(
    conn: &Connection,
    table_name: &str,
    limit: usize,
) -> StrataResult<Vec<Record>> {
    let limit = limit as i64;
    let mut out = Vec::new();
    if native_table_exists(conn, table_name)? {
        let safe = sanitize_table_name(table_name)?;
        let types = declared_types(conn, table_name)?;
        let sql = format!("SELECT * FROM \"{safe}\" ORDER BY id DESC LIMIT ?1");
        let mut stmt = conn.prepare(&sql).map_err(storage)?;
        let columns: Vec<String> = stmt.column_names().iter().map(|s| s.to_string()).collect();
        let mut rows = stmt.query(params![limit]).map_err(storage)?;
        while let Some(row) = rows.next().map_err(storage)? {
            out.push(map_native_row(row, &columns, table_name, &types)?);
        }
    } else {
        let mut stmt = conn
            .prepare(
                "SELECT id, table_name, data, created_at, updated_at \
                 FROM records WHERE table_name = ?1 ORDER BY id DESC LIMIT ?2",
            )
            .map_err(storage)?;
        let mut rows = stmt.query(params![table_name, limit]).map_err(storage)?;
        while let Some(row) = rows.next().map_err(storage)? {
            out.push(map_generic_row(row)?);
        }
    }
    Ok(out)
}

fn find_locked(
    conn: &Connection,
    table_name: &str,
    field: &str,
    value: &Value,
) -> StrataResult<Vec<Record>> {
    let candidates = list_locked(conn, table_name, FIND_SCAN_LIMIT)?;
    Ok(candidates
        .into_iter()
        .filter(|r| r.data.get(field).is_some_and(|v| v.matches(value)))
        .collect())
}

fn update_locked(
    conn: &Connection,
    table_name: &str,
    id: RecordId,
    patch: RecordData,
) -> StrataResult<Option<Record>> {
    let Some(existing) = get_locked(conn, table_name, id)? else {
        return Ok(None);
    };
    let now = format_timestamp(Utc::now());
    if native_table_exists(conn, table_name)? {
        let safe = sanitize_table_name(table_name)?;
        let schema = registry::get(conn, table_name)
            .map_err(storage)?
            .ok_or_else(|| SchemaError::NoSchema {
                table: table_name.to_string(),
            })?;
        reject_unknown_keys(table_name, &schema, &patch)?;

        // Column-wise update for only the patched columns, in schema order.
        let mut sets = Vec::new();
        let mut values: Vec<rusqlite::types::Value> = Vec::new();
        for field in &schema {
            if let Some(v) = patch.get(&field.name) {
                let col = sanitize_field_name(&field.name)?;
                values.push(bind_value(v));
                sets.push(format!("\"{col}\" = ?{}", values.len()));
            }
        }
        values.push(rusqlite::types::Value::Text(now));
        sets.push(format!("updated_at = ?{}", values.len()));
        values.push(rusqlite::types::Value::Integer(id));
        let sql = format!(
            "UPDATE \"{safe}\" SET {} WHERE id = ?{}",
            sets.join(", "),
            values.len()
        );
        conn.execute(&sql, params_from_iter(values)).map_err(storage)?;
    } else {
        let mut merged = existing.data;
        merged.extend(patch);
        let doc = serialize_document(&merged);
        conn.execute(
            "UPDATE records SET data = ?1, updated_at = ?2 WHERE table_name = ?3 AND id = ?4",
            params![doc, now, table_name, id],
        )
        .map_err(storage)?;
    }
    debug!(table = table_name, id, "record updated");
    get_locked(conn, table_name, id)
}

// ============================================================================
// ROW MAPPING
// ============================================================================

fn declared_types(
    conn: &Connection,
    table_name: &str,
) -> StrataResult<HashMap<String, FieldType>> {
    let schema = registry::get(conn, table_name).map_err(storage)?;
    Ok(schema
        .unwrap_or_default()
        .into_iter()
        .map(|f: FieldSpec| (f.name, f.field_type))
        .collect())
}

fn reject_unknown_keys(
    table_name: &str,
    schema: &[FieldSpec],
    data: &RecordData,
) -> StrataResult<()> {
    let declared: BTreeSet<&str> = schema.iter().map(|f| f.name.as_str()).collect();
    if let Some(extra) = data.keys().find(|k| !declared.contains(k.as_str())) {
        return Err(SchemaError::UnknownField {
            table: table_name.to_string(),
            field: extra.clone(),
        }
        .into());
    }
    Ok(())
}

fn serialize_document(data: &RecordData) -> String {
    let doc: serde_json::Map<String, serde_json::Value> = data
        .iter()
        .map(|(k, v)| (k.clone(), v.to_json()))
        .collect();
    serde_json::Value::Object(doc).to_string()
}

fn map_native_row(
    row: &rusqlite::Row<'_>,
    columns: &[String],
    table_name: &str,
    types: &HashMap<String, FieldType>,
) -> StrataResult<Record> {
    let mut id = 0i64;
    let mut created_at = None;
    let mut updated_at = None;
    let mut data = RecordData::new();
    for (idx, name) in columns.iter().enumerate() {
        match name.as_str() {
            "id" => id = row.get(idx).map_err(storage)?,
            "created_at" => created_at = Some(row.get::<_, String>(idx).map_err(storage)?),
            "updated_at" => updated_at = Some(row.get::<_, String>(idx).map_err(storage)?),
            _ => {
                let cell = row.get_ref(idx).map_err(storage)?;
                data.insert(name.clone(), column_value(cell, types.get(name).copied()));
            }
        }
    }
    debug_assert!(SYSTEM_COLUMNS.iter().all(|c| !data.contains_key(*c)));
    let created_at = created_at
        .ok_or_else(|| StorageError::failure(format!("'{table_name}' row missing created_at")))?;
    let updated_at = updated_at
        .ok_or_else(|| StorageError::failure(format!("'{table_name}' row missing updated_at")))?;
    Ok(Record {
        id,
        table_name: table_name.to_string(),
        data,
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}

fn map_generic_row(row: &rusqlite::Row<'_>) -> StrataResult<Record> {
    let id: RecordId = row.get(0).map_err(storage)?;
    let table_name: String = row.get(1).map_err(storage)?;
    let doc: String = row.get(2).map_err(storage)?;
    let created_at: String = row.get(3).map_err(storage)?;
    let updated_at: String = row.get(4).map_err(storage)?;
    Ok(Record {
        data: map_generic_document(id, &doc)?,
        id,
        table_name,
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}

// ============================================================================
// TESTS (generic mode; native mode is covered alongside the evolution
// engine and in the integration suite)
// ============================================================================
