//! The uniform record shape.

use crate::value::Value;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

/// Store-assigned record identifier, monotonic within a table and never
/// reused after deletion.
pub type RecordId = i64;

/// Field name to value mapping carried by every record.
pub type RecordData = BTreeMap<String, Value>;

/// A record as observed by callers.
///
/// The externally observed shape is identical regardless of whether the
/// table is generic or native — this is the central invariant the store
/// preserves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub table_name: String,
    pub data: RecordData,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

// ============================================================================
// TESTS
// ============================================================================
