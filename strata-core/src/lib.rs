//! STRATA Core - Data Types
//!
//! Pure data structures and validation shared by every other crate: the
//! tagged value type, field declarations, the uniform record shape, the
//! identifier sanitizer, and the error taxonomy. No storage, no I/O.

pub mod error;
pub mod field;
pub mod ident;
pub mod record;
pub mod value;

pub use error::{
    FieldSpecError, IdentifierError, SchemaError, StorageError, StrataError, StrataResult,
};
pub use field::{parse_fields_text, FieldSpec, FieldType};
pub use ident::{
    sanitize_field_name, sanitize_identifier, sanitize_table_name, INTERNAL_TABLES,
    MAX_IDENTIFIER_LEN, SYSTEM_COLUMNS,
};
pub use record::{Record, RecordData, RecordId, Timestamp};
pub use value::Value;
