//! Error types for STRATA operations

use thiserror::Error;

/// Identifier validation errors.
///
/// Raised before any table or column name reaches a SQL-bearing operation.
/// "Not found" is never an error anywhere in the taxonomy — absent records
/// and tables are reported as empty results.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentifierError {
    #[error("identifier is empty")]
    Empty,

    #[error("identifier '{name}' exceeds {max} characters")]
    TooLong { name: String, max: usize },

    #[error("identifier '{name}' contains characters outside [A-Za-z0-9_]")]
    InvalidChars { name: String },

    #[error("identifier '{name}' must start with a letter or underscore")]
    LeadingDigit { name: String },

    #[error("table name '{name}' is reserved for internal bookkeeping")]
    Reserved { name: String },

    #[error("field name '{name}' collides with a system column")]
    SystemColumn { name: String },
}

/// Field list parsing errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FieldSpecError {
    #[error("at least one field is required")]
    NoFields,

    #[error("unparsable fields input: {input}")]
    Unparsable { input: String },
}

/// Schema conflicts between an operation and the table's current
/// representation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("table '{table}' has no declared schema")]
    NoSchema { table: String },

    #[error("field '{field}' is not declared in the schema of table '{table}'")]
    UnknownField { table: String, field: String },
}

/// Physical storage failures. Fatal for the current operation, never
/// retried by the core.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("storage failure: {reason}")]
    Failure { reason: String },

    #[error("store lock poisoned")]
    LockPoisoned,
}

impl StorageError {
    /// Wrap an underlying driver error message.
    pub fn failure(reason: impl Into<String>) -> Self {
        StorageError::Failure {
            reason: reason.into(),
        }
    }
}

/// Master error type for all STRATA errors.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StrataError {
    #[error("invalid identifier: {0}")]
    Identifier(#[from] IdentifierError),

    #[error("invalid field spec: {0}")]
    FieldSpec(#[from] FieldSpecError),

    #[error("schema conflict: {0}")]
    Schema(#[from] SchemaError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type alias for STRATA operations.
pub type StrataResult<T> = Result<T, StrataError>;

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_error_display() {
        let err = IdentifierError::TooLong {
            name: "x".repeat(70),
            max: 64,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("exceeds 64 characters"));
    }

    #[test]
    fn test_schema_error_display_unknown_field() {
        let err = SchemaError::UnknownField {
            table: "users".to_string(),
            field: "nickname".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("nickname"));
        assert!(msg.contains("users"));
    }

    #[test]
    fn test_strata_error_from_variants() {
        let ident = StrataError::from(IdentifierError::Empty);
        assert!(matches!(ident, StrataError::Identifier(_)));

        let fields = StrataError::from(FieldSpecError::NoFields);
        assert!(matches!(fields, StrataError::FieldSpec(_)));

        let schema = StrataError::from(SchemaError::NoSchema {
            table: "users".to_string(),
        });
        assert!(matches!(schema, StrataError::Schema(_)));

        let storage = StrataError::from(StorageError::failure("disk full"));
        assert!(matches!(storage, StrataError::Storage(_)));
    }

    #[test]
    fn test_storage_error_failure_helper() {
        let err = StorageError::failure("locked");
        let msg = format!("{}", err);
        assert!(msg.contains("locked"));
    }
}
