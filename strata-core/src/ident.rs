//! Identifier sanitization for SQL-bearing operations.
//!
//! Every table or column name that will be interpolated into a physical
//! schema operation passes through here first. Generic-mode table names
//! are data values, not structural identifiers, and bypass this module.

use crate::error::IdentifierError;

/// Columns present on every native table; field names must not collide.
pub const SYSTEM_COLUMNS: [&str; 3] = ["id", "created_at", "updated_at"];

/// Physical tables owned by the store itself; never surfaced as logical
/// tables and never usable as one.
pub const INTERNAL_TABLES: [&str; 3] = ["records", "table_schemas", "sqlite_sequence"];

/// Upper bound on identifier length.
pub const MAX_IDENTIFIER_LEN: usize = 64;

/// Validate a raw name as a safe SQL identifier.
///
/// Returns the trimmed slice on success. The allowed shape is
/// `[A-Za-z_][A-Za-z0-9_]*` with at most [`MAX_IDENTIFIER_LEN`] characters.
pub fn sanitize_identifier(name: &str) -> Result<&str, IdentifierError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(IdentifierError::Empty);
    }
    if trimmed.len() > MAX_IDENTIFIER_LEN {
        return Err(IdentifierError::TooLong {
            name: trimmed.to_string(),
            max: MAX_IDENTIFIER_LEN,
        });
    }
    if !trimmed
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(IdentifierError::InvalidChars {
            name: trimmed.to_string(),
        });
    }
    if trimmed.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(IdentifierError::LeadingDigit {
            name: trimmed.to_string(),
        });
    }
    Ok(trimmed)
}

/// Validate a logical table name for use as a native table.
pub fn sanitize_table_name(name: &str) -> Result<&str, IdentifierError> {
    let safe = sanitize_identifier(name)?;
    if INTERNAL_TABLES.contains(&safe) {
        return Err(IdentifierError::Reserved {
            name: safe.to_string(),
        });
    }
    Ok(safe)
}

/// Validate a declared field name for use as a native column.
pub fn sanitize_field_name(name: &str) -> Result<&str, IdentifierError> {
    let safe = sanitize_identifier(name)?;
    if SYSTEM_COLUMNS
        .iter()
        .any(|col| col.eq_ignore_ascii_case(safe))
    {
        return Err(IdentifierError::SystemColumn {
            name: safe.to_string(),
        });
    }
    Ok(safe)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_simple_names() {
        assert_eq!(sanitize_identifier("users"), Ok("users"));
        assert_eq!(sanitize_identifier("  users  "), Ok("users"));
        assert_eq!(sanitize_identifier("_tmp_2"), Ok("_tmp_2"));
    }

    #[test]
    fn test_rejects_empty() {
        assert_eq!(sanitize_identifier("   "), Err(IdentifierError::Empty));
    }

    #[test]
    fn test_rejects_bad_chars() {
        assert!(matches!(
            sanitize_identifier("users; DROP TABLE x"),
            Err(IdentifierError::InvalidChars { .. })
        ));
        assert!(matches!(
            sanitize_identifier("user-name"),
            Err(IdentifierError::InvalidChars { .. })
        ));
    }

    #[test]
    fn test_rejects_leading_digit() {
        assert!(matches!(
            sanitize_identifier("1users"),
            Err(IdentifierError::LeadingDigit { .. })
        ));
    }

    #[test]
    fn test_rejects_too_long() {
        let long = "a".repeat(MAX_IDENTIFIER_LEN + 1);
        assert!(matches!(
            sanitize_identifier(&long),
            Err(IdentifierError::TooLong { .. })
        ));
    }

    #[test]
    fn test_table_name_rejects_internal() {
        for internal in INTERNAL_TABLES {
            assert!(matches!(
                sanitize_table_name(internal),
                Err(IdentifierError::Reserved { .. })
            ));
        }
        assert!(sanitize_table_name("users").is_ok());
    }

    #[test]
    fn test_field_name_rejects_system_columns() {
        for col in SYSTEM_COLUMNS {
            assert!(matches!(
                sanitize_field_name(col),
                Err(IdentifierError::SystemColumn { .. })
            ));
        }
        // Collision check is case-insensitive; SQLite identifiers are.
        assert!(matches!(
            sanitize_field_name("ID"),
            Err(IdentifierError::SystemColumn { .. })
        ));
        assert!(sanitize_field_name("name").is_ok());
    }
}

// ============================================================================
// PROPERTY-BASED TESTS
// ============================================================================
