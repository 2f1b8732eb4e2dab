//! Field declarations and the flexible fields-input text parser.

use crate::error::FieldSpecError;
use serde::{Deserialize, Serialize};

// ============================================================================
// FIELD TYPES
// ============================================================================

/// Column type for a declared field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    Text,
    Integer,
    Real,
    Boolean,
    Json,
}

impl FieldType {
    /// Strict keyword lookup. Returns `None` for anything that is not a
    /// recognized type name; used where a bare word must not be mistaken
    /// for a type.
    pub fn from_keyword(s: &str) -> Option<FieldType> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "string" => Some(FieldType::Text),
            "integer" | "int" => Some(FieldType::Integer),
            "real" | "float" => Some(FieldType::Real),
            "boolean" | "bool" => Some(FieldType::Boolean),
            "json" => Some(FieldType::Json),
            _ => None,
        }
    }

    /// Lenient lookup: unrecognized or empty type names default to text.
    pub fn parse_or_text(s: &str) -> FieldType {
        FieldType::from_keyword(s).unwrap_or(FieldType::Text)
    }

    /// Name as written in a schema declaration.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Integer => "integer",
            FieldType::Real => "real",
            FieldType::Boolean => "boolean",
            FieldType::Json => "json",
        }
    }
}

// ============================================================================
// FIELD SPEC
// ============================================================================

/// One declared field: name plus type. An ordered `Vec<FieldSpec>` is the
/// schema unit — replaced wholesale on alteration, never patched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }

    /// Shorthand for the default text type.
    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Text)
    }
}

// ============================================================================
// FIELDS TEXT PARSER
// ============================================================================

/// Parse a comma- or semicolon-separated fields declaration.
///
/// Accepted item forms: `name type`, `name: type`, and a bare `name`
/// (defaulting to text). `name type` only splits when the second word is a
/// recognized type keyword, so `first name` stays one bare name item and
/// is rejected later by the identifier sanitizer rather than silently
/// mangled here.
pub fn parse_fields_text(input: &str) -> Result<Vec<FieldSpec>, FieldSpecError> {
    let mut out = Vec::new();
    for part in input.split([',', ';']) {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        if let Some((name, type_text)) = part.split_once(':') {
            let name = name.trim();
            if !name.is_empty() {
                out.push(FieldSpec::new(name, FieldType::parse_or_text(type_text)));
            }
            continue;
        }
        let mut words = part.split_whitespace();
        let first = words.next().unwrap_or_default();
        let rest: Vec<&str> = words.collect();
        match rest.as_slice() {
            [type_word] if FieldType::from_keyword(type_word).is_some() => {
                out.push(FieldSpec::new(
                    first,
                    FieldType::from_keyword(type_word).unwrap_or_default(),
                ));
            }
            [] => out.push(FieldSpec::text(first)),
            _ => out.push(FieldSpec::text(part)),
        }
    }
    if out.is_empty() {
        return Err(FieldSpecError::NoFields);
    }
    Ok(out)
}

// ============================================================================
// TESTS
// ============================================================================


// ============================================================================
// PROPERTY-BASED TESTS
// ============================================================================

#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Any non-empty comma-joined list of simple names parses back to
        /// the same names in order, all typed text.
        #[test]
        fn prop_bare_names_roundtrip(names in prop::collection::vec("[a-z][a-z0-9_]{0,10}", 1..8)) {
            let input = names.join(", ");
            let parsed = parse_fields_text(&input).unwrap();
            let parsed_names: Vec<String> = parsed.iter().map(|f| f.name.clone()).collect();
            prop_assert_eq!(parsed_names, names);
            prop_assert!(parsed.iter().all(|f| f.field_type == FieldType::Text));
        }

        /// FieldSpec serde round-trips for any name and type.
        #[test]
        fn prop_field_spec_serde_roundtrip(
            name in "[a-zA-Z_][a-zA-Z0-9_]{0,20}",
            type_idx in 0usize..5,
        ) {
            let field_type = [
                FieldType::Text,
                FieldType::Integer,
                FieldType::Real,
                FieldType::Boolean,
                FieldType::Json,
            ][type_idx];
            let spec = FieldSpec::new(name, field_type);
            let json = serde_json::to_value(&spec).unwrap();
            let back: FieldSpec = serde_json::from_value(json).unwrap();
            prop_assert_eq!(back, spec);
        }
    }
}
