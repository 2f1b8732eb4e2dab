//! Flexible `fields` input normalization.
//!
//! Callers declare table fields in whichever shape their tooling emits:
//! comma-separated text, a list of bare names, a list of `{name, type}`
//! pairs, or that list serialized into a string. Everything normalizes to
//! an ordered `Vec<FieldSpec>` before touching the evolution engine.

use serde::{Deserialize, Serialize};
use strata_core::{parse_fields_text, FieldSpec, FieldSpecError, FieldType};

/// The accepted input shapes for `create_table` / `alter_table`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldsInput {
    /// `"name, email, age"` or `"name text, age integer"` or a JSON array
    /// serialized into a string.
    Text(String),
    /// `["name", "email"]`
    Names(Vec<String>),
    /// `[{"name": "age", "type": "integer"}, ...]`
    Specs(Vec<FieldSpec>),
}

impl FieldsInput {
    /// Normalize to an ordered field list. Unspecified types default to
    /// text; an input yielding no usable field is rejected.
    pub fn normalize(self) -> Result<Vec<FieldSpec>, FieldSpecError> {
        match self {
            FieldsInput::Text(text) => normalize_text(&text),
            FieldsInput::Names(names) => {
                let fields: Vec<FieldSpec> = names
                    .iter()
                    .map(|n| n.trim())
                    .filter(|n| !n.is_empty())
                    .map(FieldSpec::text)
                    .collect();
                if fields.is_empty() {
                    return Err(FieldSpecError::NoFields);
                }
                Ok(fields)
            }
            FieldsInput::Specs(specs) => {
                let fields: Vec<FieldSpec> = specs
                    .into_iter()
                    .map(|f| FieldSpec {
                        name: f.name.trim().to_string(),
                        field_type: f.field_type,
                    })
                    .filter(|f| !f.name.is_empty())
                    .collect();
                if fields.is_empty() {
                    return Err(FieldSpecError::NoFields);
                }
                Ok(fields)
            }
        }
    }
}

fn normalize_text(text: &str) -> Result<Vec<FieldSpec>, FieldSpecError> {
    let trimmed = text.trim();
    // A serialized JSON array gets one parse attempt before falling back
    // to the plain comma-separated grammar.
    if trimmed.starts_with('[') {
        if let Ok(serde_json::Value::Array(items)) = serde_json::from_str(trimmed) {
            return from_json_items(trimmed, items);
        }
    }
    parse_fields_text(trimmed)
}

fn from_json_items(
    input: &str,
    items: Vec<serde_json::Value>,
) -> Result<Vec<FieldSpec>, FieldSpecError> {
    let mut fields = Vec::new();
    for item in items {
        match item {
            serde_json::Value::String(name) => {
                let name = name.trim();
                if !name.is_empty() {
                    fields.push(FieldSpec::text(name));
                }
            }
            serde_json::Value::Object(map) => {
                let name = map
                    .get("name")
                    .or_else(|| map.get("field"))
                    .and_then(|v| v.as_str())
                    .unwrap_or("")
                    .trim()
                    .to_string();
                if name.is_empty() {
                    continue;
                }
                let field_type = map
                    .get("type")
                    .and_then(|v| v.as_str())
                    .map(FieldType::parse_or_text)
                    .unwrap_or_default();
                fields.push(FieldSpec { name, field_type });
            }
            _ => {
                return Err(FieldSpecError::Unparsable {
                    input: input.to_string(),
                })
            }
        }
    }
    if fields.is_empty() {
        return Err(FieldSpecError::NoFields);
    }
    Ok(fields)
}

// ============================================================================
// TESTS
// ============================================================================


// ============================================================================
// PROPERTY-BASED TESTS
// ============================================================================
