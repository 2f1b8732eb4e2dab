//! Tagged value type shared by both storage modes.

use serde::{Deserialize, Serialize};

// ============================================================================
// VALUE
// ============================================================================

/// A single field value as stored and returned by the record store.
///
/// Native mode maps variants onto typed columns; generic mode serializes a
/// whole data map as one JSON document. Both modes funnel through this one
/// representation so there is no per-mode conversion logic anywhere else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Real(f64),
    Text(String),
    /// Nested structures (arrays, objects) kept as raw JSON.
    Json(serde_json::Value),
}

impl Value {
    /// Convert from a raw JSON value.
    ///
    /// Scalars map onto the matching variant; arrays and objects stay
    /// wrapped as [`Value::Json`].
    pub fn from_json(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Boolean(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Integer(i)
                } else {
                    Value::Real(n.as_f64().unwrap_or(0.0))
                }
            }
            serde_json::Value::String(s) => Value::Text(s),
            other => Value::Json(other),
        }
    }

    /// Convert back to a raw JSON value.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Boolean(b) => serde_json::Value::Bool(*b),
            Value::Integer(i) => serde_json::Value::from(*i),
            Value::Real(r) => {
                serde_json::Number::from_f64(*r).map_or(serde_json::Value::Null, serde_json::Value::Number)
            }
            Value::Text(s) => serde_json::Value::String(s.clone()),
            Value::Json(j) => j.clone(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Canonical text rendering, used for loose string comparison.
    fn render_text(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Boolean(b) => b.to_string(),
            Value::Integer(i) => i.to_string(),
            Value::Real(r) => r.to_string(),
            Value::Text(s) => s.clone(),
            Value::Json(j) => j.to_string(),
        }
    }

    /// Equality as used by field lookups: exact equality for every type,
    /// with case-insensitive trimmed comparison when the query side is
    /// text. A `Null` stored value never matches a text query.
    pub fn matches(&self, query: &Value) -> bool {
        if self == query {
            return true;
        }
        if let Value::Text(wanted) = query {
            if self.is_null() {
                return false;
            }
            return self
                .render_text()
                .trim()
                .eq_ignore_ascii_case(wanted.trim());
        }
        false
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(r: f64) -> Self {
        Value::Real(r)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_scalars() {
        assert_eq!(Value::from_json(json!(null)), Value::Null);
        assert_eq!(Value::from_json(json!(true)), Value::Boolean(true));
        assert_eq!(Value::from_json(json!(42)), Value::Integer(42));
        assert_eq!(Value::from_json(json!(1.5)), Value::Real(1.5));
        assert_eq!(
            Value::from_json(json!("hi")),
            Value::Text("hi".to_string())
        );
    }

    #[test]
    fn test_from_json_nested_stays_json() {
        let v = Value::from_json(json!({"a": [1, 2]}));
        assert!(matches!(v, Value::Json(_)));
        assert_eq!(v.to_json(), json!({"a": [1, 2]}));
    }

    #[test]
    fn test_matches_exact() {
        assert!(Value::Integer(3).matches(&Value::Integer(3)));
        assert!(!Value::Integer(3).matches(&Value::Integer(4)));
        assert!(Value::Boolean(true).matches(&Value::Boolean(true)));
    }

    #[test]
    fn test_matches_text_case_insensitive() {
        let stored = Value::Text("Lakshmana".to_string());
        let query = Value::Text("  lakshmana ".to_string());
        assert!(stored.matches(&query));
    }

    #[test]
    fn test_matches_text_query_against_number() {
        // Text queries compare against the stored value's rendering.
        assert!(Value::Integer(30).matches(&Value::Text("30".to_string())));
        assert!(!Value::Integer(30).matches(&Value::Text("31".to_string())));
    }

    #[test]
    fn test_null_never_matches_text() {
        assert!(!Value::Null.matches(&Value::Text(String::new())));
    }

    #[test]
    fn test_serde_untagged_roundtrip() {
        let v = Value::Text("x".to_string());
        let s = serde_json::to_string(&v).unwrap();
        assert_eq!(s, "\"x\"");
        let back: Value = serde_json::from_str(&s).unwrap();
        assert_eq!(back, v);
    }
}

// ============================================================================
// PROPERTY-BASED TESTS
// ============================================================================

#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// For any i64, JSON conversion round-trips exactly.
        #[test]
        fn prop_integer_json_roundtrip(i in any::<i64>()) {
            let v = Value::Integer(i);
            prop_assert_eq!(Value::from_json(v.to_json()), v);
        }

        /// For any string, JSON conversion round-trips exactly.
        #[test]
        fn prop_text_json_roundtrip(s in ".*") {
            let v = Value::Text(s);
            let back = Value::from_json(v.to_json());
            prop_assert_eq!(back, v);
        }

        /// A text value always matches itself regardless of case.
        #[test]
        fn prop_text_matches_itself_any_case(s in "[a-zA-Z0-9 ]{0,40}") {
            let stored = Value::Text(s.clone());
            let query = Value::Text(s.to_uppercase());
            prop_assert!(stored.matches(&query));
        }
    }
}
