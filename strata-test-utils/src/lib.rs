//! Test utilities, proptest generators, and fixtures shared by the
//! STRATA test suites.

use proptest::prelude::*;
use strata_core::{FieldSpec, FieldType, RecordData, Value};

/// A lowercase identifier accepted by the sanitizer.
pub fn arb_identifier() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,15}".prop_filter("not a system column", |s| {
        !strata_core::SYSTEM_COLUMNS.contains(&s.as_str())
            && !strata_core::INTERNAL_TABLES.contains(&s.as_str())
    })
}

pub fn arb_field_type() -> impl Strategy<Value = FieldType> {
    prop_oneof![
        Just(FieldType::Text),
        Just(FieldType::Integer),
        Just(FieldType::Real),
        Just(FieldType::Boolean),
        Just(FieldType::Json),
    ]
}

pub fn arb_field_spec() -> impl Strategy<Value = FieldSpec> {
    (arb_identifier(), arb_field_type()).prop_map(|(name, field_type)| FieldSpec {
        name,
        field_type,
    })
}

/// An ordered field list with unique names, as a valid schema requires.
pub fn arb_schema() -> impl Strategy<Value = Vec<FieldSpec>> {
    prop::collection::btree_set(arb_identifier(), 1..6).prop_flat_map(|names| {
        let names: Vec<String> = names.into_iter().collect();
        prop::collection::vec(arb_field_type(), names.len()).prop_map(move |types| {
            names
                .iter()
                .zip(types)
                .map(|(name, field_type)| FieldSpec {
                    name: name.clone(),
                    field_type,
                })
                .collect()
        })
    })
}

/// A scalar value in canonical form (what `Value::from_json` produces),
/// so storage round-trips compare equal.
pub fn arb_scalar_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Boolean),
        any::<i64>().prop_map(Value::Integer),
        (-1.0e9f64..1.0e9).prop_map(Value::Real),
        "[a-zA-Z0-9 _-]{0,24}".prop_map(Value::Text),
    ]
}

/// Record data with identifier-shaped keys and scalar values.
pub fn arb_record_data() -> impl Strategy<Value = RecordData> {
    prop::collection::btree_map(arb_identifier(), arb_scalar_value(), 0..6)
}

/// The field list used by most example-table tests.
pub fn user_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::text("name"),
        FieldSpec::new("age", FieldType::Integer),
        FieldSpec::text("status"),
    ]
}

/// Build record data from literal pairs.
pub fn record_data(pairs: &[(&str, Value)]) -> RecordData {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}
