//! Property-based test generators using proptest.
//!
//! Provides strategies for generating random test data that stays inside
//! what the store accepts: collection and field names without `:`, no
//! caller-supplied `id`, and floats that survive a JSON round trip exactly.

use proptest::prelude::*;
use rediso_codec::{Record, Value, ID_FIELD};
use rediso_core::Operator;

/// Strategy for generating valid collection names.
pub fn collection_name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z][a-zA-Z0-9_]{0,15}").expect("Invalid regex")
}

/// Strategy for generating field names other than `id`.
pub fn field_name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9_]{0,7}")
        .expect("Invalid regex")
        .prop_filter("id is reserved", |s| s != ID_FIELD)
}

/// Strategy for generating scalar values of every kind.
pub fn value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Integer),
        (-1_000_000i32..1_000_000).prop_map(|n| Value::Float(f64::from(n) / 4.0)),
        text_strategy().prop_map(Value::Text),
    ]
}

/// Strategy for generating values that are never null.
pub fn non_null_value_strategy() -> impl Strategy<Value = Value> {
    value_strategy().prop_filter("non-null", |v| !v.is_null())
}

/// Strategy for generating short text, including characters that need
/// escaping in JSON.
pub fn text_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9 \"\\\\/|]{0,12}").expect("Invalid regex")
}

/// Strategy for generating non-empty records without an `id` field.
pub fn record_strategy() -> impl Strategy<Value = Record> {
    prop::collection::vec((field_name_strategy(), value_strategy()), 1..6)
        .prop_map(|fields| fields.into_iter().collect())
}

/// Strategy for generating predicate operators.
pub fn operator_strategy() -> impl Strategy<Value = Operator> {
    prop_oneof![
        Just(Operator::Gt),
        Just(Operator::Lt),
        Just(Operator::Eq),
        Just(Operator::Le),
        Just(Operator::Ge),
        Just(Operator::Ne),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn names_never_contain_separators(name in collection_name_strategy(), field in field_name_strategy()) {
            prop_assert!(!name.contains(':'));
            prop_assert!(!field.contains(':'));
            prop_assert_ne!(field, ID_FIELD);
        }

        #[test]
        fn records_are_insertable(record in record_strategy()) {
            prop_assert!(!record.is_empty());
            prop_assert!(!record.contains(ID_FIELD));
        }
    }
}
