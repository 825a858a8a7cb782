use graft::{Registry, ResolveError, Resolver, Value, json_to_value};
use serde_json::json;

fn v(j: serde_json::Value) -> Value {
    json_to_value(j)
}

// ============================================================================
// Dispatch
// ============================================================================

#[test]
fn test_fixed_vocabulary_lookup() {
    assert_eq!(Resolver::for_argument("orderBy"), Resolver::OrderBy);
    assert_eq!(Resolver::for_argument("first"), Resolver::First);
    assert_eq!(Resolver::for_argument("last"), Resolver::Last);
    assert_eq!(Resolver::for_argument("defaultValue"), Resolver::DefaultValue);
    assert_eq!(Resolver::for_argument("toNumber"), Resolver::ToNumber);
    assert_eq!(Resolver::for_argument("toArray"), Resolver::ToArray);
    assert_eq!(Resolver::for_argument("getObjectValues"), Resolver::ObjectValues);
    assert_eq!(Resolver::for_argument("if"), Resolver::If);
    assert_eq!(Resolver::for_argument("merge"), Resolver::Merge);
}

#[test]
fn test_unknown_name_falls_back_to_field_equality() {
    assert_eq!(
        Resolver::for_argument("price"),
        Resolver::FieldEq("price".into())
    );
}

// ============================================================================
// orderBy
// ============================================================================

#[test]
fn test_order_by_numeric_ascending() {
    let items = v(json!([{"id": 1, "price": 5}, {"id": 2, "price": 1}]));
    let result = Resolver::OrderBy.apply(items, "price").unwrap();
    assert_eq!(
        result,
        v(json!([{"id": 2, "price": 1}, {"id": 1, "price": 5}]))
    );
}

#[test]
fn test_order_by_coerces_string_fields() {
    let items = v(json!([{"p": "10"}, {"p": "2"}]));
    let result = Resolver::OrderBy.apply(items, "p").unwrap();
    assert_eq!(result, v(json!([{"p": "2"}, {"p": "10"}])));
}

#[test]
fn test_order_by_missing_field_sorts_as_zero() {
    let items = v(json!([{"p": 3}, {"other": 1}]));
    let result = Resolver::OrderBy.apply(items, "p").unwrap();
    assert_eq!(result, v(json!([{"other": 1}, {"p": 3}])));
}

#[test]
fn test_order_by_rejects_non_array() {
    let err = Resolver::OrderBy.apply(v(json!({"p": 1})), "p").unwrap_err();
    assert!(matches!(err, ResolveError::UnsupportedOperation(_)));
}

// ============================================================================
// first / last
// ============================================================================

#[test]
fn test_first_returns_head() {
    let items = v(json!([{"id": 2}, {"id": 1}]));
    assert_eq!(Resolver::First.apply(items, "").unwrap(), v(json!({"id": 2})));
}

#[test]
fn test_last_returns_tail() {
    let items = v(json!([{"id": 2}, {"id": 1}]));
    assert_eq!(Resolver::Last.apply(items, "").unwrap(), v(json!({"id": 1})));
}

#[test]
fn test_first_and_last_of_empty_are_null() {
    assert_eq!(Resolver::First.apply(v(json!([])), "").unwrap(), Value::Null);
    assert_eq!(Resolver::Last.apply(v(json!([])), "").unwrap(), Value::Null);
}

#[test]
fn test_first_of_non_array_is_null() {
    assert_eq!(
        Resolver::First.apply(Value::String("abc".into()), "").unwrap(),
        Value::Null
    );
}

// ============================================================================
// defaultValue
// ============================================================================

#[test]
fn test_default_value_fills_null_with_integer() {
    let result = Resolver::DefaultValue.apply(Value::Null, "2").unwrap();
    assert_eq!(result, Value::Integer(2));
}

#[test]
fn test_default_value_fills_null_with_float() {
    let result = Resolver::DefaultValue.apply(Value::Null, "1.5").unwrap();
    assert_eq!(result, Value::Float(1.5));
}

#[test]
fn test_default_value_keeps_non_numeric_fallback_as_string() {
    let result = Resolver::DefaultValue.apply(Value::Null, "unknown").unwrap();
    assert_eq!(result, Value::String("unknown".into()));
}

#[test]
fn test_default_value_leaves_present_value_alone() {
    let result = Resolver::DefaultValue.apply(Value::Integer(7), "2").unwrap();
    assert_eq!(result, Value::Integer(7));
}

// ============================================================================
// toNumber
// ============================================================================

#[test]
fn test_to_number_parses_integer() {
    let result = Resolver::ToNumber.apply(Value::String("42".into()), "").unwrap();
    assert_eq!(result, Value::Integer(42));
}

#[test]
fn test_to_number_parses_float() {
    let result = Resolver::ToNumber.apply(Value::String("3.5".into()), "").unwrap();
    assert_eq!(result, Value::Float(3.5));
}

#[test]
fn test_to_number_keeps_unparseable_input() {
    let result = Resolver::ToNumber.apply(Value::String("abc".into()), "").unwrap();
    assert_eq!(result, Value::String("abc".into()));
}

#[test]
fn test_to_number_keeps_zero_equivalent_input() {
    // Coercion to zero counts as failure, so the original string survives.
    let result = Resolver::ToNumber.apply(Value::String("0".into()), "").unwrap();
    assert_eq!(result, Value::String("0".into()));
}

#[test]
fn test_to_number_coerces_true_to_one() {
    let result = Resolver::ToNumber.apply(Value::Boolean(true), "").unwrap();
    assert_eq!(result, Value::Integer(1));
}

#[test]
fn test_to_number_passes_null_through() {
    assert_eq!(Resolver::ToNumber.apply(Value::Null, "").unwrap(), Value::Null);
}

// ============================================================================
// toArray / getObjectValues
// ============================================================================

#[test]
fn test_to_array_splits_object_into_single_entry_objects() {
    let result = Resolver::ToArray.apply(v(json!({"a": 1, "b": 2})), "").unwrap();
    assert_eq!(result, v(json!([{"a": 1}, {"b": 2}])));
}

#[test]
fn test_to_array_passes_non_object_through() {
    let result = Resolver::ToArray.apply(Value::Integer(3), "").unwrap();
    assert_eq!(result, Value::Integer(3));
}

#[test]
fn test_object_values_in_key_order() {
    let result = Resolver::ObjectValues
        .apply(v(json!({"a": 1, "b": 2})), "")
        .unwrap();
    assert_eq!(result, v(json!([1, 2])));
}

#[test]
fn test_object_values_passes_non_object_through() {
    let result = Resolver::ObjectValues.apply(Value::String("x".into()), "").unwrap();
    assert_eq!(result, Value::String("x".into()));
}

// ============================================================================
// if
// ============================================================================

#[test]
fn test_if_true_passes_value_through() {
    let result = Resolver::If.apply(Value::Integer(5), "true").unwrap();
    assert_eq!(result, Value::Integer(5));
}

#[test]
fn test_if_false_yields_null() {
    let result = Resolver::If.apply(Value::Integer(5), "false").unwrap();
    assert_eq!(result, Value::Null);
}

#[test]
fn test_if_accepts_truthy_json_literals() {
    assert_eq!(Resolver::If.apply(Value::Integer(5), "1").unwrap(), Value::Integer(5));
    assert_eq!(Resolver::If.apply(Value::Integer(5), "0").unwrap(), Value::Null);
    assert_eq!(Resolver::If.apply(Value::Integer(5), "null").unwrap(), Value::Null);
}

#[test]
fn test_if_rejects_non_json_argument() {
    let err = Resolver::If.apply(Value::Integer(5), "notjson").unwrap_err();
    assert!(matches!(err, ResolveError::InvalidArgument(_)));
}

// ============================================================================
// merge
// ============================================================================

#[test]
fn test_merge_concatenates_arrays() {
    let result = Resolver::Merge.apply(v(json!([1, 2])), "[3]").unwrap();
    assert_eq!(result, v(json!([1, 2, 3])));
}

#[test]
fn test_merge_shallow_merges_objects() {
    let result = Resolver::Merge.apply(v(json!({"a": 1})), r#"{"b": 2}"#).unwrap();
    assert_eq!(result, v(json!({"a": 1, "b": 2})));
}

#[test]
fn test_merge_right_wins_on_collision() {
    let result = Resolver::Merge.apply(v(json!({"a": 1})), r#"{"a": 9}"#).unwrap();
    assert_eq!(result, v(json!({"a": 9})));
}

#[test]
fn test_merge_shape_mismatch_keeps_left() {
    let result = Resolver::Merge.apply(Value::Integer(1), "[1]").unwrap();
    assert_eq!(result, Value::Integer(1));
}

#[test]
fn test_merge_non_json_argument_keeps_left() {
    let result = Resolver::Merge.apply(v(json!([1])), "oops").unwrap();
    assert_eq!(result, v(json!([1])));
}

// ============================================================================
// Implicit equality filter
// ============================================================================

#[test]
fn test_field_eq_matches_coerced_numbers() {
    let items = v(json!([{"id": 1, "price": 5}, {"id": 2, "price": 1}]));
    let result = Resolver::for_argument("price").apply(items, "1").unwrap();
    assert_eq!(result, v(json!([{"id": 2, "price": 1}])));
}

#[test]
fn test_field_eq_matches_strings_verbatim() {
    let items = v(json!([{"status": "open"}, {"status": "closed"}]));
    let result = Resolver::for_argument("status").apply(items, "open").unwrap();
    assert_eq!(result, v(json!([{"status": "open"}])));
}

#[test]
fn test_field_eq_matches_booleans() {
    let items = v(json!([{"active": true}, {"active": false}]));
    let result = Resolver::for_argument("active").apply(items, "true").unwrap();
    assert_eq!(result, v(json!([{"active": true}])));
}

#[test]
fn test_field_eq_drops_non_object_items() {
    let items = v(json!([{"id": 1}, 7, "x"]));
    let result = Resolver::for_argument("id").apply(items, "1").unwrap();
    assert_eq!(result, v(json!([{"id": 1}])));
}

#[test]
fn test_field_eq_rejects_non_array() {
    let err = Resolver::for_argument("status")
        .apply(Value::String("open".into()), "open")
        .unwrap_err();
    assert!(matches!(err, ResolveError::UnsupportedOperation(_)));
}

// ============================================================================
// Registry
// ============================================================================

#[test]
fn test_registry_runs_custom_resolver_for_unknown_name() {
    let mut registry = Registry::new();
    registry.register("double", |value, _arg| match value {
        Value::Integer(n) => Ok(Value::Integer(n * 2)),
        other => Ok(other),
    });

    // Without the custom resolver this would be an equality filter on a
    // scalar, which fails.
    let result = registry.apply("double", Value::Integer(21), "").unwrap();
    assert_eq!(result, Value::Integer(42));
}

#[test]
fn test_registry_fixed_vocabulary_cannot_be_shadowed() {
    let mut registry = Registry::new();
    registry.register("first", |_value, _arg| Ok(Value::String("shadowed".into())));

    let result = registry.apply("first", v(json!([1, 2])), "").unwrap();
    assert_eq!(result, Value::Integer(1));
}

#[test]
fn test_registry_falls_back_to_field_equality() {
    let registry = Registry::new();
    let items = v(json!([{"id": 1}, {"id": 2}]));
    let result = registry.apply("id", items, "2").unwrap();
    assert_eq!(result, v(json!([{"id": 2}])));
}
