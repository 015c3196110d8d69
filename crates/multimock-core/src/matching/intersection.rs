//! Subset checks shared by the header, query and payload matchers.

use serde_json::Value;
use std::collections::HashMap;

/// `true` when `subset` is contained in `target`.
///
/// Object fields are compared recursively and extra target fields are ignored.
/// Each item of a subset array must match some item of the target array.
/// A `null` or `{}` subset is contained in anything.
pub fn value_contains(target: &Value, subset: &Value) -> bool {
    match (target, subset) {
        (_, Value::Null) => true,
        (_, Value::Object(wanted)) if wanted.is_empty() => true,
        (Value::Object(fields), Value::Object(wanted)) => wanted.iter().all(|(key, wanted)| {
            fields
                .get(key)
                .is_some_and(|field| field_contains(field, wanted))
        }),
        (Value::Array(items), Value::Array(wanted)) => wanted
            .iter()
            .all(|wanted| items.iter().any(|item| field_contains(item, wanted))),
        _ => target == subset,
    }
}

// Nested values match strictly: a nested `null` only matches `null`.
fn field_contains(target: &Value, subset: &Value) -> bool {
    match subset {
        Value::Null => target.is_null(),
        _ => value_contains(target, subset),
    }
}

/// Check if every expected key is present in `actual` with a matching value.
///
/// Values may hold several comma-separated entries; one shared entry is enough.
pub fn hashmap_intersects(
    expected: &HashMap<String, String>,
    actual: &HashMap<String, String>,
) -> bool {
    expected.iter().all(|(k, v)| {
        actual
            .get(k)
            .is_some_and(|actual_value| values_overlap(v, actual_value))
    })
}

fn values_overlap(expected: &str, actual: &str) -> bool {
    expected
        .split(',')
        .any(|ev| actual.split(',').any(|av| av.trim() == ev.trim()))
}

/// Convert a string map to a JSON object for expression evaluation.
/// Comma-separated values become arrays.
pub fn hashmap_to_value(map: &HashMap<String, String>) -> Value {
    let json_map = map
        .iter()
        .map(|(key, value)| {
            let value = if value.contains(',') {
                Value::Array(
                    value
                        .split(',')
                        .map(|v| Value::String(v.trim().to_string()))
                        .collect(),
                )
            } else {
                Value::String(value.clone())
            };
            (key.clone(), value)
        })
        .collect();
    Value::Object(json_map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(json!({"a": 1}), json!(null), true)]
    #[case(json!({"a": 1}), json!({}), true)]
    #[case(json!({"a": 1, "b": 2}), json!({"a": 1}), true)]
    #[case(json!({"a": 1}), json!({"a": 2}), false)]
    #[case(json!({"a": 1}), json!({"b": null}), false)]
    #[case(json!({"a": null}), json!({"a": null}), true)]
    #[case(json!({"user": {"name": "John", "age": 30}}), json!({"user": {"name": "John"}}), true)]
    #[case(json!({"items": [{"id": 1}, {"id": 2}]}), json!({"items": [{"id": 2}]}), true)]
    #[case(json!({"items": [{"id": 1}]}), json!({"items": [{"id": 4}]}), false)]
    #[case(json!("test"), json!("test"), true)]
    #[case(json!(["a", "b"]), json!({"a": 1}), false)]
    fn test_value_contains(#[case] target: Value, #[case] subset: Value, #[case] expected: bool) {
        assert_eq!(value_contains(&target, &subset), expected);
    }

    fn h(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[rstest]
    #[case(&[], &[], true)]
    #[case(&[("page", "1")], &[], false)]
    #[case(&[("page", "1")], &[("page", "1"), ("limit", "10")], true)]
    #[case(&[("page", "1")], &[("page", "2")], false)]
    #[case(&[("tags", "important,urgent")], &[("tags", "urgent")], true)]
    #[case(&[("tags", "important")], &[("tags", "normal, important")], true)]
    #[case(&[("tags", "important,urgent")], &[("tags", "normal")], false)]
    fn test_hashmap_intersects(
        #[case] expected: &[(&str, &str)],
        #[case] actual: &[(&str, &str)],
        #[case] result: bool,
    ) {
        assert_eq!(hashmap_intersects(&h(expected), &h(actual)), result);
    }

    #[rstest]
    fn test_hashmap_to_value() {
        let value = hashmap_to_value(&h(&[("page", "1"), ("tags", "a, b")]));
        assert_eq!(value["page"], "1");
        assert_eq!(value["tags"], json!(["a", "b"]));
    }
}
