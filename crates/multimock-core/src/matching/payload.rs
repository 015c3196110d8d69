//! Request payload matching: JSON subset or JMESPath expression.

use crate::expression::match_with_jmespath;
use crate::matching::intersection::value_contains;
use crate::types::request::PayloadOrExpression;
use serde_json::Value;

/// Match the request payload against the stub's payload constraint.
///
/// A stub that expects a payload never matches a request without one.
pub fn payload_matches(expected: Option<&PayloadOrExpression>, actual: Option<&Value>) -> bool {
    match (expected, actual) {
        (None, _) => true,
        (Some(_), None) => false,
        (Some(PayloadOrExpression::Expression(expr)), Some(actual)) => {
            match_with_jmespath(expr, actual)
        }
        (Some(PayloadOrExpression::Value(expected)), Some(actual)) => {
            value_contains(actual, expected)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(None, None, true)]
    #[case(Some(PayloadOrExpression::Value(json!({"name": "John"}))), None, false)]
    #[case(Some(PayloadOrExpression::Value(json!({"name": "John"}))), Some(json!({"name": "John", "age": 3})), true)]
    #[case(Some(PayloadOrExpression::Value(json!({"name": "John"}))), Some(json!({"name": "Jane"})), false)]
    #[case(Some(PayloadOrExpression::Expression("contains(items[*].id, `5`)".into())), Some(json!({"items": [{"id": 1}, {"id": 5}]})), true)]
    #[case(Some(PayloadOrExpression::Expression("length(users[?age > `18`]) > `0`".into())), Some(json!({"users": [{"age": 15}]})), false)]
    fn test_payload_matches(
        #[case] expected: Option<PayloadOrExpression>,
        #[case] actual: Option<Value>,
        #[case] result: bool,
    ) {
        assert_eq!(payload_matches(expected.as_ref(), actual.as_ref()), result);
    }
}
