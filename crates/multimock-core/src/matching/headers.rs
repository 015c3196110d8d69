//! Header matching (case-insensitive names) and JMESPath expressions.

use crate::expression::match_with_jmespath;
use crate::matching::intersection::{hashmap_intersects, hashmap_to_value};
use crate::types::request::MapOrExpression;
use std::collections::HashMap;

fn normalize_headers(headers: &HashMap<String, String>) -> HashMap<String, String> {
    headers
        .iter()
        .map(|(k, v)| (k.to_lowercase(), v.clone()))
        .collect()
}

/// Match request headers against a header map or an expression.
///
/// Header names are compared case-insensitively; expressions see lowercase names.
pub fn headers_matches(expected: Option<&MapOrExpression>, actual: &HashMap<String, String>) -> bool {
    match expected {
        None => true,
        Some(MapOrExpression::Expression(expr)) => {
            match_with_jmespath(expr, &hashmap_to_value(&normalize_headers(actual)))
        }
        Some(MapOrExpression::Map(expected)) => {
            hashmap_intersects(&normalize_headers(expected), &normalize_headers(actual))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn h(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).into(), (*v).into()))
            .collect()
    }

    #[rstest]
    #[case(&[("Content-Type", "application/json")], &[], true)]
    #[case(&[("Content-Type", "application/json"), ("Auth", "Bearer x")], &[("content-type", "application/json")], true)]
    #[case(&[("content-type", "application/json")], &[("Content-Type", "application/json")], true)]
    #[case(&[("Content-Type", "application/json")], &[("Content-Type", "text/plain")], false)]
    #[case(&[("Accept", "text/html")], &[("Content-Type", "application/json")], false)]
    fn test_headers_map(
        #[case] actual: &[(&str, &str)],
        #[case] expected: &[(&str, &str)],
        #[case] result: bool,
    ) {
        let expected = MapOrExpression::Map(h(expected));
        assert_eq!(headers_matches(Some(&expected), &h(actual)), result);
    }

    #[rstest]
    #[case("\"x-test-scenario\" == 'not_found'", true)]
    #[case("\"x-test-scenario\" == 'ok'", false)]
    #[case("contains(accept, 'application/json')", true)]
    fn test_headers_expression(#[case] expression: &str, #[case] expected: bool) {
        let actual = h(&[
            ("X-Test-Scenario", "not_found"),
            ("Accept", "application/json, text/plain"),
        ]);
        let expected_headers = MapOrExpression::Expression(expression.to_string());
        assert_eq!(headers_matches(Some(&expected_headers), &actual), expected);
    }

    #[rstest]
    fn test_no_expected_headers_match_anything() {
        assert!(headers_matches(None, &HashMap::new()));
    }
}
