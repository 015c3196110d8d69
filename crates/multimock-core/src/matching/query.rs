//! Query parameter matching with map intersection and JMESPath expressions.

use crate::expression::match_with_jmespath;
use crate::matching::intersection::{hashmap_intersects, hashmap_to_value};
use crate::types::request::MapOrExpression;
use std::collections::HashMap;

/// Parse a query string into a map, URL-decoding keys and values.
/// Repeated keys are joined with commas.
pub fn parse_query_string(query_str: &str) -> HashMap<String, String> {
    let mut result: HashMap<String, String> = HashMap::new();

    for pair in query_str.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let key = decode(key);
        let value = decode(value);

        result
            .entry(key)
            .and_modify(|existing| {
                existing.push(',');
                existing.push_str(&value);
            })
            .or_insert(value);
    }

    result
}

fn decode(raw: &str) -> String {
    let raw = raw.replace('+', " ");
    urlencoding::decode(&raw)
        .map(|s| s.into_owned())
        .unwrap_or(raw)
}

/// Match query parameters against a map or an expression.
pub fn query_matches(expected: Option<&MapOrExpression>, actual: &HashMap<String, String>) -> bool {
    match expected {
        None => true,
        Some(MapOrExpression::Expression(expr)) => {
            match_with_jmespath(expr, &hashmap_to_value(actual))
        }
        Some(MapOrExpression::Map(expected)) => hashmap_intersects(expected, actual),
    }
}
