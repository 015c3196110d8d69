//! JMESPath expressions used by header, query and payload matchers.
//!
//! In stub files an expression is written as `${...}`, for example
//! `"${to_number(page) > `1`}"`.

use serde_json::Value;

/// Returns `true` if the string is a non-empty `${...}` expression.
pub fn is_expression(s: &str) -> bool {
    expression_body(s).is_some_and(|body| !body.is_empty())
}

/// Strips the `${` `}` wrapper. Strings that are not expressions are returned unchanged.
pub fn strip_expression(s: &str) -> &str {
    expression_body(s).unwrap_or(s)
}

fn expression_body(s: &str) -> Option<&str> {
    s.strip_prefix("${")?.strip_suffix('}')
}

/// Evaluate `expression` against `data` and report whether the result is
/// truthy in the JMESPath sense (`false`, `null`, `""`, `[]` and `{}` are falsy).
///
/// Compilation or evaluation errors count as no match.
pub fn match_with_jmespath(expression: &str, data: &Value) -> bool {
    jmespath::compile(expression)
        .and_then(|expr| expr.search(data))
        .map(|result| result.is_truthy())
        .unwrap_or(false)
}
