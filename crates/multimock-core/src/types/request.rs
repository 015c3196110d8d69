//! Request pattern types.

use crate::expression::{is_expression, strip_expression};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// HTTP method a stub matches. `ANY` matches every method.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
    Any,
}

impl HttpMethod {
    /// Parse a method name, case-insensitive. Methods without a variant return `None`.
    pub fn parse(method: &str) -> Option<Self> {
        match method.to_ascii_uppercase().as_str() {
            "GET" => Some(HttpMethod::Get),
            "POST" => Some(HttpMethod::Post),
            "PUT" => Some(HttpMethod::Put),
            "PATCH" => Some(HttpMethod::Patch),
            "DELETE" => Some(HttpMethod::Delete),
            "HEAD" => Some(HttpMethod::Head),
            "OPTIONS" => Some(HttpMethod::Options),
            "ANY" => Some(HttpMethod::Any),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Any => "ANY",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Header or query constraint: either a string map or a `${...}` expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapOrExpression {
    Map(HashMap<String, String>),
    Expression(String),
}

impl Serialize for MapOrExpression {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            MapOrExpression::Map(map) => map.serialize(serializer),
            MapOrExpression::Expression(expr) => format!("${{{expr}}}").serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for MapOrExpression {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::String(s) if is_expression(&s) => {
                Ok(MapOrExpression::Expression(strip_expression(&s).to_string()))
            }
            Value::Object(map) => {
                let mut result = HashMap::new();
                for (k, v) in map {
                    let value = match v {
                        Value::String(s) => s,
                        Value::Number(n) => n.to_string(),
                        Value::Bool(b) => b.to_string(),
                        other => {
                            return Err(serde::de::Error::custom(format!(
                                "value for '{k}' must be a string, got {other}"
                            )))
                        }
                    };
                    result.insert(k, value);
                }
                Ok(MapOrExpression::Map(result))
            }
            _ => Err(serde::de::Error::custom(
                "expected an object or an expression string like \"${...}\"",
            )),
        }
    }
}

/// Payload constraint: a JSON value matched as a subset, or a `${...}` expression.
#[derive(Debug, Clone, PartialEq)]
pub enum PayloadOrExpression {
    Value(Value),
    Expression(String),
}

impl Serialize for PayloadOrExpression {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            PayloadOrExpression::Value(v) => v.serialize(serializer),
            PayloadOrExpression::Expression(expr) => format!("${{{expr}}}").serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for PayloadOrExpression {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        match &value {
            Value::String(s) if is_expression(s) => Ok(PayloadOrExpression::Expression(
                strip_expression(s).to_string(),
            )),
            _ => Ok(PayloadOrExpression::Value(value)),
        }
    }
}

/// Regex over the whole path and query, compiled once and anchored on both ends.
#[derive(Debug, Clone)]
pub struct UrlPattern {
    source: String,
    regex: Regex,
}

impl UrlPattern {
    pub fn new(source: impl Into<String>) -> Result<Self, regex::Error> {
        let source = source.into();
        let regex = Regex::new(&format!("^(?:{source})$"))?;
        Ok(Self { source, regex })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, url: &str) -> bool {
        self.regex.is_match(url)
    }
}

impl PartialEq for UrlPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Serialize for UrlPattern {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.source)
    }
}

impl<'de> Deserialize<'de> for UrlPattern {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let source = String::deserialize(deserializer)?;
        UrlPattern::new(source.as_str()).map_err(|e| {
            serde::de::Error::custom(format!("invalid urlPattern '{source}': {e}"))
        })
    }
}

/// Which requests a stub applies to. Every field left out matches anything.
///
/// Unknown keys are rejected: a misspelled or foreign URL key would otherwise
/// leave the pattern matching every path.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RequestPattern {
    /// HTTP method; `None` or `ANY` match every method
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<HttpMethod>,
    /// Path template with `{param}` placeholders; the query string is ignored
    /// but every slash counts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_path: Option<String>,
    /// Regex matched against the whole path and query
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_pattern: Option<UrlPattern>,
    /// Expected values of `{param}` placeholders in `url_path`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<HashMap<String, String>>,
    /// Request headers (case-insensitive names) or an expression over them
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<MapOrExpression>,
    /// Query parameters or an expression over them
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<MapOrExpression>,
    /// Request body subset or an expression over it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<PayloadOrExpression>,
}

impl RequestPattern {
    /// Pattern matching any request.
    pub fn any() -> Self {
        Self::default()
    }

    /// Pattern matching `method` on the path template `path`.
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method: Some(method),
            url_path: Some(path.into()),
            ..Self::default()
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        match &mut self.headers {
            Some(MapOrExpression::Map(map)) => {
                map.insert(name.into(), value.into());
            }
            _ => {
                self.headers = Some(MapOrExpression::Map(HashMap::from([(
                    name.into(),
                    value.into(),
                )])));
            }
        }
        self
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(PayloadOrExpression::Value(payload));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("GET", Some(HttpMethod::Get))]
    #[case("post", Some(HttpMethod::Post))]
    #[case("Delete", Some(HttpMethod::Delete))]
    #[case("ANY", Some(HttpMethod::Any))]
    #[case("TRACE", None)]
    #[case("", None)]
    fn test_http_method_parse(#[case] input: &str, #[case] expected: Option<HttpMethod>) {
        assert_eq!(HttpMethod::parse(input), expected);
    }

    #[rstest]
    fn test_request_pattern_camel_case_fields() {
        let pattern: RequestPattern = serde_json::from_value(json!({
            "method": "GET",
            "urlPath": "/products/{id}",
            "params": {"id": "42"}
        }))
        .expect("Should deserialize");

        assert_eq!(pattern.method, Some(HttpMethod::Get));
        assert_eq!(pattern.url_path.as_deref(), Some("/products/{id}"));
        assert_eq!(pattern.url_pattern, None);
        assert_eq!(
            pattern.params,
            Some(HashMap::from([("id".to_string(), "42".to_string())]))
        );
    }

    #[rstest]
    #[case(json!({"method": "GET", "url": "/products"}))]
    #[case(json!({"method": "GET", "urlPathPattern": "/products/.*"}))]
    #[case(json!({"urlpath": "/products"}))]
    fn test_request_pattern_rejects_unknown_keys(#[case] input: Value) {
        let err = serde_json::from_value::<RequestPattern>(input).unwrap_err();
        assert!(err.to_string().contains("unknown field"));
    }

    #[rstest]
    #[case(".*", "/anything/at/all?x=1", true)]
    #[case("/products/[0-9]+", "/products/42", true)]
    #[case("/products/[0-9]+", "/products/42/reviews", false)]
    #[case("/products/[0-9]+", "/products/abc", false)]
    #[case("/search\\?q=.*", "/search?q=rust", true)]
    fn test_url_pattern_is_anchored(#[case] pattern: &str, #[case] url: &str, #[case] expected: bool) {
        let pattern = UrlPattern::new(pattern).expect("valid regex");
        assert_eq!(pattern.is_match(url), expected);
    }

    #[rstest]
    fn test_url_pattern_rejects_bad_regex() {
        assert!(UrlPattern::new("/products/(").is_err());

        let err = serde_json::from_value::<RequestPattern>(json!({"urlPattern": "(unclosed"}))
            .unwrap_err();
        assert!(err.to_string().contains("invalid urlPattern '(unclosed'"));
    }

    #[rstest]
    fn test_url_pattern_serializes_as_source() {
        let pattern: RequestPattern =
            serde_json::from_value(json!({"urlPattern": "/products/[0-9]+"})).expect("Should deserialize");
        assert_eq!(
            serde_json::to_value(&pattern).expect("Should serialize"),
            json!({"urlPattern": "/products/[0-9]+"})
        );
    }

    #[rstest]
    fn test_empty_pattern_matches_any_shape() {
        let pattern: RequestPattern = serde_json::from_value(json!({})).expect("Should deserialize");
        assert_eq!(pattern, RequestPattern::any());
    }

    #[rstest]
    #[case(json!("${page == '1'}"), MapOrExpression::Expression("page == '1'".to_string()))]
    #[case(json!({"page": "1"}), MapOrExpression::Map(HashMap::from([("page".to_string(), "1".to_string())])))]
    #[case(json!({"page": 1}), MapOrExpression::Map(HashMap::from([("page".to_string(), "1".to_string())])))]
    fn test_map_or_expression_deserialize(#[case] input: Value, #[case] expected: MapOrExpression) {
        let parsed: MapOrExpression = serde_json::from_value(input).expect("Should deserialize");
        assert_eq!(parsed, expected);
    }

    #[rstest]
    #[case(json!("not an expression"))]
    #[case(json!([1, 2]))]
    #[case(json!({"nested": {"a": 1}}))]
    fn test_map_or_expression_rejects(#[case] input: Value) {
        assert!(serde_json::from_value::<MapOrExpression>(input).is_err());
    }

    #[rstest]
    fn test_payload_expression_serializes_wrapped() {
        let payload = PayloadOrExpression::Expression("items[0].id == `5`".to_string());
        let json = serde_json::to_value(&payload).expect("Should serialize");
        assert_eq!(json, json!("${items[0].id == `5`}"));

        let back: PayloadOrExpression = serde_json::from_value(json).expect("Should deserialize");
        assert_eq!(back, payload);
    }

    #[rstest]
    fn test_plain_string_payload_is_a_value() {
        let payload: PayloadOrExpression =
            serde_json::from_value(json!("hello")).expect("Should deserialize");
        assert_eq!(payload, PayloadOrExpression::Value(json!("hello")));
    }

    #[rstest]
    fn test_with_header_accumulates() {
        let pattern = RequestPattern::get("/health")
            .with_header("Accept", "application/json")
            .with_header("X-Test-Scenario", "ok");

        let Some(MapOrExpression::Map(headers)) = pattern.headers else {
            panic!("expected header map");
        };
        assert_eq!(headers.len(), 2);
        assert_eq!(headers["X-Test-Scenario"], "ok");
    }
}
