//! Incoming request as seen by the matchers.

use crate::matching::parse_query_string;
use crate::types::request::HttpMethod;
use serde_json::Value;
use std::collections::HashMap;

/// HTTP request for stub matching.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Request {
    /// HTTP method; `None` for methods without an [`HttpMethod`] variant
    pub method: Option<HttpMethod>,
    /// Path plus query string
    pub url: String,
    /// Request headers; several values of one header are joined with commas
    pub headers: HashMap<String, String>,
    /// Body parsed as JSON, or as a JSON string when it is not JSON
    pub payload: Option<Value>,
}

impl Request {
    pub fn new(method: Option<HttpMethod>, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Build the payload from a raw body: JSON when it parses, a string otherwise.
    pub fn with_body(mut self, body: &[u8]) -> Self {
        self.payload = if body.is_empty() {
            None
        } else {
            Some(
                serde_json::from_slice(body)
                    .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned())),
            )
        };
        self
    }

    /// Path without the query string.
    pub fn path(&self) -> &str {
        self.url.split('?').next().unwrap_or("")
    }

    /// Decoded query parameters.
    pub fn query(&self) -> HashMap<String, String> {
        self.url
            .split_once('?')
            .map(|(_, query)| parse_query_string(query))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("/products?page=2", "/products")]
    #[case("/products", "/products")]
    #[case("/", "/")]
    fn test_path(#[case] url: &str, #[case] expected: &str) {
        assert_eq!(Request::new(None, url).path(), expected);
    }

    #[rstest]
    fn test_query() {
        let request = Request::new(Some(HttpMethod::Get), "/products?page=2&sort=name");
        let query = request.query();
        assert_eq!(query.get("page").map(String::as_str), Some("2"));
        assert_eq!(query.get("sort").map(String::as_str), Some("name"));
        assert!(Request::new(None, "/products").query().is_empty());
    }

    #[rstest]
    #[case(b"", None)]
    #[case(br#"{"a": 1}"#, Some(json!({"a": 1})))]
    #[case(b"plain text", Some(json!("plain text")))]
    fn test_with_body(#[case] body: &[u8], #[case] expected: Option<Value>) {
        assert_eq!(Request::new(None, "/").with_body(body).payload, expected);
    }
}
