//! Request matching utilities.

mod headers;
mod intersection;
mod payload;
mod query;
mod url;

pub use headers::headers_matches;
pub use intersection::{hashmap_intersects, hashmap_to_value, value_contains};
pub use payload::payload_matches;
pub use query::{parse_query_string, query_matches};
pub use url::{url_matches, UrlMatchResult};

use crate::mocks::request::Request;
use crate::types::request::{HttpMethod, RequestPattern};

/// Check a request against a pattern.
///
/// Order: method, URL (template or regex), path params, headers, query, payload.
pub fn request_matches(pattern: &RequestPattern, request: &Request) -> bool {
    match (pattern.method, request.method) {
        (None | Some(HttpMethod::Any), _) => {}
        (Some(expected), Some(actual)) if expected == actual => {}
        _ => return false,
    }

    if let Some(template) = &pattern.url_path {
        let result = url_matches(template, &request.url);
        if !result.matched {
            return false;
        }
        if let Some(expected_params) = &pattern.params {
            if !hashmap_intersects(expected_params, &result.params) {
                return false;
            }
        }
    } else if let Some(regex) = &pattern.url_pattern {
        if !regex.is_match(&request.url) {
            return false;
        }
    }

    headers_matches(pattern.headers.as_ref(), &request.headers)
        && query_matches(pattern.query.as_ref(), &request.query())
        && payload_matches(pattern.payload.as_ref(), request.payload.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::request::{MapOrExpression, PayloadOrExpression, UrlPattern};
    use rstest::rstest;
    use serde_json::json;
    use std::collections::HashMap;

    fn get(url: &str) -> Request {
        Request::new(Some(HttpMethod::Get), url)
    }

    #[rstest]
    fn test_empty_pattern_matches_everything() {
        let pattern = RequestPattern::any();
        assert!(request_matches(&pattern, &get("/anything")));
        assert!(request_matches(&pattern, &Request::new(None, "/x")));
        assert!(request_matches(
            &pattern,
            &Request::new(Some(HttpMethod::Delete), "/a/b?c=d")
        ));
    }

    #[rstest]
    #[case(Some(HttpMethod::Get), true)]
    #[case(Some(HttpMethod::Post), false)]
    #[case(None, false)]
    fn test_method(#[case] method: Option<HttpMethod>, #[case] expected: bool) {
        let pattern = RequestPattern::get("/health");
        assert_eq!(
            request_matches(&pattern, &Request::new(method, "/health")),
            expected
        );
    }

    #[rstest]
    fn test_any_method_matches_unknown_methods() {
        let mut pattern = RequestPattern::any();
        pattern.method = Some(HttpMethod::Any);
        assert!(request_matches(&pattern, &Request::new(None, "/x")));
    }

    #[rstest]
    #[case("/users/42", true)]
    #[case("/users/7", false)]
    #[case("/users", false)]
    fn test_path_params(#[case] url: &str, #[case] expected: bool) {
        let mut pattern = RequestPattern::get("/users/{id}");
        pattern.params = Some(HashMap::from([("id".to_string(), "42".to_string())]));
        assert_eq!(request_matches(&pattern, &get(url)), expected);
    }

    #[rstest]
    #[case("/products?category=books", true)]
    #[case("/products?category=music", false)]
    #[case("/products", false)]
    fn test_url_regex(#[case] url: &str, #[case] expected: bool) {
        let pattern = RequestPattern {
            url_pattern: Some(UrlPattern::new("/products\\?category=books.*").expect("valid regex")),
            ..RequestPattern::any()
        };
        assert_eq!(request_matches(&pattern, &get(url)), expected);
    }

    #[rstest]
    fn test_query_from_url() {
        let pattern = RequestPattern {
            query: Some(MapOrExpression::Expression("to_number(page) > `1`".to_string())),
            ..RequestPattern::get("/products")
        };
        assert!(request_matches(&pattern, &get("/products?page=2")));
        assert!(!request_matches(&pattern, &get("/products?page=1")));
        assert!(!request_matches(&pattern, &get("/products")));
    }

    #[rstest]
    fn test_headers_and_payload() {
        let pattern = RequestPattern::post("/users")
            .with_header("Content-Type", "application/json")
            .with_payload(json!({"role": "admin"}));

        let request = Request::new(Some(HttpMethod::Post), "/users")
            .with_header("content-type", "application/json")
            .with_payload(json!({"name": "Ada", "role": "admin"}));
        assert!(request_matches(&pattern, &request));

        let wrong_payload = Request::new(Some(HttpMethod::Post), "/users")
            .with_header("content-type", "application/json")
            .with_payload(json!({"role": "guest"}));
        assert!(!request_matches(&pattern, &wrong_payload));

        let no_header = Request::new(Some(HttpMethod::Post), "/users")
            .with_payload(json!({"role": "admin"}));
        assert!(!request_matches(&pattern, &no_header));
    }

    #[rstest]
    fn test_payload_expression() {
        let pattern = RequestPattern {
            payload: Some(PayloadOrExpression::Expression("items[0].qty > `2`".to_string())),
            ..RequestPattern::post("/orders")
        };
        let request = Request::new(Some(HttpMethod::Post), "/orders")
            .with_payload(json!({"items": [{"qty": 3}]}));
        assert!(request_matches(&pattern, &request));
    }
}
