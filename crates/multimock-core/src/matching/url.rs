//! URL matching against path templates with `{param}` placeholders.

use regex::Regex;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UrlMatchResult {
    pub matched: bool,
    pub params: HashMap<String, String>,
}

/// Match `url` against a path template such as `/products/{id}`.
///
/// Paths are compared segment by segment and the query string is ignored.
/// Empty segments count, so `/health/` and `//health` do not match `/health`.
/// A placeholder fills a whole non-empty segment or part of one
/// (`/files/{name}.json`).
pub fn url_matches(template: &str, url: &str) -> UrlMatchResult {
    let expected = path_segments(template);
    let actual = path_segments(url);
    if expected.len() != actual.len() {
        return UrlMatchResult::default();
    }

    let mut params = HashMap::new();
    for (expected, actual) in expected.iter().zip(&actual) {
        if !segment_matches(expected, actual, &mut params) {
            return UrlMatchResult::default();
        }
    }

    UrlMatchResult {
        matched: true,
        params,
    }
}

fn path_segments(url: &str) -> Vec<&str> {
    url.split('?')
        .next()
        .unwrap_or("")
        .split('/')
        .collect()
}

fn segment_matches(expected: &str, actual: &str, params: &mut HashMap<String, String>) -> bool {
    if !expected.contains('{') {
        return expected == actual;
    }

    let whole = expected
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
        .filter(|name| !name.contains(['{', '}']));
    if let Some(name) = whole {
        if actual.is_empty() {
            return false;
        }
        params.insert(name.to_string(), actual.to_string());
        return true;
    }

    let (pattern, names) = segment_regex(expected);
    let Ok(regex) = Regex::new(&pattern) else {
        return false;
    };
    let Some(caps) = regex.captures(actual) else {
        return false;
    };
    for (index, name) in names.into_iter().enumerate() {
        if let Some(value) = caps.get(index + 1) {
            params.insert(name, value.as_str().to_string());
        }
    }
    true
}

/// Regex for a segment mixing literal text and placeholders, plus the
/// placeholder names in capture order.
fn segment_regex(segment: &str) -> (String, Vec<String>) {
    let mut pattern = String::from("^");
    let mut names = Vec::new();
    let mut rest = segment;

    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}').map(|i| open + i) else {
            break;
        };
        pattern.push_str(&regex::escape(&rest[..open]));
        pattern.push_str("(.+?)");
        names.push(rest[open + 1..close].to_string());
        rest = &rest[close + 1..];
    }

    pattern.push_str(&regex::escape(rest));
    pattern.push('$');
    (pattern, names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("/api/users", "/api/users", true, &[])]
    #[case("/api/users", "/api/users/", false, &[])]
    #[case("/api/users", "//api/users", false, &[])]
    #[case("/api/users/", "/api/users/", true, &[])]
    #[case("/api/users/{id}", "/api/users/", false, &[])]
    #[case("/api/users/{id}", "/api/users/123", true, &[("id", "123")])]
    #[case("/api/users/{a}/posts/{b}", "/api/users/1/posts/2", true, &[("a", "1"), ("b", "2")])]
    #[case("/api/users", "/api/posts", false, &[])]
    #[case("/api/users/{id}", "/api/users", false, &[])]
    #[case("/api/users/{id}", "/api/users/123/extra", false, &[])]
    #[case("/", "/", true, &[])]
    #[case("/health", "/health?verbose=true", true, &[])]
    #[case("/api/users.json", "/api/usersXjson", false, &[])]
    #[case("/api/(v1)", "/api/(v1)", true, &[])]
    #[case("/files/{name}.json", "/files/report.json", true, &[("name", "report")])]
    #[case("/files/{name}.json", "/files/report.xml", false, &[])]
    #[case("/v{major}.{minor}/ping", "/v1.2/ping", true, &[("major", "1"), ("minor", "2")])]
    fn test_url_matches(
        #[case] pattern: &str,
        #[case] url: &str,
        #[case] expected: bool,
        #[case] params: &[(&str, &str)],
    ) {
        let result = url_matches(pattern, url);
        assert_eq!(result.matched, expected);
        for (k, v) in params {
            assert_eq!(result.params.get(*k), Some(&(*v).to_owned()));
        }
    }
}
