//! Canned response types.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

fn default_status() -> u16 {
    200
}

/// Response returned when a stub matches.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResponseDefinition {
    /// HTTP status code (100-599)
    #[serde(default = "default_status")]
    pub status: u16,
    /// Response headers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<HashMap<String, String>>,
    /// Response body. Strings are sent verbatim, other values as JSON
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    /// File under the stub source's `__files` folder to serve as body
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_file_name: Option<String>,
    /// Delay in milliseconds before sending the response
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay: Option<u64>,
    /// Body file content that is not valid UTF-8; sent in place of `body`
    #[serde(skip)]
    pub binary_body: Option<Vec<u8>>,
}

impl Default for ResponseDefinition {
    fn default() -> Self {
        Self {
            status: default_status(),
            headers: None,
            body: None,
            body_file_name: None,
            delay: None,
            binary_body: None,
        }
    }
}

impl ResponseDefinition {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }

    /// JSON response with an explicit `Content-Type: application/json` header.
    pub fn json(status: u16, body: Value) -> Self {
        Self::new(status)
            .with_header("Content-Type", "application/json")
            .with_body(body)
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(HashMap::new)
            .insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_delay(mut self, millis: u64) -> Self {
        self.delay = Some(millis);
        self
    }

    /// Value of a response header, case-insensitive.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.as_ref().and_then(|headers| {
            headers
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.as_str())
        })
    }

    /// Body bytes as sent on the wire.
    pub fn body_bytes(&self) -> Vec<u8> {
        if let Some(bytes) = &self.binary_body {
            return bytes.clone();
        }
        match &self.body {
            None => Vec::new(),
            Some(Value::String(s)) => s.as_bytes().to_vec(),
            Some(value) => serde_json::to_vec(value).unwrap_or_default(),
        }
    }

    /// `true` when the body is structured JSON rather than a verbatim string.
    pub fn has_json_body(&self) -> bool {
        self.body.as_ref().is_some_and(|body| !body.is_string())
    }
}
