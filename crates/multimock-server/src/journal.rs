//! Request journal kept by each mock server.

use serde::Serialize;
use std::collections::HashMap;

/// A request received by a mock server.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecordedRequest {
    pub method: String,
    /// Path plus query string
    pub url: String,
    /// Header names are lowercase
    pub headers: HashMap<String, String>,
    /// Body as UTF-8 text, lossily decoded
    pub body: String,
    /// Id of the stub that answered, `None` when nothing matched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_stub_id: Option<String>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn path(&self) -> &str {
        self.url.split('?').next().unwrap_or("")
    }
}
