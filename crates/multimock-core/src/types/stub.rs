//! Stub mapping types.

use crate::types::request::RequestPattern;
use crate::types::response::ResponseDefinition;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Priority given to stubs that do not set one. Lower values win.
pub const DEFAULT_PRIORITY: u8 = 5;

fn default_priority() -> u8 {
    DEFAULT_PRIORITY
}

/// A stub rule: requests matching `request` get `response`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StubMapping {
    /// Unique identifier within a server; registering the same id replaces the stub
    #[serde(default)]
    pub id: String,
    /// Match priority; lower values are tried first
    #[serde(default = "default_priority")]
    pub priority: u8,
    #[serde(default)]
    pub request: RequestPattern,
    #[serde(default)]
    pub response: ResponseDefinition,
    /// Free-form data carried along with the stub, never used for matching
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl StubMapping {
    pub fn new(
        id: impl Into<String>,
        request: RequestPattern,
        response: ResponseDefinition,
    ) -> Self {
        Self {
            id: id.into(),
            priority: DEFAULT_PRIORITY,
            request,
            response,
            metadata: None,
        }
    }

    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    /// Check the parts serde cannot: status range and conflicting URL matchers.
    pub fn validate(&self) -> Result<(), String> {
        if !(100..=599).contains(&self.response.status) {
            return Err(format!(
                "status {} is outside 100-599",
                self.response.status
            ));
        }

        if self.request.url_path.is_some() && self.request.url_pattern.is_some() {
            return Err("urlPath and urlPattern are mutually exclusive".to_string());
        }

        Ok(())
    }
}

/// Content of one mapping file: a list under `mappings` or a single mapping.
#[derive(Debug)]
pub enum StubFile {
    Many(Vec<StubMapping>),
    Single(StubMapping),
}

impl<'de> Deserialize<'de> for StubFile {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut value = Value::deserialize(deserializer)?;
        if let Some(mappings) = value.get_mut("mappings").map(Value::take) {
            serde_json::from_value(mappings)
                .map(StubFile::Many)
                .map_err(serde::de::Error::custom)
        } else {
            serde_json::from_value(value)
                .map(StubFile::Single)
                .map_err(serde::de::Error::custom)
        }
    }
}

impl StubFile {
    pub fn into_mappings(self) -> Vec<StubMapping> {
        match self {
            StubFile::Many(mappings) => mappings,
            StubFile::Single(mapping) => vec![mapping],
        }
    }
}
