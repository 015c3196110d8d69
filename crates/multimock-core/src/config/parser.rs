//! Parsing of YAML, JSON and JSONC files, chosen by file extension.

use crate::config::error::ConfigError;
use serde::de::DeserializeOwned;
use std::path::Path;

/// Formats a stub or registry file can be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Yaml,
    Json,
    /// JSON with `//` and `/* */` comments
    Jsonc,
}

impl FileFormat {
    /// Format for the extension of `path` (case-insensitive), if supported.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let extension = path.as_ref().extension()?.to_str()?;
        match extension.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Some(FileFormat::Yaml),
            "json" => Some(FileFormat::Json),
            "jsonc" => Some(FileFormat::Jsonc),
            _ => None,
        }
    }

    pub fn parse<T: DeserializeOwned>(self, content: &str) -> Result<T, ConfigError> {
        match self {
            FileFormat::Yaml => Ok(serde_yaml::from_str(content)?),
            FileFormat::Json => Ok(serde_json::from_str(content)?),
            FileFormat::Jsonc => Ok(serde_json::from_str(&strip_json_comments(content))?),
        }
    }
}

/// Remove `//` and `/* */` comments outside of string literals.
pub fn strip_json_comments(content: &str) -> String {
    let mut stripped = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();
    let mut in_string = false;
    let mut escaped = false;

    while let Some(c) = chars.next() {
        if in_string {
            stripped.push(c);
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match (c, chars.peek().copied()) {
            ('"', _) => {
                in_string = true;
                stripped.push(c);
            }
            ('/', Some('/')) => {
                // line comment; the newline itself is kept
                if let Some(newline) = chars.by_ref().find(|&next| next == '\n' || next == '\r') {
                    stripped.push(newline);
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut previous = None;
                for next in chars.by_ref() {
                    if previous == Some('*') && next == '/' {
                        break;
                    }
                    previous = Some(next);
                }
            }
            _ => stripped.push(c),
        }
    }

    stripped
}

/// Parse `content` in the format implied by `path`.
pub fn parse_config<T: DeserializeOwned>(
    content: &str,
    path: impl AsRef<Path>,
) -> Result<T, ConfigError> {
    let path = path.as_ref();
    FileFormat::from_path(path)
        .ok_or_else(|| ConfigError::UnknownFileType(path.display().to_string()))?
        .parse(content)
}

/// Read a file and parse it according to its extension.
pub async fn read_config<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, ConfigError> {
    let path = path.as_ref();
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    parse_config(&content, path)
}
