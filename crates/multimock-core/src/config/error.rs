//! Error types for configuration parsing and stub source loading.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Unknown file type: {0}")]
    UnknownFileType(String),

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The stub directory is missing or not a directory
    #[error("Stub source is not a directory: {}", .0.display())]
    MissingStubSource(PathBuf),

    #[error("Invalid stub file pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// A mapping parsed but cannot be served
    #[error("Invalid stub in {}: {reason}", path.display())]
    InvalidStub { path: PathBuf, reason: String },
}

impl ConfigError {
    /// Turn a parse error into [`ConfigError::InvalidStub`] naming `path`.
    pub fn in_file(self, path: impl Into<PathBuf>) -> Self {
        let reason = match &self {
            ConfigError::Json(_) | ConfigError::Yaml(_) => self.to_string(),
            _ => return self,
        };
        ConfigError::InvalidStub {
            path: path.into(),
            reason,
        }
    }
}
