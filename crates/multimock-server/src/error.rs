//! Error types for mock servers and the registry.

use multimock_core::ConfigError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure of a single mock server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to load stub source {}: {source}", path.display())]
    StubSource {
        path: PathBuf,
        #[source]
        source: ConfigError,
    },

    #[error("mock server on port {port} stopped with an error: {source}")]
    Serve {
        port: u16,
        #[source]
        source: io::Error,
    },
}

/// Failure of the registry as a whole.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("API name must not be empty")]
    EmptyName,

    #[error("API '{name}' is configured more than once")]
    DuplicateName { name: String },

    #[error("API '{api}' has invalid port 0; ports must be fixed")]
    InvalidPort { api: String },

    #[error("APIs '{first}' and '{second}' are both assigned port {port}")]
    DuplicatePort {
        port: u16,
        first: String,
        second: String,
    },

    #[error("registry is already running")]
    AlreadyRunning,

    #[error("failed to start mock server for API '{api}': {source}")]
    StartFailed {
        api: String,
        #[source]
        source: ServerError,
    },

    #[error("failed to reload stubs for API '{api}': {source}")]
    ReloadFailed {
        api: String,
        #[source]
        source: ServerError,
    },

    #[error("invalid registry configuration: {0}")]
    Config(#[from] ConfigError),
}
