//! Registry configuration.
//!
//! A registry file lists the mocked APIs with their fixed ports and stub
//! folders:
//!
//! ```yaml
//! host: localhost
//! stubRoot: wiremock
//! apis:
//!   - name: open_api
//!     port: 8080
//!     stubDir: open_api
//!   - name: products
//!     port: 8081
//!     stubDir: products
//! ```

use crate::error::RegistryError;
use multimock_core::config::parser::read_config;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};

fn default_host() -> String {
    "localhost".to_string()
}

fn default_bind_address() -> IpAddr {
    IpAddr::V4(Ipv4Addr::LOCALHOST)
}

fn default_stub_root() -> PathBuf {
    PathBuf::from(".")
}

/// One mocked API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApiMockConfig {
    /// Identifier, also reported as `service` by the default stubs
    pub name: String,
    pub port: u16,
    /// Stub source folder, relative to the registry's stub root
    pub stub_dir: PathBuf,
}

impl ApiMockConfig {
    pub fn new(name: impl Into<String>, port: u16, stub_dir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            port,
            stub_dir: stub_dir.into(),
        }
    }
}

/// The full set of mocked APIs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RegistryConfig {
    /// Host used in the URLs handed to consumers
    #[serde(default = "default_host")]
    pub host: String,
    /// Address every listener binds to
    #[serde(default = "default_bind_address")]
    pub bind_address: IpAddr,
    /// Folder the per-API stub folders are resolved against
    #[serde(default = "default_stub_root")]
    pub stub_root: PathBuf,
    /// APIs in start order
    #[serde(default)]
    pub apis: Vec<ApiMockConfig>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            bind_address: default_bind_address(),
            stub_root: default_stub_root(),
            apis: Vec::new(),
        }
    }
}

impl RegistryConfig {
    pub fn new(stub_root: impl Into<PathBuf>) -> Self {
        Self {
            stub_root: stub_root.into(),
            ..Self::default()
        }
    }

    pub fn with_api(mut self, name: impl Into<String>, port: u16, stub_dir: impl Into<PathBuf>) -> Self {
        self.apis.push(ApiMockConfig::new(name, port, stub_dir));
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_bind_address(mut self, address: IpAddr) -> Self {
        self.bind_address = address;
        self
    }

    /// Load a YAML, JSON or JSONC registry file.
    ///
    /// A relative `stubRoot` is resolved against the folder holding the file.
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        let mut config: RegistryConfig = read_config(path).await?;
        if config.stub_root.is_relative() {
            if let Some(parent) = path.parent() {
                config.stub_root = parent.join(&config.stub_root);
            }
        }
        Ok(config)
    }

    /// Full path of an API's stub source.
    pub fn stub_path(&self, api: &ApiMockConfig) -> PathBuf {
        self.stub_root.join(&api.stub_dir)
    }

    /// Base URL of an API: `http://<host>:<port>`.
    pub fn url_for(&self, api: &ApiMockConfig) -> String {
        format!("http://{}:{}", self.host, api.port)
    }

    /// Reject empty or repeated names, port 0 and ports shared by two APIs.
    pub fn validate(&self) -> Result<(), RegistryError> {
        let mut names = HashSet::new();
        let mut ports: HashMap<u16, &str> = HashMap::new();

        for api in &self.apis {
            if api.name.trim().is_empty() {
                return Err(RegistryError::EmptyName);
            }
            if !names.insert(api.name.as_str()) {
                return Err(RegistryError::DuplicateName {
                    name: api.name.clone(),
                });
            }
            if api.port == 0 {
                return Err(RegistryError::InvalidPort {
                    api: api.name.clone(),
                });
            }
            if let Some(first) = ports.insert(api.port, api.name.as_str()) {
                return Err(RegistryError::DuplicatePort {
                    port: api.port,
                    first: first.to_string(),
                    second: api.name.clone(),
                });
            }
        }

        Ok(())
    }
}
