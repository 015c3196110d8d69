//! The registry: every mock server of a test context, started and stopped as one.

use crate::config::RegistryConfig;
use crate::error::RegistryError;
use crate::server::MockServer;
use indexmap::IndexMap;
use tracing::{info, warn};

/// Lifecycle of a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryState {
    NotStarted,
    Running,
    Stopped,
}

/// Owns one [`MockServer`] per configured API, keyed by API name in
/// configuration order.
#[derive(Debug)]
pub struct MockRegistry {
    host: String,
    servers: IndexMap<String, MockServer>,
    state: RegistryState,
}

impl MockRegistry {
    /// Validate `config` and build stopped servers.
    pub fn new(config: RegistryConfig) -> Result<Self, RegistryError> {
        config.validate()?;

        let servers = config
            .apis
            .iter()
            .map(|api| {
                let server = MockServer::new(
                    api.name.clone(),
                    api.port,
                    config.bind_address,
                    config.host.clone(),
                    config.stub_path(api),
                );
                (api.name.clone(), server)
            })
            .collect();

        Ok(Self {
            host: config.host,
            servers,
            state: RegistryState::NotStarted,
        })
    }

    /// [`new`](Self::new) followed by [`start_all`](Self::start_all).
    pub async fn launch(config: RegistryConfig) -> Result<Self, RegistryError> {
        let mut registry = Self::new(config)?;
        registry.start_all().await?;
        Ok(registry)
    }

    /// Start every server in configuration order.
    ///
    /// If one fails, the servers started by this call are stopped again and
    /// the error names the failing API.
    pub async fn start_all(&mut self) -> Result<(), RegistryError> {
        if self.state == RegistryState::Running {
            return Err(RegistryError::AlreadyRunning);
        }

        let mut started = Vec::with_capacity(self.servers.len());
        let mut failure = None;
        for (name, server) in self.servers.iter_mut() {
            match server.start().await {
                Ok(()) => started.push(name.clone()),
                Err(source) => {
                    warn!(api = %name, "Failed to start mock server: {source}");
                    failure = Some(RegistryError::StartFailed {
                        api: name.clone(),
                        source,
                    });
                    break;
                }
            }
        }

        if let Some(error) = failure {
            for name in started.iter().rev() {
                if let Some(server) = self.servers.get_mut(name) {
                    warn!(api = %name, "Stopping mock server after failed start-up");
                    server.stop().await;
                }
            }
            return Err(error);
        }

        self.state = RegistryState::Running;
        info!(count = self.servers.len(), "All mock servers started");
        Ok(())
    }

    /// Stop every running server. Safe to call repeatedly.
    pub async fn stop_all(&mut self) {
        for server in self.servers.values_mut() {
            server.stop().await;
        }
        if self.state == RegistryState::Running {
            self.state = RegistryState::Stopped;
            info!("All mock servers stopped");
        }
    }

    /// Server registered under `name`, running or not.
    pub fn get_server(&self, name: &str) -> Option<&MockServer> {
        self.servers.get(name)
    }

    /// Base URL of every API, keyed by name in configuration order.
    pub fn get_urls(&self) -> IndexMap<String, String> {
        self.servers
            .iter()
            .map(|(name, server)| (name.clone(), server.url()))
            .collect()
    }

    /// `false` for unknown names.
    pub fn is_running(&self, name: &str) -> bool {
        self.servers
            .get(name)
            .is_some_and(MockServer::is_running)
    }

    /// Leave only the default stubs on every running server and clear journals.
    pub async fn reset_all(&self) {
        for server in self.servers.values().filter(|s| s.is_running()) {
            server.reset().await;
        }
    }

    /// Reset every running server, then load its stub source again.
    pub async fn reload_all(&self) -> Result<(), RegistryError> {
        for (name, server) in self.servers.iter().filter(|(_, s)| s.is_running()) {
            server
                .reload()
                .await
                .map_err(|source| RegistryError::ReloadFailed {
                    api: name.clone(),
                    source,
                })?;
        }
        Ok(())
    }

    pub fn state(&self) -> RegistryState {
        self.state
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// API names in configuration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.servers.keys().map(String::as_str)
    }
}
