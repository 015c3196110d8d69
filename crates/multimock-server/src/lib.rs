//! Registry of mock HTTP servers, one per mocked external API.
//!
//! Each API gets its own listener on a fixed port, its own stub source and two
//! default stubs (`GET /health` and a catch-all 404). [`MockRegistry`] starts,
//! stops and resets the whole set as one unit.
//!
//! ```no_run
//! use multimock_server::{MockRegistry, RegistryConfig};
//!
//! # async fn run() -> Result<(), multimock_server::RegistryError> {
//! let config = RegistryConfig::new("wiremock")
//!     .with_api("products", 8081, "products")
//!     .with_api("users", 8082, "users");
//!
//! let mut registry = MockRegistry::launch(config).await?;
//! let urls = registry.get_urls();
//! assert_eq!(urls["products"], "http://localhost:8081");
//!
//! registry.reset_all().await;
//! registry.stop_all().await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod defaults;
pub mod error;
pub mod journal;
pub mod registry;
pub mod server;

pub use config::{ApiMockConfig, RegistryConfig};
pub use error::{RegistryError, ServerError};
pub use journal::RecordedRequest;
pub use registry::{MockRegistry, RegistryState};
pub use server::MockServer;

pub use multimock_core::{HttpMethod, RequestPattern, ResponseDefinition, StubMapping};
