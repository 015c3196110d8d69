//! Stub engine behind the multimock servers.
//!
//! - [`types`]: stub mappings (request pattern + canned response)
//! - [`config`]: parsing of JSON/JSONC/YAML files and loading of stub sources
//! - [`matching`]: request matching primitives
//! - [`mocks`]: the ordered stub store used by a running server

pub mod config;
pub mod expression;
pub mod matching;
pub mod mocks;
pub mod types;

pub use config::error::ConfigError;
pub use mocks::request::Request;
pub use mocks::store::StubStore;
pub use types::request::{HttpMethod, MapOrExpression, PayloadOrExpression, RequestPattern, UrlPattern};
pub use types::response::ResponseDefinition;
pub use types::stub::{StubMapping, DEFAULT_PRIORITY};
