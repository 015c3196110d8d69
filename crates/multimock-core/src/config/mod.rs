//! Configuration file parsing and stub source loading.

pub mod error;
pub mod loader;
pub mod parser;
