//! Stub mapping types.

pub mod request;
pub mod response;
pub mod stub;
