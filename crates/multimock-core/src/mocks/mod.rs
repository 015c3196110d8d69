//! Stub storage and lookup.
//!
//! - [`StubStore`](store::StubStore): keeps stubs in match order and finds the first one matching a request
//! - [`Request`](request::Request): the incoming request as seen by the matchers

pub mod request;
pub mod store;
