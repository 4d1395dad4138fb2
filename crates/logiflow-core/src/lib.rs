//! LogiFlow Core - shared vocabulary for the gateway crates.
//!
//! This crate provides the request/response types used for every call
//! to a backend service, the error taxonomy those calls produce, and
//! the reqwest-backed transport that actually sends them.

pub mod error;
pub mod http;

pub use error::{GatewayError, Result};
pub use http::{HttpRequest, HttpResponse, HttpService, ReqwestTransport, RequestContext};

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
