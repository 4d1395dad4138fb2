//! Outbound HTTP abstraction.
//!
//! Backend services are reached through a `tower::Service<HttpRequest>`.
//! [`ReqwestTransport`] is the concrete implementation; layers such as
//! the auth middleware wrap it without knowing how bytes hit the wire.

mod request;
mod response;
mod transport;

pub use request::{HttpRequest, RequestContext};
pub use response::HttpResponse;
pub use transport::ReqwestTransport;

use crate::error::GatewayError;

/// Type-erased, cloneable and shareable HTTP service.
///
/// This is what the service clients hold once the middleware stack has
/// been assembled.
pub type HttpService = tower::util::BoxCloneSyncService<HttpRequest, HttpResponse, GatewayError>;
