//! Middleware de Tower para los requests entrantes:
//! - `RequestIdLayer`: genera/propaga `x-request-id`
//! - `LoggingLayer`: span y logs estructurados por request

mod logging;
mod request_id;

pub use logging::{LoggingLayer, LoggingMiddleware};
pub use request_id::{REQUEST_ID_HEADER, RequestId, RequestIdLayer, RequestIdMiddleware};
