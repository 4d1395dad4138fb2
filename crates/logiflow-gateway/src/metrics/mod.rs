//! Metrics module for the LogiFlow gateway.

pub mod cache;
pub mod http;
pub mod setup;

pub use cache::{CacheMetrics, MetricsSnapshot};
pub use setup::{detached_handle, init_metrics};
