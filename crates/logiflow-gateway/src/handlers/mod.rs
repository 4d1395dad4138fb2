//! Handlers HTTP del gateway.

pub mod cache;
pub mod fleet;
pub mod health;
pub mod metrics;
pub mod orders;
