//! Batch loading para evitar N+1 contra los backends.
//!
//! - [`BatchLoader`]: agrupa los lookups de un mismo tick en un solo fetch
//! - [`RequestLoaders`]: loaders de repartidores y vehiculos para un request

mod batch;
mod request;

pub use batch::{BatchFetch, BatchLoader, FnBatch, LoadError, LoadFuture};
pub use request::RequestLoaders;
