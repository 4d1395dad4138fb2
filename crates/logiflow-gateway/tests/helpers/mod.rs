//! Test helpers para logiflow-gateway.

#![allow(dead_code, unused_imports)]

pub mod backend;
pub mod client;

pub use backend::{Gateway, gateway, mount_login};
pub use client::{TestClient, TestResponse};
