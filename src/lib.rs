//! An in-memory catalog of items served over HTTP with axum.

pub mod feature;
pub mod infra;
pub mod server;
