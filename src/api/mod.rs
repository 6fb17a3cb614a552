//! HTTP API layer.
//!
//! - [`server`] - axum router and endpoint handlers
//! - [`types`] - request/response shapes

pub mod server;
pub mod types;
