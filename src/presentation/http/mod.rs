//! HTTP API
//!
//! Session view and local controls, plus health and metrics endpoints.

pub mod handlers;
pub mod routes;
