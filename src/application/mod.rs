//! Application Layer
//!
//! Host and remote synchronizers. This layer connects the pure session
//! model to clocks, transports, and device APIs.

pub mod services;

pub use services::*;
