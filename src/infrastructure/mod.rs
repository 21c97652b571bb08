//! Infrastructure Layer
//!
//! Contains implementations for external collaborators including:
//! - Peer transports (in-process and WebSocket)
//! - Device API control
//! - Prometheus metrics

pub mod device;
pub mod metrics;
pub mod transport;
