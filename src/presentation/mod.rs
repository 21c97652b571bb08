//! Presentation Layer
//!
//! HTTP routes, the WebSocket peer endpoint, and the remote console.

pub mod console;
pub mod http;
pub mod middleware;
pub mod websocket;
