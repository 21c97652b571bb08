//! WebSocket Peer Endpoint
//!
//! Remotes attach to the host over WebSocket.

pub mod handler;

pub use handler::peer_handler;
