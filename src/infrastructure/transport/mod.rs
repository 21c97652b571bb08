//! Transports
//!
//! Implementations of the peer transport contract.

pub mod memory;
pub mod websocket;

pub use memory::{InMemoryNetwork, Listener};
pub use websocket::WebSocketTransport;
