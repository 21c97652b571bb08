//! # Domain Value Objects
//!
//! Immutable value types that represent domain concepts without identity.
//!
//! ## Value Objects
//!
//! - **PairingCode**: Short base-36 code naming a host endpoint
//! - **PeerMessage**: Typed wire message exchanged between host and remotes

mod pairing_code;
mod peer_message;

pub use pairing_code::*;
pub use peer_message::*;
