//! # Domain Layer
//!
//! The domain layer contains the timer session model and the synchronization
//! protocol. It is independent of any runtime, transport, or device API.
//!
//! ## Structure
//!
//! - **entities**: Session state, agenda lookup, attached connections
//! - **value_objects**: Pairing codes and wire messages
//! - **services**: Command transition function and collaborator contracts
//!
//! ## Design Principles
//!
//! - No dependencies on infrastructure or presentation layers
//! - Only the host's `SessionState` is authoritative
//! - Collaborator traits define transport and device contracts

pub mod entities;
pub mod services;
pub mod value_objects;

// Re-export commonly used types
pub use entities::*;
pub use services::*;
pub use value_objects::*;
