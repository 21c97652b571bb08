//! # Domain Services
//!
//! Domain services encapsulate protocol logic that doesn't naturally belong
//! to a single entity, plus the contracts of external collaborators.
//!
//! ## Services
//!
//! - **CommandProcessor**: Applies a remote command to the session state
//! - **Transport**: Reliable ordered record channel between peers
//! - **DeviceControl**: Wake lock and fullscreen device APIs

mod command_processor;
pub mod device_control;
pub mod transport;

pub use command_processor::*;
pub use device_control::*;
pub use transport::*;
