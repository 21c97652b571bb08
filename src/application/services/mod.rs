//! Application Services
//!
//! Runtime pieces that drive the session model.
//!
//! ## Available Services
//!
//! - **ClockEngine**: Periodic tick source while the session runs
//! - **ConnectionRegistry**: Remotes attached to a host
//! - **HostSynchronizer**: Authoritative host event loop
//! - **RemoteSynchronizer**: Outbound controller that mirrors host snapshots

pub mod clock_engine;
pub mod connection_registry;
pub mod host_synchronizer;
pub mod remote_synchronizer;

pub use clock_engine::ClockEngine;
pub use connection_registry::ConnectionRegistry;
pub use host_synchronizer::{HostEvent, HostHandle, HostSynchronizer, HostView};
pub use remote_synchronizer::{RemoteError, RemotePhase, RemoteSynchronizer, RemoteUpdate};
