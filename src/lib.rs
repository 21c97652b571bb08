//! # Stage Timer Library
//!
//! A presentation countdown timer whose authoritative clock runs on a host,
//! with any number of remote controllers kept in sync over a peer channel:
//! - Session model with overtime and agenda segments
//! - Snapshot-replicating wire protocol
//! - Host event loop owning the clock and connections
//! - Remote controller with a guarded connect
//! - HTTP and WebSocket endpoints for the host
//! - Line-based console for running as a remote
//!
//! ## Architecture
//!
//! - **Domain Layer**: Session state, wire messages, collaborator traits
//! - **Application Layer**: Clock engine, host and remote synchronizers
//! - **Infrastructure Layer**: Transports, device stand-in, metrics
//! - **Presentation Layer**: HTTP handlers, WebSocket peer endpoint, remote console
//!
//! ## Module Structure
//!
//! ```text
//! stage_timer/
//! +-- config/         Configuration management
//! +-- domain/         Session model, protocol, and traits
//! +-- application/    Synchronizers and clock
//! +-- infrastructure/ Transports, device, metrics
//! +-- presentation/   HTTP routes, WebSocket handler, console
//! +-- shared/         Common utilities (errors)
//! ```

// Configuration module
pub mod config;

// Domain layer - Core session logic
pub mod domain;

// Application layer - Synchronizers
pub mod application;

// Infrastructure layer - External implementations
pub mod infrastructure;

// Presentation layer - HTTP, WebSocket and console front ends
pub mod presentation;

// Shared utilities
pub mod shared;

// Application startup and state management
pub mod startup;

// Telemetry and observability
pub mod telemetry;
