//! Domain Entities
//!
//! Core state of a timer session and the connections attached to it.

pub mod agenda;
pub mod connection;
pub mod session;

pub use agenda::{active_segment, ActiveSegment, WRAP_UP_TITLE};
pub use connection::Connection;
pub use session::{
    format_clock, Segment, SessionConfig, SessionSnapshot, SessionState, TimerStatus,
    MINUTE_ADJUSTMENT_SECS,
};
