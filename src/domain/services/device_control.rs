//! Device API contract.
//!
//! Screen wake lock and fullscreen are best effort: callers log failures and
//! carry on, they never reach the session state.

/// Device API errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeviceError {
    #[error("{0} is not supported on this device")]
    Unsupported(&'static str),

    #[error("Device request rejected: {0}")]
    Rejected(String),
}

/// Device capabilities driven by the session status.
#[cfg_attr(test, mockall::automock)]
pub trait DeviceControl: Send + Sync {
    fn acquire_wake_lock(&self) -> Result<(), DeviceError>;

    fn release_wake_lock(&self) -> Result<(), DeviceError>;

    fn enter_fullscreen(&self) -> Result<(), DeviceError>;

    fn exit_fullscreen(&self) -> Result<(), DeviceError>;
}
