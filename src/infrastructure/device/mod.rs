//! Headless Device Control
//!
//! Device API implementation for hosts without a screen of their own. It
//! records what the session asked for and logs it, so a display process
//! (or a test) can observe it.

use parking_lot::Mutex;

use crate::domain::{DeviceControl, DeviceError};

/// Requested device state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeviceState {
    pub wake_lock_held: bool,
    pub fullscreen: bool,
}

/// Device control that tracks requests in memory
#[derive(Debug, Default)]
pub struct HeadlessDevice {
    state: Mutex<DeviceState>,
}

impl HeadlessDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DeviceState {
        *self.state.lock()
    }
}

impl DeviceControl for HeadlessDevice {
    fn acquire_wake_lock(&self) -> Result<(), DeviceError> {
        let mut state = self.state.lock();
        if !state.wake_lock_held {
            state.wake_lock_held = true;
            tracing::debug!("Wake lock acquired");
        }
        Ok(())
    }

    fn release_wake_lock(&self) -> Result<(), DeviceError> {
        let mut state = self.state.lock();
        if state.wake_lock_held {
            state.wake_lock_held = false;
            tracing::debug!("Wake lock released");
        }
        Ok(())
    }

    fn enter_fullscreen(&self) -> Result<(), DeviceError> {
        self.state.lock().fullscreen = true;
        tracing::debug!("Entered fullscreen");
        Ok(())
    }

    fn exit_fullscreen(&self) -> Result<(), DeviceError> {
        self.state.lock().fullscreen = false;
        tracing::debug!("Exited fullscreen");
        Ok(())
    }
}
