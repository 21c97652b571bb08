//! Clock Engine
//!
//! Periodic driver for the countdown. The engine only produces ticks; the
//! host applies each tick to the session state on its own event loop, so a
//! tick never runs concurrently with a command.

use std::time::Duration;

use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

/// Periodic tick source that can be installed and removed.
#[derive(Debug)]
pub struct ClockEngine {
    period: Duration,
    interval: Option<Interval>,
}

impl ClockEngine {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            interval: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_running(&self) -> bool {
        self.interval.is_some()
    }

    /// (Re)install the driver. The first tick fires one full period from now.
    pub fn start(&mut self) {
        let mut interval = interval_at(Instant::now() + self.period, self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Burst);
        self.interval = Some(interval);
    }

    /// Remove the driver. No further ticks until the next `start`.
    pub fn stop(&mut self) {
        self.interval = None;
    }

    /// Wait for the next tick. Never resolves while stopped.
    pub async fn ticked(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }
}
