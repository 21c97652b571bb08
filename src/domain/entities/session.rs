//! Timer session entity.
//!
//! `SessionState` is owned by the host and is the single source of truth for
//! the countdown. Remotes only ever see it as a [`SessionSnapshot`].

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::agenda::{active_segment, ActiveSegment};

/// Seconds added or removed by a one-minute adjustment.
pub const MINUTE_ADJUSTMENT_SECS: i64 = 60;

/// Lifecycle status of a timer session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum TimerStatus {
    #[default]
    Idle,
    Running,
    Paused,
    /// Reserved. No transition assigns it; overtime keeps `Running`.
    Finished,
}

impl TimerStatus {
    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::Running => "RUNNING",
            Self::Paused => "PAUSED",
            Self::Finished => "FINISHED",
        }
    }
}

impl std::fmt::Display for TimerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A named slice of the agenda.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub title: String,
    pub duration_minutes: u32,
}

impl Segment {
    pub fn new(title: impl Into<String>, duration_minutes: u32) -> Self {
        Self {
            title: title.into(),
            duration_minutes,
        }
    }

    pub fn duration_secs(&self) -> u64 {
        u64::from(self.duration_minutes) * 60
    }
}

/// Configuration of one timer session.
///
/// Immutable once the session starts; a new `START` replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    #[validate(range(min = 1))]
    pub total_minutes: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segments: Option<Vec<Segment>>,
}

impl SessionConfig {
    /// A plain countdown with no topic and no agenda.
    pub fn minutes(total_minutes: u32) -> Self {
        Self {
            total_minutes,
            topic: None,
            segments: None,
        }
    }

    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    pub fn with_segments(mut self, segments: Vec<Segment>) -> Self {
        self.segments = Some(segments);
        self
    }

    pub fn total_secs(&self) -> i64 {
        i64::from(self.total_minutes) * 60
    }
}

/// Authoritative state of the session held by the host.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionState {
    status: TimerStatus,
    seconds_remaining: i64,
    seconds_elapsed: u64,
    config: Option<SessionConfig>,
}

impl SessionState {
    /// Fresh state: idle, no config, both counters at zero.
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn status(&self) -> TimerStatus {
        self.status
    }

    pub fn seconds_remaining(&self) -> i64 {
        self.seconds_remaining
    }

    pub fn seconds_elapsed(&self) -> u64 {
        self.seconds_elapsed
    }

    pub fn config(&self) -> Option<&SessionConfig> {
        self.config.as_ref()
    }

    pub fn is_running(&self) -> bool {
        self.status == TimerStatus::Running
    }

    /// `config.total_minutes * 60`, or 0 without a config.
    pub fn total_seconds(&self) -> i64 {
        self.config.as_ref().map_or(0, SessionConfig::total_secs)
    }

    /// Replace the config and run from the full duration.
    pub fn start(&mut self, config: SessionConfig) {
        self.seconds_remaining = config.total_secs();
        self.seconds_elapsed = 0;
        self.config = Some(config);
        self.status = TimerStatus::Running;
    }

    /// Flip between running and paused. Returns `false` when idle.
    pub fn toggle_pause(&mut self) -> bool {
        match self.status {
            TimerStatus::Running => self.status = TimerStatus::Paused,
            TimerStatus::Paused => self.status = TimerStatus::Running,
            TimerStatus::Idle | TimerStatus::Finished => return false,
        }
        true
    }

    pub fn reset(&mut self) {
        *self = Self::idle();
    }

    /// Rewind to the full duration, paused. Returns `false` without a config.
    pub fn restart(&mut self) -> bool {
        let Some(total) = self.config.as_ref().map(SessionConfig::total_secs) else {
            return false;
        };
        self.seconds_remaining = total;
        self.seconds_elapsed = 0;
        self.status = TimerStatus::Paused;
        true
    }

    /// Shift the remaining time. Never clamped.
    pub fn adjust(&mut self, delta_secs: i64) {
        self.seconds_remaining += delta_secs;
    }

    /// Advance one second. Only counts while running; the remaining time
    /// keeps going below zero into overtime.
    pub fn tick(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.seconds_remaining -= 1;
        self.seconds_elapsed += 1;
        true
    }

    pub fn active_segment(&self) -> Option<ActiveSegment> {
        let segments = self.config.as_ref()?.segments.as_deref()?;
        active_segment(segments, self.seconds_elapsed)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            status: self.status,
            seconds_remaining: self.seconds_remaining,
            seconds_elapsed: self.seconds_elapsed,
            total_seconds: self.total_seconds(),
            config: self.config.clone(),
        }
    }
}

/// Full copy of the session state as sent to remotes in `SYNC_STATE`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub status: TimerStatus,
    pub seconds_remaining: i64,
    #[serde(default)]
    pub seconds_elapsed: u64,
    #[serde(default)]
    pub total_seconds: i64,
    pub config: Option<SessionConfig>,
}

impl SessionSnapshot {
    pub fn is_overtime(&self) -> bool {
        self.seconds_remaining < 0
    }

    pub fn is_idle(&self) -> bool {
        self.status == TimerStatus::Idle
    }

    /// Remaining time as `MM:SS`, prefixed with `-` in overtime.
    pub fn clock_display(&self) -> String {
        format_clock(self.seconds_remaining)
    }

    pub fn active_segment(&self) -> Option<ActiveSegment> {
        let segments = self.config.as_ref()?.segments.as_deref()?;
        active_segment(segments, self.seconds_elapsed)
    }
}

/// Format a signed second count as `MM:SS`.
pub fn format_clock(seconds: i64) -> String {
    let abs = seconds.unsigned_abs();
    let sign = if seconds < 0 { "-" } else { "" };
    format!("{}{:02}:{:02}", sign, abs / 60, abs % 60)
}
