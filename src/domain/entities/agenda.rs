//! Agenda segment lookup.

use serde::Serialize;

use super::session::Segment;

/// Title of the implied segment once the agenda has run out.
pub const WRAP_UP_TITLE: &str = "Wrap Up";

/// The segment covering the current elapsed time, plus the one after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveSegment {
    pub current: Segment,
    pub next: Option<Segment>,
    /// True for the synthetic wrap-up segment past the end of the agenda.
    pub is_wrap_up: bool,
}

impl ActiveSegment {
    fn wrap_up() -> Self {
        Self {
            current: Segment::new(WRAP_UP_TITLE, 0),
            next: None,
            is_wrap_up: true,
        }
    }
}

/// Find the segment active at `seconds_elapsed`.
///
/// A segment covers `[start, start + duration)` where `start` is the sum of
/// the durations before it. Zero-length segments are never active. Returns
/// `None` for an empty agenda.
pub fn active_segment(segments: &[Segment], seconds_elapsed: u64) -> Option<ActiveSegment> {
    if segments.is_empty() {
        return None;
    }

    let mut start = 0u64;
    for (index, segment) in segments.iter().enumerate() {
        let end = start + segment.duration_secs();
        if seconds_elapsed < end {
            return Some(ActiveSegment {
                current: segment.clone(),
                next: segments.get(index + 1).cloned(),
                is_wrap_up: false,
            });
        }
        start = end;
    }

    Some(ActiveSegment::wrap_up())
}
