//! Calendar window model.
//!
//! A resource's working calendar is an ordered list of half-open
//! [open, close) windows. The solver and validator both reason about
//! windows in integer minutes from the horizon start; conversion from
//! wall-clock instants happens once, during model construction.
//!
//! # Containment
//! An operation complies with a calendar iff it fits **entirely** inside
//! a single window. Operations never straddle the gap between windows.

use serde::{Deserialize, Serialize};

/// A working-time interval [open, close) in minutes from horizon start.
///
/// Half-open interval: includes open, excludes close.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeWindow {
    /// Window start (minutes, inclusive).
    pub open: i64,
    /// Window end (minutes, exclusive).
    pub close: i64,
}

impl TimeWindow {
    /// Creates a new window.
    pub fn new(open: i64, close: i64) -> Self {
        Self { open, close }
    }

    /// Length of this window in minutes.
    #[inline]
    pub fn minutes(&self) -> i64 {
        self.close - self.open
    }

    /// Whether a minute offset falls within this window.
    #[inline]
    pub fn contains(&self, minute: i64) -> bool {
        minute >= self.open && minute < self.close
    }

    /// Whether an interval of `duration` minutes starting at `start`
    /// lies entirely inside this window.
    #[inline]
    pub fn fits(&self, start: i64, duration: i64) -> bool {
        start >= self.open && start + duration <= self.close
    }
}

/// Finds the earliest start `>= ready` at which an interval of
/// `duration` minutes fits entirely inside one of `windows`.
///
/// `windows` must be sorted and pairwise disjoint (guaranteed by the
/// model builder). Returns `None` when no window can host the interval.
pub fn earliest_fit(windows: &[TimeWindow], ready: i64, duration: i64) -> Option<i64> {
    for w in windows {
        let start = w.open.max(ready);
        if start + duration <= w.close {
            return Some(start);
        }
    }
    None
}

/// Total working minutes across all windows.
pub fn total_minutes(windows: &[TimeWindow]) -> i64 {
    windows.iter().map(TimeWindow::minutes).sum()
}
