//! Temporal types for time-bounded records
//!
//! Credit limits are authorizations with an effective window; aging buckets
//! are computed from whole-day calendar differences. Both work on calendar
//! dates - the core never depends on wall-clock time zones.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors related to temporal operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Invalid window: from {from} must be before to {to}")]
    InvalidWindow { from: NaiveDate, to: NaiveDate },
}

/// A half-open validity window `[from, to)`; `to = None` means open-ended
///
/// Used for credit-limit effectiveness: a limit applies on date `d` when
/// `from <= d` and `d < to` (or `to` is absent).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveWindow {
    pub from: NaiveDate,
    pub to: Option<NaiveDate>,
}

impl EffectiveWindow {
    /// Creates a bounded or open-ended window
    ///
    /// # Errors
    ///
    /// Returns `TemporalError::InvalidWindow` when `to` is present and not
    /// after `from`.
    pub fn new(from: NaiveDate, to: Option<NaiveDate>) -> Result<Self, TemporalError> {
        if let Some(end) = to {
            if end <= from {
                return Err(TemporalError::InvalidWindow { from, to: end });
            }
        }
        Ok(Self { from, to })
    }

    /// Creates an open-ended window starting at `from`
    pub fn open_ended(from: NaiveDate) -> Self {
        Self { from, to: None }
    }

    /// Returns true when `date` falls inside the window
    pub fn contains(&self, date: NaiveDate) -> bool {
        if date < self.from {
            return false;
        }
        match self.to {
            Some(end) => date < end,
            None => true,
        }
    }

    /// Returns true when this window and `other` share at least one date
    pub fn overlaps(&self, other: &EffectiveWindow) -> bool {
        let starts_before_other_ends = match other.to {
            Some(end) => self.from < end,
            None => true,
        };
        let other_starts_before_self_ends = match self.to {
            Some(end) => other.from < end,
            None => true,
        };
        starts_before_other_ends && other_starts_before_self_ends
    }
}

/// Whole days from `earlier` to `later`; negative when `later` precedes it
pub fn days_between(earlier: NaiveDate, later: NaiveDate) -> i64 {
    (later - earlier).num_days()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_bounded_window_contains() {
        let window = EffectiveWindow::new(d(2026, 1, 1), Some(d(2026, 7, 1))).unwrap();

        assert!(!window.contains(d(2025, 12, 31)));
        assert!(window.contains(d(2026, 1, 1)));
        assert!(window.contains(d(2026, 6, 30)));
        // Half-open: the end date itself is excluded
        assert!(!window.contains(d(2026, 7, 1)));
    }

    #[test]
    fn test_open_ended_window() {
        let window = EffectiveWindow::open_ended(d(2026, 1, 1));

        assert!(window.contains(d(2026, 1, 1)));
        assert!(window.contains(d(2099, 12, 31)));
        assert!(!window.contains(d(2025, 12, 31)));
    }

    #[test]
    fn test_invalid_window_rejected() {
        let result = EffectiveWindow::new(d(2026, 7, 1), Some(d(2026, 1, 1)));
        assert!(matches!(result, Err(TemporalError::InvalidWindow { .. })));
    }

    #[test]
    fn test_overlap_detection() {
        let a = EffectiveWindow::new(d(2026, 1, 1), Some(d(2026, 6, 1))).unwrap();
        let b = EffectiveWindow::new(d(2026, 5, 1), Some(d(2026, 9, 1))).unwrap();
        let c = EffectiveWindow::new(d(2026, 6, 1), Some(d(2026, 9, 1))).unwrap();
        let open = EffectiveWindow::open_ended(d(2026, 3, 1));

        assert!(a.overlaps(&b));
        // Half-open windows that touch at the boundary do not overlap
        assert!(!a.overlaps(&c));
        assert!(a.overlaps(&open));
        assert!(open.overlaps(&c));
    }

    #[test]
    fn test_days_between() {
        assert_eq!(days_between(d(2026, 1, 1), d(2026, 1, 31)), 30);
        assert_eq!(days_between(d(2026, 1, 31), d(2026, 1, 1)), -30);
        assert_eq!(days_between(d(2026, 1, 1), d(2026, 1, 1)), 0);
    }
}
