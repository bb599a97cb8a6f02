//! Guard against applying availability results that arrive after the
//! caller has moved to another range or duration.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::calendar::DateRange;

/// What an availability result was computed for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct AvailabilityKey {
    pub range: DateRange,
    pub duration_minutes: u32,
}

/// A result tagged with the key it was requested for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tagged<T> {
    pub key: AvailabilityKey,
    pub value: T,
}

/// Tracks the currently visible key; results for any other key are stale.
#[derive(Debug, Default)]
pub struct VisibleWindow {
    current: Mutex<Option<AvailabilityKey>>,
}

impl VisibleWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `key` the visible one; anything in flight for an older key
    /// will be rejected by [`VisibleWindow::accept`].
    pub fn show(&self, key: AvailabilityKey) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        *current = Some(key);
    }

    pub fn current(&self) -> Option<AvailabilityKey> {
        *self.current.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Unwrap a result if it still matches the visible key, otherwise drop it
    pub fn accept<T>(&self, result: Tagged<T>) -> Option<T> {
        if self.current() == Some(result.key) {
            Some(result.value)
        } else {
            tracing::debug!(
                "Discarding stale availability result for {}..{} ({} min)",
                result.key.range.start,
                result.key.range.end,
                result.key.duration_minutes
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::availability::calendar::CalendarMonth;

    fn key(month: u32, duration: u32) -> AvailabilityKey {
        AvailabilityKey {
            range: CalendarMonth::new(2026, month).unwrap().grid(),
            duration_minutes: duration,
        }
    }

    #[test]
    fn test_accepts_current_key() {
        let window = VisibleWindow::new();
        window.show(key(10, 30));
        assert_eq!(window.accept(Tagged { key: key(10, 30), value: 7 }), Some(7));
    }

    #[test]
    fn test_discards_result_for_previous_month() {
        let window = VisibleWindow::new();
        window.show(key(10, 30));
        window.show(key(11, 30));
        assert_eq!(window.accept(Tagged { key: key(10, 30), value: 7 }), None);
    }

    #[test]
    fn test_discards_result_for_other_duration() {
        let window = VisibleWindow::new();
        window.show(key(10, 90));
        assert_eq!(window.accept(Tagged { key: key(10, 30), value: () }), None);
    }

    #[test]
    fn test_nothing_visible_discards_everything() {
        let window = VisibleWindow::new();
        assert_eq!(window.accept(Tagged { key: key(10, 30), value: 1 }), None);
    }
}
