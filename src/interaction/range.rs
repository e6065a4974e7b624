use chrono::{Duration, NaiveDate};
use tracing::debug;

use crate::model::{ScheduledItem, TimelineViewport, ZoomLevel};

/// Padding added on both sides of the task span for the default window.
pub const DEFAULT_PADDING_DAYS: i64 = 3;

/// Direction of a window shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shift {
    Back,
    Forward,
}

/// Holds the visible window and zoom, and knows the default window for the
/// current task set.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeController {
    view_start: NaiveDate,
    view_end: NaiveDate,
    zoom: ZoomLevel,
    default_window: (NaiveDate, NaiveDate),
}

impl RangeController {
    pub fn new(items: &[ScheduledItem], zoom: ZoomLevel, today: NaiveDate) -> Self {
        let default_window = default_window(items, zoom, today);
        Self {
            view_start: default_window.0,
            view_end: default_window.1,
            zoom,
            default_window,
        }
    }

    pub fn viewport(&self) -> TimelineViewport {
        TimelineViewport::new(self.view_start, self.view_end, self.zoom)
    }

    pub fn zoom(&self) -> ZoomLevel {
        self.zoom
    }

    pub fn default_window(&self) -> (NaiveDate, NaiveDate) {
        self.default_window
    }

    /// Recompute the default window for a new task set. If it changed, the
    /// visible window is reset to it. Returns whether a reset happened.
    pub fn sync_items(&mut self, items: &[ScheduledItem], today: NaiveDate) -> bool {
        let window = default_window(items, self.zoom, today);
        if window == self.default_window {
            return false;
        }
        debug!(start = %window.0, end = %window.1, "task set changed, resetting window");
        self.default_window = window;
        self.reset_range();
        true
    }

    pub fn set_zoom(&mut self, zoom: ZoomLevel) {
        self.zoom = zoom;
    }

    /// Move the window by one zoom-dependent step.
    pub fn shift(&mut self, direction: Shift) {
        let step = match direction {
            Shift::Back => -self.zoom.shift_step_days(),
            Shift::Forward => self.zoom.shift_step_days(),
        };
        self.view_start += Duration::days(step);
        self.view_end += Duration::days(step);
    }

    /// Center the window on `today` with the zoom's half-span.
    pub fn center_on(&mut self, today: NaiveDate) {
        let (start, end) = centered(today, self.zoom);
        self.view_start = start;
        self.view_end = end;
    }

    /// Restore the computed default window.
    pub fn reset_range(&mut self) {
        (self.view_start, self.view_end) = self.default_window;
    }

    /// Set an explicit window start, keeping the current span.
    pub fn jump_to(&mut self, start: NaiveDate) {
        let span = self.view_end - self.view_start;
        self.view_start = start;
        self.view_end = start + span;
    }
}

/// Earliest start minus padding to latest end plus padding; centred on today
/// when there are no items.
pub fn default_window(items: &[ScheduledItem], zoom: ZoomLevel, today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let earliest = items.iter().map(|i| i.start).min();
    let latest = items.iter().map(|i| i.end).max();
    match (earliest, latest) {
        (Some(start), Some(end)) => (
            start - Duration::days(DEFAULT_PADDING_DAYS),
            end.max(start) + Duration::days(DEFAULT_PADDING_DAYS),
        ),
        _ => centered(today, zoom),
    }
}

fn centered(day: NaiveDate, zoom: ZoomLevel) -> (NaiveDate, NaiveDate) {
    let half = Duration::days(zoom.center_half_span_days());
    (day - half, day + half)
}
