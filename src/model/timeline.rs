use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Controls the horizontal scale of the timeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoomLevel {
    Day,
    #[default]
    Week,
    Month,
}

impl ZoomLevel {
    pub const ALL: [ZoomLevel; 3] = [ZoomLevel::Day, ZoomLevel::Week, ZoomLevel::Month];

    /// Horizontal scale. Day view leaves room for in-bar labels; month view
    /// still fits several months on screen.
    pub fn pixels_per_day(self) -> f32 {
        match self {
            ZoomLevel::Day => 44.0,
            ZoomLevel::Week => 20.0,
            ZoomLevel::Month => 10.0,
        }
    }

    /// Days moved by one "previous"/"next" window shift.
    pub fn shift_step_days(self) -> i64 {
        match self {
            ZoomLevel::Day => 7,
            ZoomLevel::Week => 28,
            ZoomLevel::Month => 90,
        }
    }

    /// Half-span of the window used by "center today".
    pub fn center_half_span_days(self) -> i64 {
        match self {
            ZoomLevel::Day => 7,
            ZoomLevel::Week => 21,
            ZoomLevel::Month => 60,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ZoomLevel::Day => "Day",
            ZoomLevel::Week => "Week",
            ZoomLevel::Month => "Month",
        }
    }
}

/// Kind of a ruler tick, which decides how the header labels it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickKind {
    /// A single day (day zoom).
    Day,
    /// Start of an ISO week (week zoom).
    Week,
    /// First day of a month.
    Month,
}

/// A vertical grid line in the header ruler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RulerTick {
    pub date: NaiveDate,
    pub x: f32,
    pub kind: TickKind,
    /// Whether the tick should also carry the "Mon YYYY" caption.
    pub month_caption: bool,
}

/// The visible date window and its zoom. Pixels-per-day is derived from the
/// zoom, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineViewport {
    /// The leftmost visible date.
    pub start: NaiveDate,
    /// The rightmost visible date (inclusive).
    pub end: NaiveDate,
    pub zoom: ZoomLevel,
}

impl TimelineViewport {
    pub fn new(start: NaiveDate, end: NaiveDate, zoom: ZoomLevel) -> Self {
        Self {
            start,
            end: end.max(start),
            zoom,
        }
    }

    pub fn pixels_per_day(&self) -> f32 {
        self.zoom.pixels_per_day()
    }

    /// Number of day columns in the window.
    pub fn day_count(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Clamp a date into the window.
    pub fn clamp(&self, date: NaiveDate) -> NaiveDate {
        date.clamp(self.start, self.end)
    }

    /// Convert a date to an x-pixel offset from the window start. Dates
    /// outside the window are clamped to its edges.
    pub fn date_to_x(&self, date: NaiveDate) -> f32 {
        let days = (self.clamp(date) - self.start).num_days() as f32;
        days * self.pixels_per_day()
    }

    /// Convert an x-pixel offset back to a date, rounding to the nearest day
    /// and clamping to the window.
    pub fn x_to_date(&self, x: f32) -> NaiveDate {
        // `as` saturates infinities and maps NaN to 0.
        let days = ((x / self.pixels_per_day()).round() as i64).clamp(0, self.day_count() - 1);
        self.start + Duration::days(days)
    }

    /// Horizontal extent of a bar covering `start..=end`. Both dates are
    /// clamped; the bar is always at least one day wide.
    pub fn bar_span(&self, start: NaiveDate, end: NaiveDate) -> (f32, f32) {
        let x0 = self.date_to_x(start);
        let x1 = self.date_to_x(end.max(start)) + self.pixels_per_day();
        (x0, x1.max(x0 + self.pixels_per_day()))
    }

    /// Whether `start..=end` overlaps the window at all.
    pub fn intersects(&self, start: NaiveDate, end: NaiveDate) -> bool {
        start <= self.end && end >= self.start
    }

    /// Column index of a date relative to the window start, unclamped.
    pub fn column_of(&self, date: NaiveDate) -> i64 {
        (date - self.start).num_days()
    }

    /// Total width in pixels for the visible range.
    pub fn total_width(&self) -> f32 {
        self.day_count() as f32 * self.pixels_per_day()
    }

    /// Grid lines for the header ruler at the current zoom.
    pub fn ruler_ticks(&self) -> Vec<RulerTick> {
        let mut ticks = Vec::new();
        let mut date = self.start;

        match self.zoom {
            ZoomLevel::Day => {
                while date <= self.end {
                    ticks.push(RulerTick {
                        date,
                        x: self.date_to_x(date),
                        kind: TickKind::Day,
                        month_caption: date.day() == 1 || date == self.start,
                    });
                    date += Duration::days(1);
                }
            }
            ZoomLevel::Week => {
                let weekday = date.weekday().num_days_from_monday();
                date -= Duration::days(weekday as i64);
                while date <= self.end {
                    if date >= self.start {
                        ticks.push(RulerTick {
                            date,
                            x: self.date_to_x(date),
                            kind: TickKind::Week,
                            month_caption: date.day() <= 7,
                        });
                    }
                    date += Duration::days(7);
                }
            }
            ZoomLevel::Month => {
                date = NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date);
                while date <= self.end {
                    ticks.push(RulerTick {
                        date,
                        x: self.date_to_x(date),
                        kind: TickKind::Month,
                        month_caption: true,
                    });
                    let (y, m) = if date.month() == 12 {
                        (date.year() + 1, 1)
                    } else {
                        (date.year(), date.month() + 1)
                    };
                    date = NaiveDate::from_ymd_opt(y, m, 1).unwrap_or(date + Duration::days(31));
                }
            }
        }

        ticks
    }
}
