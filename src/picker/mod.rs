//! Host-side controller for the range picker.
//!
//! [`RangePicker`] owns what a view needs across its lifetime: the selected
//! range, the selection state, the month cursor and the `on_change` callback.
//! It routes clicks into [`handle_date_click`] and, unlike the bare state
//! machine, refuses clicks outside the configured bounds.
use std::fmt::{self, Write};

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calendar::{build_month_grid, CalendarDate, MonthCursor, MonthGrid};
use crate::selection::{classify, handle_date_click, DateRange, DayClass, SelectionState};

pub const PLACEHOLDER:      &str = "Start date → End date";
pub const MISSING_END:      &str = "Select end date";
pub const DEFAULT_FORMAT:   &str = "%Y-%m-%d";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PickError {
    #[error("{date} is outside the allowed range {bounds}")]
    OutOfBounds { date: CalendarDate, bounds: DateBounds },
    #[error("min_date {min} is after max_date {max}")]
    InvertedBounds { min: CalendarDate, max: CalendarDate },
    #[error("Invalid date format: {0}")]
    InvalidDateFormat(String),
}

pub type Result<T> = std::result::Result<T, PickError>;

// ─── Options ──────────────────────────────────────────────────────────────────

fn default_locale()      -> String { "default".to_owned() }
fn default_date_format() -> String { DEFAULT_FORMAT.to_owned() }

/// Host-supplied configuration. `locale` and `date_format` only affect how
/// dates are displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickerOptions {
    #[serde(default)]
    pub start_date:  Option<CalendarDate>,
    #[serde(default)]
    pub end_date:    Option<CalendarDate>,
    #[serde(default = "default_locale")]
    pub locale:      String,
    #[serde(default = "default_date_format")]
    pub date_format: String,
    #[serde(default)]
    pub min_date:    Option<CalendarDate>,
    #[serde(default)]
    pub max_date:    Option<CalendarDate>,
}

impl Default for PickerOptions {
    fn default() -> Self {
        Self {
            start_date:  None,
            end_date:    None,
            locale:      default_locale(),
            date_format: default_date_format(),
            min_date:    None,
            max_date:    None,
        }
    }
}

impl PickerOptions {
    pub fn bounds(&self) -> Result<DateBounds> {
        DateBounds::new(self.min_date, self.max_date)
    }
}

/// Inclusive, optionally open-ended interval of selectable days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateBounds {
    pub min: Option<CalendarDate>,
    pub max: Option<CalendarDate>,
}

impl DateBounds {
    pub fn new(min: Option<CalendarDate>, max: Option<CalendarDate>) -> Result<Self> {
        if let (Some(min), Some(max)) = (min, max) {
            if min > max {
                return Err(PickError::InvertedBounds { min, max });
            }
        }
        Ok(Self { min, max })
    }

    pub fn contains(&self, date: CalendarDate) -> bool {
        self.min.map_or(true, |m| date >= m) && self.max.map_or(true, |m| date <= m)
    }
}

impl fmt::Display for DateBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min, self.max) {
            (Some(a), Some(b)) => write!(f, "[{a}, {b}]"),
            (Some(a), None)    => write!(f, "[{a}, …)"),
            (None, Some(b))    => write!(f, "(…, {b}]"),
            (None, None)       => write!(f, "(…, …)"),
        }
    }
}

/// Rejects patterns chrono cannot parse, and patterns that need a time of
/// day or a zone, which a bare date cannot render.
fn check_date_format(fmt: &str) -> Result<()> {
    let invalid = || PickError::InvalidDateFormat(fmt.to_owned());
    if StrftimeItems::new(fmt).any(|item| matches!(item, Item::Error)) {
        return Err(invalid());
    }
    let mut sample = String::new();
    write!(sample, "{}", CalendarDate::MIN.format(fmt)).map_err(|_| invalid())
}

// ─── Controller ───────────────────────────────────────────────────────────────

pub type OnChange = Box<dyn FnMut(Option<CalendarDate>, Option<CalendarDate>)>;

pub struct RangePicker {
    options:   PickerOptions,
    bounds:    DateBounds,
    range:     DateRange,
    state:     SelectionState,
    cursor:    MonthCursor,
    on_change: OnChange,
}

impl fmt::Debug for RangePicker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RangePicker")
            .field("range", &self.range)
            .field("state", &self.state)
            .field("cursor", &self.cursor)
            .field("bounds", &self.bounds)
            .finish_non_exhaustive()
    }
}

impl RangePicker {
    /// The cursor opens on the month of the initial start date, or on
    /// `today`'s month when there is none.
    pub fn new<F>(options: PickerOptions, today: CalendarDate, on_change: F) -> Result<Self>
    where
        F: FnMut(Option<CalendarDate>, Option<CalendarDate>) + 'static,
    {
        let bounds = options.bounds()?;
        check_date_format(&options.date_format)?;

        let range  = DateRange::new(options.start_date, options.end_date);
        for date in [range.start, range.end].into_iter().flatten() {
            if !bounds.contains(date) {
                return Err(PickError::OutOfBounds { date, bounds });
            }
        }
        let cursor = MonthCursor::from_date(range.start.unwrap_or(today));

        Ok(Self {
            options, bounds, range,
            state: SelectionState::Idle,
            cursor,
            on_change: Box::new(on_change),
        })
    }

    pub fn options(&self) -> &PickerOptions { &self.options }
    pub fn bounds(&self)  -> DateBounds { self.bounds }
    pub fn range(&self)   -> DateRange { self.range }
    pub fn state(&self)   -> SelectionState { self.state }
    pub fn cursor(&self)  -> MonthCursor { self.cursor }

    // ── Selection ─────────────────────────────────────────────────────────────

    /// Routes a click on `date`. Reports the new range through `on_change`
    /// exactly once, or rejects the click untouched if it is out of bounds.
    pub fn click(&mut self, date: CalendarDate) -> Result<DateRange> {
        if !self.bounds.contains(date) {
            tracing::warn!(%date, bounds = %self.bounds, "Rejected out-of-bounds click");
            return Err(PickError::OutOfBounds { date, bounds: self.bounds });
        }

        let (range, state) = handle_date_click(&self.range, self.state, date);
        self.range = range;
        self.state = state;
        tracing::info!(?range, ?state, "Date clicked");
        (self.on_change)(range.start, range.end);
        Ok(range)
    }

    /// Drops the current selection and reports the empty range.
    pub fn clear(&mut self) {
        self.range = DateRange::EMPTY;
        self.state = SelectionState::Idle;
        tracing::info!("Selection cleared");
        (self.on_change)(None, None);
    }

    pub fn classify(&self, date: CalendarDate) -> DayClass {
        classify(&self.range, date)
    }

    pub fn is_selectable(&self, date: CalendarDate) -> bool {
        self.bounds.contains(date)
    }

    // ── Navigation ────────────────────────────────────────────────────────────

    pub fn next_month(&mut self) {
        self.cursor = self.cursor.next();
        tracing::debug!(cursor = %self.cursor, "Advanced month");
    }

    pub fn prev_month(&mut self) {
        self.cursor = self.cursor.prev();
        tracing::debug!(cursor = %self.cursor, "Retreated month");
    }

    /// Moves the cursor just enough for `date` to be on screen.
    pub fn reveal(&mut self, date: CalendarDate) {
        let target = MonthCursor::from_date(date);
        if target < self.cursor {
            self.cursor = target;
        } else if target > self.cursor.next() {
            self.cursor = target.prev();
        }
    }

    /// The cursor month and the one after it.
    pub fn visible_months(&self) -> [MonthGrid; 2] {
        let next = self.cursor.next();
        [
            build_month_grid(self.cursor.year, self.cursor.month as i32),
            build_month_grid(next.year, next.month as i32),
        ]
    }

    // ── Display ───────────────────────────────────────────────────────────────

    pub fn format_date(&self, date: CalendarDate) -> String {
        date.format(&self.options.date_format).to_string()
    }

    /// Input-field text: empty with no selection, otherwise `start → end`.
    pub fn summary(&self) -> String {
        if self.range.is_empty() {
            return String::new();
        }
        let start = self.range.start.map(|d| self.format_date(d)).unwrap_or_default();
        let end   = self.range.end.map(|d| self.format_date(d))
            .unwrap_or_else(|| MISSING_END.to_owned());
        format!("{start} → {end}")
    }
}
