//! Month grid arithmetic.
//!
//! Months are zero-based throughout this module (0 = January), matching the
//! cursor the host view navigates with. Weeks start on Sunday.
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use thiserror::Error;

/// A calendar day with no time-of-day or timezone attached.
pub type CalendarDate = NaiveDate;

/// Column headers for a Sunday-first grid.
pub const WEEKDAY_LABELS: [&str; 7] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CalendarError {
    #[error("Invalid month '{0}' (expected YYYY-MM)")]
    InvalidMonth(String),
}

// ─── Month cursor ─────────────────────────────────────────────────────────────

/// A (year, zero-based month) pair. Always normalized: `month` is in 0..=11.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthCursor {
    pub year:  i32,
    pub month: u32,
}

impl MonthCursor {
    /// Builds a cursor from any integer month, rolling the year over the way
    /// host calendar arithmetic does (`month = 12` is January of `year + 1`,
    /// `month = -1` is December of `year - 1`).
    pub fn new(year: i32, month: i32) -> Self {
        Self {
            year:  year.saturating_add(month.div_euclid(12)),
            month: month.rem_euclid(12) as u32,
        }
    }

    pub fn from_date(date: CalendarDate) -> Self {
        Self { year: date.year(), month: date.month0() }
    }

    pub fn next(self) -> Self { Self::new(self.year, self.month as i32 + 1) }
    pub fn prev(self) -> Self { Self::new(self.year, self.month as i32 - 1) }

    /// First day of the month, or `None` if the year is outside what chrono
    /// can represent.
    pub fn first_day(&self) -> Option<CalendarDate> {
        NaiveDate::from_ymd_opt(self.year, self.month + 1, 1)
    }

    pub fn contains(&self, date: CalendarDate) -> bool {
        date.year() == self.year && date.month0() == self.month
    }

    pub fn month_name(&self) -> &'static str {
        month_name(self.month)
    }

    /// "March 2024"
    pub fn title(&self) -> String {
        format!("{} {}", self.month_name(), self.year)
    }
}

impl fmt::Display for MonthCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month + 1)
    }
}

impl FromStr for MonthCursor {
    type Err = CalendarError;

    /// Parses `YYYY-MM` with a one-based month.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || CalendarError::InvalidMonth(s.to_owned());
        let (y, m) = s.trim().split_once('-').ok_or_else(bad)?;
        let year:  i32 = y.parse().map_err(|_| bad())?;
        let month: u32 = m.parse().map_err(|_| bad())?;
        if !(1..=12).contains(&month) {
            return Err(bad());
        }
        Ok(Self { year, month: month - 1 })
    }
}

/// Moves the cursor one month forward, rolling December into January.
pub fn advance_month(cursor: MonthCursor) -> MonthCursor { cursor.next() }

/// Moves the cursor one month back, rolling January into December.
pub fn retreat_month(cursor: MonthCursor) -> MonthCursor { cursor.prev() }

// ─── Grid ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayCell {
    /// Padding before the 1st; not clickable and not part of any month.
    Blank,
    Day(CalendarDate),
}

impl DayCell {
    pub fn date(&self) -> Option<CalendarDate> {
        match self {
            DayCell::Blank     => None,
            DayCell::Day(date) => Some(*date),
        }
    }

    pub fn is_blank(&self) -> bool { matches!(self, DayCell::Blank) }
}

/// Leading blanks followed by one cell per day of the month. No trailing
/// padding, so the last week may be short.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    cursor: MonthCursor,
    cells:  Vec<DayCell>,
}

impl MonthGrid {
    pub fn cursor(&self) -> MonthCursor { self.cursor }
    pub fn cells(&self) -> &[DayCell] { &self.cells }
    pub fn len(&self) -> usize { self.cells.len() }
    pub fn is_empty(&self) -> bool { self.cells.is_empty() }

    pub fn leading_blanks(&self) -> usize {
        self.cells.iter().take_while(|c| c.is_blank()).count()
    }

    pub fn days(&self) -> impl Iterator<Item = CalendarDate> + '_ {
        self.cells.iter().filter_map(DayCell::date)
    }

    /// Rows of up to seven cells, Sunday first.
    pub fn weeks(&self) -> impl Iterator<Item = &[DayCell]> {
        self.cells.chunks(7)
    }
}

/// Builds the grid for `month` (zero-based) of `year`.
///
/// Out-of-range months are rolled into the neighbouring year, the same way
/// [`MonthCursor::new`] does; callers navigating with a cursor never hit
/// that path. A year chrono cannot represent yields an empty grid.
pub fn build_month_grid(year: i32, month: i32) -> MonthGrid {
    let cursor = MonthCursor::new(year, month);
    let Some(first) = cursor.first_day() else {
        return MonthGrid { cursor, cells: Vec::new() };
    };

    let leading = first.weekday().num_days_from_sunday() as usize;
    let total   = days_in_month(cursor.year, cursor.month as i32);

    let mut cells = Vec::with_capacity(leading + total as usize);
    cells.extend(std::iter::repeat(DayCell::Blank).take(leading));
    cells.extend(
        (1..=total)
            .filter_map(|d| NaiveDate::from_ymd_opt(cursor.year, cursor.month + 1, d))
            .map(DayCell::Day),
    );

    MonthGrid { cursor, cells }
}

/// Number of days in `month` (zero-based) of `year`: the day before the 1st
/// of the following month. For chrono's last month, which has no following
/// month, the days are counted directly. Returns 0 when the month itself is
/// unrepresentable.
pub fn days_in_month(year: i32, month: i32) -> u32 {
    let cursor = MonthCursor::new(year, month);
    let Some(first) = cursor.first_day() else { return 0 };
    match cursor.next().first_day().and_then(|next| next.pred_opt()) {
        Some(last) => last.day(),
        None => std::iter::successors(Some(first), |d| d.succ_opt())
            .take_while(|d| d.month0() == cursor.month)
            .count() as u32,
    }
}

pub fn month_name(month0: u32) -> &'static str {
    match month0 {
        0=>"January", 1=>"February", 2=>"March",     3=>"April",
        4=>"May",     5=>"June",     6=>"July",      7=>"August",
        8=>"September",9=>"October", 10=>"November", 11=>"December",
        _=>"???",
    }
}
