//! Two-click range selection and the highlight predicate.
use crate::calendar::CalendarDate;

// ─── Data types ───────────────────────────────────────────────────────────────

/// A possibly partial selection. When both ends are set, `start <= end`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<CalendarDate>,
    pub end:   Option<CalendarDate>,
}

impl DateRange {
    pub const EMPTY: DateRange = DateRange { start: None, end: None };

    /// Builds a range from two optional endpoints, swapping them if needed.
    /// A lone end becomes the start.
    pub fn new(start: Option<CalendarDate>, end: Option<CalendarDate>) -> Self {
        match (start, end) {
            (Some(s), Some(e)) if e < s => Self { start: Some(e), end: Some(s) },
            (None, Some(e)) => Self { start: Some(e), end: None },
            _ => Self { start, end },
        }
    }

    pub fn is_empty(&self) -> bool { self.start.is_none() && self.end.is_none() }

    pub fn is_complete(&self) -> bool { self.start.is_some() && self.end.is_some() }

    /// Inclusive day count of a complete range.
    pub fn num_days(&self) -> Option<i64> {
        match (self.start, self.end) {
            (Some(s), Some(e)) => Some((e - s).num_days() + 1),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SelectionState {
    /// The next click starts a new range.
    #[default]
    Idle,
    /// A start has been chosen; the next click sets the end.
    PickingEnd,
}

// ─── State machine ────────────────────────────────────────────────────────────

/// Applies one click to the current selection.
///
/// From `Idle` the click becomes a fresh start with no end. From `PickingEnd`
/// the click becomes the other endpoint, swapped in front of the stored start
/// if it is earlier. Bounds are not checked here; the host must not route
/// clicks it considers out of bounds.
///
/// A `PickingEnd` state paired with a range that has no start (the host
/// cleared it mid-selection) is treated like `Idle`.
pub fn handle_date_click(
    current: &DateRange,
    state:   SelectionState,
    clicked: CalendarDate,
) -> (DateRange, SelectionState) {
    match (state, current.start) {
        (SelectionState::PickingEnd, Some(start)) => {
            let range = if clicked < start {
                DateRange { start: Some(clicked), end: Some(start) }
            } else {
                DateRange { start: Some(start), end: Some(clicked) }
            };
            (range, SelectionState::Idle)
        }
        _ => (
            DateRange { start: Some(clicked), end: None },
            SelectionState::PickingEnd,
        ),
    }
}

// ─── Highlight query ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DayClass {
    pub is_start_or_end: bool,
    pub is_in_range:     bool,
}

/// How `date` relates to `range`, for highlighting. `is_in_range` is
/// inclusive of both endpoints and only set for a complete range.
pub fn classify(range: &DateRange, date: CalendarDate) -> DayClass {
    let is_start_or_end = range.start == Some(date) || range.end == Some(date);
    let is_in_range = match (range.start, range.end) {
        (Some(s), Some(e)) => s <= date && date <= e,
        _ => false,
    };
    DayClass { is_start_or_end, is_in_range }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ymd(y: i32, m: u32, d: u32) -> CalendarDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn two_clicks(d1: CalendarDate, d2: CalendarDate) -> (DateRange, SelectionState) {
        let (r, s) = handle_date_click(&DateRange::EMPTY, SelectionState::Idle, d1);
        handle_date_click(&r, s, d2)
    }

    #[test]
    fn test_first_click_starts_range() {
        let (range, state) =
            handle_date_click(&DateRange::EMPTY, SelectionState::default(), ymd(2024, 3, 10));
        assert_eq!(range, DateRange { start: Some(ymd(2024, 3, 10)), end: None });
        assert_eq!(state, SelectionState::PickingEnd);
    }

    #[test]
    fn test_earlier_second_click_swaps() {
        let (range, state) = two_clicks(ymd(2024, 3, 10), ymd(2024, 3, 5));
        assert_eq!(range.start, Some(ymd(2024, 3, 5)));
        assert_eq!(range.end, Some(ymd(2024, 3, 10)));
        assert_eq!(state, SelectionState::Idle);
    }

    #[test]
    fn test_ordered_clicks_keep_order() {
        let pairs = [
            (ymd(2024, 3, 5),  ymd(2024, 3, 10)),
            (ymd(2024, 3, 5),  ymd(2024, 3, 5)),
            (ymd(2023, 12, 31), ymd(2024, 1, 1)),
        ];
        for (d1, d2) in pairs {
            let (range, _) = two_clicks(d1, d2);
            assert_eq!(range, DateRange { start: Some(d1), end: Some(d2) });
            let (swapped, _) = two_clicks(d2, d1);
            assert_eq!(swapped, DateRange { start: Some(d1), end: Some(d2) });
        }
    }

    #[test]
    fn test_third_click_restarts() {
        let (range, state) = two_clicks(ymd(2024, 3, 5), ymd(2024, 3, 10));
        let (range, state) = handle_date_click(&range, state, ymd(2024, 4, 1));
        assert_eq!(range, DateRange { start: Some(ymd(2024, 4, 1)), end: None });
        assert_eq!(state, SelectionState::PickingEnd);
    }

    #[test]
    fn test_picking_end_without_start_acts_idle() {
        let (range, state) =
            handle_date_click(&DateRange::EMPTY, SelectionState::PickingEnd, ymd(2024, 3, 7));
        assert_eq!(range, DateRange { start: Some(ymd(2024, 3, 7)), end: None });
        assert_eq!(state, SelectionState::PickingEnd);
    }

    #[test]
    fn test_classify_inside_range() {
        let range = DateRange::new(Some(ymd(2024, 3, 5)), Some(ymd(2024, 3, 10)));
        let class = classify(&range, ymd(2024, 3, 7));
        assert_eq!(class, DayClass { is_start_or_end: false, is_in_range: true });
        assert_eq!(classify(&range, ymd(2024, 3, 7)), class);
    }

    #[test]
    fn test_classify_endpoints_and_outside() {
        let range = DateRange::new(Some(ymd(2024, 3, 5)), Some(ymd(2024, 3, 10)));
        assert_eq!(
            classify(&range, ymd(2024, 3, 5)),
            DayClass { is_start_or_end: true, is_in_range: true },
        );
        assert_eq!(
            classify(&range, ymd(2024, 3, 10)),
            DayClass { is_start_or_end: true, is_in_range: true },
        );
        assert_eq!(classify(&range, ymd(2024, 3, 11)), DayClass::default());
    }

    #[test]
    fn test_classify_partial_and_empty() {
        let partial = DateRange { start: Some(ymd(2024, 3, 5)), end: None };
        assert_eq!(
            classify(&partial, ymd(2024, 3, 5)),
            DayClass { is_start_or_end: true, is_in_range: false },
        );
        assert_eq!(classify(&partial, ymd(2024, 3, 6)), DayClass::default());
        assert_eq!(classify(&DateRange::EMPTY, ymd(2024, 3, 6)), DayClass::default());
    }

    #[test]
    fn test_range_new_swaps_and_counts() {
        let r = DateRange::new(Some(ymd(2024, 3, 10)), Some(ymd(2024, 3, 5)));
        assert_eq!(r.start, Some(ymd(2024, 3, 5)));
        assert_eq!(r.num_days(), Some(6));
        assert!(r.is_complete());
        assert!(DateRange::EMPTY.is_empty());
        assert_eq!(
            DateRange::new(None, Some(ymd(2024, 3, 10))),
            DateRange { start: Some(ymd(2024, 3, 10)), end: None },
        );
        assert_eq!(DateRange::EMPTY.num_days(), None);
    }
}
