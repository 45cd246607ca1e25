//! Two-month date-range picker.
//!
//! The engine lives in [`calendar`] (month grids and navigation) and
//! [`selection`] (the two-click state machine and highlight query); both are
//! pure and hold no state. [`picker::RangePicker`] is the host-side
//! controller a view drives, and [`app`]/[`ui`] are the terminal view shipped
//! with the `rp` binary.
pub mod app;
pub mod calendar;
pub mod config;
pub mod picker;
pub mod selection;
pub mod theme;
pub mod ui;
