use anyhow::Result;
use chrono::{Datelike, Duration, NaiveDate};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::cell::Cell;
use std::io;
use std::rc::Rc;

use crate::{
    calendar::{days_in_month, CalendarDate, MonthCursor},
    picker::{PickerOptions, RangePicker},
    theme::ThemeConfig,
    ui::draw,
};

/// A complete range as last reported through `on_change`.
pub type Committed = Option<(CalendarDate, CalendarDate)>;

#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    Info(String),
    Error(String),
}

// ─── App state ────────────────────────────────────────────────────────────────

pub struct App {
    pub picker:    RangePicker,
    pub theme:     ThemeConfig,
    pub theme_idx: usize,
    /// Day the keyboard cursor sits on; always inside a visible month.
    pub focus:     CalendarDate,
    pub today:     CalendarDate,
    pub show_help: bool,
    pub status:    Status,
    pub running:   bool,
    committed:     Rc<Cell<Committed>>,
}

impl App {
    pub fn new(options: PickerOptions, theme: ThemeConfig, today: CalendarDate) -> Result<Self> {
        let committed: Rc<Cell<Committed>> = Rc::default();
        if let (Some(s), Some(e)) = (options.start_date, options.end_date) {
            committed.set(Some((s.min(e), s.max(e))));
        }

        let sink   = committed.clone();
        let picker = RangePicker::new(options, today, move |start, end| match (start, end) {
            (Some(s), Some(e)) => sink.set(Some((s, e))),
            _                  => sink.set(None),
        })?;

        let focus = picker.range().start.unwrap_or(today);
        let idx   = ThemeConfig::all_themes().iter().position(|t| t.name == theme.name).unwrap_or(0);

        Ok(Self {
            picker, theme,
            theme_idx: idx,
            focus, today,
            show_help: false,
            status:    Status::Info(String::new()),
            running:   true,
            committed,
        })
    }

    /// The last complete range the picker reported.
    pub fn committed(&self) -> Committed { self.committed.get() }

    // ── TUI loop ──────────────────────────────────────────────────────────────

    pub fn run(&mut self) -> Result<Committed> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend  = CrosstermBackend::new(stdout);
        let mut term = Terminal::new(backend)?;

        let result = self.event_loop(&mut term);

        disable_raw_mode()?;
        execute!(term.backend_mut(), LeaveAlternateScreen)?;
        term.show_cursor()?;
        result.map(|_| self.committed())
    }

    fn event_loop(&mut self, term: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        let tick = std::time::Duration::from_millis(100);
        while self.running {
            term.draw(|f| draw(f, self))?;

            if event::poll(tick)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.on_key(key);
                    }
                }
            }
        }
        Ok(())
    }

    // ── Input ─────────────────────────────────────────────────────────────────

    pub fn on_key(&mut self, key: KeyEvent) {
        if self.show_help {
            self.show_help = false;
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.running = false,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Right | KeyCode::Char('l') => self.shift_day(1),
            KeyCode::Left  | KeyCode::Char('h') => self.shift_day(-1),
            KeyCode::Down  | KeyCode::Char('j') => self.shift_day(7),
            KeyCode::Up    | KeyCode::Char('k') => self.shift_day(-7),
            KeyCode::Char(']') => { self.picker.next_month(); self.keep_focus_visible(); }
            KeyCode::Char('[') => { self.picker.prev_month(); self.keep_focus_visible(); }
            KeyCode::Char('t') => {
                self.focus = self.today;
                self.picker.reveal(self.today);
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.click_focus(),
            KeyCode::Esc => {
                self.picker.clear();
                self.status = Status::Info("Selection cleared".into());
            }
            KeyCode::Char('T') => self.cycle_theme(),
            _ => {}
        }
    }

    fn click_focus(&mut self) {
        self.status = match self.picker.click(self.focus) {
            Ok(_)  => Status::Info(self.picker.summary()),
            Err(e) => Status::Error(e.to_string()),
        };
    }

    fn cycle_theme(&mut self) {
        let themes = ThemeConfig::all_themes();
        self.theme_idx = (self.theme_idx + 1) % themes.len();
        self.theme     = themes[self.theme_idx].clone();
        if let Err(e) = self.theme.save() {
            tracing::warn!("Could not save theme: {e}");
        }
    }

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn shift_day(&mut self, d: i64) {
        if let Some(date) = self.focus.checked_add_signed(Duration::days(d)) {
            self.focus = date;
            self.picker.reveal(date);
        }
    }

    /// After paging months, pulls the focus onto the same day-of-month in the
    /// nearest visible month.
    fn keep_focus_visible(&mut self) {
        let left  = self.picker.cursor();
        let right = left.next();
        if left.contains(self.focus) || right.contains(self.focus) {
            return;
        }
        let target = if MonthCursor::from_date(self.focus) < left { left } else { right };
        let last = days_in_month(target.year, target.month as i32);
        let day  = self.focus.day().min(last);
        if let Some(date) = NaiveDate::from_ymd_opt(target.year, target.month + 1, day) {
            self.focus = date;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::SelectionState;
    use crossterm::event::KeyModifiers;

    fn ymd(y: i32, m: u32, d: u32) -> CalendarDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn press(app: &mut App, code: KeyCode) {
        app.on_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn app(options: PickerOptions) -> App {
        App::new(options, ThemeConfig::default(), ymd(2024, 3, 10)).unwrap()
    }

    #[test]
    fn test_two_enters_commit_swapped_range() {
        let mut app = app(PickerOptions::default());
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.picker.state(), SelectionState::PickingEnd);
        assert_eq!(app.committed(), None);

        for _ in 0..5 { press(&mut app, KeyCode::Char('h')); }
        press(&mut app, KeyCode::Char(' '));

        assert_eq!(app.committed(), Some((ymd(2024, 3, 5), ymd(2024, 3, 10))));
        assert_eq!(app.status, Status::Info("2024-03-05 → 2024-03-10".into()));
    }

    #[test]
    fn test_escape_clears_committed_range() {
        let options = PickerOptions {
            start_date: Some(ymd(2024, 3, 1)),
            end_date:   Some(ymd(2024, 3, 4)),
            ..PickerOptions::default()
        };
        let mut app = app(options);
        assert_eq!(app.committed(), Some((ymd(2024, 3, 1), ymd(2024, 3, 4))));
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.committed(), None);
        assert!(app.picker.range().is_empty());
    }

    #[test]
    fn test_new_start_drops_committed_range() {
        let options = PickerOptions {
            start_date: Some(ymd(2024, 3, 1)),
            end_date:   Some(ymd(2024, 3, 4)),
            ..PickerOptions::default()
        };
        let mut app = app(options);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.picker.state(), SelectionState::PickingEnd);
        assert_eq!(app.committed(), None);
        press(&mut app, KeyCode::Char('l'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.committed(), Some((ymd(2024, 3, 1), ymd(2024, 3, 2))));
    }

    #[test]
    fn test_out_of_bounds_enter_sets_error() {
        let options = PickerOptions { max_date: Some(ymd(2024, 3, 9)), ..PickerOptions::default() };
        let mut app = app(options);
        press(&mut app, KeyCode::Enter);
        assert!(matches!(app.status, Status::Error(_)));
        assert!(app.picker.range().is_empty());
    }

    #[test]
    fn test_focus_moves_cursor_past_visible_months() {
        let mut app = app(PickerOptions::default());
        for _ in 0..8 { press(&mut app, KeyCode::Char('j')); }
        assert_eq!(app.focus, ymd(2024, 5, 5));
        assert_eq!(app.picker.cursor(), MonthCursor { year: 2024, month: 3 });
    }

    #[test]
    fn test_paging_months_drags_focus() {
        let options = PickerOptions { start_date: Some(ymd(2024, 1, 31)), ..PickerOptions::default() };
        let mut app = app(options);
        press(&mut app, KeyCode::Char(']'));
        assert_eq!(app.focus, ymd(2024, 2, 29));
        press(&mut app, KeyCode::Char('['));
        press(&mut app, KeyCode::Char('['));
        assert_eq!(app.picker.cursor(), MonthCursor { year: 2023, month: 11 });
        assert_eq!(app.focus, ymd(2024, 1, 29));
    }

    #[test]
    fn test_help_swallows_next_key() {
        let mut app = app(PickerOptions::default());
        press(&mut app, KeyCode::Char('?'));
        assert!(app.show_help);
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.show_help);
        assert!(app.running);
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.running);
    }
}
