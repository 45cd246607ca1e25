use chrono::{Datelike, NaiveDate};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{block::Title, Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Status};
use crate::calendar::{DayCell, MonthGrid, WEEKDAY_LABELS};
use crate::picker::PLACEHOLDER;

/// Inner width of one month: seven 4-column cells.
const MONTH_WIDTH: u16 = 7 * 4;

// ─── Root draw ────────────────────────────────────────────────────────────────

pub fn draw(f: &mut Frame, app: &App) {
    let area = f.area();

    f.render_widget(
        Block::default().style(Style::default().bg(app.theme.bg()).fg(app.theme.fg())),
        area,
    );

    // Layout: [ input(3) | months | status_bar(1) ]
    let root = Layout::default().direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    // Months: [ pad | left(30) | gap(2) | right(30) | pad ]
    let cols = Layout::default().direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(MONTH_WIDTH + 2),
            Constraint::Length(2),
            Constraint::Length(MONTH_WIDTH + 2),
            Constraint::Min(0),
        ]).split(root[1]);

    let [left, right] = app.picker.visible_months();

    draw_input(f, app, root[0]);
    draw_month(f, app, &left, cols[1]);
    draw_month(f, app, &right, cols[3]);
    draw_statusbar(f, app, root[2]);

    if app.show_help {
        draw_help(f, area, app);
    }
}

// ─── Input field ──────────────────────────────────────────────────────────────

fn draw_input(f: &mut Frame, app: &App, area: Rect) {
    let t       = &app.theme;
    let summary = app.picker.summary();
    let text    = if summary.is_empty() {
        Span::styled(PLACEHOLDER, Style::default().fg(t.fg_dim()))
    } else {
        Span::styled(summary, Style::default().fg(t.fg()))
    };

    let block = Block::default()
        .title(Title::from(Span::styled(" Range ", Style::default().fg(t.accent()))))
        .borders(Borders::ALL)
        .border_type(t.border_type())
        .border_style(Style::default().fg(t.border_active()))
        .style(Style::default().bg(t.bg()));

    f.render_widget(Paragraph::new(Line::from(vec![Span::raw(" "), text])).block(block), area);
}

// ─── Month ────────────────────────────────────────────────────────────────────

fn draw_month(f: &mut Frame, app: &App, grid: &MonthGrid, area: Rect) {
    let t     = &app.theme;
    let title = Line::from(Span::styled(
        format!(" {} ", grid.cursor().title()),
        Style::default().fg(t.accent()).add_modifier(Modifier::BOLD),
    ));

    let block = Block::default()
        .title(Title::from(title))
        .borders(Borders::ALL)
        .border_type(t.border_type())
        .border_style(Style::default().fg(t.border()))
        .style(Style::default().bg(t.bg()));

    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut lines: Vec<Line> = vec![];

    let hdrs: Vec<Span> = WEEKDAY_LABELS.iter().enumerate().map(|(i, d)| {
        let fg = if i == 0 || i == 6 { t.weekend_color() } else { t.fg_dim() };
        Span::styled(format!(" {d} "), Style::default().fg(fg).add_modifier(Modifier::BOLD))
    }).collect();
    lines.push(Line::from(hdrs));
    lines.push(Line::from(Span::styled(
        "─".repeat(inner.width as usize),
        Style::default().fg(t.border()),
    )));

    for week in grid.weeks() {
        let spans: Vec<Span> = week.iter().enumerate().map(|(col, cell)| {
            let DayCell::Day(date) = *cell else {
                return Span::raw("    ");
            };
            Span::styled(day_label(date), day_style(app, date, col))
        }).collect();
        lines.push(Line::from(spans));
    }

    f.render_widget(
        Paragraph::new(lines).style(Style::default().bg(t.bg())).alignment(Alignment::Left),
        inner,
    );
}

fn day_label(date: NaiveDate) -> String {
    format!(" {:2} ", date.day())
}

/// Keyboard focus wins over range endpoints, which win over the in-range
/// fill; disabled, today and weekend colouring only apply to plain days.
fn day_style(app: &App, date: NaiveDate, col: usize) -> Style {
    let t     = &app.theme;
    let class = app.picker.classify(date);

    if date == app.focus {
        let (bg, fg) = t.cursor_highlight();
        Style::default().bg(bg).fg(fg).add_modifier(Modifier::BOLD)
    } else if class.is_start_or_end {
        let (bg, fg) = t.endpoint_highlight();
        Style::default().bg(bg).fg(fg).add_modifier(Modifier::BOLD)
    } else if class.is_in_range {
        let (bg, fg) = t.range_highlight();
        Style::default().bg(bg).fg(fg)
    } else if !app.picker.is_selectable(date) {
        Style::default().fg(t.disabled()).add_modifier(Modifier::DIM)
    } else if date == app.today {
        Style::default().fg(t.today()).add_modifier(Modifier::UNDERLINED)
    } else if col == 0 || col == 6 {
        Style::default().fg(t.weekend_color())
    } else {
        Style::default().fg(t.fg())
    }
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_statusbar(f: &mut Frame, app: &App, area: Rect) {
    let t = &app.theme;
    let status = match &app.status {
        Status::Info(msg)  => Span::styled(format!("  {msg}"), Style::default().fg(t.fg_dim())),
        Status::Error(msg) => Span::styled(
            format!("  ✗ {msg}"),
            Style::default().fg(t.error()).add_modifier(Modifier::BOLD),
        ),
    };
    let bar = Paragraph::new(Line::from(vec![
        Span::styled(
            " hjkl:move  Enter:pick  [:prev  ]:next  t:today  Esc:clear  ?:help  q:done",
            Style::default().fg(t.fg_dim()),
        ),
        status,
    ])).style(Style::default().bg(t.bg2()));
    f.render_widget(bar, area);
}

// ─── Help overlay ────────────────────────────────────────────────────────────

fn draw_help(f: &mut Frame, area: Rect, app: &App) {
    let t    = &app.theme;
    let rect = centered(60, 70, area);
    f.render_widget(Clear, rect);

    let title = Line::from(Span::styled(
        " Keyboard Shortcuts ",
        Style::default().fg(t.accent()).add_modifier(Modifier::BOLD),
    ));
    let block = Block::default()
        .title(Title::from(title))
        .borders(Borders::ALL)
        .border_type(t.border_type())
        .border_style(Style::default().fg(t.border_active()))
        .style(Style::default().bg(t.popup_bg()));

    let accent = Style::default().fg(t.accent()).add_modifier(Modifier::BOLD);
    let dim    = Style::default().fg(t.fg_dim());
    let lines  = vec![
        Line::from(""),
        Line::from(Span::styled("  Navigation", accent)),
        Line::from(Span::styled("  h/j/k/l  ←↓↑→     Move by day / week", dim)),
        Line::from(Span::styled("  [ / ]              Prev / Next month", dim)),
        Line::from(Span::styled("  t                  Jump to today", dim)),
        Line::from(""),
        Line::from(Span::styled("  Selection", accent)),
        Line::from(Span::styled("  Enter / Space      Pick start, then end", dim)),
        Line::from(Span::styled("  Esc                Clear selection", dim)),
        Line::from(""),
        Line::from(Span::styled("  General", accent)),
        Line::from(Span::styled("  T                  Cycle theme", dim)),
        Line::from(Span::styled("  ?                  Toggle help", dim)),
        Line::from(Span::styled("  q                  Print range and quit", dim)),
    ];

    f.render_widget(
        Paragraph::new(lines).block(block).style(Style::default().fg(t.fg()))
            .wrap(Wrap { trim: false }),
        rect,
    );
}

// ─── Plain text ───────────────────────────────────────────────────────────────

/// One month as `cal`-style text: title, weekday header, then one line per
/// week. Lines are not padded to a common width.
pub fn plain_month(grid: &MonthGrid) -> Vec<String> {
    let mut out = vec![
        format!("{:^20}", grid.cursor().title()),
        WEEKDAY_LABELS.join(" "),
    ];
    for week in grid.weeks() {
        let cells: Vec<String> = week.iter().map(|c| match c.date() {
            Some(date) => format!("{:2}", date.day()),
            None => "  ".to_owned(),
        }).collect();
        out.push(cells.join(" ").trim_end().to_owned());
    }
    out
}

/// Several months side by side, separated by three spaces.
pub fn plain_months(grids: &[MonthGrid]) -> String {
    let blocks: Vec<Vec<String>> = grids.iter().map(plain_month).collect();
    let rows = blocks.iter().map(Vec::len).max().unwrap_or(0);
    (0..rows)
        .map(|i| {
            blocks.iter()
                .map(|b| format!("{:<20}", b.get(i).map(String::as_str).unwrap_or("")))
                .collect::<Vec<_>>()
                .join("   ")
                .trim_end()
                .to_owned()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// ─── Utilities ────────────────────────────────────────────────────────────────

fn centered(pct_x: u16, pct_y: u16, r: Rect) -> Rect {
    let vert = Layout::default().direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - pct_y) / 2),
            Constraint::Percentage(pct_y),
            Constraint::Percentage((100 - pct_y) / 2),
        ]).split(r);
    Layout::default().direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - pct_x) / 2),
            Constraint::Percentage(pct_x),
            Constraint::Percentage((100 - pct_x) / 2),
        ]).split(vert[1])[1]
}
