use anyhow::{Context, Result};
use rangepick::{
    app::App,
    calendar::{build_month_grid, MonthCursor},
    config::{data_dir, AppConfig},
    theme::ThemeConfig,
    ui::plain_months,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    // ── rp print [YYYY-MM] ────────────────────────────────────────────────────
    if args.get(1).map(|s| s.as_str()) == Some("print") {
        return cmd_print(args.get(2).map(|s| s.as_str()));
    }

    // ── rp (TUI) ──────────────────────────────────────────────────────────────
    run_tui()
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

// ─── Print command ────────────────────────────────────────────────────────────

fn cmd_print(month: Option<&str>) -> Result<()> {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cursor = match month {
        Some(m) => m.parse::<MonthCursor>()?,
        None    => MonthCursor::from_date(chrono::Local::now().date_naive()),
    };
    tracing::debug!(%cursor, "Printing months");

    let next = cursor.next();
    println!("{}", plain_months(&[
        build_month_grid(cursor.year, cursor.month as i32),
        build_month_grid(next.year, next.month as i32),
    ]));
    Ok(())
}

// ─── TUI ─────────────────────────────────────────────────────────────────────

fn run_tui() -> Result<()> {
    let log_dir = data_dir();
    std::fs::create_dir_all(&log_dir)?;
    let file_appender = tracing_appender::rolling::daily(&log_dir, "rangepick.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    tracing::info!("Starting rangepick");

    let cfg = AppConfig::load().unwrap_or_else(|e| {
        tracing::warn!("{e}; using defaults");
        AppConfig::default()
    });
    let theme  = ThemeConfig::load()?;
    let today  = chrono::Local::now().date_naive();
    let format = cfg.picker.date_format.clone();

    let mut app = App::new(cfg.picker, theme, today).context("Invalid [picker] configuration")?;
    let committed = app.run()?;

    if let Some((start, end)) = committed {
        tracing::info!(%start, %end, "Range committed");
        println!("{} {}", start.format(&format), end.format(&format));
    }
    Ok(())
}
