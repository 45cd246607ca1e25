use anyhow::Result;
use ratatui::style::Color;
use ratatui::widgets::BorderType;
use serde::{Deserialize, Serialize};

use crate::config::config_dir;

pub fn hex_to_color(hex: &str) -> Color {
    let h = hex.trim_start_matches('#');
    if h.len() != 6 || !h.is_ascii() { return Color::Reset; }
    let r = u8::from_str_radix(&h[0..2], 16).unwrap_or(0);
    let g = u8::from_str_radix(&h[2..4], 16).unwrap_or(0);
    let b = u8::from_str_radix(&h[4..6], 16).unwrap_or(0);
    Color::Rgb(r, g, b)
}

fn default_border_style() -> String { "rounded".to_owned() }

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeConfig {
    pub name: String,
    // Backgrounds
    pub bg_primary: String, pub bg_secondary: String, pub bg_popup: String,
    // Borders
    pub border_normal: String, pub border_focused: String,
    // Text
    pub text_primary: String, pub text_muted: String, pub text_accent: String,
    /// Days outside min/max.
    pub text_disabled: String,
    // Range highlights
    pub endpoint_bg: String, pub endpoint_fg: String,
    pub range_bg: String,    pub range_fg: String,
    pub cursor_bg: String,   pub cursor_fg: String,
    // Special
    pub today_fg: String, pub weekend_fg: String, pub error: String,
    /// Border style: "rounded" | "double" | "thick" | "plain"
    #[serde(default = "default_border_style")]
    pub border_style: String,
}

impl ThemeConfig {
    // ── Color accessors ───────────────────────────────────────────────────────
    pub fn bg(&self)            -> Color { hex_to_color(&self.bg_primary) }
    pub fn bg2(&self)           -> Color { hex_to_color(&self.bg_secondary) }
    pub fn popup_bg(&self)      -> Color { hex_to_color(&self.bg_popup) }
    pub fn border(&self)        -> Color { hex_to_color(&self.border_normal) }
    pub fn border_active(&self) -> Color { hex_to_color(&self.border_focused) }
    pub fn fg(&self)            -> Color { hex_to_color(&self.text_primary) }
    pub fn fg_dim(&self)        -> Color { hex_to_color(&self.text_muted) }
    pub fn accent(&self)        -> Color { hex_to_color(&self.text_accent) }
    pub fn disabled(&self)      -> Color { hex_to_color(&self.text_disabled) }
    pub fn today(&self)         -> Color { hex_to_color(&self.today_fg) }
    pub fn weekend_color(&self) -> Color { hex_to_color(&self.weekend_fg) }
    pub fn error(&self)         -> Color { hex_to_color(&self.error) }

    pub fn endpoint_highlight(&self) -> (Color, Color) {
        (hex_to_color(&self.endpoint_bg), hex_to_color(&self.endpoint_fg))
    }
    pub fn range_highlight(&self)    -> (Color, Color) {
        (hex_to_color(&self.range_bg), hex_to_color(&self.range_fg))
    }
    pub fn cursor_highlight(&self)   -> (Color, Color) {
        (hex_to_color(&self.cursor_bg), hex_to_color(&self.cursor_fg))
    }

    pub fn border_type(&self) -> BorderType {
        match self.border_style.as_str() {
            "double" => BorderType::Double,
            "thick"  => BorderType::Thick,
            "plain"  => BorderType::Plain,
            _        => BorderType::Rounded,
        }
    }

    // ── Persistence ───────────────────────────────────────────────────────────
    pub fn load() -> Result<Self> {
        let path = config_dir().join("theme.toml");
        if path.exists() {
            Ok(toml::from_str(&std::fs::read_to_string(&path)?)?)
        } else {
            let t = ThemeConfig::default();
            t.save()?;
            Ok(t)
        }
    }

    pub fn save(&self) -> Result<()> {
        let dir = config_dir();
        std::fs::create_dir_all(&dir)?;
        std::fs::write(dir.join("theme.toml"), toml::to_string_pretty(self)?)?;
        Ok(())
    }

    // ── Theme catalogue ───────────────────────────────────────────────────────
    pub fn all_themes() -> Vec<ThemeConfig> {
        vec![
            ThemeConfig::default(),    // Catppuccin Mocha
            ThemeConfig::nord(),
            ThemeConfig::gruvbox(),
            ThemeConfig::paper(),
        ]
    }

    // ── Built-in themes ───────────────────────────────────────────────────────

    pub fn nord() -> Self { Self {
        name: "nord".into(),
        bg_primary: "#2e3440".into(), bg_secondary: "#3b4252".into(), bg_popup: "#434c5e".into(),
        border_normal: "#4c566a".into(), border_focused: "#88c0d0".into(),
        text_primary: "#eceff4".into(), text_muted: "#616e88".into(), text_accent: "#88c0d0".into(),
        text_disabled: "#434c5e".into(),
        endpoint_bg: "#88c0d0".into(), endpoint_fg: "#2e3440".into(),
        range_bg: "#3b4252".into(),    range_fg: "#88c0d0".into(),
        cursor_bg: "#ebcb8b".into(),   cursor_fg: "#2e3440".into(),
        today_fg: "#a3be8c".into(), weekend_fg: "#bf616a".into(), error: "#bf616a".into(),
        border_style: "rounded".into(),
    }}

    pub fn gruvbox() -> Self { Self {
        name: "gruvbox".into(),
        bg_primary: "#282828".into(), bg_secondary: "#1d2021".into(), bg_popup: "#3c3836".into(),
        border_normal: "#504945".into(), border_focused: "#d79921".into(),
        text_primary: "#ebdbb2".into(), text_muted: "#7c6f64".into(), text_accent: "#d79921".into(),
        text_disabled: "#504945".into(),
        endpoint_bg: "#d79921".into(), endpoint_fg: "#282828".into(),
        range_bg: "#3c3836".into(),    range_fg: "#fabd2f".into(),
        cursor_bg: "#689d6a".into(),   cursor_fg: "#282828".into(),
        today_fg: "#b8bb26".into(), weekend_fg: "#fb4934".into(), error: "#fb4934".into(),
        border_style: "rounded".into(),
    }}

    /// Light theme for bright terminals, plain borders.
    pub fn paper() -> Self { Self {
        name: "paper".into(),
        bg_primary: "#fafafa".into(), bg_secondary: "#eeeeee".into(), bg_popup: "#ffffff".into(),
        border_normal: "#bdbdbd".into(), border_focused: "#1565c0".into(),
        text_primary: "#212121".into(), text_muted: "#757575".into(), text_accent: "#1565c0".into(),
        text_disabled: "#cfcfcf".into(),
        endpoint_bg: "#1565c0".into(), endpoint_fg: "#ffffff".into(),
        range_bg: "#bbdefb".into(),    range_fg: "#0d47a1".into(),
        cursor_bg: "#ffb300".into(),   cursor_fg: "#212121".into(),
        today_fg: "#2e7d32".into(), weekend_fg: "#c62828".into(), error: "#c62828".into(),
        border_style: "plain".into(),
    }}
}

impl Default for ThemeConfig {
    fn default() -> Self { Self {
        name: "catppuccin-mocha".into(),
        bg_primary: "#1e1e2e".into(), bg_secondary: "#181825".into(), bg_popup: "#313244".into(),
        border_normal: "#45475a".into(), border_focused: "#89b4fa".into(),
        text_primary: "#cdd6f4".into(), text_muted: "#6c7086".into(), text_accent: "#89b4fa".into(),
        text_disabled: "#45475a".into(),
        endpoint_bg: "#89b4fa".into(), endpoint_fg: "#1e1e2e".into(),
        range_bg: "#313244".into(),    range_fg: "#89b4fa".into(),
        cursor_bg: "#cba6f7".into(),   cursor_fg: "#1e1e2e".into(),
        today_fg: "#a6e3a1".into(), weekend_fg: "#f38ba8".into(), error: "#f38ba8".into(),
        border_style: "rounded".into(),
    }}
}
