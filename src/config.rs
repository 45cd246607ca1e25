use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::picker::PickerOptions;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("Failed to parse {path}: {source}")]
    Parse { path: PathBuf, source: toml::de::Error },
}

#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub picker: PickerOptions,
}

impl AppConfig {
    /// Loads `config.toml` from the user config dir; a missing file yields
    /// the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_dir().join("config.toml"))
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(AppConfig::default());
        }
        let text = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_owned(), source })?;
        toml::from_str(&text)
            .map_err(|source| ConfigError::Parse { path: path.to_owned(), source })
    }
}

pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("rangepick")
}

pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("rangepick")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_full_picker_section() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [picker]
            date_format = "%d.%m.%Y"
            locale      = "de-DE"
            min_date    = "2024-01-01"
            max_date    = "2025-12-31"
            start_date  = "2024-03-05"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.picker.date_format, "%d.%m.%Y");
        assert_eq!(cfg.picker.locale, "de-DE");
        assert_eq!(cfg.picker.min_date, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(cfg.picker.start_date, NaiveDate::from_ymd_opt(2024, 3, 5));
        assert_eq!(cfg.picker.end_date, None);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let cfg: AppConfig = toml::from_str("").unwrap();
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.picker.date_format, "%Y-%m-%d");
        assert_eq!(cfg.picker.locale, "default");
    }

    #[test]
    fn test_bad_date_is_a_parse_error() {
        assert!(toml::from_str::<AppConfig>("[picker]\nmin_date = \"yesterday\"").is_err());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let path = std::env::temp_dir().join("rangepick-does-not-exist.toml");
        assert_eq!(AppConfig::load_from(&path).unwrap(), AppConfig::default());
    }
}
