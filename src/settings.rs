use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SheetError};

/// Environment variable naming an alternative settings file.
pub const SETTINGS_ENV: &str = "STOCKSHEET_SETTINGS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Sheet name for exported workbooks when the source had none.
    #[serde(default = "default_sheet_name")]
    pub sheet_name: String,
    /// Directory for exports without an explicit `--output`.
    #[serde(default)]
    pub export_dir: Option<String>,
    /// Overwrite a row's week with the suggested next week when a movement
    /// is logged on it.
    #[serde(default = "default_relabel_week")]
    pub relabel_week_on_movement: bool,
}

fn default_sheet_name() -> String {
    "Inventory".to_string()
}

fn default_relabel_week() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sheet_name: default_sheet_name(),
            export_dir: None,
            relabel_week_on_movement: default_relabel_week(),
        }
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("stocksheet")
}

pub fn settings_path() -> PathBuf {
    match std::env::var_os(SETTINGS_ENV) {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => config_dir().join("settings.json"),
    }
}

/// Read settings from `path`; a missing or malformed file yields defaults.
pub fn load_settings_from(path: &Path) -> Settings {
    if !path.exists() {
        return Settings::default();
    }
    let content = std::fs::read_to_string(path).unwrap_or_default();
    match serde_json::from_str(&content) {
        Ok(settings) => settings,
        Err(e) => {
            log::warn!("ignoring malformed settings at {}: {e}", path.display());
            Settings::default()
        }
    }
}

pub fn load_settings() -> Settings {
    load_settings_from(&settings_path())
}

pub fn save_settings_to(settings: &Settings, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| SheetError::Settings(e.to_string()))?;
    std::fs::write(path, format!("{json}\n"))?;
    Ok(())
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    save_settings_to(settings, &settings_path())
}

pub fn shellexpand_path(path: &str) -> String {
    if path.starts_with('~') {
        if let Some(home) = dirs::home_dir() {
            return path.replacen('~', &home.to_string_lossy(), 1);
        }
    }
    std::fs::canonicalize(path)
        .unwrap_or_else(|_| PathBuf::from(path))
        .to_string_lossy()
        .to_string()
}
