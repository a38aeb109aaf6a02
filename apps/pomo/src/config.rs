//! Configuration for the pomodoro timer.

use crate::models::Mode;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub durations: DurationConfig,
    #[serde(default)]
    pub log: LogConfig,
}

impl Config {
    /// Load from the config file, falling back to defaults when it is missing
    /// or unreadable.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        let Ok(content) = std::fs::read_to_string(&path) else {
            return Self::default();
        };
        match Self::from_toml(&content) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring invalid config");
                Self::default()
            }
        }
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "pomo")
            .map(|d| d.config_dir().join("config.toml"))
    }

    pub fn data_dir() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "pomo").map(|d| d.data_dir().to_path_buf())
    }

    /// Where completed and abandoned intervals are recorded.
    pub fn session_log_path(&self) -> PathBuf {
        self.log
            .path
            .clone()
            .or_else(|| Self::data_dir().map(|d| d.join("sessions.csv")))
            .unwrap_or_else(|| "sessions.csv".into())
    }

    /// Diagnostics file for tracing output.
    pub fn diagnostics_path() -> PathBuf {
        Self::data_dir()
            .map(|d| d.join("pomo.log"))
            .unwrap_or_else(|| "pomo.log".into())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DurationConfig {
    #[serde(default = "default_focus_mins")]
    pub focus_mins: f64,
    #[serde(default = "default_short_break")]
    pub short_break_mins: f64,
    #[serde(default = "default_long_break")]
    pub long_break_mins: f64,
    #[serde(default = "default_long_break_every")]
    pub long_break_every: u32,
}

fn default_focus_mins() -> f64 { 25.0 }
fn default_short_break() -> f64 { 5.0 }
fn default_long_break() -> f64 { 15.0 }
fn default_long_break_every() -> u32 { 4 }

impl Default for DurationConfig {
    fn default() -> Self {
        Self {
            focus_mins: 25.0,
            short_break_mins: 5.0,
            long_break_mins: 15.0,
            long_break_every: 4,
        }
    }
}

impl DurationConfig {
    pub fn minutes(&self, mode: Mode) -> f64 {
        match mode {
            Mode::Focus => self.focus_mins,
            Mode::ShortBreak => self.short_break_mins,
            Mode::LongBreak => self.long_break_mins,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogConfig {
    /// Overrides the default session log location.
    #[serde(default)]
    pub path: Option<PathBuf>,
}
