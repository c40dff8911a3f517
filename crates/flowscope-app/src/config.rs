//! Application settings
//!
//! Loaded from `flowscope.toml` (an explicit path, the working directory,
//! or the user config dir), then overridden by environment variables.
//! The capture start and tick length drive tick bucketing and are otherwise
//! opaque configuration.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use flowscope_core::prelude::*;
use flowscope_core::TickConfig;

/// Settings file name looked up in the search path.
const SETTINGS_FILE: &str = "flowscope.toml";

/// Complete application settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub capture: CaptureSettings,
}

/// Backend connection settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Base URL of the retrieval backend.
    pub base_url: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
        }
    }
}

/// Capture timing settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CaptureSettings {
    /// Capture start as an RFC 3339 timestamp.
    pub start_date: Option<String>,
    /// Capture start as epoch seconds. Wins over `start_date`.
    pub start_ts: Option<i64>,
    /// Tick length in seconds.
    pub tick_length: i64,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            start_date: None,
            start_ts: None,
            tick_length: 60,
        }
    }
}

impl Settings {
    /// Load settings.
    ///
    /// An explicit path must exist; otherwise `flowscope.toml` is looked up
    /// in the working directory, then the user config dir, falling back to
    /// defaults. Environment variables (`FLOWSCOPE_SERVER`,
    /// `FLOWSCOPE_START_DATE`, `FLOWSCOPE_TICK_LENGTH`) override the file.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut settings = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::ConfigNotFound {
                        path: path.to_path_buf(),
                    });
                }
                Self::from_file(path)?
            }
            None => match Self::search_path().into_iter().find(|p| p.exists()) {
                Some(path) => Self::from_file(&path)?,
                None => Self::default(),
            },
        };
        settings.apply_env();
        Ok(settings)
    }

    fn search_path() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(SETTINGS_FILE)];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("flowscope").join(SETTINGS_FILE));
        }
        paths
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::config(format!("{}: {e}", path.display())))
    }

    fn apply_env(&mut self) {
        if let Ok(base_url) = std::env::var("FLOWSCOPE_SERVER") {
            if !base_url.is_empty() {
                self.server.base_url = base_url;
            }
        }
        if let Ok(start_date) = std::env::var("FLOWSCOPE_START_DATE") {
            if !start_date.is_empty() {
                self.capture.start_date = Some(start_date);
            }
        }
        if let Ok(tick_length) = std::env::var("FLOWSCOPE_TICK_LENGTH") {
            if let Ok(value) = tick_length.parse() {
                self.capture.tick_length = value;
            }
        }
    }

    /// Resolve the tick configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when `start_date` is present but not a
    /// valid RFC 3339 timestamp.
    pub fn tick_config(&self) -> Result<TickConfig> {
        let start_ts_s = match (self.capture.start_ts, &self.capture.start_date) {
            (Some(ts), _) => ts,
            (None, Some(date)) => chrono::DateTime::parse_from_rfc3339(date)
                .map_err(|e| Error::config(format!("invalid capture.start_date {date:?}: {e}")))?
                .timestamp(),
            (None, None) => 0,
        };
        Ok(TickConfig::new(start_ts_s, self.capture.tick_length))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
