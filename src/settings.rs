//! User settings
//!
//! Loaded from `<config dir>/pageturn/config.yaml`. A missing file yields
//! defaults; a malformed one logs a warning and falls back to defaults so a
//! bad edit never keeps the viewer from starting.

use std::fs;
use std::path::{Path, PathBuf};

use log::warn;
use serde::{Deserialize, Serialize};
use simplelog::LevelFilter;

use crate::render::DEFAULT_SCALE;

const SETTINGS_FILENAME: &str = "config.yaml";
const APP_NAME: &str = "pageturn";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Zoom factor for page rasterization
    #[serde(default = "default_scale")]
    pub scale: f32,

    /// Start in dark theme
    #[serde(default)]
    pub dark: bool,

    /// Log verbosity: off, error, warn, info, debug, trace
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_scale() -> f32 {
    DEFAULT_SCALE
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            scale: default_scale(),
            dark: false,
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    /// Load from the user config dir, falling back to defaults.
    #[must_use]
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Self::default(),
        }
    }

    /// Load from an explicit path, falling back to defaults.
    #[must_use]
    pub fn load_from(path: &Path) -> Self {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("could not read {}: {e}", path.display());
                return Self::default();
            }
        };

        match serde_yaml::from_str::<Self>(&raw) {
            Ok(mut settings) => {
                if !settings.scale.is_finite() || settings.scale <= 0.0 {
                    warn!("ignoring invalid scale {} in settings", settings.scale);
                    settings.scale = default_scale();
                }
                settings
            }
            Err(e) => {
                warn!("malformed settings file {}: {e}", path.display());
                Self::default()
            }
        }
    }

    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        Some(dirs::config_dir()?.join(APP_NAME).join(SETTINGS_FILENAME))
    }

    /// Translate the configured log level for the logger backend.
    #[must_use]
    pub fn level_filter(&self) -> LevelFilter {
        match self.log_level.to_ascii_lowercase().as_str() {
            "off" => LevelFilter::Off,
            "error" => LevelFilter::Error,
            "warn" => LevelFilter::Warn,
            "debug" => LevelFilter::Debug,
            "trace" => LevelFilter::Trace,
            _ => LevelFilter::Info,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_when_file_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("nope.yaml"));
        assert_eq!(settings.scale, DEFAULT_SCALE);
        assert!(!settings.dark);
        assert_eq!(settings.level_filter(), LevelFilter::Info);
    }

    #[test]
    fn loads_partial_file_with_defaults_for_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILENAME);
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "dark: true").unwrap();

        let settings = Settings::load_from(&path);
        assert!(settings.dark);
        assert_eq!(settings.scale, DEFAULT_SCALE);
    }

    #[test]
    fn malformed_yaml_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILENAME);
        fs::write(&path, "scale: [not a number").unwrap();

        let settings = Settings::load_from(&path);
        assert_eq!(settings.scale, DEFAULT_SCALE);
    }

    #[test]
    fn nonsense_scale_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILENAME);
        fs::write(&path, "scale: -2.0\nlog_level: debug\n").unwrap();

        let settings = Settings::load_from(&path);
        assert_eq!(settings.scale, DEFAULT_SCALE);
        assert_eq!(settings.level_filter(), LevelFilter::Debug);
    }
}
