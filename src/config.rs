//! Runtime configuration
//!
//! Loaded from a TOML file. Every field has a default, so an empty or missing
//! file is a valid configuration:
//!
//! ```toml
//! poll_interval_ms = 16
//! quit_key = "ctrl+q"
//! mouse_capture = true
//! bell = false
//! title = "widgets"
//! log_filter = "spark_widgets=debug"
//! log_file = "widgets.log"
//!
//! [colors]
//! foreground = 0   # ANSI palette index
//! background = 7
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::Result;
use crate::input::Key;
use crate::types::{ColorPair, Rgba};

/// Runtime configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// How long one tick waits for input, in milliseconds
    pub poll_interval_ms: u64,
    /// Key that stops the run loop (`ctrl+q`, `esc`, `f10`, `q`)
    pub quit_key: String,
    /// Report mouse events from the terminal
    pub mouse_capture: bool,
    /// Default colors for every widget
    pub colors: ColorConfig,
    /// Ring the terminal bell on a widget hit and on a line merge
    pub bell: bool,
    /// Terminal window title
    pub title: Option<String>,
    /// tracing-subscriber filter directive
    pub log_filter: String,
    /// Log destination; logging is off without one
    pub log_file: Option<PathBuf>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 16,
            quit_key: "ctrl+q".to_string(),
            mouse_capture: true,
            colors: ColorConfig::default(),
            bell: false,
            title: None,
            log_filter: "spark_widgets=info".to_string(),
            log_file: None,
        }
    }
}

/// Default widget colors as ANSI palette indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    pub foreground: u8,
    pub background: u8,
}

impl Default for ColorConfig {
    /// Black on white.
    fn default() -> Self {
        Self {
            foreground: 0,
            background: 7,
        }
    }
}

impl RuntimeConfig {
    /// Load config from a TOML file, falling back to defaults if it is missing
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        match Self::read(path)? {
            Some(config) => {
                tracing::info!("loaded config from {}", path.display());
                Ok(config)
            }
            None => {
                tracing::warn!("config not found at {}, using defaults", path.display());
                Ok(Self::default())
            }
        }
    }

    /// Read config from a TOML file without logging; None if it is missing.
    ///
    /// For callers that install their subscriber from the config itself.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Option<Self>> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content).map(Some)
    }

    /// Parse config from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: RuntimeConfig = toml::from_str(content)?;
        // Surface a bad quit key at load time rather than at startup.
        config.quit_key()?;
        Ok(config)
    }

    pub fn quit_key(&self) -> Result<Key> {
        self.quit_key.parse()
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn default_colors(&self) -> ColorPair {
        ColorPair::new(
            Rgba::ansi(self.colors.foreground),
            Rgba::ansi(self.colors.background),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config = RuntimeConfig::from_toml("").unwrap();
        assert_eq!(config, RuntimeConfig::default());
        assert_eq!(config.quit_key().unwrap(), Key::Ctrl('q'));
        assert_eq!(config.poll_interval(), Duration::from_millis(16));
        assert_eq!(config.default_colors(), ColorPair::new(Rgba::BLACK, Rgba::WHITE));
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config = RuntimeConfig::from_toml(
            r#"
            quit_key = "esc"
            title = "demo"

            [colors]
            foreground = 1
            "#,
        )
        .unwrap();
        assert_eq!(config.quit_key().unwrap(), Key::Escape);
        assert_eq!(config.title.as_deref(), Some("demo"));
        assert_eq!(config.default_colors(), ColorPair::new(Rgba::RED, Rgba::WHITE));
        assert!(config.mouse_capture);
    }

    #[test]
    fn test_invalid_quit_key_rejected() {
        let err = RuntimeConfig::from_toml(r#"quit_key = "ctrl+""#).unwrap_err();
        assert!(matches!(err, Error::InvalidKey(_)));
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let err = RuntimeConfig::from_toml("poll_interval_ms = \"soon\"").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = RuntimeConfig::load("/nonexistent/spark-widgets.toml").unwrap();
        assert_eq!(config, RuntimeConfig::default());
        assert!(!config.bell);
    }

    #[test]
    fn test_read_reports_missing_file() {
        assert_eq!(RuntimeConfig::read("/nonexistent/spark-widgets.toml").unwrap(), None);
    }

    #[test]
    fn test_bell_flag() {
        assert!(RuntimeConfig::from_toml("bell = true").unwrap().bell);
    }
}
