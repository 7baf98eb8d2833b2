//! Configuration management for console-tee

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::alert::TerminalAlert;
use crate::capture::FailurePolicy;
use crate::console::{ConsoleStyle, Palette, TimeFormat};

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Directory dump files are written to (`~` is expanded; empty means the working directory)
    #[serde(default)]
    pub dump_dir: String,

    /// Keep captured output across stop/start cycles (default: true)
    #[serde(default = "default_continue_capture")]
    pub continue_capture: bool,

    /// Capture stderr as well as stdout (default: true)
    #[serde(default = "default_capture_stderr")]
    pub capture_stderr: bool,

    /// Emit color escape sequences on the console (default: true)
    #[serde(default = "default_use_colors")]
    pub use_colors: bool,

    /// What a tee does when one of its sinks fails: "best_effort" or "fail_fast"
    #[serde(default)]
    pub failure_policy: FailurePolicy,

    /// Wait for Enter after a fatal-error notice on an interactive terminal (default: true)
    #[serde(default = "default_wait_on_alert")]
    pub wait_on_alert: bool,

    /// Timestamp format for console messages
    #[serde(default)]
    pub time_format: TimeFormat,

    /// Colors for the four message categories
    #[serde(default)]
    pub colors: Palette,
}

fn default_continue_capture() -> bool {
    true
}

fn default_capture_stderr() -> bool {
    true
}

fn default_use_colors() -> bool {
    true
}

fn default_wait_on_alert() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dump_dir: String::new(),
            continue_capture: default_continue_capture(),
            capture_stderr: default_capture_stderr(),
            time_format: TimeFormat::default(),
            colors: Palette::default(),
            use_colors: default_use_colors(),
            failure_policy: FailurePolicy::default(),
            wait_on_alert: default_wait_on_alert(),
        }
    }
}

impl Config {
    /// Load configuration from the default file, or return default if not found
    pub fn load() -> Result<Self> {
        Self::load_from(&config_file_path())
    }

    /// Load configuration from `path`, or return default if not found
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path).context("Failed to read config file")?;
            let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
            if !config.time_format.is_valid() {
                tracing::warn!(
                    "Invalid time format pattern '{}', falling back to HH:mm:ss",
                    config.time_format.pattern()
                );
            }
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to the default file
    pub fn save(&self) -> Result<()> {
        std::fs::create_dir_all(config_dir()).context("Failed to create config directory")?;
        self.save_to(&config_file_path())
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content).context("Failed to write config file")?;
        Ok(())
    }

    /// Dump directory with `~` and environment variables expanded
    pub fn resolved_dump_dir(&self) -> PathBuf {
        match shellexpand::full(&self.dump_dir) {
            Ok(expanded) => PathBuf::from(expanded.as_ref()),
            Err(e) => {
                tracing::warn!("Could not expand dump path '{}': {}", self.dump_dir, e);
                PathBuf::from(&self.dump_dir)
            }
        }
    }

    /// Console style described by this configuration
    pub fn console_style(&self) -> ConsoleStyle {
        ConsoleStyle {
            palette: self.colors,
            time_format: self.time_format.clone(),
            colors: self.use_colors,
        }
    }

    /// Operator notice described by this configuration
    pub fn terminal_alert(&self) -> TerminalAlert {
        TerminalAlert {
            non_blocking: !self.wait_on_alert,
        }
    }
}

/// Get the base configuration directory (~/.console-tee)
/// Falls back to ./.console-tee if home directory cannot be determined
pub fn config_dir() -> PathBuf {
    try_config_dir().unwrap_or_else(|| {
        tracing::warn!("Could not determine home directory, using current directory for config");
        PathBuf::from(".console-tee")
    })
}

/// Try to get the base configuration directory, returning None if home dir is unavailable
pub fn try_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".console-tee"))
}

/// Get the path to the config file
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::ConsoleColor;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.continue_capture);
        assert!(config.capture_stderr);
        assert_eq!(config.time_format, TimeFormat::HourMinuteSecond);
        assert_eq!(config.failure_policy, FailurePolicy::BestEffort);
    }

    #[test]
    fn test_config_serialization() {
        let mut config = Config::default();
        config.time_format = TimeFormat::Custom("%H:%M".to_string());
        config.colors.warn = ConsoleColor::Purple;

        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let parsed: Config = toml::from_str(
            r#"
            dump_dir = "/var/log/app"
            time_format = "hour_minute_second12h"
            failure_policy = "fail_fast"

            [colors]
            error = "red"
            "#,
        )
        .unwrap();

        assert_eq!(parsed.dump_dir, "/var/log/app");
        assert_eq!(parsed.time_format, TimeFormat::HourMinuteSecond12h);
        assert_eq!(parsed.failure_policy, FailurePolicy::FailFast);
        assert_eq!(parsed.colors.error, ConsoleColor::Red);
        assert_eq!(parsed.colors.info, ConsoleColor::CyanBright);
        assert!(parsed.continue_capture);
        assert!(parsed.wait_on_alert);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        let mut config = Config::default();
        config.dump_dir = "dumps".to_string();
        config.capture_stderr = false;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_returns_default() {
        let temp_dir = TempDir::new().unwrap();
        let loaded = Config::load_from(&temp_dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn test_load_invalid_toml_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "continue_capture = \"maybe\"").unwrap();

        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_resolved_dump_dir_expands_home() {
        let config = Config {
            dump_dir: "~/dumps".to_string(),
            ..Config::default()
        };
        if let Some(home) = dirs::home_dir() {
            assert_eq!(config.resolved_dump_dir(), home.join("dumps"));
        }
    }

    #[test]
    fn test_console_style_from_config() {
        let config = Config {
            use_colors: false,
            ..Config::default()
        };
        let style = config.console_style();
        assert!(!style.colors);
        assert_eq!(style.palette, Palette::default());
    }

    #[test]
    fn test_terminal_alert_from_config() {
        assert!(!Config::default().terminal_alert().non_blocking);

        let parsed: Config = toml::from_str("wait_on_alert = false").unwrap();
        assert!(parsed.terminal_alert().non_blocking);
    }

    #[test]
    fn test_config_dir_does_not_panic() {
        let dir = config_dir();
        assert!(dir.ends_with(".console-tee"));
    }
}
