//! Configuration management for the human-typer daemon.
//!
//! Handles loading, saving, and providing defaults for the daemon configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::settings::TypingSettings;

/// Main configuration struct for the daemon.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    /// Default typing settings; request settings are merged on top.
    pub typing: TypingSettings,
    pub session: SessionConfig,
    pub injection: InjectionConfig,
    pub logging: LoggingConfig,
}

/// Address of the local control surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Engine timing that is not part of the live settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Seconds to wait before typing starts and again after a resume.
    pub countdown_secs: u64,
    /// Check the foreground window every N characters.
    pub focus_check_every: usize,
    /// Suppress focus checks for this long after a settings update.
    pub focus_grace_ms: u64,
    /// Upper bound on how long a paused engine waits before re-checking signals.
    pub resume_poll_ms: u64,
    /// Pause the session when the foreground window changes.
    pub focus_tracking: bool,
}

/// Configuration for keystroke injection behavior.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InjectionConfig {
    /// Log keystrokes instead of sending them to the focused window.
    pub dry_run: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: LogLevel,
}

/// Log verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Convert to a tracing filter directive string for the daemon crate.
    pub fn as_directive(&self) -> &'static str {
        match self {
            LogLevel::Error => "human_typer_daemon=error",
            LogLevel::Warn => "human_typer_daemon=warn",
            LogLevel::Info => "human_typer_daemon=info",
            LogLevel::Debug => "human_typer_daemon=debug",
            LogLevel::Trace => "human_typer_daemon=trace",
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: human_typer_proto::DEFAULT_PORT,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            countdown_secs: 3,
            focus_check_every: 10,
            focus_grace_ms: 2000,
            resume_poll_ms: 100,
            focus_tracking: true,
        }
    }
}

impl SessionConfig {
    pub fn countdown(&self) -> Duration {
        Duration::from_secs(self.countdown_secs)
    }

    pub fn focus_grace(&self) -> Duration {
        Duration::from_millis(self.focus_grace_ms)
    }

    pub fn resume_poll(&self) -> Duration {
        Duration::from_millis(self.resume_poll_ms.max(1))
    }
}

impl ServerConfig {
    /// `host:port` string suitable for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Config {
    /// Returns the default config directory path.
    /// `~/.config/human-typer/` (or `$XDG_CONFIG_HOME/human-typer/`)
    pub fn config_dir() -> Result<PathBuf> {
        human_typer_common::dirs::config_dir()
    }

    /// Returns the default config file path.
    /// `~/.config/human-typer/config.toml`
    pub fn config_path() -> Result<PathBuf> {
        Self::config_dir().map(|p| p.join("config.toml"))
    }

    /// Load configuration from the default path.
    /// Returns defaults if the file doesn't exist.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    /// Returns defaults if the file doesn't exist.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).context("Failed to parse config file as TOML")?;
        config
            .typing
            .validate()
            .context("Invalid [typing] section in config file")?;
        Ok(config)
    }

    /// Save configuration to the default path.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        self.save_to(&path)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
