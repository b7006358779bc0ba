//! Configuration schema definitions.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use pewter_framework::DEFAULT_QUEUE_CAPACITY;

use super::error::{ConfigError, ConfigResult};

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PewterConfig {
    /// Bot behavior and credentials.
    #[serde(default)]
    pub bot: BotSettings,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl PewterConfig {
    /// Returns the bot token or a missing-field error.
    pub fn bot_token(&self) -> ConfigResult<&str> {
        self.bot
            .bot_token
            .as_deref()
            .ok_or_else(|| ConfigError::missing_field("bot.bot_token"))
    }

    /// Returns the app-level token or a missing-field error.
    pub fn app_token(&self) -> ConfigResult<&str> {
        self.bot
            .app_token
            .as_deref()
            .ok_or_else(|| ConfigError::missing_field("bot.app_token"))
    }
}

// =============================================================================
// Bot Settings
// =============================================================================

/// Bot behavior and credentials.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BotSettings {
    /// Bot user token, `xoxb-...`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot_token: Option<String>,

    /// App-level token, `xapp-...`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_token: Option<String>,

    /// Prefix prepended to every command pattern, e.g. `!`.
    #[serde(default)]
    pub command_prefix: String,

    /// Only route messages that mention the bot or arrive by direct message.
    #[serde(default)]
    pub reply_only: bool,

    /// Capacity of each channel notification queue.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// Wait for in-flight handlers when the listener stops.
    #[serde(default)]
    pub drain_on_shutdown: bool,

    /// Upper bound on the shutdown drain, in milliseconds.
    #[serde(default = "default_drain_timeout_ms")]
    pub drain_timeout_ms: u64,

    /// Log every raw inbound event as JSON.
    #[serde(default)]
    pub debug_events: bool,
}

impl Default for BotSettings {
    fn default() -> Self {
        Self {
            bot_token: None,
            app_token: None,
            command_prefix: String::new(),
            reply_only: false,
            queue_capacity: default_queue_capacity(),
            drain_on_shutdown: false,
            drain_timeout_ms: default_drain_timeout_ms(),
            debug_events: false,
        }
    }
}

impl BotSettings {
    /// The drain timeout as a [`Duration`].
    pub fn drain_timeout(&self) -> Duration {
        Duration::from_millis(self.drain_timeout_ms)
    }
}

fn default_queue_capacity() -> usize {
    DEFAULT_QUEUE_CAPACITY
}

fn default_drain_timeout_ms() -> u64 {
    5000
}

// =============================================================================
// Logging
// =============================================================================

/// Log verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Returns the lowercase level name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// Converts to a `tracing` level.
    pub fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            other => Err(ConfigError::validation(format!("Invalid log level: {other}"))),
        }
    }
}

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Full,
    Pretty,
    /// Requires the `json-log` feature; falls back to `Full` without it.
    Json,
}

/// Log destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    #[default]
    Stdout,
    Stderr,
    File,
}

/// Which span lifecycle events are logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SpanEventConfig {
    #[serde(default)]
    pub new: bool,
    #[serde(default)]
    pub enter: bool,
    #[serde(default)]
    pub exit: bool,
    #[serde(default)]
    pub close: bool,
}

/// Logging settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Base level; `RUST_LOG` takes precedence when set.
    #[serde(default)]
    pub level: LogLevel,

    #[serde(default)]
    pub format: LogFormat,

    #[serde(default)]
    pub output: LogOutput,

    /// Target file for `output = "file"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<PathBuf>,

    /// Per-module levels, e.g. `pewter_framework = "trace"`.
    #[serde(default)]
    pub filters: HashMap<String, LogLevel>,

    #[serde(default)]
    pub thread_ids: bool,

    /// Include file names and line numbers.
    #[serde(default)]
    pub file_location: bool,

    #[serde(default)]
    pub span_events: SpanEventConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PewterConfig::default();

        assert_eq!(config.bot.queue_capacity, 10);
        assert_eq!(config.bot.drain_timeout(), Duration::from_secs(5));
        assert!(!config.bot.reply_only);
        assert!(config.bot.command_prefix.is_empty());
        assert_eq!(config.logging.level, LogLevel::Info);
    }

    #[test]
    fn test_missing_tokens() {
        let config = PewterConfig::default();

        assert!(matches!(
            config.bot_token(),
            Err(ConfigError::MissingField { field }) if field == "bot.bot_token"
        ));
        assert!(config.app_token().is_err());
    }

    #[test]
    fn test_log_level_parse() {
        assert_eq!("WARNING".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!("trace".parse::<LogLevel>().unwrap(), LogLevel::Trace);
        assert!("loud".parse::<LogLevel>().is_err());
    }
}
