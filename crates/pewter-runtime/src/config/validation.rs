//! Configuration validation utilities.

use super::error::{ConfigError, ConfigResult};
use super::schema::{BotSettings, LogOutput, LoggingConfig, PewterConfig};

/// Required prefix of a bot user token.
pub const BOT_TOKEN_PREFIX: &str = "xoxb-";

/// Required prefix of an app-level token.
pub const APP_TOKEN_PREFIX: &str = "xapp-";

/// Validates the entire configuration.
pub fn validate_config(config: &PewterConfig) -> ConfigResult<()> {
    validate_bot_settings(&config.bot)?;
    validate_logging_config(&config.logging)?;
    Ok(())
}

/// Validates bot settings.
fn validate_bot_settings(bot: &BotSettings) -> ConfigResult<()> {
    if let Some(token) = &bot.bot_token {
        validate_token(token, "bot.bot_token", BOT_TOKEN_PREFIX)?;
    }

    if let Some(token) = &bot.app_token {
        validate_token(token, "bot.app_token", APP_TOKEN_PREFIX)?;
    }

    if bot.queue_capacity == 0 {
        return Err(ConfigError::validation(
            "Queue capacity must be greater than 0",
        ));
    }

    if bot.drain_on_shutdown && bot.drain_timeout_ms == 0 {
        return Err(ConfigError::validation(
            "Drain timeout must be greater than 0 when draining on shutdown",
        ));
    }

    Ok(())
}

/// Validates a credential's prefix.
pub fn validate_token(token: &str, field: &str, prefix: &'static str) -> ConfigResult<()> {
    if token.is_empty() {
        return Err(ConfigError::missing_field(field));
    }

    if !token.starts_with(prefix) {
        return Err(ConfigError::invalid_token(field, prefix));
    }

    Ok(())
}

/// Validates logging settings.
fn validate_logging_config(logging: &LoggingConfig) -> ConfigResult<()> {
    if logging.output == LogOutput::File && logging.file_path.is_none() {
        return Err(ConfigError::missing_field("logging.file_path"));
    }

    for module in logging.filters.keys() {
        if module.is_empty() || module.contains(char::is_whitespace) {
            return Err(ConfigError::validation(format!(
                "Invalid logging filter target: '{module}'"
            )));
        }
    }

    Ok(())
}
