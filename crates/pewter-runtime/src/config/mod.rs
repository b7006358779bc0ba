//! Configuration module for the Pewter runtime.
//!
//! Layered loading (defaults, files, environment, overrides) and validation
//! for bot settings and logging.

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, Profile, load_config, load_config_from_file};
pub use schema::{
    BotSettings, LogFormat, LogLevel, LogOutput, LoggingConfig, PewterConfig, SpanEventConfig,
};
pub use validation::validate_config;
