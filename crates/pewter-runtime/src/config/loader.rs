//! Configuration loader using figment.
//!
//! # Configuration Priority (lowest to highest)
//!
//! 1. Built-in defaults
//! 2. Main config file (`pewter.toml` / `config.toml`)
//! 3. Profile-specific config file (`pewter.{profile}.toml`)
//! 4. Environment variables (`PEWTER_*`)
//! 5. Programmatic overrides
//!
//! Files are searched in the current directory, then in `pewter/` under the
//! user config directory. The first directory holding a main file wins.
//!
//! # Feature Flags
//!
//! - `toml-config` *(default)*: TOML files
//! - `yaml-config`: YAML files (`pewter.yaml`, `pewter.yml`, ...)
//!
//! # Environment Variable Mapping
//!
//! Environment variables use the `PEWTER_` prefix with `__` as separator:
//!
//! - `PEWTER_BOT__REPLY_ONLY=true` → `bot.reply_only = true`
//! - `PEWTER_BOT__BOT_TOKEN=xoxb-...` → `bot.bot_token = "xoxb-..."`
//! - `PEWTER_LOGGING__LEVEL=debug` → `logging.level = "debug"`
//!
//! `PEWTER_PROFILE` selects the profile and a non-empty `PEWTER_DEBUG`
//! turns on `bot.debug_events`.
//!
//! # Example
//!
//! ```rust,ignore
//! use pewter_runtime::config::ConfigLoader;
//!
//! let config = ConfigLoader::new()
//!     .profile("production")
//!     .load()?;
//! ```

use std::path::{Path, PathBuf};

use figment::Figment;
#[cfg(any(feature = "yaml-config", feature = "toml-config"))]
use figment::providers::Format;
#[cfg(feature = "toml-config")]
use figment::providers::Toml;
#[cfg(feature = "yaml-config")]
use figment::providers::Yaml;
use figment::providers::{Env, Serialized};
use tracing::{debug, info, trace};

use super::error::{ConfigError, ConfigResult};
use super::schema::PewterConfig;
use super::validation::validate_config;

/// Default prefix for environment variables.
pub const ENV_PREFIX: &str = "PEWTER_";

/// Selects the configuration profile.
pub const PROFILE_ENV: &str = "PEWTER_PROFILE";

/// Enables the raw event dump when set to a non-empty value.
pub const DEBUG_ENV: &str = "PEWTER_DEBUG";

/// Configuration profile for environment-specific settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Profile {
    /// Development profile (default).
    #[default]
    Development,
    /// Production profile.
    Production,
    /// Custom profile name.
    Custom(String),
}

impl Profile {
    /// Returns the profile name as a string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Custom(name) => name,
        }
    }

    /// Parses a profile name, accepting `prod` and `dev` shorthands.
    pub fn parse(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "development" | "dev" => Self::Development,
            other => Self::Custom(other.to_string()),
        }
    }

    /// Reads the profile from `PEWTER_PROFILE`, defaulting to development.
    pub fn from_env() -> Self {
        std::env::var(PROFILE_ENV)
            .map(|p| Self::parse(&p))
            .unwrap_or_default()
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Configuration loader with figment-based multi-source support.
pub struct ConfigLoader {
    /// Configuration profile.
    profile: Profile,
    /// Search paths for configuration files.
    search_paths: Vec<PathBuf>,
    /// Whether to load environment variables.
    load_env: bool,
    /// Environment variable prefix.
    env_prefix: String,
    /// Specific config file to load (overrides search).
    config_file: Option<PathBuf>,
    /// Programmatic overrides, merged last.
    overrides: Figment,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Creates a new configuration loader with defaults.
    pub fn new() -> Self {
        Self {
            profile: Profile::from_env(),
            search_paths: Vec::new(),
            load_env: true,
            env_prefix: ENV_PREFIX.to_string(),
            config_file: None,
            overrides: Figment::new(),
        }
    }

    /// Sets the configuration profile.
    pub fn profile(mut self, profile: impl AsRef<str>) -> Self {
        self.profile = Profile::parse(profile.as_ref());
        self
    }

    /// Adds a search path for configuration files.
    pub fn search_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.search_paths.push(path.as_ref().to_path_buf());
        self
    }

    /// Adds current directory to search paths.
    pub fn with_current_dir(self) -> Self {
        if let Ok(cwd) = std::env::current_dir() {
            self.search_path(cwd)
        } else {
            self
        }
    }

    /// Adds user config directory to search paths.
    pub fn with_user_config_dir(self) -> Self {
        if let Some(config_dir) = dirs::config_dir() {
            self.search_path(config_dir.join("pewter"))
        } else {
            self
        }
    }

    /// Sets a specific configuration file to load.
    pub fn file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Enables loading environment variables (default: true).
    pub fn with_env(mut self) -> Self {
        self.load_env = true;
        self
    }

    /// Disables loading environment variables.
    pub fn without_env(mut self) -> Self {
        self.load_env = false;
        self
    }

    /// Changes the environment variable prefix.
    pub fn env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Merges a full configuration over everything else.
    pub fn merge(mut self, config: PewterConfig) -> Self {
        self.overrides = self.overrides.merge(Serialized::defaults(config));
        self
    }

    /// Sets a single value by dotted key, e.g. `("bot.reply_only", true)`.
    pub fn set<T: serde::Serialize>(mut self, key: &str, value: T) -> Self {
        self.overrides = self.overrides.merge(Serialized::default(key, value));
        self
    }

    /// Loads, validates and returns the configuration.
    pub fn load(self) -> ConfigResult<PewterConfig> {
        let profile = self.profile.clone();
        let debug_from_env = self.load_env && debug_flag_set();
        let figment = self.build_figment()?;

        let mut config: PewterConfig = figment.extract()?;
        if debug_from_env {
            config.bot.debug_events = true;
        }

        validate_config(&config)?;

        debug!(
            profile = %profile,
            logging_level = %config.logging.level,
            reply_only = config.bot.reply_only,
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    /// Builds the figment instance with all sources.
    fn build_figment(self) -> ConfigResult<Figment> {
        let mut figment = Figment::from(Serialized::defaults(PewterConfig::default()));

        if let Some(path) = &self.config_file {
            if !path.exists() {
                return Err(ConfigError::FileNotFound(path.clone()));
            }
            info!(path = %path.display(), "Loading configuration file");
            figment = Self::merge_config_file(figment, path)?;
        } else {
            figment = self.load_config_files(figment);
        }

        if self.load_env {
            trace!(prefix = %self.env_prefix, "Loading environment variables");
            figment = figment.merge(Env::prefixed(&self.env_prefix).split("__"));
        }

        Ok(figment.merge(self.overrides))
    }

    /// Merges a single config file into the figment, dispatching on file extension.
    fn merge_config_file(figment: Figment, path: &Path) -> ConfigResult<Figment> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        match ext {
            #[cfg(feature = "toml-config")]
            "toml" => Ok(figment.merge(Toml::file(path))),
            #[cfg(feature = "yaml-config")]
            "yaml" | "yml" => Ok(figment.merge(Yaml::file(path))),
            _ => Err(ConfigError::ParseError(format!(
                "Unsupported or disabled configuration file format: .{ext}"
            ))),
        }
    }

    /// Resolves the effective list of search paths.
    fn resolve_search_paths(&self) -> Vec<PathBuf> {
        if self.search_paths.is_empty() {
            let mut paths = Vec::new();
            if let Ok(cwd) = std::env::current_dir() {
                paths.push(cwd);
            }
            if let Some(config_dir) = dirs::config_dir() {
                paths.push(config_dir.join("pewter"));
            }
            paths
        } else {
            self.search_paths.clone()
        }
    }

    /// Searches `search_paths × base_names` for a main file, then merges its
    /// profile-specific sibling on top.
    #[cfg(any(feature = "toml-config", feature = "yaml-config"))]
    fn load_format_files<F>(
        &self,
        mut figment: Figment,
        search_paths: &[PathBuf],
        base_names: &[&str],
        merge_fn: F,
    ) -> (Figment, bool)
    where
        F: Fn(Figment, &Path) -> Figment,
    {
        for search_path in search_paths {
            for base_name in base_names {
                let base_path = search_path.join(base_name);
                if !base_path.exists() {
                    continue;
                }

                info!(path = %base_path.display(), "Loading configuration file");
                figment = merge_fn(figment, &base_path);

                if let Some((stem, ext)) = base_name.rsplit_once('.') {
                    let profile_path =
                        search_path.join(format!("{}.{}.{}", stem, self.profile.as_str(), ext));
                    if profile_path.exists() {
                        debug!(path = %profile_path.display(), "Loading profile-specific config");
                        figment = merge_fn(figment, &profile_path);
                    }
                }
                return (figment, true);
            }
        }
        (figment, false)
    }

    /// Searches for and loads configuration files from search paths.
    fn load_config_files(&self, figment: Figment) -> Figment {
        let search_paths = self.resolve_search_paths();
        #[allow(unused_mut)]
        let mut figment = figment;
        #[allow(unused_mut)]
        let mut found = false;

        #[cfg(feature = "toml-config")]
        {
            let (f, ok) = self.load_format_files(
                figment,
                &search_paths,
                &["pewter.toml", "config.toml"],
                |fig, path| fig.merge(Toml::file(path)),
            );
            figment = f;
            found |= ok;
        }

        #[cfg(feature = "yaml-config")]
        {
            let (f, ok) = self.load_format_files(
                figment,
                &search_paths,
                &["pewter.yaml", "pewter.yml", "config.yaml", "config.yml"],
                |fig, path| fig.merge(Yaml::file(path)),
            );
            figment = f;
            found |= ok;
        }

        if !found {
            debug!(paths = ?search_paths, "No configuration file found, using defaults");
        }
        figment
    }
}

fn debug_flag_set() -> bool {
    std::env::var_os(DEBUG_ENV).is_some_and(|v| !v.is_empty())
}

/// Loads configuration from the default locations.
pub fn load_config() -> ConfigResult<PewterConfig> {
    ConfigLoader::new().load()
}

/// Loads configuration from a specific file, plus environment variables.
pub fn load_config_from_file<P: AsRef<Path>>(path: P) -> ConfigResult<PewterConfig> {
    ConfigLoader::new().file(path).load()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::config::LogLevel;

    fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    fn empty_dir() -> tempfile::TempDir {
        tempfile::tempdir().unwrap()
    }

    #[test]
    fn test_default_config() {
        let dir = empty_dir();
        let config = ConfigLoader::new()
            .search_path(dir.path())
            .without_env()
            .load()
            .unwrap();

        assert_eq!(config, PewterConfig::default());
    }

    #[test]
    fn test_profile_parse() {
        assert_eq!(Profile::parse("prod"), Profile::Production);
        assert_eq!(Profile::parse("DEV"), Profile::Development);
        assert_eq!(Profile::parse("staging").as_str(), "staging");
    }

    #[cfg(feature = "toml-config")]
    #[test]
    fn test_file_then_profile() {
        let dir = empty_dir();
        write_file(
            dir.path(),
            "pewter.toml",
            "[bot]\ncommand_prefix = \"!\"\nqueue_capacity = 20\n",
        );
        write_file(
            dir.path(),
            "pewter.staging.toml",
            "[bot]\nqueue_capacity = 30\n",
        );

        let config = ConfigLoader::new()
            .search_path(dir.path())
            .profile("staging")
            .without_env()
            .load()
            .unwrap();

        assert_eq!(config.bot.command_prefix, "!");
        assert_eq!(config.bot.queue_capacity, 30);
    }

    #[cfg(feature = "toml-config")]
    #[test]
    fn test_explicit_file() {
        let dir = empty_dir();
        let path = write_file(
            dir.path(),
            "bot.toml",
            "[bot]\nreply_only = true\n\n[logging]\nlevel = \"debug\"\n",
        );

        let config = ConfigLoader::new().file(&path).without_env().load().unwrap();

        assert!(config.bot.reply_only);
        assert_eq!(config.logging.level, LogLevel::Debug);
    }

    #[cfg(feature = "toml-config")]
    #[test]
    fn test_file_logging_section() {
        let dir = empty_dir();
        let path = write_file(
            dir.path(),
            "bot.toml",
            "[logging]\noutput = \"file\"\nfile_path = \"bot.log\"\nmax_files = 0\n",
        );

        let config = ConfigLoader::new().file(&path).without_env().load().unwrap();

        assert_eq!(config.logging.output, crate::config::LogOutput::File);
        assert_eq!(config.logging.file_path.as_deref(), Some(Path::new("bot.log")));
    }

    #[test]
    fn test_missing_file() {
        let result = ConfigLoader::new()
            .file("/definitely/not/here/pewter.toml")
            .without_env()
            .load();

        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_env_overrides() {
        // SAFETY: the variable names are unique to this test
        unsafe {
            std::env::set_var("PEWTER_LOADER_TEST_BOT__REPLY_ONLY", "true");
            std::env::set_var("PEWTER_LOADER_TEST_BOT__QUEUE_CAPACITY", "3");
        }

        let dir = empty_dir();
        let config = ConfigLoader::new()
            .search_path(dir.path())
            .env_prefix("PEWTER_LOADER_TEST_")
            .load();

        unsafe {
            std::env::remove_var("PEWTER_LOADER_TEST_BOT__REPLY_ONLY");
            std::env::remove_var("PEWTER_LOADER_TEST_BOT__QUEUE_CAPACITY");
        }

        let config = config.unwrap();
        assert!(config.bot.reply_only);
        assert_eq!(config.bot.queue_capacity, 3);
    }

    #[test]
    fn test_overrides_win() {
        let dir = empty_dir();
        let config = ConfigLoader::new()
            .search_path(dir.path())
            .without_env()
            .set("bot.command_prefix", "?")
            .set("bot.drain_on_shutdown", true)
            .load()
            .unwrap();

        assert_eq!(config.bot.command_prefix, "?");
        assert!(config.bot.drain_on_shutdown);
    }

    #[test]
    fn test_invalid_values_fail_validation() {
        let dir = empty_dir();
        let result = ConfigLoader::new()
            .search_path(dir.path())
            .without_env()
            .set("bot.bot_token", "not-a-token")
            .load();

        assert!(matches!(result, Err(ConfigError::InvalidToken { .. })));
    }
}
