//! Pewter Runtime - orchestration layer for the Pewter command router.
//!
//! This crate provides:
//! - The receive loop and bot builder (`BotRuntime`)
//! - Layered configuration (`config`)
//! - Logging configuration (`logging`)
//!
//! ```ignore
//! use pewter_runtime::BotRuntime;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut bot = BotRuntime::builder(MyClient::connect().await?).build()?;
//!     bot.command("ping", ping)?;
//!
//!     // Run until Ctrl+C
//!     bot.run().await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod runtime;

// Re-exports
pub use config::{
    BotSettings, ConfigError, ConfigLoader, ConfigResult, LoggingConfig, PewterConfig,
};
pub use error::{RuntimeError, RuntimeResult};
pub use logging::init_from_config;
pub use runtime::{BotRuntime, RuntimeBuilder};

// Re-export for callers driving `listen` directly
pub use tokio_util::sync::CancellationToken;

// Re-export tracing for use by other crates
pub use tracing;
pub use tracing_subscriber;

/// Prelude module for convenient imports.
///
/// This provides all the commonly used logging macros:
/// - `trace!`, `debug!`, `info!`, `warn!`, `error!`
/// - `span`, `event`
/// - `instrument` attribute
/// - `Level` for span creation
pub mod prelude {
    pub use tracing::{Level, debug, error, info, instrument, span, trace, warn};
}
