//! Runtime error types.

use thiserror::Error;

use pewter_core::ClientError;

pub use crate::config::{ConfigError, ConfigResult};

/// Errors that can occur during runtime operations.
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Configuration could not be loaded or is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The chat client failed.
    #[error("Client error: {0}")]
    Client(#[from] ClientError),

    /// The client's event stream is already being consumed.
    #[error("Runtime is already listening")]
    AlreadyListening,
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
