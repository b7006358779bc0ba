//! Unified error types for the Pewter core.
//!
//! Pattern errors surface at registration time, match errors surface to
//! handler code, and client errors come back from send operations.

use thiserror::Error;

// =============================================================================
// Pattern Errors
// =============================================================================

/// Errors raised while compiling a command pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    /// A placeholder declared a type tag that is not `string` or `integer`.
    #[error("invalid pattern '{pattern}': unknown placeholder type '{tag}'")]
    UnknownType {
        /// The full pattern text.
        pattern: String,
        /// The unrecognised type tag.
        tag: String,
    },

    /// A placeholder had an empty name (`<>` or `<:integer>`).
    #[error("invalid pattern '{pattern}': placeholder without a name")]
    EmptyName {
        /// The full pattern text.
        pattern: String,
    },

    /// A placeholder tag could not be parsed (for example `<a:b:c>`).
    #[error("invalid pattern '{pattern}': malformed placeholder '<{tag}>'")]
    MalformedPlaceholder {
        /// The full pattern text.
        pattern: String,
        /// The raw placeholder content.
        tag: String,
    },

    /// The same placeholder name appears more than once.
    #[error("invalid pattern '{pattern}': duplicate placeholder '{name}'")]
    DuplicatePlaceholder {
        /// The full pattern text.
        pattern: String,
        /// The repeated name.
        name: String,
    },

    /// The generated expression was rejected by the regex engine.
    #[error("invalid pattern '{pattern}': {reason}")]
    Regex {
        /// The full pattern text.
        pattern: String,
        /// Engine error message.
        reason: String,
    },
}

// =============================================================================
// Match Errors
// =============================================================================

/// Errors raised while matching input or reading captured parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    /// The input does not satisfy the pattern.
    ///
    /// This drives control flow during routing and is not a failure.
    #[error("request does not match pattern '{pattern}'")]
    NoMatch {
        /// The pattern text that was tried.
        pattern: String,
    },

    /// The requested parameter is not declared in the pattern.
    #[error("unknown parameter '{name}'")]
    UnknownParameter {
        /// The requested name.
        name: String,
    },

    /// No placeholder exists at the requested position.
    #[error("no parameter at position {position} (pattern has {count})")]
    PositionOutOfRange {
        /// The requested zero-based position.
        position: usize,
        /// Number of placeholders in the pattern.
        count: usize,
    },

    /// The captured text could not be read as an integer.
    #[error("parameter '{name}' is not a valid integer: '{value}'")]
    NumberFormat {
        /// The parameter name.
        name: String,
        /// The captured text.
        value: String,
    },
}

impl MatchError {
    /// Returns `true` for the expected no-match outcome.
    pub fn is_no_match(&self) -> bool {
        matches!(self, Self::NoMatch { .. })
    }
}

// =============================================================================
// Client Errors
// =============================================================================

/// Errors returned by a chat platform client.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// The client is not connected or has been shut down.
    #[error("chat client is closed")]
    Closed,

    /// The platform rejected or failed to deliver the message.
    #[error("failed to send message to '{channel}': {reason}")]
    SendFailed {
        /// Target channel.
        channel: String,
        /// Reason reported by the client.
        reason: String,
    },

    /// The event stream was already taken by another listener.
    #[error("event stream already taken")]
    StreamTaken,
}

impl ClientError {
    /// Creates a send failure.
    pub fn send_failed(channel: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SendFailed {
            channel: channel.into(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for pattern compilation.
pub type PatternResult<T> = Result<T, PatternError>;

/// Result type for match operations.
pub type MatchResult<T> = Result<T, MatchError>;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;
