//! Events emitted by a chat platform client.

use serde::Serialize;
use serde_json::Value;

use crate::message::Message;

/// An event on a client's event stream.
///
/// Connection lifecycle problems arrive here as plain events; the router never
/// retries or reconnects on its own.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatEvent {
    /// The client started connecting.
    Connecting,

    /// The client is connected; carries the bot's own user id.
    Connected {
        /// The bot identity on the platform.
        bot_id: String,
    },

    /// The connection failed or dropped.
    ConnectionError {
        /// Reason reported by the client.
        reason: String,
    },

    /// The platform rejected the credentials.
    AuthenticationError {
        /// Reason reported by the client.
        reason: String,
    },

    /// An inbound chat message.
    Message(Message),

    /// Any other platform event, passed through untouched.
    Other {
        /// Raw event payload.
        payload: Value,
    },
}

impl ChatEvent {
    /// A short, stable name for logging.
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::Connecting => "connecting",
            Self::Connected { .. } => "connected",
            Self::ConnectionError { .. } => "connection_error",
            Self::AuthenticationError { .. } => "authentication_error",
            Self::Message(_) => "message",
            Self::Other { .. } => "other",
        }
    }

    /// Pretty JSON rendering used by the raw event dump.
    pub fn to_debug_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("<unserializable: {e}>"))
    }
}

impl From<Message> for ChatEvent {
    fn from(message: Message) -> Self {
        Self::Message(message)
    }
}
