//! # Pewter
//!
//! A chat-bot command router: declare commands as text patterns with typed
//! placeholders, and Pewter routes every inbound chat message to the first
//! matching handler.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐  events  ┌─────────────┐  message  ┌────────────┐  first match  ┌─────────┐
//! │ ChatClient │─────────▶│ BotRuntime  │──────────▶│ Dispatcher │──────────────▶│ Handler │
//! └────────────┘          │ (recv loop) │           └────────────┘               └─────────┘
//!       ▲                 └─────────────┘                                             │
//!       │                        │ message                                          │ reply
//!       │                        ▼                                                  │
//!       │                 ┌─────────────┐                                           │
//!       │                 │ ChannelHub  │ bounded per-channel queues                │
//!       │                 └─────────────┘                                           │
//!       └───────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **Core**: patterns, matches, messages and normalization, the client seam
//! - **Framework**: commands, registry, dispatcher, conversations, channels
//! - **Runtime**: configuration, logging, the receive loop
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pewter::prelude::*;
//!
//! async fn deploy(convo: Conversation) {
//!     let app = convo.string("app").unwrap_or_default().to_string();
//!     let count = convo.integer("count").unwrap_or(1);
//!     let _ = reply!(convo, "deploying {count} instance(s) of {app}").await;
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut bot = BotRuntime::builder(client).build()?;
//!     bot.command_with_description(
//!         "deploy <app> x<count:integer>",
//!         "Deploy an app",
//!         deploy,
//!     )?;
//!     bot.run().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `toml-config`: TOML configuration files (default)
//! - `yaml-config`: YAML configuration files
//! - `json-log`: JSON log output

pub use pewter_core as core;
pub use pewter_framework as framework;
pub use pewter_runtime as runtime;

pub use pewter_framework::reply;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use pewter::prelude::*;
/// ```
pub mod prelude {
    // Runtime - main entry point
    pub use pewter_runtime::{BotRuntime, CancellationToken, PewterConfig};

    // Commands and handlers
    pub use pewter_framework::{
        Channel, Command, CommandRegistry, Conversation, Dispatcher, Handler, Outcome, reply,
    };

    // Core types
    pub use pewter_core::{
        ChatClient, ChatEvent, LocalClient, Match, MatchError, Message, MessageSender, Pattern,
        PatternError, local_client,
    };
}
