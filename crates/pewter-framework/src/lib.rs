//! # Pewter Framework
//!
//! Command routing on top of the core types.
//!
//! This layer provides:
//! - Commands and handlers: any `async fn(Conversation)` can handle a command
//! - An ordered command registry with help generation
//! - The dispatcher: normalization, relevance filtering, first-match routing
//! - Conversations with mention-prefixed replies
//! - Per-channel bounded fan-out queues
//!
//! Everything shares one [`BotContext`], which the runtime creates when the
//! bot is built.

pub mod channel;
pub mod command;
pub mod context;
pub mod conversation;
pub mod dispatcher;
pub mod handler;
pub mod registry;

pub use channel::{Channel, ChannelHub, DEFAULT_QUEUE_CAPACITY, MessageQueue};
pub use command::Command;
pub use context::BotContext;
pub use conversation::Conversation;
pub use dispatcher::{Dispatcher, Outcome};
pub use handler::{BoxFuture, BoxedHandler, Handler, into_handler};
pub use registry::{CommandRegistry, HELP_HEADER};
