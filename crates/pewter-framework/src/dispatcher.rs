//! Message dispatcher for the Pewter framework.
//!
//! The [`Dispatcher`] takes one inbound [`Message`] through the fixed
//! processing pipeline:
//!
//! 1. Normalize the text: strip the leading bot mention, then unwrap link
//!    markup.
//! 2. If the message is relevant to the bot and asks for help, send the help
//!    listing and stop.
//! 3. In reply-only mode, drop messages that are not relevant.
//! 4. Search the registry in registration order. The first matching command
//!    has its handler spawned and the search stops.
//! 5. In reply-only mode, hand unmatched messages to the unknown-command
//!    handler with a dummy match.
//!
//! Handlers are spawned into the context's task group and never awaited.
//!
//! ```rust,ignore
//! let mut registry = CommandRegistry::new();
//! registry.command("ping", |convo: Conversation| async move {
//!     let _ = convo.reply("pong").await;
//! })?;
//!
//! let dispatcher = Dispatcher::new(Arc::new(registry), context).reply_only(true);
//! dispatcher.dispatch(message).await;
//! ```

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use tower::Service;
use tracing::{Instrument, Level, debug, span, trace, warn};

use pewter_core::{Match, Message, mention};

use crate::context::BotContext;
use crate::conversation::Conversation;
use crate::handler::{BoxedHandler, Handler, into_handler};
use crate::registry::CommandRegistry;

/// What the dispatcher did with a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The help listing was sent.
    Help,
    /// A command matched and its handler was spawned.
    Handled,
    /// No command matched.
    Unhandled,
    /// Dropped by the reply-only relevance filter.
    Ignored,
    /// No command matched and the unknown-command handler was spawned.
    Unknown,
}

impl Outcome {
    /// Returns `true` if a handler was spawned for the message.
    pub fn is_handled(&self) -> bool {
        matches!(self, Self::Handled | Self::Unknown)
    }
}

/// Routes messages to registered commands.
///
/// The registry is frozen behind an `Arc`; cloning a dispatcher is cheap.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<CommandRegistry>,
    unknown: Option<BoxedHandler>,
    reply_only: bool,
    context: Arc<BotContext>,
}

impl Dispatcher {
    /// Creates a dispatcher over a frozen registry.
    pub fn new(registry: Arc<CommandRegistry>, context: Arc<BotContext>) -> Self {
        Self {
            registry,
            unknown: None,
            reply_only: false,
            context,
        }
    }

    /// Enables or disables reply-only mode.
    pub fn reply_only(mut self, reply_only: bool) -> Self {
        self.reply_only = reply_only;
        self
    }

    /// Sets the handler for relevant messages no command matches.
    pub fn unknown_command<H: Handler>(mut self, handler: H) -> Self {
        self.unknown = Some(into_handler(handler));
        self
    }

    /// Sets an already boxed unknown-command handler.
    pub fn unknown_handler(mut self, handler: Option<BoxedHandler>) -> Self {
        self.unknown = handler;
        self
    }

    /// Returns `true` in reply-only mode.
    pub fn is_reply_only(&self) -> bool {
        self.reply_only
    }

    /// The command registry.
    pub fn registry(&self) -> &Arc<CommandRegistry> {
        &self.registry
    }

    /// The bot context.
    pub fn context(&self) -> &Arc<BotContext> {
        &self.context
    }

    /// Builds the help listing.
    pub fn help_text(&self) -> String {
        self.registry.help_text()
    }

    /// Runs one message through the full pipeline.
    pub async fn dispatch(&self, message: Message) -> Outcome {
        let span = span!(
            Level::DEBUG,
            "dispatch",
            channel = %message.channel(),
            user = %message.user()
        );
        self.process(message).instrument(span).await
    }

    async fn process(&self, mut message: Message) -> Outcome {
        let bot_id = self.context.bot_id();
        message.normalize(bot_id.as_deref());

        // Before the client connects, only direct messages can be addressed to the bot.
        let relevant = match bot_id.as_deref() {
            Some(bot_id) => message.is_relevant_for(bot_id),
            None => message.is_message() && message.is_direct_message(),
        };

        if relevant && message.is_help_request() {
            self.send_help(&message).await;
            return Outcome::Help;
        }

        if self.reply_only && !relevant {
            trace!("Message not addressed to the bot, ignoring");
            return Outcome::Ignored;
        }

        if let Some(outcome) = self.search(&message) {
            return outcome;
        }

        match &self.unknown {
            Some(unknown) if self.reply_only => {
                debug!(text = %message.text(), "Unknown command");
                let convo = Conversation::new(Match::dummy(), message, Arc::clone(&self.context));
                self.context.spawn(unknown.call(convo));
                Outcome::Unknown
            }
            _ => Outcome::Unhandled,
        }
    }

    /// First-match search over the registry.
    ///
    /// Spawns the winning handler and returns `Some(Outcome::Handled)`, or
    /// `None` when no pattern accepts the text.
    pub fn search(&self, message: &Message) -> Option<Outcome> {
        let Some((command, matched)) = self.registry.find(message.text()) else {
            trace!(text = %message.text(), "No command matched");
            return None;
        };

        debug!(pattern = %command.pattern(), "Command matched");
        command.handle(matched, message.clone(), &self.context);
        Some(Outcome::Handled)
    }

    async fn send_help(&self, message: &Message) {
        debug!("Sending help");
        let help = self.help_text();
        let text = if message.is_direct_message() {
            help
        } else {
            format!("{}: {}", mention(message.user()), help)
        };

        if let Err(error) = self.context.say(message.channel(), &text).await {
            warn!(channel = %message.channel(), error = %error, "Failed to send help");
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("command_count", &self.registry.len())
            .field("reply_only", &self.reply_only)
            .field("has_unknown", &self.unknown.is_some())
            .finish()
    }
}

// ============================================================================
// Tower Service Implementation
// ============================================================================

impl Service<Message> for Dispatcher {
    type Response = Outcome;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Outcome, Infallible>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, message: Message) -> Self::Future {
        let dispatcher = self.clone();
        Box::pin(async move { Ok(dispatcher.dispatch(message).await) })
    }
}
