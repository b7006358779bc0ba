//! The context a handler receives for one matched message.

use std::sync::Arc;

use pewter_core::{ClientResult, Match, MatchResult, Message, mention};

use crate::context::BotContext;

/// One matched message together with its reply capability.
///
/// Created by the dispatcher and moved into the handler task.
#[derive(Debug, Clone)]
pub struct Conversation {
    matched: Match,
    message: Message,
    context: Arc<BotContext>,
}

impl Conversation {
    /// Creates a conversation.
    pub fn new(matched: Match, message: Message, context: Arc<BotContext>) -> Self {
        Self {
            matched,
            message,
            context,
        }
    }

    /// The triggering message, after normalization.
    pub fn message(&self) -> &Message {
        &self.message
    }

    /// The match produced by the command pattern.
    ///
    /// For the unknown-command handler this is a dummy match.
    pub fn matched(&self) -> &Match {
        &self.matched
    }

    /// The bot context.
    pub fn context(&self) -> &Arc<BotContext> {
        &self.context
    }

    /// Shorthand for `matched().string(name)`.
    pub fn string(&self, name: &str) -> MatchResult<&str> {
        self.matched.string(name)
    }

    /// Shorthand for `matched().integer(name)`.
    pub fn integer(&self, name: &str) -> MatchResult<i64> {
        self.matched.integer(name)
    }

    /// Shorthand for `matched().at(position)`.
    pub fn at(&self, position: usize) -> MatchResult<&str> {
        self.matched.at(position)
    }

    /// The text [`reply`](Self::reply) would send for `text`.
    ///
    /// Outside direct messages the reply addresses the author, `<@user>: `.
    pub fn reply_text(&self, text: &str) -> String {
        if self.message.is_direct_message() {
            text.to_string()
        } else {
            format!("{}: {}", mention(self.message.user()), text)
        }
    }

    /// Sends a reply to the channel the message came from.
    pub async fn reply(&self, text: impl AsRef<str>) -> ClientResult<()> {
        let text = self.reply_text(text.as_ref());
        self.context.say(self.message.channel(), &text).await
    }
}

/// Formats and sends a reply, `reply!(convo, "deployed {}", app)`.
///
/// Expands to `convo.reply(format!(...))` and must be awaited.
#[macro_export]
macro_rules! reply {
    ($convo:expr, $($arg:tt)*) => {
        $convo.reply(::std::format!($($arg)*))
    };
}
