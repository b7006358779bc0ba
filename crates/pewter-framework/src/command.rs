//! A single registered command: one pattern, an optional description and a
//! handler.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use pewter_core::{Match, MatchResult, Message, Pattern, PatternResult};

use crate::context::BotContext;
use crate::conversation::Conversation;
use crate::handler::{BoxedHandler, Handler, into_handler};

/// A command pattern bound to its handler.
///
/// Cloning is cheap: the handler is shared.
#[derive(Clone)]
pub struct Command {
    pattern: Pattern,
    description: Option<String>,
    handler: BoxedHandler,
}

impl Command {
    /// Compiles `pattern` and binds it to `handler`.
    pub fn new<H: Handler>(pattern: &str, handler: H) -> PatternResult<Self> {
        Ok(Self::from_pattern(Pattern::compile(pattern)?, handler))
    }

    /// Binds an already compiled pattern to `handler`.
    pub fn from_pattern<H: Handler>(pattern: Pattern, handler: H) -> Self {
        Self {
            pattern,
            description: None,
            handler: into_handler(handler),
        }
    }

    /// Sets the description shown in help output.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.description = (!description.is_empty()).then_some(description);
        self
    }

    /// The compiled pattern.
    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// The description, if one was set.
    pub fn get_description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The handler.
    pub fn handler(&self) -> &BoxedHandler {
        &self.handler
    }

    /// Attempts to match `text` against this command's pattern.
    pub fn try_match(&self, text: &str) -> MatchResult<Match> {
        self.pattern.match_text(text)
    }

    /// Spawns the handler for a conversation and returns immediately.
    pub fn handle(&self, matched: Match, message: Message, context: &Arc<BotContext>) {
        debug!(pattern = %self.pattern, "Spawning command handler");
        let convo = Conversation::new(matched, message, Arc::clone(context));
        context.spawn(self.handler.call(convo));
    }

    /// One help line: `` `pattern` `` plus ` *–* description` when present.
    pub fn help_line(&self) -> String {
        match &self.description {
            Some(description) => format!("`{}` *–* {}", self.pattern, description),
            None => format!("`{}`", self.pattern),
        }
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("pattern", &self.pattern.text())
            .field("description", &self.description)
            .finish()
    }
}
