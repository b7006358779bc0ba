//! The ordered command registry.
//!
//! Commands are tried in registration order and the first pattern that
//! matches wins. Registration never deduplicates: a later command whose
//! pattern overlaps an earlier one is simply shadowed for the inputs the
//! earlier one accepts.

use tracing::debug;

use pewter_core::{Match, Pattern, PatternResult};

use crate::command::Command;
use crate::handler::Handler;

/// Header line of the generated help text.
pub const HELP_HEADER: &str = "The available commands are:\n\n";

/// An ordered list of commands.
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    commands: Vec<Command>,
    prefix: String,
}

impl CommandRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty registry whose helper methods prepend `prefix` to
    /// every pattern, e.g. `"!"` turns `ping` into `!ping`.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            commands: Vec::new(),
            prefix: prefix.into(),
        }
    }

    /// Changes the prefix applied to commands registered from now on.
    pub fn set_prefix(&mut self, prefix: impl Into<String>) {
        self.prefix = prefix.into();
    }

    /// The current command prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Compiles `pattern` (with the prefix) and registers it.
    pub fn command<H: Handler>(&mut self, pattern: &str, handler: H) -> PatternResult<&mut Self> {
        let command = Command::from_pattern(self.compile(pattern)?, handler);
        Ok(self.register(command))
    }

    /// Like [`command`](Self::command) with a help description.
    pub fn command_with_description<H: Handler>(
        &mut self,
        pattern: &str,
        description: &str,
        handler: H,
    ) -> PatternResult<&mut Self> {
        let command = Command::from_pattern(self.compile(pattern)?, handler).description(description);
        Ok(self.register(command))
    }

    /// Appends a prebuilt command as is.
    pub fn register(&mut self, command: Command) -> &mut Self {
        debug!(
            pattern = %command.pattern(),
            position = self.commands.len(),
            "Command registered"
        );
        self.commands.push(command);
        self
    }

    /// Returns the first command whose pattern accepts `text`, with its match.
    pub fn find(&self, text: &str) -> Option<(&Command, Match)> {
        self.commands
            .iter()
            .find_map(|command| command.try_match(text).ok().map(|m| (command, m)))
    }

    /// Builds the help listing, one line per command in registration order.
    pub fn help_text(&self) -> String {
        let mut help = String::from(HELP_HEADER);
        for command in &self.commands {
            help.push_str(&command.help_line());
            help.push('\n');
        }
        help
    }

    /// Number of registered commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Iterates commands in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter()
    }

    fn compile(&self, pattern: &str) -> PatternResult<Pattern> {
        if self.prefix.is_empty() {
            Pattern::compile(pattern)
        } else {
            Pattern::compile(format!("{}{}", self.prefix, pattern))
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::conversation::Conversation;

    use super::*;

    async fn noop(_convo: Conversation) {}

    #[test]
    fn test_first_match_wins() {
        let mut registry = CommandRegistry::new();
        registry
            .command("deploy <app>", noop)
            .unwrap()
            .command("deploy <app:integer>", noop)
            .unwrap();

        let (command, matched) = registry.find("deploy 42").unwrap();
        assert_eq!(command.pattern().text(), "deploy <app>");
        assert_eq!(matched.string("app").unwrap(), "42");
    }

    #[test]
    fn test_general_pattern_shadows_later_literal() {
        let mut registry = CommandRegistry::new();
        registry
            .command("cmd <a>", noop)
            .unwrap()
            .command("cmd specific", noop)
            .unwrap();

        let (command, matched) = registry.find("cmd specific").unwrap();
        assert_eq!(command.pattern().text(), "cmd <a>");
        assert_eq!(matched.string("a").unwrap(), "specific");
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_find_none() {
        let mut registry = CommandRegistry::new();
        registry.command("ping", noop).unwrap();

        assert!(registry.find("pong").is_none());
        assert!(registry.find("ping extra").is_none());
    }

    #[test]
    fn test_invalid_pattern_not_registered() {
        let mut registry = CommandRegistry::new();

        assert!(registry.command("cmd <x:float>", noop).is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_help_text() {
        let mut registry = CommandRegistry::new();
        registry
            .command("ping", noop)
            .unwrap()
            .command_with_description("echo <text>", "Repeats the text", noop)
            .unwrap();

        assert_eq!(
            registry.help_text(),
            "The available commands are:\n\n`ping`\n`echo <text>` *–* Repeats the text\n"
        );
    }

    #[test]
    fn test_empty_help_text() {
        assert_eq!(CommandRegistry::new().help_text(), HELP_HEADER);
    }

    #[test]
    fn test_prefix_applies_to_helpers_only() {
        let mut registry = CommandRegistry::with_prefix("!");
        registry.command("ping", noop).unwrap();
        registry.register(Command::new("pong", noop).unwrap());

        assert!(registry.find("!ping").is_some());
        assert!(registry.find("ping").is_none());
        assert!(registry.find("pong").is_some());
        assert!(registry.help_text().contains("`!ping`"));
    }

    #[test]
    fn test_prefix_metacharacters_are_literal() {
        let mut registry = CommandRegistry::with_prefix(".");
        registry.command("ping", noop).unwrap();

        assert!(registry.find(".ping").is_some());
        assert!(registry.find("xping").is_none());
    }
}
