//! The bot context shared by the dispatcher, conversations and channels.
//!
//! [`BotContext`] replaces ambient bot state: it carries the bot identity
//! learned from the connection, the send capability, and the task group every
//! spawned handler runs in. One `Arc<BotContext>` is created per bot and
//! threaded explicitly through everything that needs it.

use std::future::Future;

use tokio::sync::watch;
use tokio_util::task::TaskTracker;
use tracing::{debug, trace};

use pewter_core::{BoxedSender, ClientResult};

/// Shared state for one bot.
pub struct BotContext {
    /// The bot's own user id, unknown until the client connects.
    identity: watch::Sender<Option<String>>,
    /// Outbound send capability.
    sender: BoxedSender,
    /// Every handler and notification task is spawned here.
    tasks: TaskTracker,
}

impl BotContext {
    /// Creates a context around a send capability.
    pub fn new(sender: BoxedSender) -> Self {
        let (identity, _) = watch::channel(None);
        Self {
            identity,
            sender,
            tasks: TaskTracker::new(),
        }
    }

    /// Creates a context with a known bot identity.
    pub fn with_bot_id(sender: BoxedSender, bot_id: impl Into<String>) -> Self {
        let context = Self::new(sender);
        context.set_bot_id(bot_id);
        context
    }

    /// Returns the bot's user id, if connected.
    pub fn bot_id(&self) -> Option<String> {
        self.identity.borrow().clone()
    }

    /// Records the bot identity reported by the client.
    pub fn set_bot_id(&self, bot_id: impl Into<String>) {
        let bot_id = bot_id.into();
        debug!(bot_id = %bot_id, "Bot identity set");
        self.identity.send_replace(Some(bot_id));
    }

    /// Waits until the bot identity is known and returns it.
    pub async fn wait_for_connection(&self) -> Option<String> {
        let mut rx = self.identity.subscribe();
        rx.wait_for(Option::is_some)
            .await
            .ok()
            .and_then(|id| (*id).clone())
    }

    /// The outbound send capability.
    pub fn sender(&self) -> &BoxedSender {
        &self.sender
    }

    /// Sends `text` to `channel` exactly once.
    pub async fn say(&self, channel: &str, text: &str) -> ClientResult<()> {
        trace!(channel, "Sending message");
        self.sender.send(channel, text).await
    }

    /// Spawns a fire-and-forget task in the bot's task group.
    ///
    /// Nothing waits for the task unless the group is drained on shutdown.
    pub fn spawn<F>(&self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.tasks.spawn(future);
    }

    /// The task group holding spawned handlers.
    pub fn tasks(&self) -> &TaskTracker {
        &self.tasks
    }
}

impl std::fmt::Debug for BotContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotContext")
            .field("bot_id", &self.bot_id())
            .field("running_tasks", &self.tasks.len())
            .finish()
    }
}
