//! Per-channel notification fan-out.
//!
//! Every inbound message is offered to the bounded queue of its channel, but
//! only if someone asked for that channel's messages first. The producer
//! never waits: a full queue drops the message.
//!
//! ```rust,ignore
//! let general = runtime.channel("C024BE91L");
//! let queue = general.messages();
//! tokio::spawn(async move {
//!     loop {
//!         let message = queue.recv().await;
//!         println!("{}: {}", message.user(), message.text());
//!     }
//! });
//! ```

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::Notify;
use tracing::trace;

use pewter_core::{ClientResult, Message};

use crate::context::BotContext;

/// Default capacity of a channel queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 10;

// ============================================================================
// Message Queue
// ============================================================================

/// A bounded, drop-on-full message queue with async receive.
#[derive(Debug)]
pub struct MessageQueue {
    items: Mutex<VecDeque<Message>>,
    capacity: usize,
    notify: Notify,
}

impl MessageQueue {
    /// Creates an empty queue holding at most `capacity` messages.
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
            notify: Notify::new(),
        }
    }

    /// Appends `message` unless the queue is full.
    ///
    /// Returns `false` if the message was dropped.
    pub fn offer(&self, message: Message) -> bool {
        {
            let mut items = self.items.lock();
            if items.len() >= self.capacity {
                return false;
            }
            items.push_back(message);
        }
        self.notify.notify_one();
        true
    }

    /// Takes the oldest message without waiting.
    pub fn try_recv(&self) -> Option<Message> {
        self.items.lock().pop_front()
    }

    /// Waits for and takes the oldest message.
    pub async fn recv(&self) -> Message {
        loop {
            if let Some(message) = self.try_recv() {
                if !self.is_empty() {
                    self.notify.notify_one();
                }
                return message;
            }
            self.notify.notified().await;
        }
    }

    /// Number of queued messages.
    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    /// Returns `true` if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }

    /// Maximum number of queued messages.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

// ============================================================================
// Channel Hub
// ============================================================================

/// Registry of channel queues, keyed by channel id.
#[derive(Debug)]
pub struct ChannelHub {
    queues: Mutex<HashMap<String, Arc<MessageQueue>>>,
    capacity: usize,
}

impl Default for ChannelHub {
    fn default() -> Self {
        Self::new(DEFAULT_QUEUE_CAPACITY)
    }
}

impl ChannelHub {
    /// Creates a hub whose queues hold `capacity` messages each.
    pub fn new(capacity: usize) -> Self {
        Self {
            queues: Mutex::new(HashMap::new()),
            capacity,
        }
    }

    /// Returns the queue for `channel`, creating it on first use.
    pub fn subscribe(&self, channel: &str) -> Arc<MessageQueue> {
        let mut queues = self.queues.lock();
        Arc::clone(
            queues
                .entry(channel.to_string())
                .or_insert_with(|| Arc::new(MessageQueue::new(self.capacity))),
        )
    }

    /// Returns the queue for `channel` if one exists.
    pub fn queue(&self, channel: &str) -> Option<Arc<MessageQueue>> {
        self.queues.lock().get(channel).cloned()
    }

    /// Offers `message` to its channel's queue.
    ///
    /// Returns `true` only if the message was queued. Channels nobody
    /// subscribed to are skipped.
    pub fn notify(&self, message: Message) -> bool {
        let Some(queue) = self.queue(message.channel()) else {
            return false;
        };

        let channel = message.channel().to_string();
        let queued = queue.offer(message);
        if !queued {
            trace!(channel = %channel, "Channel queue full, dropping message");
        }
        queued
    }

    /// Number of channels with a queue.
    pub fn len(&self) -> usize {
        self.queues.lock().len()
    }

    /// Returns `true` if no channel has a queue.
    pub fn is_empty(&self) -> bool {
        self.queues.lock().is_empty()
    }

    /// Per-queue capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

// ============================================================================
// Channel Handle
// ============================================================================

/// A handle on one chat channel.
#[derive(Debug, Clone)]
pub struct Channel {
    id: String,
    hub: Arc<ChannelHub>,
    context: Arc<BotContext>,
}

impl Channel {
    /// Creates a handle for channel `id`.
    pub fn new(id: impl Into<String>, hub: Arc<ChannelHub>, context: Arc<BotContext>) -> Self {
        Self {
            id: id.into(),
            hub,
            context,
        }
    }

    /// The channel id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The channel's message queue, created on first call.
    pub fn messages(&self) -> Arc<MessageQueue> {
        self.hub.subscribe(&self.id)
    }

    /// Sends `text` to this channel, without a mention prefix.
    pub async fn say(&self, text: impl AsRef<str>) -> ClientResult<()> {
        self.context.say(&self.id, text.as_ref()).await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pewter_core::local_client;

    use super::*;

    fn message(channel: &str, text: &str) -> Message {
        Message::new(channel, "U1", text)
    }

    #[test]
    fn test_unsubscribed_channel_is_not_queued() {
        let hub = ChannelHub::default();

        assert!(!hub.notify(message("C1", "hello")));
        assert!(hub.is_empty());
        assert!(hub.queue("C1").is_none());
    }

    #[test]
    fn test_drop_on_full() {
        let hub = ChannelHub::default();
        let queue = hub.subscribe("C1");

        for i in 0..10 {
            assert!(hub.notify(message("C1", &format!("m{i}"))));
        }
        assert!(!hub.notify(message("C1", "m10")));

        assert_eq!(queue.len(), 10);
        assert_eq!(queue.try_recv().unwrap().text(), "m0");
    }

    #[test]
    fn test_subscribe_is_idempotent() {
        let hub = ChannelHub::new(3);
        let first = hub.subscribe("C1");
        let second = hub.subscribe("C1");

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.capacity(), 3);
        assert_eq!(hub.len(), 1);
    }

    #[test]
    fn test_queues_are_per_channel() {
        let hub = ChannelHub::default();
        let c1 = hub.subscribe("C1");
        let c2 = hub.subscribe("C2");

        hub.notify(message("C2", "for two"));

        assert!(c1.is_empty());
        assert_eq!(c2.try_recv().unwrap().text(), "for two");
    }

    #[tokio::test]
    async fn test_recv_waits_for_message() {
        let queue = Arc::new(MessageQueue::new(2));

        let reader = {
            let queue = Arc::clone(&queue);
            tokio::spawn(async move { queue.recv().await })
        };

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(queue.offer(message("C1", "late")));

        let received = tokio::time::timeout(Duration::from_secs(1), reader)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(received.text(), "late");
    }

    #[test]
    fn test_recv_pending_until_offer() {
        let queue = MessageQueue::new(1);
        let mut recv = tokio_test::task::spawn(queue.recv());

        tokio_test::assert_pending!(recv.poll());
        assert!(queue.offer(message("C1", "x")));
        assert!(recv.is_woken());

        let received = tokio_test::assert_ready!(recv.poll());
        assert_eq!(received.text(), "x");
    }

    #[tokio::test]
    async fn test_recv_drains_in_order() {
        let queue = MessageQueue::new(4);
        queue.offer(message("C1", "a"));
        queue.offer(message("C1", "b"));

        assert_eq!(queue.recv().await.text(), "a");
        assert_eq!(queue.recv().await.text(), "b");
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn test_channel_say_has_no_prefix() {
        let (client, mut handle) = local_client(2);
        let context = Arc::new(BotContext::with_bot_id(Arc::new(client), "UBOT"));
        let channel = Channel::new("C1", Arc::new(ChannelHub::default()), context);

        channel.say("announcement").await.unwrap();
        let sent = handle.next_sent().await.unwrap();
        assert_eq!((sent.channel.as_str(), sent.text.as_str()), ("C1", "announcement"));
    }

    #[test]
    fn test_channel_messages_subscribes() {
        let (client, _handle) = local_client(1);
        let context = Arc::new(BotContext::new(Arc::new(client)));
        let hub = Arc::new(ChannelHub::default());
        let channel = Channel::new("C9", Arc::clone(&hub), context);

        assert!(hub.queue("C9").is_none());
        let queue = channel.messages();
        assert!(hub.notify(message("C9", "x")));
        assert_eq!(queue.len(), 1);
    }
}
