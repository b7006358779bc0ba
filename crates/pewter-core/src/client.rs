//! The chat platform client seam.
//!
//! Transport, authentication and reconnection belong to the client. The
//! router only needs two things from it: a stream of [`ChatEvent`]s and a way
//! to post text to a channel.
//!
//! [`LocalClient`] is an in-process implementation backed by bounded tokio
//! channels. The paired [`LocalHandle`] plays the platform side: it emits
//! events and observes everything the bot sends.

use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use futures::stream::{self, BoxStream};
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::trace;

use crate::error::{ClientError, ClientResult};
use crate::event::ChatEvent;
use crate::message::Message;

/// A boxed stream of client events.
pub type EventStream = BoxStream<'static, ChatEvent>;

/// Something that can post text to a channel.
#[async_trait]
pub trait MessageSender: Send + Sync + 'static {
    /// Posts `text` to `channel`. Called once per outbound message.
    async fn send(&self, channel: &str, text: &str) -> ClientResult<()>;
}

/// Type-erased sender shared between the runtime and conversations.
pub type BoxedSender = Arc<dyn MessageSender>;

/// A chat platform client: a sender plus an event stream.
pub trait ChatClient: MessageSender {
    /// Takes the event stream.
    ///
    /// Clients may hand out the stream only once and return
    /// [`ClientError::StreamTaken`] afterwards.
    fn events(&self) -> ClientResult<EventStream>;
}

// ============================================================================
// Local Client
// ============================================================================

/// A message posted through a [`LocalClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outgoing {
    /// Target channel.
    pub channel: String,
    /// Posted text.
    pub text: String,
}

/// In-process client backed by tokio channels.
pub struct LocalClient {
    events: Mutex<Option<mpsc::Receiver<ChatEvent>>>,
    outbox: mpsc::Sender<Outgoing>,
}

/// Platform side of a [`LocalClient`].
pub struct LocalHandle {
    events: mpsc::Sender<ChatEvent>,
    outbox: mpsc::Receiver<Outgoing>,
}

/// Creates a connected [`LocalClient`] / [`LocalHandle`] pair.
pub fn local_client(buffer_size: usize) -> (LocalClient, LocalHandle) {
    let (events_tx, events_rx) = mpsc::channel(buffer_size);
    let (outbox_tx, outbox_rx) = mpsc::channel(buffer_size);

    let client = LocalClient {
        events: Mutex::new(Some(events_rx)),
        outbox: outbox_tx,
    };

    let handle = LocalHandle {
        events: events_tx,
        outbox: outbox_rx,
    };

    (client, handle)
}

#[async_trait]
impl MessageSender for LocalClient {
    async fn send(&self, channel: &str, text: &str) -> ClientResult<()> {
        trace!(channel, "LocalClient sending message");
        self.outbox
            .send(Outgoing {
                channel: channel.to_string(),
                text: text.to_string(),
            })
            .await
            .map_err(|_| ClientError::Closed)
    }
}

impl ChatClient for LocalClient {
    fn events(&self) -> ClientResult<EventStream> {
        let rx = self.events.lock().take().ok_or(ClientError::StreamTaken)?;
        Ok(stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|event| (event, rx))
        })
        .boxed())
    }
}

impl LocalHandle {
    /// Pushes an event onto the client's stream.
    pub async fn emit(&self, event: ChatEvent) -> ClientResult<()> {
        self.events.send(event).await.map_err(|_| ClientError::Closed)
    }

    /// Emits a connection-established event for `bot_id`.
    pub async fn connect(&self, bot_id: impl Into<String>) -> ClientResult<()> {
        self.emit(ChatEvent::Connected {
            bot_id: bot_id.into(),
        })
        .await
    }

    /// Emits an inbound message.
    pub async fn message(
        &self,
        channel: impl Into<String>,
        user: impl Into<String>,
        text: impl Into<String>,
    ) -> ClientResult<()> {
        self.emit(ChatEvent::Message(Message::new(channel, user, text)))
            .await
    }

    /// Waits for the next message the bot sends.
    ///
    /// Returns `None` once the client has been dropped.
    pub async fn next_sent(&mut self) -> Option<Outgoing> {
        self.outbox.recv().await
    }

    /// Returns a sent message if one is already waiting.
    pub fn try_next_sent(&mut self) -> Option<Outgoing> {
        self.outbox.try_recv().ok()
    }

    /// Closes the event stream; the listener sees the end of the stream.
    pub fn close_events(self) -> mpsc::Receiver<Outgoing> {
        self.outbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_send_reaches_handle() {
        let (client, mut handle) = local_client(8);

        client.send("C1", "hello").await.unwrap();

        assert_eq!(
            handle.next_sent().await,
            Some(Outgoing {
                channel: "C1".into(),
                text: "hello".into(),
            })
        );
        assert!(handle.try_next_sent().is_none());
    }

    #[tokio::test]
    async fn test_events_flow_through_stream() {
        let (client, handle) = local_client(8);
        let mut events = client.events().unwrap();

        handle.connect("UBOT").await.unwrap();
        handle.message("C1", "U1", "ping").await.unwrap();

        assert!(matches!(
            events.next().await,
            Some(ChatEvent::Connected { bot_id }) if bot_id == "UBOT"
        ));
        match events.next().await {
            Some(ChatEvent::Message(message)) => assert_eq!(message.text(), "ping"),
            other => panic!("unexpected event: {other:?}"),
        }

        let _outbox = handle.close_events();
        assert!(events.next().await.is_none());
    }

    #[tokio::test]
    async fn test_stream_taken_once() {
        let (client, _handle) = local_client(1);

        assert!(client.events().is_ok());
        assert!(matches!(client.events(), Err(ClientError::StreamTaken)));
    }

    #[tokio::test]
    async fn test_send_after_handle_dropped() {
        let (client, handle) = local_client(1);
        drop(handle);

        assert!(matches!(
            client.send("C1", "x").await,
            Err(ClientError::Closed)
        ));
    }
}
