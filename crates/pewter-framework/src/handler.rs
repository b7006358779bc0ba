//! Command handlers.
//!
//! Any `Fn(Conversation) -> impl Future<Output = ()>` is a [`Handler`]:
//!
//! ```rust,ignore
//! async fn ping(convo: Conversation) {
//!     let _ = convo.reply("pong").await;
//! }
//!
//! registry.command("ping", ping)?;
//! registry.command("echo <text>", |convo: Conversation| async move {
//!     let text = convo.string("text").unwrap_or_default().to_string();
//!     let _ = convo.reply(text).await;
//! })?;
//! ```
//!
//! Handlers always run in their own task. The dispatcher never awaits them,
//! so a slow or panicking handler cannot hold up routing.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::conversation::Conversation;

/// A type alias for a boxed, pinned future that is `Send`.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The trait implemented by command handlers.
pub trait Handler: Send + Sync + 'static {
    /// Runs the handler for one conversation.
    fn call(&self, convo: Conversation) -> BoxFuture<'static, ()>;
}

impl<F, Fut> Handler for F
where
    F: Fn(Conversation) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    fn call(&self, convo: Conversation) -> BoxFuture<'static, ()> {
        Box::pin((self)(convo))
    }
}

/// A type-erased handler that can be stored in collections.
pub type BoxedHandler = Arc<dyn Handler>;

/// Converts a handler into a [`BoxedHandler`].
pub fn into_handler<H: Handler>(handler: H) -> BoxedHandler {
    Arc::new(handler)
}
