//! # Pewter Core
//!
//! Leaf building blocks of the Pewter command router.
//!
//! - **Patterns**: [`Pattern`] compiles `deploy <app> to <env>` style text
//!   into an anchored matcher with typed placeholders.
//! - **Matches**: [`Match`] holds the parameters captured from one input.
//! - **Messages**: [`Message`] is the single message structure every
//!   transport fills in, together with the mention and link-markup
//!   normalizers.
//! - **Clients**: [`ChatClient`] is the seam to the chat platform: an event
//!   stream plus a send operation. [`LocalClient`] implements it in-process.
//!
//! ```text
//! ┌────────────┐  ChatEvent   ┌───────────┐  text   ┌─────────┐
//! │ ChatClient │─────────────▶│  Message  │────────▶│ Pattern │──▶ Match
//! └────────────┘              │ normalize │         └─────────┘
//!       ▲                     └───────────┘
//!       └──────────── send(channel, text) ◀──────── handlers
//! ```

pub mod capture;
pub mod client;
pub mod error;
pub mod event;
pub mod message;
pub mod pattern;

pub use capture::{Match, Param};
pub use client::{
    BoxedSender, ChatClient, EventStream, LocalClient, LocalHandle, MessageSender, Outgoing,
    local_client,
};
pub use error::{
    ClientError, ClientResult, MatchError, MatchResult, PatternError, PatternResult,
};
pub use event::ChatEvent;
pub use message::{Message, MessageKind, mention, strip_link_markup, strip_mention};
pub use pattern::{ParamType, Pattern, Placeholder, Segment};

/// Prelude for common imports.
pub mod prelude {
    pub use super::{
        ChatClient, ChatEvent, ClientResult, Match, MatchError, Message, MessageSender, Pattern,
        PatternError,
    };
}
