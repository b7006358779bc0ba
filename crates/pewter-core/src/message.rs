//! The canonical chat message and its text normalization rules.
//!
//! Every transport adapter fills in one [`Message`]; the router and handlers
//! only ever see this structure. Two normalization steps rewrite the display
//! text before routing, always in this order:
//!
//! 1. [`strip_mention`] removes a leading `<@BOTID> ` addressed to the bot.
//! 2. [`strip_link_markup`] unwraps `<url|label>` and `<url>` link tokens,
//!    leaving channel (`<#C..>`), user (`<@U..>`) and special (`<!..>`)
//!    references untouched.
//!
//! The original text is kept separately so that mention detection still
//! works after the display text has been rewritten.

use serde::Serialize;

/// Whether a message came from the platform or is being composed by the bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// Received from the chat platform.
    Inbound,
    /// Composed locally for sending.
    Outbound,
}

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    channel: String,
    user: String,
    text: String,
    original_text: String,
    direct: bool,
    kind: MessageKind,
}

impl Message {
    /// Creates an inbound message.
    ///
    /// Channels whose id starts with `D` are treated as direct-message
    /// channels; use [`Message::with_direct`] to override.
    pub fn new(
        channel: impl Into<String>,
        user: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        let channel = channel.into();
        let text = text.into();
        Self {
            direct: channel.starts_with('D'),
            channel,
            user: user.into(),
            original_text: text.clone(),
            text,
            kind: MessageKind::Inbound,
        }
    }

    /// Creates an outbound message addressed to a channel.
    pub fn outbound(channel: impl Into<String>, text: impl Into<String>) -> Self {
        let mut message = Self::new(channel, "", text);
        message.kind = MessageKind::Outbound;
        message
    }

    /// Overrides the direct-message flag.
    pub fn with_direct(mut self, direct: bool) -> Self {
        self.direct = direct;
        self
    }

    /// The current display text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The text as received, before any normalization.
    pub fn original_text(&self) -> &str {
        &self.original_text
    }

    /// The author's user id.
    pub fn user(&self) -> &str {
        &self.user
    }

    /// The channel id.
    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Whether this message was received or composed locally.
    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    /// Replaces the display text.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Returns `true` for messages received from the platform.
    pub fn is_message(&self) -> bool {
        self.kind == MessageKind::Inbound
    }

    /// Returns `true` if `user` authored this message.
    pub fn is_from(&self, user: &str) -> bool {
        self.user == user
    }

    /// Returns `true` if the message arrived on a direct-message channel.
    pub fn is_direct_message(&self) -> bool {
        self.direct
    }

    /// Returns `true` if the original text starts with a mention of `user`.
    pub fn is_mention_for(&self, user: &str) -> bool {
        !user.is_empty() && self.original_text.starts_with(&mention(user))
    }

    /// Returns `true` if the bot `user` should pay attention to this message.
    ///
    /// A message is relevant when it was received from the platform, was not
    /// written by the bot itself, and is either a direct message or starts
    /// with a mention of the bot.
    pub fn is_relevant_for(&self, user: &str) -> bool {
        self.is_message()
            && !self.is_from(user)
            && (self.is_direct_message() || self.is_mention_for(user))
    }

    /// Returns `true` if the text begins or ends with `help`.
    pub fn is_help_request(&self) -> bool {
        self.text.starts_with("help") || self.text.ends_with("help")
    }

    /// Removes a leading `<@bot_id> ` from the display text.
    pub fn strip_mention(&mut self, bot_id: &str) -> &str {
        let stripped = strip_mention(&self.text, bot_id);
        if stripped.len() != self.text.len() {
            self.text = stripped.to_string();
        }
        &self.text
    }

    /// Unwraps link markup in the display text.
    pub fn strip_link_markup(&mut self) -> &str {
        self.text = strip_link_markup(&self.text);
        &self.text
    }

    /// Applies both normalization steps in order.
    ///
    /// Mention stripping is skipped while the bot identity is unknown.
    pub fn normalize(&mut self, bot_id: Option<&str>) {
        if let Some(bot_id) = bot_id {
            self.strip_mention(bot_id);
        }
        self.strip_link_markup();
    }
}

/// Formats a user mention, `<@user>`.
pub fn mention(user: &str) -> String {
    format!("<@{user}>")
}

/// Removes the exact prefix `<@bot_id> ` (trailing space included).
///
/// Anything else, including `<@bot_id>` without the space, is returned
/// unchanged.
pub fn strip_mention<'a>(text: &'a str, bot_id: &str) -> &'a str {
    if bot_id.is_empty() {
        return text;
    }

    text.strip_prefix("<@")
        .and_then(|rest| rest.strip_prefix(bot_id))
        .and_then(|rest| rest.strip_prefix("> "))
        .unwrap_or(text)
}

/// Returns `true` for `<#C..>`, `<@U..>` and `<!..>` references.
fn is_reference(content: &str) -> bool {
    content.starts_with("#C") || content.starts_with("@U") || content.starts_with('!')
}

/// A `<` still waiting for its `>`.
struct OpenToken {
    start: usize,
    reference: bool,
    /// First two pipes at this token's own nesting level.
    pipes: [Option<usize>; 2],
}

/// Marks `text[from..to]` for removal.
fn mark_removed(removed: &mut [i32], from: usize, to: usize) {
    removed[from] += 1;
    removed[to] -= 1;
}

/// Unwraps Slack-style link markup.
///
/// - `<http://example.com|example.com>` becomes `example.com`
/// - `<http://example.com>` becomes `http://example.com`
/// - `<#C123|general>`, `<@U123>` and `<!here>` are left as they are
///
/// Each `>` closes the most recent open `<`. A link token keeps the text
/// between its first and second top-level pipe, or its whole content when
/// it has none; nested tokens are unwrapped the same way. Unmatched `<` and
/// `>` are literal. The result contains no link tokens, so a second call is
/// a no-op. Runs in a single pass.
pub fn strip_link_markup(text: &str) -> String {
    let mut open: Vec<OpenToken> = Vec::new();
    // +1 where a removed range starts, -1 where it ends
    let mut removed = vec![0i32; text.len() + 1];

    for (i, byte) in text.bytes().enumerate() {
        match byte {
            b'<' => open.push(OpenToken {
                start: i,
                reference: is_reference(&text[i + 1..]),
                pipes: [None, None],
            }),
            b'|' => {
                if let Some(token) = open.last_mut() {
                    if let Some(slot) = token.pipes.iter_mut().find(|p| p.is_none()) {
                        *slot = Some(i);
                    }
                }
            }
            b'>' => match open.pop() {
                Some(token) if token.reference => {}
                Some(OpenToken {
                    start,
                    pipes: [Some(first), second],
                    ..
                }) => {
                    mark_removed(&mut removed, start, first + 1);
                    mark_removed(&mut removed, second.unwrap_or(i), i + 1);
                }
                Some(token) => {
                    mark_removed(&mut removed, token.start, token.start + 1);
                    mark_removed(&mut removed, i, i + 1);
                }
                None => {}
            },
            _ => {}
        }
    }

    let mut out = String::with_capacity(text.len());
    let mut depth = 0;
    let mut kept_from = 0;
    for (i, &delta) in removed.iter().enumerate() {
        if delta == 0 {
            continue;
        }
        let was_kept = depth == 0;
        depth += delta;
        if was_kept && depth != 0 {
            out.push_str(&text[kept_from..i]);
        } else if !was_kept && depth == 0 {
            kept_from = i;
        }
    }
    if depth == 0 {
        out.push_str(&text[kept_from..]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_mention_exact_prefix() {
        assert_eq!(strip_mention("<@U1> help", "U1"), "help");
        assert_eq!(strip_mention("<@U12>help", "U1"), "<@U12>help");
        assert_eq!(strip_mention("<@U1>help", "U1"), "<@U1>help");
        assert_eq!(strip_mention("<@U12> help", "U1"), "<@U12> help");
        assert_eq!(strip_mention("hey <@U1> help", "U1"), "hey <@U1> help");
        assert_eq!(strip_mention("<@U1> ", "U1"), "");
    }

    #[test]
    fn test_strip_mention_is_not_a_trim() {
        // A character-class trim would also eat the leading 'U' and '1'.
        assert_eq!(strip_mention("<@U1> U1 stats", "U1"), "U1 stats");
    }

    #[test]
    fn test_strip_mention_without_bot_id() {
        assert_eq!(strip_mention("<@> help", ""), "<@> help");
    }

    #[test]
    fn test_strip_link_markup() {
        assert_eq!(
            strip_link_markup("<http://example.com|example.com>"),
            "example.com"
        );
        assert_eq!(
            strip_link_markup("<http://example.com>"),
            "http://example.com"
        );
        assert_eq!(strip_link_markup("<#C123|general>"), "<#C123|general>");
        assert_eq!(strip_link_markup("<@U123>"), "<@U123>");
        assert_eq!(strip_link_markup("<!channel>"), "<!channel>");
    }

    #[test]
    fn test_strip_link_markup_in_sentence() {
        assert_eq!(
            strip_link_markup("open <https://a.io|a.io> and <mailto:x@y.z> in <#C9|dev>"),
            "open a.io and mailto:x@y.z in <#C9|dev>"
        );
    }

    #[test]
    fn test_strip_link_markup_repeated_token() {
        assert_eq!(strip_link_markup("<http://a> <http://a>"), "http://a http://a");
    }

    #[test]
    fn test_strip_link_markup_unbalanced() {
        assert_eq!(strip_link_markup("a < b"), "a < b");
        assert_eq!(strip_link_markup("a > b"), "a > b");
        assert_eq!(strip_link_markup("x <y <http://z>"), "x <y http://z");
    }

    #[test]
    fn test_strip_link_markup_idempotent() {
        let inputs = [
            "<http://example.com|example.com>",
            "plain text",
            "<#C123|general> see <http://x.y>",
            "<<http://nested>>",
            "<a|<b|c>>",
            "<>",
        ];

        for input in inputs {
            let once = strip_link_markup(input);
            let twice = strip_link_markup(&once);
            assert_eq!(once, twice, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn test_strip_link_markup_reference_inside_label() {
        assert_eq!(
            strip_link_markup("<http://x.io|see <#C1|general>>"),
            "see <#C1|general>"
        );
        assert_eq!(strip_link_markup("<a|b|c>"), "b");
    }

    #[test]
    fn test_strip_link_markup_deep_nesting_is_linear() {
        let depth = 16_000;
        let input = format!("{}x{}", "<".repeat(depth), ">".repeat(depth));

        let started = std::time::Instant::now();
        let stripped = strip_link_markup(&input);
        let elapsed = started.elapsed();

        assert_eq!(stripped, "x");
        assert!(
            elapsed < std::time::Duration::from_millis(250),
            "stripping {} bytes took {elapsed:?}",
            input.len()
        );
    }

    #[test]
    fn test_strip_link_markup_alternating_nesting() {
        let depth = 4_000;
        let input = format!("{}x{}", "<a|<#C ".repeat(depth), ">>".repeat(depth));

        let started = std::time::Instant::now();
        let once = strip_link_markup(&input);
        assert!(started.elapsed() < std::time::Duration::from_millis(250));

        assert_eq!(strip_link_markup(&once), once);
        assert!(once.starts_with("<#C <#C "));
    }

    #[test]
    fn test_direct_message_inference() {
        assert!(Message::new("D123", "U9", "hi").is_direct_message());
        assert!(!Message::new("C123", "U9", "hi").is_direct_message());
        assert!(
            Message::new("C123", "U9", "hi")
                .with_direct(true)
                .is_direct_message()
        );
    }

    #[test]
    fn test_relevance() {
        let bot = "UBOT";

        assert!(Message::new("D1", "U9", "hello").is_relevant_for(bot));
        assert!(Message::new("C1", "U9", "<@UBOT> hello").is_relevant_for(bot));
        assert!(Message::new("C1", "U9", "<@UBOT>hello").is_relevant_for(bot));
        assert!(!Message::new("C1", "U9", "hello <@UBOT>").is_relevant_for(bot));
        assert!(!Message::new("C1", "U9", "hello").is_relevant_for(bot));
        assert!(!Message::new("D1", "UBOT", "echo").is_relevant_for(bot));
        assert!(!Message::outbound("D1", "hello").is_relevant_for(bot));
    }

    #[test]
    fn test_mention_survives_normalization() {
        let mut message = Message::new("C1", "U9", "<@UBOT> deploy <http://x.io|x.io>");
        message.normalize(Some("UBOT"));

        assert_eq!(message.text(), "deploy x.io");
        assert_eq!(message.original_text(), "<@UBOT> deploy <http://x.io|x.io>");
        assert!(message.is_mention_for("UBOT"));
        assert!(message.is_relevant_for("UBOT"));
    }

    #[test]
    fn test_normalize_without_identity() {
        let mut message = Message::new("C1", "U9", "<@UBOT> <http://x.io>");
        message.normalize(None);
        assert_eq!(message.text(), "<@UBOT> http://x.io");
    }

    #[test]
    fn test_help_request() {
        assert!(Message::new("D1", "U1", "help").is_help_request());
        assert!(Message::new("D1", "U1", "help me").is_help_request());
        assert!(Message::new("D1", "U1", "please help").is_help_request());
        assert!(!Message::new("D1", "U1", "no helping").is_help_request());
    }

    #[test]
    fn test_set_text_keeps_original() {
        let mut message = Message::new("C1", "U1", "before");
        message.set_text("after");

        assert_eq!(message.text(), "after");
        assert_eq!(message.original_text(), "before");
    }
}
