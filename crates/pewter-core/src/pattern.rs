//! Command pattern compiler.
//!
//! A pattern is plain text with typed placeholders written in angle brackets:
//!
//! ```text
//! remind <who> at <when:integer>
//! ```
//!
//! `<name>` declares a `string` placeholder (one or more non-whitespace
//! characters) and `<name:integer>` declares an `integer` placeholder (one or
//! more decimal digits). Everything between placeholders is literal text and
//! must appear verbatim. The compiled matcher is always anchored to the whole
//! input, so `cmd <a>` never matches `cmd a b` or `say cmd a`.
//!
//! # Example
//!
//! ```rust
//! use pewter_core::Pattern;
//!
//! let pattern = Pattern::compile("remind <who> at <when:integer>").unwrap();
//! let matched = pattern.match_text("remind bob at 5").unwrap();
//!
//! assert_eq!(matched.string("who").unwrap(), "bob");
//! assert_eq!(matched.integer("when").unwrap(), 5);
//! assert!(!pattern.matches("remind bob at five"));
//! ```

use std::fmt;
use std::str::FromStr;

use regex::Regex;
use tracing::trace;

use crate::capture::{Match, Param};
use crate::error::{MatchError, MatchResult, PatternError, PatternResult};

// ============================================================================
// Placeholder Types
// ============================================================================

/// The type of a placeholder, which selects its character class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ParamType {
    /// One or more non-whitespace characters.
    #[default]
    String,
    /// One or more decimal digits.
    Integer,
}

impl ParamType {
    /// Returns the type tag as written in patterns.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
        }
    }

    /// Returns the regular expression fragment for this type.
    fn expression(&self) -> &'static str {
        match self {
            Self::String => r"\S+",
            Self::Integer => "[0-9]+",
        }
    }
}

impl FromStr for ParamType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(Self::String),
            "integer" => Ok(Self::Integer),
            _ => Err(()),
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named, typed capture slot inside a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    name: String,
    kind: ParamType,
    position: usize,
}

impl Placeholder {
    /// The placeholder name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The placeholder type.
    pub fn kind(&self) -> ParamType {
        self.kind
    }

    /// Zero-based index among the pattern's placeholders.
    pub fn position(&self) -> usize {
        self.position
    }
}

/// One piece of a parsed pattern, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Text that must match verbatim.
    Literal(String),
    /// Index into [`Pattern::placeholders`].
    Placeholder(usize),
}

// ============================================================================
// Pattern
// ============================================================================

/// A compiled command pattern.
///
/// Compilation happens once, at registration time; malformed patterns fail
/// there with a [`PatternError`] rather than at match time.
#[derive(Debug, Clone)]
pub struct Pattern {
    text: String,
    segments: Vec<Segment>,
    placeholders: Vec<Placeholder>,
    regex: Regex,
}

impl Pattern {
    /// Parses and compiles a pattern.
    pub fn compile(text: impl Into<String>) -> PatternResult<Self> {
        let text = text.into();
        let (segments, placeholders) = parse(&text)?;

        let mut expression = String::from("^");
        for segment in &segments {
            match segment {
                Segment::Literal(literal) => expression.push_str(&regex::escape(literal)),
                Segment::Placeholder(index) => {
                    expression.push('(');
                    expression.push_str(placeholders[*index].kind.expression());
                    expression.push(')');
                }
            }
        }
        expression.push('$');

        let regex = Regex::new(&expression).map_err(|e| PatternError::Regex {
            pattern: text.clone(),
            reason: e.to_string(),
        })?;

        trace!(pattern = %text, expression = %expression, "Compiled pattern");

        Ok(Self {
            text,
            segments,
            placeholders,
            regex,
        })
    }

    /// The pattern text as written.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The parsed segments in source order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The placeholders in left-to-right order.
    pub fn placeholders(&self) -> &[Placeholder] {
        &self.placeholders
    }

    /// Returns the position of the named placeholder, if declared.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.placeholders.iter().position(|p| p.name == name)
    }

    /// Returns `true` if the placeholder is declared in this pattern.
    pub fn has(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Whole-string test.
    pub fn matches(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Matches `text` against this pattern and captures its parameters.
    pub fn match_text(&self, text: &str) -> MatchResult<Match> {
        let captures = self
            .regex
            .captures(text)
            .ok_or_else(|| MatchError::NoMatch {
                pattern: self.text.clone(),
            })?;

        let params = self
            .placeholders
            .iter()
            .map(|placeholder| Param {
                name: placeholder.name.clone(),
                kind: placeholder.kind,
                value: captures
                    .get(placeholder.position + 1)
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default(),
            })
            .collect();

        Ok(Match::bound(self.text.clone(), params))
    }
}

impl FromStr for Pattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::compile(s)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

// ============================================================================
// Parsing
// ============================================================================

/// Splits pattern text into literal segments and placeholders.
///
/// A `<` with no closing `>` is kept as literal text.
fn parse(text: &str) -> PatternResult<(Vec<Segment>, Vec<Placeholder>)> {
    let mut segments = Vec::new();
    let mut placeholders: Vec<Placeholder> = Vec::new();
    let mut literal = String::new();
    let mut rest = text;

    while let Some(open) = rest.find('<') {
        let after = &rest[open + 1..];
        let Some(close) = after.find('>') else {
            break;
        };

        literal.push_str(&rest[..open]);
        let placeholder = parse_placeholder(text, &after[..close], placeholders.len())?;

        if placeholders.iter().any(|p| p.name == placeholder.name) {
            return Err(PatternError::DuplicatePlaceholder {
                pattern: text.to_string(),
                name: placeholder.name,
            });
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(std::mem::take(&mut literal)));
        }
        segments.push(Segment::Placeholder(placeholders.len()));
        placeholders.push(placeholder);

        rest = &after[close + 1..];
    }

    literal.push_str(rest);
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }

    Ok((segments, placeholders))
}

/// Parses the content between `<` and `>`.
fn parse_placeholder(pattern: &str, tag: &str, position: usize) -> PatternResult<Placeholder> {
    let malformed = || PatternError::MalformedPlaceholder {
        pattern: pattern.to_string(),
        tag: tag.to_string(),
    };

    if tag.contains(|c: char| c.is_whitespace() || c == '<') {
        return Err(malformed());
    }

    let mut parts = tag.split(':');
    let name = parts.next().unwrap_or_default();
    let type_tag = parts.next();
    if parts.next().is_some() {
        return Err(malformed());
    }

    if name.is_empty() {
        return Err(PatternError::EmptyName {
            pattern: pattern.to_string(),
        });
    }

    let kind = match type_tag {
        None => ParamType::String,
        Some(tag) => tag.parse().map_err(|()| PatternError::UnknownType {
            pattern: pattern.to_string(),
            tag: tag.to_string(),
        })?,
    };

    Ok(Placeholder {
        name: name.to_string(),
        kind,
        position,
    })
}
