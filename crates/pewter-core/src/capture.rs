//! Captured parameters of a successful pattern match.

use crate::error::{MatchError, MatchResult};
use crate::pattern::ParamType;

/// A single captured parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub(crate) name: String,
    pub(crate) kind: ParamType,
    pub(crate) value: String,
}

impl Param {
    /// The placeholder name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared placeholder type.
    pub fn kind(&self) -> ParamType {
        self.kind
    }

    /// The captured text.
    pub fn value(&self) -> &str {
        &self.value
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum MatchKind {
    Bound { pattern: String, params: Vec<Param> },
    Dummy,
}

/// The result of matching one input against one [`Pattern`](crate::Pattern).
///
/// A `Match` only exists after a successful match and never changes
/// afterwards. Parameters are kept in the pattern's placeholder order.
///
/// [`Match::dummy`] builds the no-op variant handed to unknown-command
/// handlers: every accessor succeeds with an empty value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    kind: MatchKind,
}

impl Match {
    pub(crate) fn bound(pattern: String, params: Vec<Param>) -> Self {
        Self {
            kind: MatchKind::Bound { pattern, params },
        }
    }

    /// Creates a match that carries no parameters and never fails.
    pub fn dummy() -> Self {
        Self {
            kind: MatchKind::Dummy,
        }
    }

    /// Returns `true` for a [`Match::dummy`].
    pub fn is_dummy(&self) -> bool {
        matches!(self.kind, MatchKind::Dummy)
    }

    /// The text of the pattern that produced this match.
    pub fn pattern(&self) -> Option<&str> {
        match &self.kind {
            MatchKind::Bound { pattern, .. } => Some(pattern),
            MatchKind::Dummy => None,
        }
    }

    /// All captured parameters in placeholder order.
    pub fn params(&self) -> &[Param] {
        match &self.kind {
            MatchKind::Bound { params, .. } => params,
            MatchKind::Dummy => &[],
        }
    }

    /// Returns the captured text of the named parameter.
    pub fn string(&self, name: &str) -> MatchResult<&str> {
        match &self.kind {
            MatchKind::Bound { params, .. } => params
                .iter()
                .find(|p| p.name == name)
                .map(|p| p.value.as_str())
                .ok_or_else(|| MatchError::UnknownParameter {
                    name: name.to_string(),
                }),
            MatchKind::Dummy => Ok(""),
        }
    }

    /// Returns the named parameter parsed as an integer.
    ///
    /// Works for `string` placeholders too, as long as the captured text is
    /// a valid integer.
    pub fn integer(&self, name: &str) -> MatchResult<i64> {
        if self.is_dummy() {
            return Ok(0);
        }

        let value = self.string(name)?;
        value.parse().map_err(|_| MatchError::NumberFormat {
            name: name.to_string(),
            value: value.to_string(),
        })
    }

    /// Returns the captured text at a zero-based placeholder position.
    pub fn at(&self, position: usize) -> MatchResult<&str> {
        match &self.kind {
            MatchKind::Bound { params, .. } => params
                .get(position)
                .map(|p| p.value.as_str())
                .ok_or(MatchError::PositionOutOfRange {
                    position,
                    count: params.len(),
                }),
            MatchKind::Dummy => Ok(""),
        }
    }
}
