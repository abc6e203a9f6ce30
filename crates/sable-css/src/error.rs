//! Parse error types shared by every grammar built on [`crate::Parser`].

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::token::Token;

/// A flat character offset into the source text.
///
/// Positions are only meaningful against the text they were taken from and
/// are never mutated after creation. They are produced by the tokenizer and
/// consumed by its slicing operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct SourcePosition(pub usize);

/// A zero-based line/column pair into the source text.
///
/// Used for error reporting; never mutated after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SourceLocation {
    /// Zero-based line index.
    pub line: u32,
    /// Zero-based column index within the line.
    pub column: u32,
}

impl SourceLocation {
    /// Create a [`ParseError`] of the given kind at this location.
    #[must_use]
    pub const fn new_error(self, kind: ParseErrorKind) -> ParseError {
        ParseError {
            kind,
            location: self,
        }
    }

    /// Create an [`ParseErrorKind::UnexpectedToken`] error at this location.
    #[must_use]
    pub const fn new_unexpected_token_error(self, token: Token) -> ParseError {
        self.new_error(ParseErrorKind::UnexpectedToken(token))
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// The category of a parse failure.
///
/// Parse failures are ordinary return values, not exceptions; callers decide
/// whether to recover (via [`crate::Parser::try_parse`]) or to bubble the
/// error up the call chain with `?`.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
pub enum ParseErrorKind {
    /// More input was expected, but the token stream (or the enclosing
    /// delimiter scope) ended.
    #[error("unexpected end of input")]
    EndOfFile,

    /// Trailing unconsumed input remained after a construct that was
    /// required to consume its input entirely.
    #[error("unexhausted input")]
    Unexhausted,

    /// The grammar did not allow the token that was read. Carries the
    /// offending token for diagnostics.
    #[error("unexpected token: {0}")]
    UnexpectedToken(Token),

    /// A deliberately unimplemented grammar branch was reached.
    #[error("unsupported feature")]
    UnsupportedFeature,

    /// Fallback kind for failures that carry no further detail.
    #[error("unknown parse error")]
    Unknown,
}

/// A parse failure tagged with the [`SourceLocation`] it occurred at.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[error("{kind} at {location}")]
pub struct ParseError {
    /// What went wrong.
    pub kind: ParseErrorKind,
    /// Where it went wrong.
    pub location: SourceLocation,
}
