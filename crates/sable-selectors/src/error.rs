//! Selector grammar errors, layered over the core parse errors.

use std::fmt;

use sable_css::{ParseError, ParseErrorKind, SourceLocation, Token};
use serde::Serialize;
use thiserror::Error;

/// What went wrong while parsing a selector.
///
/// The selector grammar surfaces its own failure vocabulary on top of the
/// token-level taxonomy; anything the underlying combinators report passes
/// through as [`SelectorParseErrorKind::Parse`].
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
pub enum SelectorParseErrorKind {
    /// A token-level failure from the underlying parser.
    #[error("{0}")]
    Parse(ParseErrorKind),
    /// A combinator with no compound selector after it.
    #[error("dangling combinator")]
    DanglingCombinator,
    /// Nothing recognizable at the start of a selector.
    #[error("unknown selector")]
    UnknownSelector,
    /// `.` not followed by an identifier.
    #[error("expected identifier after `.`")]
    ClassNeedsIdentifier,
    /// `:` not followed by an identifier or function name.
    #[error("expected identifier after `:`")]
    PseudoNeedsIdentifier,
    /// `::` not followed by a pseudo-element name.
    #[error("expected pseudo-element name after `::`")]
    NoIdentifierForPseudo(Token),
    /// A pseudo-element spelling missing its leading colon.
    #[error("expected `:` before pseudo-element")]
    PseudoElementExpectedColon,
    /// A namespace prefix with no declaration in the parse context.
    #[error("unresolvable namespace prefix")]
    ExpectedNamespace,
    /// A malformed local name after an explicit `prefix|`.
    #[error("unexpected token after explicit namespace")]
    ExplicitNamespaceUnexpectedToken(Token),
    /// `:not()` with nothing inside.
    #[error("empty negation")]
    EmptyNegation,
    /// A pseudo-element or nested negation inside `:not(...)`.
    #[error("non-simple selector in negation")]
    NonSimpleSelectorInNegation,
    /// `[...]` with no attribute name at all.
    #[error("expected qualified name in attribute selector")]
    NoQualifiedNameInAttributeSelector,
    /// A qualified name shape that is illegal inside `[...]`.
    #[error("invalid qualified name in attribute selector")]
    InvalidQualifiedNameInAttributeSelector,
    /// A `|` where the attribute grammar does not allow one.
    #[error("unexpected `|` in attribute selector")]
    ExpectedBarAttributeSelector,
    /// Any other token the attribute grammar cannot place.
    #[error("unexpected token in attribute selector")]
    UnexpectedTokenInAttributeSelector(Token),
}

/// A selector parse failure tagged with the location it occurred at.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
pub struct SelectorParseError {
    /// What went wrong.
    pub kind: SelectorParseErrorKind,
    /// Where it went wrong.
    pub location: SourceLocation,
}

impl SelectorParseError {
    /// An error of the given kind at the given location.
    #[must_use]
    pub const fn new(kind: SelectorParseErrorKind, location: SourceLocation) -> Self {
        Self { kind, location }
    }
}

impl fmt::Display for SelectorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.kind, self.location)
    }
}

impl From<ParseError> for SelectorParseError {
    fn from(error: ParseError) -> Self {
        Self {
            kind: SelectorParseErrorKind::Parse(error.kind),
            location: error.location,
        }
    }
}
