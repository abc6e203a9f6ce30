//! CSS3 tokenization and combinator-style parsing for the Sable engine.
//!
//! # Scope
//!
//! This crate implements:
//! - **CSS Tokenizer** ([§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization))
//!   - All token types: ident, function, at-keyword, hash, string, url, number, dimension, etc.
//!   - Escape sequences with the U+FFFD replacement policy
//!   - Unicode ranges, comments, and the `Bad*` recovery tokens
//!
//! - **Backtracking token stream**
//!   - A persistent state chain shared by cheap tokenizer clones
//!   - O(1) snapshot and restore that never re-lexes input
//!
//! - **Scoped Parser** ([§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing))
//!   - Delimiter-bounded views that cannot read past their scope
//!   - Lazy block skipping with correct nesting under error recovery
//!   - Combinators: `try_parse`, `parse_entirely`, `parse_comma_separated`,
//!     `parse_until_before`, `parse_until_after`, `parse_nested_block`
//!
//! - **The An+B microsyntax** ([§ 6](https://www.w3.org/TR/css-syntax-3/#anb-microsyntax))
//!
//! # Not Implemented
//!
//! - Property value parsing
//! - Stylesheet, rule, and declaration grammars

/// Parse errors and source positions.
pub mod error;
/// CSS lexing per [§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization).
mod lexer;
/// The `An+B` microsyntax per [§ 6](https://www.w3.org/TR/css-syntax-3/#anb-microsyntax).
pub mod nth;
/// Scoped parsing per [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing).
pub mod parser;
/// Input preprocessing per [§ 3.3](https://www.w3.org/TR/css-syntax-3/#input-preprocessing).
mod reader;
/// Token definitions per [§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization).
pub mod token;
/// The backtracking token stream.
pub mod tokenizer;

pub use error::{ParseError, ParseErrorKind, SourceLocation, SourcePosition};
pub use nth::{parse_nth, Nth};
pub use parser::{Parser, ParserState};
pub use token::{BlockType, Delimiters, Number, Token};
pub use tokenizer::{State, Tokenizer};
