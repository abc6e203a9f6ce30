//! Selector parsing and matching for the `sable` engine.
//!
//! Implements [Selectors Level 3](https://www.w3.org/TR/selectors-3/) on top
//! of the `sable-css` parser combinators:
//!
//! - Parsing selector lists into a matching-order component model with
//!   packed specificity.
//! - A backtracking matching engine over any tree that implements
//!   [`Element`].
//! - Bloom-filter rejection of selectors via precomputed ancestor hashes.
//! - A [`SelectorMap`] that buckets rules by their most selective feature.
//!
//! Not implemented:
//!
//! - Selectors Level 4 grammar (`:is()`, `:where()`, complex `:not()`).
//! - Functional pseudo-elements.
//! - Namespaced attribute matching against elements.

pub mod bloom;
pub mod builder;
pub mod element;
pub mod error;
pub mod hashes;
pub mod map;
pub mod matching;
pub mod parser;
pub mod selector;

pub use bloom::{BloomFilter, StyleBloom};
pub use builder::Specificity;
pub use element::Element;
pub use error::{SelectorParseError, SelectorParseErrorKind};
pub use hashes::AncestorHashes;
pub use map::{ApplicableDeclarationBlock, Rule, SelectorMap};
pub use matching::{matches_selector, MatchingContext, QuirksMode};
pub use parser::{parse_selector, DefaultSelectorContext, SelectorParserContext};
pub use selector::{
    Combinator, Component, LocalName, NamespacePrefix, NamespaceUrl, NonTSPseudoClass,
    PseudoElement, Selector, SelectorIter, SelectorList, ToCss,
};
