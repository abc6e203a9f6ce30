//! The parsed selector data model.
//!
//! [Selectors Level 3](https://www.w3.org/TR/selectors-3/)
//!
//! A [`Selector`] stores its components in **matching order**: the rightmost
//! compound selector first, then the combinator joining it leftward, and so
//! on. Matching always starts at the candidate element and walks toward the
//! root, so this inversion avoids reversing the list on every match. Within
//! a compound selector the components keep their source order.

use std::fmt;
use std::fmt::Write;

use sable_css::nth::Nth;
use serde::Serialize;
use strum_macros::{Display, EnumIter, EnumString};

use crate::builder::{Specificity, HAS_PSEUDO_ELEMENT};

/// A namespace URL, e.g. `http://www.w3.org/1999/xhtml`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct NamespaceUrl(pub String);

/// A declared namespace prefix, e.g. `svg` in `@namespace svg url(...)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamespacePrefix(pub String);

/// An element type name together with its ASCII-lowercased form.
///
/// The lowercased form is kept because HTML matches type selectors
/// case-insensitively while XML does not; precomputing it at parse time
/// keeps the per-element check allocation-free.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalName {
    /// The name as written.
    pub name: String,
    /// The ASCII-lowercased name.
    pub lower_name: String,
}

impl LocalName {
    /// Build a local name, precomputing the lowercased form.
    #[must_use]
    pub fn new(name: String) -> Self {
        let lower_name = name.to_ascii_lowercase();
        Self { name, lower_name }
    }
}

/// [§ 7. Pseudo-elements](https://www.w3.org/TR/selectors-3/#pseudo-elements)
///
/// "A pseudo-element is made of two colons (`::`) followed by the name of
/// the pseudo-element. This `::` notation is introduced ... In order to be
/// compatible with existing style sheets, user agents must also accept the
/// previous one-colon notation for pseudo-elements introduced in CSS levels
/// 1 and 2."
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter, Serialize,
)]
#[strum(serialize_all = "kebab-case")]
pub enum PseudoElement {
    /// `::before`
    Before,
    /// `::after`
    After,
    /// `::selection`
    Selection,
    /// `::first-letter`
    FirstLetter,
    /// `::first-line`
    FirstLine,
    /// `::placeholder`
    Placeholder,
}

impl PseudoElement {
    /// Whether the CSS2 one-colon spelling is accepted for this
    /// pseudo-element.
    #[must_use]
    pub const fn allows_single_colon(self) -> bool {
        matches!(
            self,
            Self::Before | Self::After | Self::FirstLetter | Self::FirstLine
        )
    }
}

/// [§ 6.6 Pseudo-classes](https://www.w3.org/TR/selectors-3/#pseudo-classes)
///
/// The non-tree-structural pseudo-classes: those whose truth depends on
/// element state the document tree alone cannot answer, delegated to the
/// [`Element`](crate::element::Element) collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Display, EnumString, EnumIter, Serialize)]
#[strum(serialize_all = "kebab-case")]
pub enum NonTSPseudoClass {
    /// `:active`
    Active,
    /// `:checked`
    Checked,
    /// `:disabled`
    Disabled,
    /// `:enabled`
    Enabled,
    /// `:focus`
    Focus,
    /// `:fullscreen`
    Fullscreen,
    /// `:hover`
    Hover,
    /// `:indeterminate`
    Indeterminate,
    /// `:lang(..)`, the one functional pseudo-class in this set.
    #[strum(disabled)]
    Lang(String),
    /// `:link`
    Link,
    /// `:placeholder-shown`
    PlaceholderShown,
    /// `:read-write`
    ReadWrite,
    /// `:read-only`
    ReadOnly,
    /// `:target`
    Target,
    /// `:visited`
    Visited,
}

/// [§ 8. Combinators](https://www.w3.org/TR/selectors-3/#combinators)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Combinator {
    /// `A > B`
    Child,
    /// `A B`
    Descendant,
    /// `A + B`
    NextSibling,
    /// `A ~ B`
    LaterSibling,
    /// The synthetic combinator separating a compound selector from its
    /// trailing pseudo-element; never written in source.
    PseudoElement,
}

impl Combinator {
    /// Whether the left-hand compound selector constrains an ancestor of
    /// the element the right-hand side matched.
    #[must_use]
    pub const fn is_ancestor(self) -> bool {
        matches!(self, Self::Child | Self::Descendant)
    }

    /// Whether the left-hand compound selector constrains a sibling.
    #[must_use]
    pub const fn is_sibling(self) -> bool {
        matches!(self, Self::NextSibling | Self::LaterSibling)
    }
}

/// [§ 6.3 Attribute selectors](https://www.w3.org/TR/selectors-3/#attribute-selectors)
///
/// The six value-comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AttrSelectorOperator {
    /// `[attr=value]`
    Equal,
    /// `[attr~=value]`
    Includes,
    /// `[attr|=value]`
    DashMatch,
    /// `[attr^=value]`
    Prefix,
    /// `[attr*=value]`
    Substring,
    /// `[attr$=value]`
    Suffix,
}

impl AttrSelectorOperator {
    /// Apply the operator to an actual attribute value.
    #[must_use]
    pub fn eval(self, actual: &str, expected: &str, case_sensitive: bool) -> bool {
        if case_sensitive {
            self.eval_exact(actual, expected)
        } else {
            self.eval_exact(
                &actual.to_ascii_lowercase(),
                &expected.to_ascii_lowercase(),
            )
        }
    }

    fn eval_exact(self, actual: &str, expected: &str) -> bool {
        match self {
            Self::Equal => actual == expected,
            Self::Includes => actual.split_ascii_whitespace().any(|word| word == expected),
            Self::DashMatch => {
                actual == expected
                    || (actual.starts_with(expected) && actual[expected.len()..].starts_with('-'))
            }
            Self::Prefix => actual.starts_with(expected),
            Self::Substring => actual.contains(expected),
            Self::Suffix => actual.ends_with(expected),
        }
    }
}

impl fmt::Display for AttrSelectorOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Equal => "=",
            Self::Includes => "~=",
            Self::DashMatch => "|=",
            Self::Prefix => "^=",
            Self::Substring => "*=",
            Self::Suffix => "$=",
        })
    }
}

/// What an attribute selector tests once the attribute is found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum AttrSelectorOperation {
    /// `[attr]` — presence only.
    Exists,
    /// `[attr <op> value]` with an optional `i` case flag.
    WithValue {
        /// The comparison operator.
        operator: AttrSelectorOperator,
        /// False when the `i` flag was present.
        case_sensitive: bool,
        /// The expected value as written.
        expected_value: String,
    },
}

/// The namespace an attribute selector constrains, when one was written
/// explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum NamespaceConstraint {
    /// `*|attr`
    Any,
    /// `prefix|attr`
    Specific(NamespacePrefix, NamespaceUrl),
}

/// The spilled-out form of a namespaced attribute selector, boxed to keep
/// the common [`Component`] variants small.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttrSelectorWithNamespace {
    /// The explicit namespace constraint.
    pub namespace: NamespaceConstraint,
    /// Attribute local name as written.
    pub local_name: String,
    /// ASCII-lowercased local name.
    pub local_name_lower: String,
    /// The value test.
    pub operation: AttrSelectorOperation,
    /// True when the test provably cannot match any value.
    pub never_matches: bool,
}

/// One atomic piece of a compound selector.
///
/// A `Combinator` component never appears inside a `Negation`'s inner list;
/// negation only holds simple selectors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Component {
    /// The joint between two compound selectors.
    Combinator(Combinator),

    /// The implicit namespace recorded when no explicit type selector was
    /// written but the context declares a default namespace.
    DefaultNamespace(NamespaceUrl),
    /// `|element` — no namespace.
    ExplicitNoNamespace,
    /// `*|element` — any namespace.
    ExplicitAnyNamespace,
    /// `prefix|element`.
    Namespace(NamespacePrefix, NamespaceUrl),

    /// A type selector, e.g. `div`.
    LocalName(LocalName),
    /// `*`
    ExplicitUniversalType,

    /// `#id`
    ID(String),
    /// `.class`
    Class(String),

    /// `::name` (or the CSS2 `:name` spelling where permitted).
    PseudoElement(PseudoElement),
    /// A state pseudo-class, e.g. `:hover`.
    NonTSPseudoClass(NonTSPseudoClass),

    /// `:not(..)` over a list of simple selectors.
    Negation(Vec<Component>),

    /// `:first-child`
    FirstChild,
    /// `:last-child`
    LastChild,
    /// `:only-child`
    OnlyChild,
    /// `:first-of-type`
    FirstOfType,
    /// `:last-of-type`
    LastOfType,
    /// `:only-of-type`
    OnlyOfType,
    /// `:root`
    Root,
    /// `:empty`
    Empty,
    /// `:scope`
    Scope,
    /// `:host`
    Host,

    /// `:nth-child(An+B)`
    NthChild(Nth),
    /// `:nth-of-type(An+B)`
    NthOfType(Nth),
    /// `:nth-last-child(An+B)`
    NthLastChild(Nth),
    /// `:nth-last-of-type(An+B)`
    NthLastOfType(Nth),

    /// `[attr]` with no namespace: presence test.
    AttributeInNoNamespaceExists {
        /// Attribute local name as written.
        local_name: String,
        /// ASCII-lowercased local name.
        local_name_lower: String,
    },
    /// `[attr <op> value]` with no namespace.
    AttributeInNoNamespace {
        /// Attribute local name as written.
        local_name: String,
        /// ASCII-lowercased local name.
        local_name_lower: String,
        /// The comparison operator.
        operator: AttrSelectorOperator,
        /// The expected value as written.
        value: String,
        /// False when the `i` flag was present.
        case_sensitive: bool,
        /// True when the test provably cannot match any value.
        never_matches: bool,
    },
    /// Any attribute selector with an explicit namespace.
    AttributeOther(Box<AttrSelectorWithNamespace>),
}

impl Component {
    /// The combinator this component is, if it is one.
    #[must_use]
    pub const fn as_combinator(&self) -> Option<Combinator> {
        match self {
            Self::Combinator(combinator) => Some(*combinator),
            _ => None,
        }
    }
}

/// A complete parsed selector: matching-order components plus packed
/// specificity and the pseudo-element flag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Selector {
    pub(crate) components: Vec<Component>,
    pub(crate) specificity_and_flags: u32,
}

impl Selector {
    pub(crate) const fn new(components: Vec<Component>, specificity_and_flags: u32) -> Self {
        Self {
            components,
            specificity_and_flags,
        }
    }

    /// The packed specificity, high-to-low: id, class-level, element-level
    /// counts in 10-bit fields.
    #[must_use]
    pub const fn specificity(&self) -> u32 {
        self.specificity_and_flags & !HAS_PSEUDO_ELEMENT
    }

    /// The unpacked specificity counts.
    #[must_use]
    pub fn specificity_counts(&self) -> Specificity {
        Specificity::from_packed(self.specificity())
    }

    /// Whether this selector ends in a pseudo-element.
    #[must_use]
    pub const fn has_pseudo_element(&self) -> bool {
        self.specificity_and_flags & HAS_PSEUDO_ELEMENT != 0
    }

    /// The components in matching order.
    #[must_use]
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Iterate the rightmost compound selector; [`SelectorIter::next_sequence`]
    /// steps across each combinator boundary.
    #[must_use]
    pub fn iter(&self) -> SelectorIter<'_> {
        SelectorIter {
            iter: self.components.iter(),
            next_combinator: None,
        }
    }
}

/// An iterator over one compound selector at a time, in matching order.
///
/// `next()` yields components until the current compound selector is
/// exhausted, then `None`; calling [`SelectorIter::next_sequence`] consumes
/// the stashed combinator and moves on to the next compound selector.
#[derive(Clone)]
pub struct SelectorIter<'a> {
    iter: std::slice::Iter<'a, Component>,
    next_combinator: Option<Combinator>,
}

impl SelectorIter<'_> {
    /// The combinator separating the compound selector just iterated from
    /// the next one, if any. Must only be called once `next()` has returned
    /// `None`.
    pub fn next_sequence(&mut self) -> Option<Combinator> {
        self.next_combinator.take()
    }
}

impl<'a> Iterator for SelectorIter<'a> {
    type Item = &'a Component;

    fn next(&mut self) -> Option<Self::Item> {
        debug_assert!(
            self.next_combinator.is_none(),
            "next() called before next_sequence() consumed the combinator"
        );
        let component = self.iter.next()?;
        if let Some(combinator) = component.as_combinator() {
            self.next_combinator = Some(combinator);
            return None;
        }
        Some(component)
    }
}

/// A comma-separated list of selectors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectorList {
    /// The selectors in source order.
    pub selectors: Vec<Selector>,
}

/// Serialization back to CSS source.
pub trait ToCss {
    /// Write the CSS representation of `self`.
    ///
    /// # Errors
    ///
    /// Propagates formatting failures from the destination.
    fn to_css<W: Write>(&self, dest: &mut W) -> fmt::Result;

    /// The CSS representation of `self` as a fresh string.
    fn to_css_string(&self) -> String {
        let mut result = String::new();
        self.to_css(&mut result)
            .unwrap_or_else(|_| unreachable!("writing to a String cannot fail"));
        result
    }
}

impl ToCss for Combinator {
    fn to_css<W: Write>(&self, dest: &mut W) -> fmt::Result {
        match self {
            Self::Child => dest.write_str(" > "),
            Self::Descendant => dest.write_str(" "),
            Self::NextSibling => dest.write_str(" + "),
            Self::LaterSibling => dest.write_str(" ~ "),
            Self::PseudoElement => Ok(()),
        }
    }
}

impl ToCss for Nth {
    fn to_css<W: Write>(&self, dest: &mut W) -> fmt::Result {
        write!(dest, "{}n{:+}", self.a, self.b)
    }
}

impl ToCss for Component {
    fn to_css<W: Write>(&self, dest: &mut W) -> fmt::Result {
        match self {
            Self::Combinator(combinator) => combinator.to_css(dest),
            // the implicit default namespace is not written in source
            Self::DefaultNamespace(_) => Ok(()),
            Self::ExplicitNoNamespace => dest.write_str("|"),
            Self::ExplicitAnyNamespace => dest.write_str("*|"),
            Self::Namespace(prefix, _) => write!(dest, "{}|", prefix.0),
            Self::LocalName(local_name) => dest.write_str(&local_name.name),
            Self::ExplicitUniversalType => dest.write_str("*"),
            Self::ID(id) => write!(dest, "#{id}"),
            Self::Class(class) => write!(dest, ".{class}"),
            Self::PseudoElement(pseudo) => write!(dest, "::{pseudo}"),
            Self::NonTSPseudoClass(NonTSPseudoClass::Lang(lang)) => {
                write!(dest, ":lang({lang})")
            }
            Self::NonTSPseudoClass(pseudo) => write!(dest, ":{pseudo}"),
            Self::Negation(inner) => {
                dest.write_str(":not(")?;
                for component in inner {
                    component.to_css(dest)?;
                }
                dest.write_str(")")
            }
            Self::FirstChild => dest.write_str(":first-child"),
            Self::LastChild => dest.write_str(":last-child"),
            Self::OnlyChild => dest.write_str(":only-child"),
            Self::FirstOfType => dest.write_str(":first-of-type"),
            Self::LastOfType => dest.write_str(":last-of-type"),
            Self::OnlyOfType => dest.write_str(":only-of-type"),
            Self::Root => dest.write_str(":root"),
            Self::Empty => dest.write_str(":empty"),
            Self::Scope => dest.write_str(":scope"),
            Self::Host => dest.write_str(":host"),
            Self::NthChild(nth) => {
                dest.write_str(":nth-child(")?;
                nth.to_css(dest)?;
                dest.write_str(")")
            }
            Self::NthOfType(nth) => {
                dest.write_str(":nth-of-type(")?;
                nth.to_css(dest)?;
                dest.write_str(")")
            }
            Self::NthLastChild(nth) => {
                dest.write_str(":nth-last-child(")?;
                nth.to_css(dest)?;
                dest.write_str(")")
            }
            Self::NthLastOfType(nth) => {
                dest.write_str(":nth-last-of-type(")?;
                nth.to_css(dest)?;
                dest.write_str(")")
            }
            Self::AttributeInNoNamespaceExists { local_name, .. } => {
                write!(dest, "[{local_name}]")
            }
            Self::AttributeInNoNamespace {
                local_name,
                operator,
                value,
                case_sensitive,
                ..
            } => {
                write!(dest, "[{local_name}{operator}\"{value}\"")?;
                if !case_sensitive {
                    dest.write_str(" i")?;
                }
                dest.write_str("]")
            }
            Self::AttributeOther(attr) => {
                dest.write_str("[")?;
                match &attr.namespace {
                    NamespaceConstraint::Any => dest.write_str("*|")?,
                    NamespaceConstraint::Specific(prefix, _) => write!(dest, "{}|", prefix.0)?,
                }
                dest.write_str(&attr.local_name)?;
                match &attr.operation {
                    AttrSelectorOperation::Exists => {}
                    AttrSelectorOperation::WithValue {
                        operator,
                        case_sensitive,
                        expected_value,
                    } => {
                        write!(dest, "{operator}\"{expected_value}\"")?;
                        if !case_sensitive {
                            dest.write_str(" i")?;
                        }
                    }
                }
                dest.write_str("]")
            }
        }
    }
}

impl ToCss for Selector {
    /// Selectors are stored in matching order, so serialization walks the
    /// compound selectors in reverse.
    fn to_css<W: Write>(&self, dest: &mut W) -> fmt::Result {
        // split into compound runs and the combinators between them
        let mut compounds: Vec<&[Component]> = Vec::new();
        let mut combinators: Vec<Combinator> = Vec::new();
        let mut start = 0;
        for (i, component) in self.components.iter().enumerate() {
            if let Some(combinator) = component.as_combinator() {
                compounds.push(&self.components[start..i]);
                combinators.push(combinator);
                start = i + 1;
            }
        }
        compounds.push(&self.components[start..]);

        // matching order is right-to-left; source order is left-to-right
        for (i, compound) in compounds.iter().enumerate().rev() {
            for component in *compound {
                component.to_css(dest)?;
            }
            if i > 0 {
                combinators[i - 1].to_css(dest)?;
            }
        }
        Ok(())
    }
}

impl ToCss for SelectorList {
    fn to_css<W: Write>(&self, dest: &mut W) -> fmt::Result {
        for (i, selector) in self.selectors.iter().enumerate() {
            if i > 0 {
                dest.write_str(", ")?;
            }
            selector.to_css(dest)?;
        }
        Ok(())
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_css(f)
    }
}

impl fmt::Display for SelectorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_css(f)
    }
}
