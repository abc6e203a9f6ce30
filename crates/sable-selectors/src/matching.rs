//! The matching engine: deciding whether a parsed selector matches an
//! element of a document tree.
//!
//! [Selectors Level 3 § 3. Case sensitivity](https://www.w3.org/TR/selectors-3/#casesens)
//! governs the quirks-mode switches; the rest of the module implements the
//! per-combinator backtracking walk.

use crate::bloom::BloomFilter;
use crate::element::Element;
use crate::hashes::AncestorHashes;
use crate::selector::{
    AttrSelectorOperation, Combinator, Component, NamespaceConstraint, Selector, SelectorIter,
};
use sable_css::nth::Nth;

/// How lenient matching is about character case, decided by the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuirksMode {
    /// Standards mode: names, ids and classes compare case-sensitively.
    #[default]
    NoQuirks,
    /// Limited quirks mode: compares like standards mode.
    LimitedQuirks,
    /// Quirks mode: local names, ids and classes compare
    /// ASCII-case-insensitively.
    Quirks,
}

impl QuirksMode {
    /// Whether name-like comparisons are case-insensitive under this mode.
    #[must_use]
    pub const fn classes_and_ids_case_sensitive(self) -> bool {
        !matches!(self, Self::Quirks)
    }
}

/// Shared state for one matching run.
pub struct MatchingContext<'a> {
    /// A filter over the ancestor chain of the element being matched, used
    /// to reject selectors early. `None` disables the fast path.
    pub bloom_filter: Option<&'a BloomFilter>,
    /// The document's case-sensitivity regime.
    pub quirks_mode: QuirksMode,
}

impl<'a> MatchingContext<'a> {
    /// A context with the given filter and quirks mode.
    #[must_use]
    pub const fn new(bloom_filter: Option<&'a BloomFilter>, quirks_mode: QuirksMode) -> Self {
        Self {
            bloom_filter,
            quirks_mode,
        }
    }
}

/// The outcome of matching a suffix of a complex selector, directing the
/// backtracking walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MatchResult {
    /// Everything matched.
    Matched,
    /// No candidate element anywhere can recover this failure.
    NotMatchedGlobally,
    /// Retrying against a later-sibling candidate cannot help, but an
    /// element closer to the subject on the descendant axis might.
    NotMatchedRestartFromClosestDescendant,
    /// A later-sibling candidate might still match.
    NotMatchedRestartFromClosestLaterSibling,
}

/// Whether `selector` matches `element`.
///
/// When the context carries a Bloom filter, `hashes` lets the engine reject
/// the selector without walking the tree; a rejected selector is guaranteed
/// not to match.
#[must_use]
pub fn matches_selector<E: Element>(
    selector: &Selector,
    hashes: Option<&AncestorHashes>,
    element: &E,
    context: &MatchingContext<'_>,
) -> bool {
    if let (Some(filter), Some(hashes)) = (context.bloom_filter, hashes) {
        if !hashes.may_match(filter) {
            return false;
        }
    }

    matches!(
        matches_complex_selector(selector.iter(), element, context),
        MatchResult::Matched
    )
}

/// Whether the complex selector behind `iter` matches `element`.
fn matches_complex_selector<E: Element>(
    iter: SelectorIter<'_>,
    element: &E,
    context: &MatchingContext<'_>,
) -> MatchResult {
    matches_complex_selector_internal(iter, element, context)
}

/// Match the rightmost compound of `selector_iter` against `element`, then
/// recurse leftwards across the next combinator, backtracking through
/// candidate elements as the combinator allows.
fn matches_complex_selector_internal<E: Element>(
    mut selector_iter: SelectorIter<'_>,
    element: &E,
    context: &MatchingContext<'_>,
) -> MatchResult {
    let compound_matches = matches_compound_selector(&mut selector_iter, element, context);

    if !compound_matches {
        return MatchResult::NotMatchedRestartFromClosestLaterSibling;
    }

    let Some(combinator) = selector_iter.next_sequence() else {
        return MatchResult::Matched;
    };

    let candidate_not_found = if combinator.is_sibling() {
        MatchResult::NotMatchedRestartFromClosestDescendant
    } else {
        MatchResult::NotMatchedGlobally
    };

    let mut next_element = next_element_for_combinator(element, combinator);

    loop {
        let Some(candidate) = next_element else {
            return candidate_not_found;
        };

        let result =
            matches_complex_selector_internal(selector_iter.clone(), &candidate, context);

        match (result, combinator) {
            // the whole left-hand side matched
            (MatchResult::Matched, _) => return result,
            (MatchResult::NotMatchedGlobally, _) => return result,

            // child and pseudo-element combinators admit exactly one
            // candidate each, so a failure cannot be retried here
            (_, Combinator::Child | Combinator::PseudoElement) => {
                return MatchResult::NotMatchedRestartFromClosestDescendant;
            }
            (_, Combinator::NextSibling) => return result,

            (
                MatchResult::NotMatchedRestartFromClosestDescendant,
                Combinator::LaterSibling,
            ) => {
                return MatchResult::NotMatchedRestartFromClosestDescendant;
            }

            // keep walking the axis
            (
                MatchResult::NotMatchedRestartFromClosestLaterSibling,
                Combinator::Descendant | Combinator::LaterSibling,
            )
            | (MatchResult::NotMatchedRestartFromClosestDescendant, Combinator::Descendant) => {
                next_element = next_element_for_combinator(&candidate, combinator);
            }
        }
    }
}

/// The next candidate along `combinator`'s axis starting from `element`.
fn next_element_for_combinator<E: Element>(element: &E, combinator: Combinator) -> Option<E> {
    match combinator {
        Combinator::Child | Combinator::Descendant => element.parent(),
        Combinator::NextSibling | Combinator::LaterSibling => element.previous_sibling(),
        Combinator::PseudoElement => element.owner(),
    }
}

/// Match one compound selector (everything up to the next combinator in
/// `selector_iter`) against `element`.
///
/// Components are checked cheapest-reject-first: local name, then id, then
/// classes, then everything else.
fn matches_compound_selector<E: Element>(
    selector_iter: &mut SelectorIter<'_>,
    element: &E,
    context: &MatchingContext<'_>,
) -> bool {
    let components: Vec<&Component> = selector_iter.by_ref().collect();

    // rank 0: local name, 1: id, 2: classes, 3: everything else
    let check_rank = |component: &Component| match component {
        Component::LocalName(_) => 0,
        Component::ID(_) => 1,
        Component::Class(_) => 2,
        _ => 3,
    };

    for rank in 0..4 {
        for component in &components {
            if check_rank(component) == rank
                && !matches_simple_selector(component, element, context)
            {
                return false;
            }
        }
    }

    true
}

/// Match one simple selector against `element`.
fn matches_simple_selector<E: Element>(
    component: &Component,
    element: &E,
    context: &MatchingContext<'_>,
) -> bool {
    let case_sensitive = context.quirks_mode.classes_and_ids_case_sensitive();

    match component {
        Component::Combinator(_) => unreachable!("combinators are consumed by the iterator"),

        Component::LocalName(local_name) => {
            let name = element.local_name();
            if case_sensitive {
                name == local_name.name
            } else {
                name.eq_ignore_ascii_case(&local_name.lower_name)
            }
        }
        Component::ExplicitUniversalType => true,

        Component::ExplicitAnyNamespace => true,
        Component::ExplicitNoNamespace => element.namespace().is_none(),
        Component::DefaultNamespace(url) | Component::Namespace(_, url) => {
            element.namespace() == Some(url)
        }

        Component::ID(id) => element.has_id(id, case_sensitive),
        Component::Class(class) => element.has_class(class, case_sensitive),

        Component::AttributeInNoNamespaceExists { local_name, .. } => {
            element.attribute(local_name).is_some()
        }
        Component::AttributeInNoNamespace {
            local_name,
            operator,
            value,
            case_sensitive,
            never_matches,
            ..
        } => {
            if *never_matches {
                return false;
            }
            element
                .attribute(local_name)
                .is_some_and(|actual| operator.eval(actual, value, *case_sensitive))
        }
        Component::AttributeOther(attr) => {
            if attr.never_matches {
                return false;
            }
            match &attr.namespace {
                // namespaced attributes are not modeled on elements
                NamespaceConstraint::Specific(..) => false,
                NamespaceConstraint::Any => match &attr.operation {
                    AttrSelectorOperation::Exists => {
                        element.attribute(&attr.local_name).is_some()
                    }
                    AttrSelectorOperation::WithValue {
                        operator,
                        case_sensitive,
                        expected_value,
                    } => element
                        .attribute(&attr.local_name)
                        .is_some_and(|actual| operator.eval(actual, expected_value, *case_sensitive)),
                },
            }
        }

        Component::NonTSPseudoClass(pseudo_class) => {
            element.match_non_ts_pseudo_class(pseudo_class)
        }
        Component::PseudoElement(pseudo_element) => element.match_pseudo_element(pseudo_element),

        Component::FirstChild => element.previous_sibling().is_none(),
        Component::LastChild => element.next_sibling().is_none(),
        Component::OnlyChild => {
            element.previous_sibling().is_none() && element.next_sibling().is_none()
        }
        Component::Root => element.is_root(),
        Component::Empty => element.is_empty(),

        Component::FirstOfType => sibling_index_of_type(element, false) == 1,
        Component::LastOfType => sibling_index_of_type(element, true) == 1,
        Component::OnlyOfType => {
            sibling_index_of_type(element, false) == 1 && sibling_index_of_type(element, true) == 1
        }

        Component::NthChild(nth) => nth_matches(nth, sibling_index(element, false)),
        Component::NthLastChild(nth) => nth_matches(nth, sibling_index(element, true)),
        Component::NthOfType(nth) => nth_matches(nth, sibling_index_of_type(element, false)),
        Component::NthLastOfType(nth) => nth_matches(nth, sibling_index_of_type(element, true)),

        // matches only when none of the negated simple selectors do
        Component::Negation(components) => !components
            .iter()
            .any(|negated| matches_simple_selector(negated, element, context)),

        // matching contexts for these are not modeled
        Component::Scope | Component::Host => false,
    }
}

/// [§ 6.6.5.2 :nth-child() pseudo-class](https://www.w3.org/TR/selectors-3/#nth-child-pseudo)
///
/// "Represents an element that has an+b-1 siblings before it in the
/// document tree, for any positive integer or zero value of n."
fn nth_matches(nth: &Nth, index: i32) -> bool {
    let an = index - nth.b;
    if nth.a == 0 {
        // a fixed index: matches exactly when index == b
        return an == 0;
    }
    // an must be a non-negative multiple of a
    let n = an / nth.a;
    n >= 0 && nth.a * n == an
}

/// The 1-based position of `element` among its sibling elements, from the
/// end when `from_end`.
fn sibling_index<E: Element>(element: &E, from_end: bool) -> i32 {
    let mut index = 1;
    let mut current = element.clone();
    loop {
        let sibling = if from_end {
            current.next_sibling()
        } else {
            current.previous_sibling()
        };
        match sibling {
            Some(sibling) => {
                current = sibling;
                index += 1;
            }
            None => return index,
        }
    }
}

/// Like [`sibling_index`], but counting only siblings that share the
/// element's local name and namespace.
fn sibling_index_of_type<E: Element>(element: &E, from_end: bool) -> i32 {
    let local_name = element.local_name().to_owned();
    let namespace = element.namespace().cloned();

    let mut index = 1;
    let mut current = element.clone();
    loop {
        let sibling = if from_end {
            current.next_sibling()
        } else {
            current.previous_sibling()
        };
        match sibling {
            Some(sibling) => {
                if sibling.local_name() == local_name
                    && sibling.namespace().cloned() == namespace
                {
                    index += 1;
                }
                current = sibling;
            }
            None => return index,
        }
    }
}
