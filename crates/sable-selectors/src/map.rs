//! Rule indexing: finding the rules that might match an element without
//! scanning every rule in the stylesheet.
//!
//! Rules are bucketed by the most selective simple selector found by a
//! scan over the whole component list in matching order. An element then
//! only consults the buckets its own id, classes and local name can reach,
//! plus the universal bucket.

use std::collections::HashMap;

use crate::element::Element;
use crate::hashes::AncestorHashes;
use crate::matching::{matches_selector, MatchingContext, QuirksMode};
use crate::selector::{Component, Selector};

/// A selector ready for matching: the parsed selector, its precomputed
/// ancestor hashes, and its position in the stylesheet.
#[derive(Debug, Clone)]
pub struct Rule {
    /// The parsed selector.
    pub selector: Selector,
    /// Ancestor hashes for Bloom-filter rejection.
    pub hashes: AncestorHashes,
    /// The rule's index in stylesheet order; ties in specificity are broken
    /// by this.
    pub source_order: u32,
}

impl Rule {
    /// Build a rule, computing its ancestor hashes.
    #[must_use]
    pub fn new(selector: Selector, source_order: u32, quirks_mode: QuirksMode) -> Self {
        let hashes = AncestorHashes::new(&selector, quirks_mode);
        Self {
            selector,
            hashes,
            source_order,
        }
    }
}

/// A matched rule, borrowed from the map, ready for cascade sorting.
#[derive(Debug, Clone, Copy)]
pub struct ApplicableDeclarationBlock<'a> {
    /// The rule that matched.
    pub rule: &'a Rule,
}

impl ApplicableDeclarationBlock<'_> {
    /// The selector's packed specificity.
    #[must_use]
    pub fn specificity(&self) -> u32 {
        self.rule.selector.specificity()
    }

    /// The rule's stylesheet position.
    #[must_use]
    pub const fn source_order(&self) -> u32 {
        self.rule.source_order
    }
}

/// The bucket a rule is filed under.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Bucket {
    ID(String),
    Class(String),
    LocalName { name: String, lower_name: String },
    Universal,
}

impl Bucket {
    /// Selectivity ranking; higher is filed first.
    const fn priority(&self) -> u8 {
        match self {
            Self::ID(_) => 3,
            Self::Class(_) => 2,
            Self::LocalName { .. } => 1,
            Self::Universal => 0,
        }
    }
}

/// An index from element features to the rules whose rightmost compound
/// requires that feature.
#[derive(Debug, Default)]
pub struct SelectorMap {
    id_hash: HashMap<String, Vec<Rule>>,
    class_hash: HashMap<String, Vec<Rule>>,
    local_name_hash: HashMap<String, Vec<Rule>>,
    other: Vec<Rule>,
    count: usize,
}

impl SelectorMap {
    /// An empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of rules in the map.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.count
    }

    /// Whether the map holds no rules.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// File `rule` under its bucket.
    ///
    /// In quirks mode id and class keys are lowercased, so lookups can use
    /// the element's lowercased values and still hit.
    pub fn insert(&mut self, rule: Rule, quirks_mode: QuirksMode) {
        self.count += 1;

        match find_bucket(rule.selector.components()) {
            Bucket::ID(id) => {
                let key = if quirks_mode == QuirksMode::Quirks {
                    id.to_ascii_lowercase()
                } else {
                    id
                };
                self.id_hash.entry(key).or_default().push(rule);
            }
            Bucket::Class(class) => {
                let key = if quirks_mode == QuirksMode::Quirks {
                    class.to_ascii_lowercase()
                } else {
                    class
                };
                self.class_hash.entry(key).or_default().push(rule);
            }
            Bucket::LocalName { name, lower_name } => {
                // file under both spellings so documents with either case
                // reach the rule with a single lookup
                if name == lower_name {
                    self.local_name_hash.entry(name).or_default().push(rule);
                } else {
                    self.local_name_hash
                        .entry(lower_name)
                        .or_default()
                        .push(rule.clone());
                    self.local_name_hash.entry(name).or_default().push(rule);
                }
            }
            Bucket::Universal => self.other.push(rule),
        }
    }

    /// Collect every rule that matches `element` into `results`, sorted by
    /// (specificity, source order).
    pub fn get_all_matching_rules<'a, E: Element>(
        &'a self,
        element: &E,
        context: &MatchingContext<'_>,
        results: &mut Vec<ApplicableDeclarationBlock<'a>>,
    ) {
        if self.is_empty() {
            return;
        }

        let quirks = context.quirks_mode == QuirksMode::Quirks;

        if let Some(id) = element.id() {
            let key = if quirks { id.to_ascii_lowercase() } else { id.to_owned() };
            if let Some(rules) = self.id_hash.get(&key) {
                Self::get_matching_rules(element, rules, context, results);
            }
        }

        element.each_class(|class| {
            let key = if quirks {
                class.to_ascii_lowercase()
            } else {
                class.to_owned()
            };
            if let Some(rules) = self.class_hash.get(&key) {
                Self::get_matching_rules(element, rules, context, results);
            }
        });

        if let Some(rules) = self.local_name_hash.get(element.local_name()) {
            Self::get_matching_rules(element, rules, context, results);
        }

        Self::get_matching_rules(element, &self.other, context, results);

        results.sort_by_key(|block| (block.specificity(), block.source_order()));
    }

    fn get_matching_rules<'a, E: Element>(
        element: &E,
        rules: &'a [Rule],
        context: &MatchingContext<'_>,
        results: &mut Vec<ApplicableDeclarationBlock<'a>>,
    ) {
        for rule in rules {
            if matches_selector(&rule.selector, Some(&rule.hashes), element, context) {
                results.push(ApplicableDeclarationBlock { rule });
            }
        }
    }
}

/// Decide the bucket for a selector by a priority scan over its whole
/// component list in matching order.
///
/// The first id found wins outright and stops the scan. Otherwise the
/// first class or local name found is kept; scanning continues only
/// because a later id can still override it. A negation's argument is
/// scanned recursively but never overrides a pick made outside it.
fn find_bucket(components: &[Component]) -> Bucket {
    let mut current = Bucket::Universal;

    for component in components {
        match component {
            Component::ID(id) => return Bucket::ID(id.clone()),
            Component::Class(class) => {
                if current == Bucket::Universal {
                    current = Bucket::Class(class.clone());
                }
            }
            Component::LocalName(local_name) => {
                if current == Bucket::Universal {
                    current = Bucket::LocalName {
                        name: local_name.name.clone(),
                        lower_name: local_name.lower_name.clone(),
                    };
                }
            }
            Component::Negation(negated) => {
                // an id inside a negation indexes, but does not stop the
                // outer scan the way a top-level id does
                let inner = find_bucket(negated);
                if inner.priority() > current.priority() {
                    current = inner;
                }
            }
            _ => {}
        }
    }

    current
}
