//! Per-selector ancestor hashes and the hashing scheme shared with the
//! ancestor Bloom filter.
//!
//! A selector like `div p span` can only match elements that have both a
//! `div` and a `p` ancestor. Hashing those ancestor requirements once at
//! parse time lets matching reject the selector against a filter of the
//! actual ancestor chain without touching the tree.

use std::hash::{DefaultHasher, Hash, Hasher};

use serde::Serialize;

use crate::bloom::BloomFilter;
use crate::matching::QuirksMode;
use crate::selector::{Component, Selector, SelectorIter};

/// Only the low 24 bits of each hash are stored, so a fourth hash can be
/// packed byte-wise into the three high bytes.
pub const HASH_BLOOM_MASK: u32 = 0x00ff_ffff;

/// Hash a string the way both selector hashes and element hashes must.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn hash_string(value: &str) -> u32 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    // truncation to the filter's hash width is the point
    (hasher.finish() & u64::from(u32::MAX)) as u32
}

/// Up to four hashes of ancestor requirements, packed into three words.
///
/// The fourth hash donates one byte to each of the other three; a zero hash
/// marks the end of the list (and therefore always passes the filter
/// check).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AncestorHashes {
    /// The packed hash words.
    pub packed_hashes: [u32; 3],
}

impl AncestorHashes {
    /// Compute the hashes for a parsed selector.
    #[must_use]
    pub fn new(selector: &Selector, quirks_mode: QuirksMode) -> Self {
        let mut hashes = [0_u32; 4];
        let mut count = 0;

        for component in AncestorIter::new(selector.iter()) {
            if let Some(hash) = component.ancestor_hash(quirks_mode) {
                hashes[count] = hash & HASH_BLOOM_MASK;
                count += 1;
                if count == 4 {
                    break;
                }
            }
        }

        // pack the fourth hash one byte per word into the high bytes
        let fourth = hashes[3];
        if fourth != 0 {
            hashes[0] |= (fourth & 0x0000_00ff) << 24;
            hashes[1] |= (fourth & 0x0000_ff00) << 16;
            hashes[2] |= (fourth & 0x00ff_0000) << 8;
        }

        Self {
            packed_hashes: [hashes[0], hashes[1], hashes[2]],
        }
    }

    /// Recover the fourth hash from the packed high bytes.
    #[must_use]
    pub const fn fourth_hash(&self) -> u32 {
        (self.packed_hashes[0] >> 24)
            | ((self.packed_hashes[1] >> 24) << 8)
            | ((self.packed_hashes[2] >> 24) << 16)
    }

    /// Whether the selector might match an element whose ancestor chain is
    /// summarized by `bloom_filter`. `false` is definitive.
    #[must_use]
    pub fn may_match(&self, bloom_filter: &BloomFilter) -> bool {
        for packed in self.packed_hashes {
            let hash = packed & HASH_BLOOM_MASK;
            if hash == 0 {
                // end of the hash list
                return true;
            }
            if !bloom_filter.might_contain_hash(hash) {
                return false;
            }
        }

        let fourth = self.fourth_hash();
        fourth == 0 || bloom_filter.might_contain_hash(fourth)
    }
}

impl Component {
    /// The hash this component contributes to ancestor filtering, if it is
    /// the kind of requirement the filter tracks.
    ///
    /// Local names are only hashed when the name is already lowercase,
    /// since elements hash their name as-is and a mixed-case selector name
    /// could otherwise miss a case-insensitive match. Ids and classes are
    /// skipped in quirks mode for the same reason.
    #[must_use]
    pub fn ancestor_hash(&self, quirks_mode: QuirksMode) -> Option<u32> {
        match self {
            Self::LocalName(local_name) if local_name.name == local_name.lower_name => {
                Some(hash_string(&local_name.name))
            }
            Self::ID(id) if quirks_mode != QuirksMode::Quirks => Some(hash_string(id)),
            Self::Class(class) if quirks_mode != QuirksMode::Quirks => Some(hash_string(class)),
            Self::Namespace(_, url) | Self::DefaultNamespace(url) => Some(hash_string(&url.0)),
            _ => None,
        }
    }
}

/// Iterates the components of the ancestor compounds of a selector: the
/// compounds to the left of the rightmost one, reached only through child
/// and descendant combinators.
pub struct AncestorIter<'a>(SelectorIter<'a>);

impl<'a> AncestorIter<'a> {
    /// Skip the rightmost compound and position on the first ancestor
    /// compound.
    fn new(iter: SelectorIter<'a>) -> Self {
        let mut result = Self(iter);
        result.skip_until_ancestor();
        result
    }

    /// Skip compounds until the previous combinator crossed is an ancestor
    /// one.
    fn skip_until_ancestor(&mut self) {
        loop {
            // exhaust the current compound
            while self.0.next().is_some() {}
            match self.0.next_sequence() {
                None => break,
                Some(combinator) if combinator.is_ancestor() => break,
                Some(_) => {}
            }
        }
    }
}

impl<'a> Iterator for AncestorIter<'a> {
    type Item = &'a Component;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(component) = self.0.next() {
            return Some(component);
        }

        // move to the next compound; skip over sibling-joined compounds
        // since their elements are not ancestors
        match self.0.next_sequence() {
            None => None,
            Some(combinator) => {
                if !combinator.is_ancestor() {
                    self.skip_until_ancestor();
                }
                self.0.next()
            }
        }
    }
}
