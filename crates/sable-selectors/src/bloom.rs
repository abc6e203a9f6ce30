//! A counting Bloom filter over the ancestor chain of the element being
//! matched, used to reject selectors without walking the tree.
//!
//! Each inserted hash sets two 8-bit counters; removal decrements them, so
//! the same filter can be reused across a depth-first traversal by pushing
//! an element's hashes on the way down and popping them on the way up. A
//! counter that saturates at 255 stays there, trading accuracy for never
//! underflowing.

use crate::element::Element;
use crate::hashes::{hash_string, HASH_BLOOM_MASK};

const KEY_SIZE: u32 = 12;
const ARRAY_SIZE: usize = 1 << KEY_SIZE;
const KEY_MASK: u32 = (1 << KEY_SIZE) - 1;

/// A counting Bloom filter with two hash slots per entry.
///
/// `may_contain` can return false positives but never false negatives, as
/// long as every `remove` pairs with an earlier `insert`.
pub struct BloomFilter {
    counters: Box<[u8; ARRAY_SIZE]>,
}

impl Default for BloomFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl BloomFilter {
    /// An empty filter.
    #[must_use]
    pub fn new() -> Self {
        Self {
            counters: Box::new([0; ARRAY_SIZE]),
        }
    }

    const fn first_slot(hash: u32) -> usize {
        (hash & KEY_MASK) as usize
    }

    const fn second_slot(hash: u32) -> usize {
        ((hash >> KEY_SIZE) & KEY_MASK) as usize
    }

    /// Record one hash.
    pub fn insert_hash(&mut self, hash: u32) {
        let first = self.counters[Self::first_slot(hash)].saturating_add(1);
        self.counters[Self::first_slot(hash)] = first;
        let second = self.counters[Self::second_slot(hash)].saturating_add(1);
        self.counters[Self::second_slot(hash)] = second;
    }

    /// Remove one previously recorded hash. Saturated counters are left
    /// untouched since their true count is unknown.
    pub fn remove_hash(&mut self, hash: u32) {
        for slot in [Self::first_slot(hash), Self::second_slot(hash)] {
            let counter = self.counters[slot];
            if counter != u8::MAX {
                self.counters[slot] = counter.saturating_sub(1);
            }
        }
    }

    /// Whether the hash might have been recorded. `false` is definitive.
    #[must_use]
    pub fn might_contain_hash(&self, hash: u32) -> bool {
        self.counters[Self::first_slot(hash)] != 0 && self.counters[Self::second_slot(hash)] != 0
    }

    /// Drop every recorded hash.
    pub fn clear(&mut self) {
        self.counters.fill(0);
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counters.iter().all(|counter| *counter == 0)
    }
}

impl std::fmt::Debug for BloomFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let set = self.counters.iter().filter(|counter| **counter != 0).count();
        f.debug_struct("BloomFilter")
            .field("occupied_slots", &set)
            .finish()
    }
}

/// The ancestor filter maintained across a document traversal.
///
/// A styling pass pushes each element on the way down and pops it on the
/// way up, so at any point the filter summarizes exactly the ancestor chain
/// of the element being styled. `rebuild` recovers that state for an
/// arbitrary element when a traversal starts mid-tree.
pub struct StyleBloom<E: Element> {
    filter: BloomFilter,
    elements: Vec<E>,
}

impl<E: Element> Default for StyleBloom<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Element> StyleBloom<E> {
    /// An empty traversal filter.
    #[must_use]
    pub fn new() -> Self {
        Self {
            filter: BloomFilter::new(),
            elements: Vec::new(),
        }
    }

    /// The underlying filter, for matching calls.
    #[must_use]
    pub const fn filter(&self) -> &BloomFilter {
        &self.filter
    }

    /// Record `element` as the new deepest ancestor.
    pub fn push(&mut self, element: &E) {
        each_element_hash(element, |hash| self.filter.insert_hash(hash));
        self.elements.push(element.clone());
    }

    /// Remove the deepest recorded ancestor.
    pub fn pop(&mut self) -> Option<E> {
        let element = self.elements.pop()?;
        each_element_hash(&element, |hash| self.filter.remove_hash(hash));
        Some(element)
    }

    /// Reset the filter to summarize exactly the ancestor chain of
    /// `element` (excluding `element` itself).
    pub fn rebuild(&mut self, element: &E) {
        self.filter.clear();
        self.elements.clear();

        let mut ancestors = Vec::new();
        let mut current = element.parent();
        while let Some(ancestor) = current {
            current = ancestor.parent();
            ancestors.push(ancestor);
        }
        for ancestor in ancestors.into_iter().rev() {
            self.push(&ancestor);
        }
    }
}

impl<E: Element> std::fmt::Debug for StyleBloom<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StyleBloom")
            .field("depth", &self.elements.len())
            .finish()
    }
}

/// Feed every hashable feature of `element` to `callback`: local name,
/// namespace, id and classes, hashed the same way selector ancestor hashes
/// are.
fn each_element_hash<E: Element>(element: &E, mut callback: impl FnMut(u32)) {
    callback(hash_string(element.local_name()) & HASH_BLOOM_MASK);
    if let Some(namespace) = element.namespace() {
        callback(hash_string(&namespace.0) & HASH_BLOOM_MASK);
    }
    if let Some(id) = element.id() {
        callback(hash_string(id) & HASH_BLOOM_MASK);
    }
    element.each_class(|class| callback(hash_string(class) & HASH_BLOOM_MASK));
}

#[cfg(test)]
mod tests {
    use super::BloomFilter;

    #[test]
    fn test_insert_then_contains() {
        let mut filter = BloomFilter::new();
        filter.insert_hash(0x1234_5678);
        assert!(filter.might_contain_hash(0x1234_5678));
    }

    #[test]
    fn test_remove_restores_emptiness() {
        let mut filter = BloomFilter::new();
        filter.insert_hash(42);
        filter.insert_hash(42);
        filter.remove_hash(42);
        assert!(filter.might_contain_hash(42));
        filter.remove_hash(42);
        assert!(!filter.might_contain_hash(42));
        assert!(filter.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut filter = BloomFilter::new();
        for hash in 0..100 {
            filter.insert_hash(hash * 0x9e37);
        }
        filter.clear();
        assert!(filter.is_empty());
    }

    #[test]
    fn test_no_false_negatives() {
        let mut filter = BloomFilter::new();
        let hashes: Vec<u32> = (0..1000_u32).map(|i| i.wrapping_mul(0x0100_0193)).collect();
        for hash in &hashes {
            filter.insert_hash(*hash);
        }
        for hash in &hashes {
            assert!(filter.might_contain_hash(*hash));
        }
    }
}
