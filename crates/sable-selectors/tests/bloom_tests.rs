//! Ancestor-hash and Bloom-filter pruning tests.

use sable_css::Parser;
use sable_dom::{ElementData, NodeId, Tree};
use sable_selectors::hashes::{hash_string, AncestorHashes, HASH_BLOOM_MASK};
use sable_selectors::{
    matches_selector, parse_selector, BloomFilter, DefaultSelectorContext, MatchingContext,
    QuirksMode, Selector, StyleBloom,
};

fn parse(input: &str) -> Selector {
    let mut parser = Parser::new(input);
    parser
        .parse_entirely(|parser| parse_selector(&DefaultSelectorContext, parser))
        .unwrap()
}

fn hashes(input: &str) -> AncestorHashes {
    AncestorHashes::new(&parse(input), QuirksMode::NoQuirks)
}

#[test]
fn test_rightmost_compound_does_not_contribute() {
    // only ancestor compounds are hashed, never the subject compound
    let hashes = hashes("div span");
    assert_eq!(hashes.packed_hashes[0], hash_string("div") & HASH_BLOOM_MASK);
    assert_eq!(hashes.packed_hashes[1], 0);
    assert_eq!(hashes.fourth_hash(), 0);
}

#[test]
fn test_sibling_compounds_are_skipped() {
    // `div` is a sibling requirement of `p`, not an ancestor of `span`
    let hashes = hashes("div + p span");
    assert_eq!(hashes.packed_hashes[0], hash_string("p") & HASH_BLOOM_MASK);
    assert_eq!(hashes.packed_hashes[1], 0);
}

#[test]
fn test_fourth_hash_packing() {
    let hashes = hashes("#a .b main article section span");
    assert_ne!(hashes.fourth_hash(), 0);

    // the low 24 bits of the first three stay intact under the packing
    assert_eq!(
        hashes.packed_hashes[0] & HASH_BLOOM_MASK,
        hash_string("section") & HASH_BLOOM_MASK
    );
    assert_eq!(
        hashes.packed_hashes[1] & HASH_BLOOM_MASK,
        hash_string("article") & HASH_BLOOM_MASK
    );
    assert_eq!(
        hashes.packed_hashes[2] & HASH_BLOOM_MASK,
        hash_string("main") & HASH_BLOOM_MASK
    );
    assert_eq!(hashes.fourth_hash(), hash_string("b") & HASH_BLOOM_MASK);
}

#[test]
fn test_quirks_mode_skips_ids_and_classes() {
    let selector = parse("#a .b span");
    let quirky = AncestorHashes::new(&selector, QuirksMode::Quirks);
    assert_eq!(quirky.packed_hashes, [0, 0, 0]);
}

#[test]
fn test_may_match_soundness() {
    // a filter built from the real ancestor chain never rejects a selector
    // that actually matches
    let mut filter = BloomFilter::new();
    filter.insert_hash(hash_string("div") & HASH_BLOOM_MASK);
    filter.insert_hash(hash_string("p") & HASH_BLOOM_MASK);

    assert!(hashes("div span").may_match(&filter));
    assert!(hashes("div p span").may_match(&filter));
    assert!(hashes("span").may_match(&filter));
    assert!(!hashes("nav span").may_match(&filter));
}

#[test]
fn test_style_bloom_traversal() {
    // <div><p><span/></p></div>
    let mut tree = Tree::new(ElementData::new("div"));
    let p = tree.append_child(NodeId::ROOT, ElementData::new("p"));
    let span = tree.append_child(p, ElementData::new("span"));

    let mut bloom = StyleBloom::new();
    bloom.push(&tree.root());
    bloom.push(&tree.element(p));

    let selector = parse("div p span");
    let hashes = AncestorHashes::new(&selector, QuirksMode::NoQuirks);
    let context = MatchingContext::new(Some(bloom.filter()), QuirksMode::NoQuirks);
    assert!(matches_selector(
        &selector,
        Some(&hashes),
        &tree.element(span),
        &context
    ));

    // a selector whose ancestor requirement is absent is pruned
    let absent = parse("nav span");
    let absent_hashes = AncestorHashes::new(&absent, QuirksMode::NoQuirks);
    assert!(!absent_hashes.may_match(bloom.filter()));
}

#[test]
fn test_style_bloom_pop_restores_state() {
    let mut tree = Tree::new(ElementData::new("div"));
    let p = tree.append_child(NodeId::ROOT, ElementData::new("p"));

    let mut bloom = StyleBloom::new();
    bloom.push(&tree.root());
    bloom.push(&tree.element(p));
    assert!(bloom.filter().might_contain_hash(hash_string("p") & HASH_BLOOM_MASK));

    let popped = bloom.pop().unwrap();
    assert_eq!(popped, tree.element(p));
    assert!(!bloom.filter().might_contain_hash(hash_string("p") & HASH_BLOOM_MASK));
    assert!(bloom.filter().might_contain_hash(hash_string("div") & HASH_BLOOM_MASK));
}

#[test]
fn test_style_bloom_rebuild_matches_incremental_push() {
    let mut tree = Tree::new(ElementData::new("div"));
    let p = tree.append_child(NodeId::ROOT, ElementData::new("p").with_class("note"));
    let span = tree.append_child(p, ElementData::new("span"));

    let mut rebuilt = StyleBloom::new();
    rebuilt.rebuild(&tree.element(span));

    for name in ["div", "p", "note"] {
        assert!(rebuilt.filter().might_contain_hash(hash_string(name) & HASH_BLOOM_MASK));
    }
    // the element itself is not part of its own ancestor chain
    assert!(!rebuilt.filter().might_contain_hash(hash_string("span") & HASH_BLOOM_MASK));
}

#[test]
fn test_filter_rejection_is_no_false_negative() {
    let mut tree = Tree::new(ElementData::new("a"));
    let mut parent = NodeId::ROOT;
    for name in ["b", "c", "d", "e"] {
        parent = tree.append_child(parent, ElementData::new(name));
    }

    let mut bloom = StyleBloom::new();
    bloom.rebuild(&tree.element(parent));

    for selector_text in ["a e", "a b c e", "b ~ b c d e", "c > d > e"] {
        let selector = parse(selector_text);
        let hashes = AncestorHashes::new(&selector, QuirksMode::NoQuirks);
        assert!(
            hashes.may_match(bloom.filter()),
            "{selector_text} wrongly rejected"
        );
    }
}
