//! SelectorMap tests: bucketing, lookup and cascade ordering.

use sable_css::Parser;
use sable_dom::{ElementData, NodeId, Tree};
use sable_selectors::{
    parse_selector, DefaultSelectorContext, MatchingContext, QuirksMode, Rule, Selector,
    SelectorMap, ToCss,
};

fn parse(input: &str) -> Selector {
    let mut parser = Parser::new(input);
    parser
        .parse_entirely(|parser| parse_selector(&DefaultSelectorContext, parser))
        .unwrap()
}

fn map_of(selectors: &[&str], quirks_mode: QuirksMode) -> SelectorMap {
    let mut map = SelectorMap::new();
    for (order, selector) in selectors.iter().enumerate() {
        let rule = Rule::new(parse(selector), u32::try_from(order).unwrap(), quirks_mode);
        map.insert(rule, quirks_mode);
    }
    map
}

fn matching_selectors(map: &SelectorMap, tree: &Tree, id: NodeId) -> Vec<String> {
    let context = MatchingContext::new(None, QuirksMode::NoQuirks);
    let mut results = Vec::new();
    map.get_all_matching_rules(&tree.element(id), &context, &mut results);
    results
        .iter()
        .map(|block| block.rule.selector.to_css_string())
        .collect()
}

#[test]
fn test_cascade_ordering_by_specificity() {
    let map = map_of(&["#id", ".cls", "div"], QuirksMode::NoQuirks);

    let mut tree = Tree::new(ElementData::new("html"));
    let div = tree.append_child(
        NodeId::ROOT,
        ElementData::new("div").with_id("id").with_class("cls"),
    );

    assert_eq!(
        matching_selectors(&map, &tree, div),
        vec!["div", ".cls", "#id"]
    );
}

#[test]
fn test_source_order_breaks_specificity_ties() {
    let map = map_of(&[".b", ".a"], QuirksMode::NoQuirks);

    let mut tree = Tree::new(ElementData::new("html"));
    let div = tree.append_child(
        NodeId::ROOT,
        ElementData::new("div").with_class("a").with_class("b"),
    );

    assert_eq!(matching_selectors(&map, &tree, div), vec![".b", ".a"]);
}

#[test]
fn test_buckets_prune_candidates() {
    let map = map_of(&["div", ".foo", "#bar", "*"], QuirksMode::NoQuirks);
    assert_eq!(map.len(), 4);

    let mut tree = Tree::new(ElementData::new("html"));
    let span = tree.append_child(NodeId::ROOT, ElementData::new("span"));

    // nothing but the universal fallback reaches a bare span
    assert_eq!(matching_selectors(&map, &tree, span), vec!["*"]);
}

#[test]
fn test_rightmost_feature_buckets_rule() {
    // `.foo div` must be reachable from a div without any class
    let map = map_of(&[".foo div"], QuirksMode::NoQuirks);

    let mut tree = Tree::new(ElementData::new("html"));
    let foo = tree.append_child(NodeId::ROOT, ElementData::new("section").with_class("foo"));
    let div = tree.append_child(foo, ElementData::new("div"));

    assert_eq!(matching_selectors(&map, &tree, div), vec![".foo div"]);
}

#[test]
fn test_pseudo_element_rule_files_under_origin() {
    use sable_selectors::PseudoElement;

    let map = map_of(&["div::before"], QuirksMode::NoQuirks);

    let mut tree = Tree::new(ElementData::new("html"));
    let div = tree.append_child(NodeId::ROOT, ElementData::new("div"));
    let before = tree.append_child(
        div,
        ElementData::new("div").with_pseudo_element(PseudoElement::Before),
    );

    assert_eq!(
        matching_selectors(&map, &tree, before),
        vec!["div::before"]
    );
}

#[test]
fn test_quirks_mode_lookup() {
    let map = map_of(&["#Main", ".Nav"], QuirksMode::Quirks);

    let mut tree = Tree::new(ElementData::new("html"));
    let div = tree.append_child(
        NodeId::ROOT,
        ElementData::new("div").with_id("main").with_class("nav"),
    );

    let context = MatchingContext::new(None, QuirksMode::Quirks);
    let mut results = Vec::new();
    map.get_all_matching_rules(&tree.element(div), &context, &mut results);
    assert_eq!(results.len(), 2);
}

#[test]
fn test_empty_map() {
    let map = SelectorMap::new();
    assert!(map.is_empty());

    let tree = Tree::new(ElementData::new("html"));
    assert!(matching_selectors(&map, &tree, NodeId::ROOT).is_empty());
}
