//! Matching engine tests over small synthetic trees.

use sable_css::Parser;
use sable_dom::{ElementData, ElementRef, NodeId, Tree};
use sable_selectors::{
    matches_selector, parse_selector, DefaultSelectorContext, MatchingContext, NonTSPseudoClass,
    PseudoElement, QuirksMode, Selector,
};

fn parse(input: &str) -> Selector {
    let mut parser = Parser::new(input);
    parser
        .parse_entirely(|parser| parse_selector(&DefaultSelectorContext, parser))
        .unwrap()
}

fn matches(selector: &str, element: &ElementRef<'_>) -> bool {
    let selector = parse(selector);
    let context = MatchingContext::new(None, QuirksMode::NoQuirks);
    matches_selector(&selector, None, element, &context)
}

fn matches_quirks(selector: &str, element: &ElementRef<'_>) -> bool {
    let selector = parse(selector);
    let context = MatchingContext::new(None, QuirksMode::Quirks);
    matches_selector(&selector, None, element, &context)
}

/// `<a><b><c/></b></a>`
fn nested_tree() -> Tree {
    let mut tree = Tree::new(ElementData::new("a"));
    let b = tree.append_child(NodeId::ROOT, ElementData::new("b"));
    let _ = tree.append_child(b, ElementData::new("c"));
    tree
}

#[test]
fn test_descendant_combinator() {
    let tree = nested_tree();
    let c = tree.element(NodeId(2));
    assert!(matches("a c", &c));
    assert!(matches("a b c", &c));
    assert!(!matches("b a c", &c));
}

#[test]
fn test_child_combinator() {
    let tree = nested_tree();
    let c = tree.element(NodeId(2));
    assert!(matches("b > c", &c));
    assert!(!matches("a > c", &c));
    assert!(matches("a > b > c", &c));
}

#[test]
fn test_descendant_backtracks_over_failed_child() {
    // `a > b` must consider every ancestor pair on the descendant axis
    let mut tree = Tree::new(ElementData::new("a"));
    let wrapper = tree.append_child(NodeId::ROOT, ElementData::new("wrapper"));
    let a = tree.append_child(wrapper, ElementData::new("a"));
    let b = tree.append_child(a, ElementData::new("b"));
    let subject = tree.append_child(b, ElementData::new("c"));
    assert!(matches("a > b c", &tree.element(subject)));
}

#[test]
fn test_sibling_combinators() {
    let mut tree = Tree::new(ElementData::new("ul"));
    let _b = tree.append_child(NodeId::ROOT, ElementData::new("b"));
    let c = tree.append_child(NodeId::ROOT, ElementData::new("c"));
    let d = tree.append_child(NodeId::ROOT, ElementData::new("d"));

    assert!(matches("b + c", &tree.element(c)));
    assert!(!matches("b + d", &tree.element(d)));
    assert!(matches("b ~ d", &tree.element(d)));
    assert!(!matches("d ~ b", &tree.element(NodeId(1))));
}

#[test]
fn test_compound_conjunction() {
    let mut tree = Tree::new(ElementData::new("html"));
    let div = tree.append_child(
        NodeId::ROOT,
        ElementData::new("div").with_id("x").with_class("big"),
    );
    let element = tree.element(div);
    assert!(matches("div.big#x", &element));
    assert!(!matches("div.small#x", &element));
    assert!(!matches("span.big#x", &element));
}

#[test]
fn test_nth_child() {
    let mut tree = Tree::new(ElementData::new("ul"));
    let children: Vec<NodeId> = (0..5)
        .map(|_| tree.append_child(NodeId::ROOT, ElementData::new("li")))
        .collect();

    let odd: Vec<usize> = children
        .iter()
        .enumerate()
        .filter(|(_, id)| matches(":nth-child(2n+1)", &tree.element(**id)))
        .map(|(i, _)| i + 1)
        .collect();
    assert_eq!(odd, vec![1, 3, 5]);

    let first_two: Vec<usize> = children
        .iter()
        .enumerate()
        .filter(|(_, id)| matches(":nth-child(-n+2)", &tree.element(**id)))
        .map(|(i, _)| i + 1)
        .collect();
    assert_eq!(first_two, vec![1, 2]);

    assert!(
        children
            .iter()
            .all(|id| !matches(":nth-child(0)", &tree.element(*id)))
    );
}

#[test]
fn test_nth_child_fixed_index() {
    let mut tree = Tree::new(ElementData::new("ul"));
    let children: Vec<NodeId> = (0..5)
        .map(|_| tree.append_child(NodeId::ROOT, ElementData::new("li")))
        .collect();
    let third: Vec<usize> = children
        .iter()
        .enumerate()
        .filter(|(_, id)| matches(":nth-child(3)", &tree.element(**id)))
        .map(|(i, _)| i + 1)
        .collect();
    assert_eq!(third, vec![3]);
}

#[test]
fn test_of_type_pseudo_classes() {
    // <p/><span/><p/>
    let mut tree = Tree::new(ElementData::new("body"));
    let first_p = tree.append_child(NodeId::ROOT, ElementData::new("p"));
    let span = tree.append_child(NodeId::ROOT, ElementData::new("span"));
    let second_p = tree.append_child(NodeId::ROOT, ElementData::new("p"));

    assert!(matches(":first-of-type", &tree.element(first_p)));
    assert!(matches(":first-of-type", &tree.element(span)));
    assert!(!matches(":first-of-type", &tree.element(second_p)));
    assert!(matches(":last-of-type", &tree.element(second_p)));
    assert!(matches(":only-of-type", &tree.element(span)));
    assert!(!matches(":only-of-type", &tree.element(first_p)));
    assert!(matches(":nth-of-type(2)", &tree.element(second_p)));
}

#[test]
fn test_structural_pseudo_classes() {
    let mut tree = Tree::new(ElementData::new("html"));
    let only = tree.append_child(NodeId::ROOT, ElementData::new("div"));
    let leaf = tree.append_child(only, ElementData::new("span"));

    assert!(matches(":root", &tree.root()));
    assert!(!matches(":root", &tree.element(only)));
    assert!(matches(":only-child", &tree.element(only)));
    assert!(matches(":first-child", &tree.element(only)));
    assert!(matches(":last-child", &tree.element(only)));
    assert!(matches(":empty", &tree.element(leaf)));
    assert!(!matches(":empty", &tree.element(only)));
}

#[test]
fn test_empty_excludes_text() {
    let mut tree = Tree::new(ElementData::new("html"));
    let with_text = tree.append_child(NodeId::ROOT, ElementData::new("p").with_text());
    assert!(!matches(":empty", &tree.element(with_text)));
}

#[test]
fn test_negation() {
    let mut tree = Tree::new(ElementData::new("html"));
    let plain_div = tree.append_child(NodeId::ROOT, ElementData::new("div"));
    let span = tree.append_child(NodeId::ROOT, ElementData::new("span"));
    let foo_span = tree.append_child(NodeId::ROOT, ElementData::new("span").with_class("foo"));

    assert!(!matches(":not(div)", &tree.element(plain_div)));
    assert!(matches(":not(div)", &tree.element(span)));

    // matches only elements that are neither `div` nor `.foo`
    assert!(!matches(":not(div.foo)", &tree.element(plain_div)));
    assert!(!matches(":not(div.foo)", &tree.element(foo_span)));
    assert!(matches(":not(div.foo)", &tree.element(span)));
}

#[test]
fn test_non_ts_pseudo_classes() {
    let mut tree = Tree::new(ElementData::new("html"));
    let hovered = tree.append_child(
        NodeId::ROOT,
        ElementData::new("a").with_pseudo_class(NonTSPseudoClass::Hover),
    );
    let plain = tree.append_child(NodeId::ROOT, ElementData::new("a"));

    assert!(matches("a:hover", &tree.element(hovered)));
    assert!(!matches("a:hover", &tree.element(plain)));
}

#[test]
fn test_pseudo_element_matching() {
    let mut tree = Tree::new(ElementData::new("html"));
    let div = tree.append_child(NodeId::ROOT, ElementData::new("div"));
    let before = tree.append_child(
        div,
        ElementData::new("div").with_pseudo_element(PseudoElement::Before),
    );

    assert!(matches("div::before", &tree.element(before)));
    assert!(!matches("span::before", &tree.element(before)));
    assert!(!matches("div::after", &tree.element(before)));
}

#[test]
fn test_attribute_matching() {
    let mut tree = Tree::new(ElementData::new("html"));
    let link = tree.append_child(
        NodeId::ROOT,
        ElementData::new("a").with_attribute("href", "https://example.com/path"),
    );
    let element = tree.element(link);

    assert!(matches("[href]", &element));
    assert!(!matches("[title]", &element));
    assert!(matches("[href^='https']", &element));
    assert!(matches("[href*='example']", &element));
    assert!(matches("[href$='path']", &element));
    assert!(!matches("[href='https']", &element));
    assert!(matches("[href^='HTTPS' i]", &element));
    assert!(!matches("[href^='HTTPS']", &element));
}

#[test]
fn test_never_matches_short_circuits() {
    let mut tree = Tree::new(ElementData::new("html"));
    let node = tree.append_child(NodeId::ROOT, ElementData::new("div").with_attribute("a", ""));
    // the attribute value actually is empty, but the form is unmatchable
    assert!(!matches("[a~='']", &tree.element(node)));
    assert!(matches("[a='']", &tree.element(node)));
}

#[test]
fn test_dash_match() {
    let mut tree = Tree::new(ElementData::new("html"));
    let en_us = tree.append_child(
        NodeId::ROOT,
        ElementData::new("p").with_attribute("lang", "en-US"),
    );
    let element = tree.element(en_us);
    assert!(matches("[lang|='en']", &element));
    assert!(!matches("[lang|='e']", &element));
}

#[test]
fn test_quirks_mode_case_rules() {
    let mut tree = Tree::new(ElementData::new("html"));
    let div = tree.append_child(
        NodeId::ROOT,
        ElementData::new("div").with_id("Main").with_class("Nav"),
    );
    let element = tree.element(div);

    assert!(!matches("#main", &element));
    assert!(!matches(".nav", &element));
    assert!(matches_quirks("#main", &element));
    assert!(matches_quirks(".nav", &element));
}
