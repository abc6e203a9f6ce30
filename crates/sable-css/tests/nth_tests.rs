//! Integration tests for the An+B microsyntax.

use sable_css::nth::{parse_nth, Nth};
use sable_css::parser::Parser;

/// Helper to parse a complete An+B expression.
fn nth(input: &str) -> Result<Nth, sable_css::ParseError> {
    let mut parser = Parser::new(input);
    parser.parse_entirely(parse_nth)
}

#[test]
fn test_keywords() {
    assert_eq!(nth("even").unwrap(), Nth::new(2, 0));
    assert_eq!(nth("odd").unwrap(), Nth::new(2, 1));
    assert_eq!(nth("EVEN").unwrap(), Nth::new(2, 0));
}

#[test]
fn test_integer_only() {
    assert_eq!(nth("5").unwrap(), Nth::new(0, 5));
    assert_eq!(nth("-3").unwrap(), Nth::new(0, -3));
    assert_eq!(nth("+2").unwrap(), Nth::new(0, 2));
}

#[test]
fn test_dimension_forms() {
    assert_eq!(nth("2n").unwrap(), Nth::new(2, 0));
    assert_eq!(nth("-2n").unwrap(), Nth::new(-2, 0));
    assert_eq!(nth("2N").unwrap(), Nth::new(2, 0));
    assert_eq!(nth("3n+1").unwrap(), Nth::new(3, 1));
    assert_eq!(nth("3n + 1").unwrap(), Nth::new(3, 1));
    assert_eq!(nth("3n - 1").unwrap(), Nth::new(3, -1));
    // `2n-1` lexes as a single dimension with unit `n-1`
    assert_eq!(nth("2n-1").unwrap(), Nth::new(2, -1));
    // `2n-` followed by a signless integer
    assert_eq!(nth("2n- 1").unwrap(), Nth::new(2, -1));
}

#[test]
fn test_identifier_forms() {
    assert_eq!(nth("n").unwrap(), Nth::new(1, 0));
    assert_eq!(nth("-n").unwrap(), Nth::new(-1, 0));
    assert_eq!(nth("n+3").unwrap(), Nth::new(1, 3));
    assert_eq!(nth("-n+2").unwrap(), Nth::new(-1, 2));
    // `n-3` lexes as a single identifier
    assert_eq!(nth("n-3").unwrap(), Nth::new(1, -3));
    assert_eq!(nth("-n-3").unwrap(), Nth::new(-1, -3));
}

#[test]
fn test_plus_prefixed_forms() {
    assert_eq!(nth("+n").unwrap(), Nth::new(1, 0));
    assert_eq!(nth("+n+4").unwrap(), Nth::new(1, 4));
    assert_eq!(nth("+n-4").unwrap(), Nth::new(1, -4));
    // whitespace between `+` and `n` is not allowed
    assert!(nth("+ n").is_err());
}

#[test]
fn test_signed_b_requires_sign_agreement() {
    // a signless integer after `An` needs an explicit sign token
    assert!(nth("2n 1").is_err());
    // a signed integer after a sign token is malformed
    assert!(nth("2n + +1").is_err());
    assert!(nth("2n + -1").is_err());
}

#[test]
fn test_rejects_garbage() {
    assert!(nth("foo").is_err());
    assert!(nth("n-b").is_err());
    assert!(nth("3n1").is_err());
    assert!(nth("1.5n").is_err());
    assert!(nth("").is_err());
}
