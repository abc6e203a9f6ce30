//! Integration tests for the CSS tokenizer and its backtracking state chain.

use sable_css::token::Token;
use sable_css::tokenizer::Tokenizer;

/// Helper to drain a tokenizer into a vector.
fn tokenize(input: &str) -> Vec<Token> {
    let mut tokenizer = Tokenizer::new(input);
    let mut tokens = Vec::new();
    while let Some(token) = tokenizer.next_token() {
        tokens.push(token);
    }
    tokens
}

#[test]
fn test_whitespace_collapses_to_one_token() {
    let tokens = tokenize("   \t\n  ");
    assert_eq!(tokens.len(), 1);
    assert!(matches!(tokens[0], Token::Whitespace));
}

#[test]
fn test_ident() {
    let tokens = tokenize("background-color");
    assert_eq!(tokens.len(), 1);
    match &tokens[0] {
        Token::Identifier(name) => assert_eq!(name, "background-color"),
        other => panic!("Expected Identifier token, got {other:?}"),
    }
}

#[test]
fn test_ident_with_underscore() {
    let tokens = tokenize("_private");
    match &tokens[0] {
        Token::Identifier(name) => assert_eq!(name, "_private"),
        other => panic!("Expected Identifier token, got {other:?}"),
    }
}

#[test]
fn test_non_ascii_ident() {
    // non-ASCII starts at U+0080 inclusive
    let tokens = tokenize("\u{80}x caf\u{E9}");
    match &tokens[0] {
        Token::Identifier(name) => assert_eq!(name, "\u{80}x"),
        other => panic!("Expected Identifier token, got {other:?}"),
    }
    match &tokens[2] {
        Token::Identifier(name) => assert_eq!(name, "caf\u{E9}"),
        other => panic!("Expected Identifier token, got {other:?}"),
    }
}

#[test]
fn test_custom_property_name() {
    let tokens = tokenize("--main-color");
    match &tokens[0] {
        Token::Identifier(name) => assert_eq!(name, "--main-color"),
        other => panic!("Expected Identifier token, got {other:?}"),
    }
}

#[test]
fn test_at_keyword() {
    let tokens = tokenize("@media");
    assert_eq!(tokens.len(), 1);
    match &tokens[0] {
        Token::AtKeyword(name) => assert_eq!(name, "media"),
        other => panic!("Expected AtKeyword token, got {other:?}"),
    }
}

#[test]
fn test_hash_id_flag() {
    let tokens = tokenize("#header #2col");
    match &tokens[0] {
        Token::IdHash(name) => assert_eq!(name, "header"),
        other => panic!("Expected IdHash token, got {other:?}"),
    }
    match &tokens[2] {
        Token::Hash(name) => assert_eq!(name, "2col"),
        other => panic!("Expected Hash token, got {other:?}"),
    }
}

#[test]
fn test_function_and_url() {
    let tokens = tokenize("calc( url(foo.png) url( \"bar.png\" )");
    match &tokens[0] {
        Token::Function(name) => assert_eq!(name, "calc"),
        other => panic!("Expected Function token, got {other:?}"),
    }
    match &tokens[2] {
        Token::Url(value) => assert_eq!(value, "foo.png"),
        other => panic!("Expected Url token, got {other:?}"),
    }
    match &tokens[4] {
        Token::Url(value) => assert_eq!(value, "bar.png"),
        other => panic!("Expected Url token, got {other:?}"),
    }
}

#[test]
fn test_bad_url() {
    let tokens = tokenize("url(foo bar) next");
    match &tokens[0] {
        Token::BadUrl(value) => assert_eq!(value, "foo"),
        other => panic!("Expected BadUrl token, got {other:?}"),
    }
    // the remnants consumption must stop at the closing parenthesis
    assert!(matches!(&tokens[2], Token::Identifier(name) if name == "next"));
}

#[test]
fn test_string_and_bad_string() {
    let tokens = tokenize("\"hello\" 'world' \"broken\nrest");
    assert!(matches!(&tokens[0], Token::String(value) if value == "hello"));
    assert!(matches!(&tokens[2], Token::String(value) if value == "world"));
    assert!(matches!(&tokens[4], Token::BadString(value) if value == "broken"));
    // the newline is not part of the bad string
    assert!(matches!(tokens[5], Token::Whitespace));
}

#[test]
fn test_string_escape_continuation() {
    let tokens = tokenize("\"one\\\ntwo\"");
    assert!(matches!(&tokens[0], Token::String(value) if value == "onetwo"));
}

#[test]
fn test_escape_replacement_policy() {
    // NUL, surrogate, and out-of-range escapes all become U+FFFD
    let tokens = tokenize("\\0 \\D800 \\110000 x");
    match &tokens[0] {
        Token::Identifier(name) => assert_eq!(name, "\u{FFFD}\u{FFFD}\u{FFFD}x"),
        other => panic!("Expected Identifier token, got {other:?}"),
    }
}

#[test]
fn test_hex_escape_consumes_one_trailing_whitespace() {
    let tokens = tokenize("\\41 B");
    assert_eq!(tokens.len(), 1);
    assert!(matches!(&tokens[0], Token::Identifier(name) if name == "AB"));
}

#[test]
fn test_numbers() {
    let tokens = tokenize("12 -34.5 +6 .25 3e2 1.5e-2");
    let values: Vec<f32> = tokens
        .iter()
        .filter_map(|token| match token {
            Token::Number(number) => Some(number.float()),
            _ => None,
        })
        .collect();
    assert_eq!(values, vec![12.0, -34.5, 6.0, 0.25, 300.0, 0.015]);
}

#[test]
fn test_number_flags() {
    let tokens = tokenize("7 +7 7.5");
    match (&tokens[0], &tokens[2], &tokens[4]) {
        (Token::Number(plain), Token::Number(signed), Token::Number(fraction)) => {
            assert!(plain.is_integer() && !plain.has_sign());
            assert!(signed.is_integer() && signed.has_sign());
            assert!(!fraction.is_integer());
        }
        other => panic!("Expected three Number tokens, got {other:?}"),
    }
}

#[test]
fn test_dimension_and_percentage() {
    let tokens = tokenize("10px 50%");
    match &tokens[0] {
        Token::Dimension(number, unit) => {
            assert_eq!(number.int(), 10);
            assert_eq!(unit, "px");
        }
        other => panic!("Expected Dimension token, got {other:?}"),
    }
    match &tokens[2] {
        Token::Percentage(number) => assert_eq!(number.int(), 50),
        other => panic!("Expected Percentage token, got {other:?}"),
    }
}

#[test]
fn test_unicode_range() {
    let tokens = tokenize("u+26 U+0-7F u+4??");
    assert!(matches!(tokens[0], Token::UnicodeRange(0x26, 0x26)));
    assert!(matches!(tokens[2], Token::UnicodeRange(0x0, 0x7F)));
    assert!(matches!(tokens[4], Token::UnicodeRange(0x400, 0x4FF)));
}

#[test]
fn test_match_operators() {
    let tokens = tokenize("~= |= ^= $= *= ||");
    let expected = [
        Token::IncludeMatch,
        Token::DashMatch,
        Token::PrefixMatch,
        Token::SuffixMatch,
        Token::SubstringMatch,
        Token::Column,
    ];
    for (i, token) in expected.iter().enumerate() {
        assert_eq!(&tokens[i * 2], token);
    }
}

#[test]
fn test_cdo_cdc() {
    let tokens = tokenize("<!-- -->");
    assert!(matches!(tokens[0], Token::CDO));
    assert!(matches!(tokens[2], Token::CDC));
}

#[test]
fn test_comment_is_surfaced() {
    let tokens = tokenize("a/* note */b");
    assert!(matches!(&tokens[1], Token::Comment(text) if text == " note "));
    assert!(matches!(&tokens[2], Token::Identifier(name) if name == "b"));
}

#[test]
fn test_newline_canonicalization() {
    // \r, \r\n, and form feed all count as a single newline
    let mut tokenizer = Tokenizer::new("a\r\nb\rc\u{C}d");
    let mut lines = Vec::new();
    while tokenizer.next_token().is_some() {
        lines.push(tokenizer.location().line);
    }
    assert_eq!(lines, vec![0, 1, 1, 2, 2, 3, 3]);
}

#[test]
fn test_state_reset_replays_identical_tokens() {
    let mut tokenizer = Tokenizer::new("div .cls #id");
    let start = tokenizer.state();

    let first: Vec<Token> = std::iter::from_fn(|| tokenizer.next_token()).collect();
    tokenizer.reset(&start);
    let second: Vec<Token> = std::iter::from_fn(|| tokenizer.next_token()).collect();

    assert_eq!(first, second);
}

#[test]
fn test_clones_share_the_chain() {
    let mut tokenizer = Tokenizer::new("a b c");
    let mut clone = tokenizer.clone();

    assert!(matches!(tokenizer.next_token(), Some(Token::Identifier(name)) if name == "a"));
    // the clone's cursor is independent and starts from the beginning
    assert!(matches!(clone.next_token(), Some(Token::Identifier(name)) if name == "a"));

    // advancing the clone materializes chain nodes the original then reuses
    while clone.next_token().is_some() {}
    assert!(matches!(tokenizer.next_token(), Some(Token::Whitespace)));
    assert!(matches!(tokenizer.next_token(), Some(Token::Identifier(name)) if name == "b"));
}

#[test]
fn test_peek_does_not_advance() {
    let mut tokenizer = Tokenizer::new("a b");
    assert!(matches!(tokenizer.peek_token(2), Some(Token::Identifier(name)) if name == "b"));
    assert!(matches!(tokenizer.next_token(), Some(Token::Identifier(name)) if name == "a"));
}

#[test]
fn test_slice_from() {
    let mut tokenizer = Tokenizer::new("foo bar baz");
    let start = tokenizer.position();
    let _ = tokenizer.next_token();
    let _ = tokenizer.next_token();
    let _ = tokenizer.next_token();
    assert_eq!(tokenizer.slice_from(start), "foo bar");
}

#[test]
fn test_consume_until_end_of_block_handles_nesting() {
    let mut tokenizer = Tokenizer::new("a [b (c)] d) e");
    // simulate having consumed an opening parenthesis before this input
    tokenizer.consume_until_end_of_block(sable_css::BlockType::Parenthesis);
    assert!(matches!(tokenizer.next_token(), Some(Token::Whitespace)));
    assert!(matches!(tokenizer.next_token(), Some(Token::Identifier(name)) if name == "e"));
}
