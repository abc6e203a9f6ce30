//! Integration tests for the scoped parser and its combinators.

use sable_css::error::ParseErrorKind;
use sable_css::parser::Parser;
use sable_css::token::{Delimiters, Token};
use sable_css::ParseError;

#[test]
fn test_next_filters_whitespace_and_comments() {
    let mut parser = Parser::new("  /* c */ a /* d */ b");
    assert!(matches!(parser.next(), Ok(Token::Identifier(name)) if name == "a"));
    assert!(matches!(parser.next(), Ok(Token::Identifier(name)) if name == "b"));
    assert!(matches!(parser.next(), Err(_)));
}

#[test]
fn test_next_including_whitespace() {
    let mut parser = Parser::new("a /* c */ b");
    assert!(matches!(
        parser.next_including_whitespace(),
        Ok(Token::Identifier(name)) if name == "a"
    ));
    assert!(matches!(
        parser.next_including_whitespace(),
        Ok(Token::Whitespace)
    ));
    assert!(matches!(
        parser.next_including_whitespace(),
        Ok(Token::Whitespace)
    ));
    assert!(matches!(
        parser.next_including_whitespace(),
        Ok(Token::Identifier(name)) if name == "b"
    ));
}

#[test]
fn test_try_parse_rolls_back_on_failure() {
    let mut parser = Parser::new("a b");
    let result: Result<(), ParseError> = parser.try_parse(|parser| {
        let _ = parser.expect_identifier()?;
        parser.expect_colon()
    });
    assert!(result.is_err());
    // the failed attempt must not have consumed anything
    assert!(matches!(parser.next(), Ok(Token::Identifier(name)) if name == "a"));
}

#[test]
fn test_parse_entirely_rejects_trailing_input() {
    let mut parser = Parser::new("a b");
    let result: Result<String, ParseError> = parser.parse_entirely(Parser::expect_identifier);
    match result {
        Err(error) => assert!(matches!(error.kind, ParseErrorKind::Unexhausted)),
        Ok(value) => panic!("Expected Unexhausted error, got {value:?}"),
    }
}

#[test]
fn test_parse_comma_separated_scopes_commas() {
    // the comma inside the function block must not split the list
    let mut parser = Parser::new("rgb(1, 2, 3), red");
    let values: Result<Vec<String>, ParseError> = parser.parse_comma_separated(|parser| {
        let start = parser.position();
        while parser.next().is_ok() {}
        Ok(parser.slice_from(start).trim().to_owned())
    });
    assert_eq!(values.unwrap(), vec!["rgb(1, 2, 3)", "red"]);
}

#[test]
fn test_parse_until_before_stops_at_delimiter() {
    let mut parser = Parser::new("a b; c");
    let first: Result<Vec<Token>, ParseError> =
        parser.parse_until_before(Delimiters::SEMICOLON, |parser| {
            let mut tokens = Vec::new();
            while let Ok(token) = parser.next() {
                tokens.push(token);
            }
            Ok(tokens)
        });
    assert_eq!(first.unwrap().len(), 2);
    // the delimiter itself is left for the enclosing scope
    assert!(matches!(parser.next(), Ok(Token::SemiColon)));
    assert!(matches!(parser.next(), Ok(Token::Identifier(name)) if name == "c"));
}

#[test]
fn test_parse_until_before_skips_unconsumed_blocks() {
    // the closure stops early with a block left pending; the scope must
    // still land exactly before the delimiter, skipping the nested block
    // contents wholesale
    let mut parser = Parser::new("foo(bar(baz)qux) rest; tail");
    let result: Result<(), ParseError> =
        parser.parse_until_before(Delimiters::SEMICOLON, |parser| {
            let _ = parser.expect_function()?;
            Ok(())
        });
    match result {
        Err(error) => assert!(matches!(error.kind, ParseErrorKind::Unexhausted)),
        Ok(()) => panic!("Expected Unexhausted error"),
    }
    assert!(matches!(parser.next(), Ok(Token::SemiColon)));
    assert!(matches!(parser.next(), Ok(Token::Identifier(name)) if name == "tail"));
}

#[test]
fn test_parse_until_after_consumes_delimiter() {
    let mut parser = Parser::new("a; b");
    let result: Result<(), ParseError> = parser.parse_until_after(Delimiters::SEMICOLON, |parser| {
        parser.expect_identifier().map(|_| ())
    });
    assert!(result.is_ok());
    assert!(matches!(parser.next(), Ok(Token::Identifier(name)) if name == "b"));
}

#[test]
fn test_parse_nested_block() {
    let mut parser = Parser::new("calc(1 + 2) tail");
    assert_eq!(parser.expect_function().unwrap(), "calc");

    let tokens: Result<Vec<Token>, ParseError> = parser.parse_nested_block(|parser| {
        let mut tokens = Vec::new();
        while let Ok(token) = parser.next() {
            tokens.push(token);
        }
        Ok(tokens)
    });
    assert_eq!(tokens.unwrap().len(), 3);
    assert!(matches!(parser.next(), Ok(Token::Identifier(name)) if name == "tail"));
}

#[test]
fn test_pending_block_is_skipped_lazily() {
    let mut parser = Parser::new("[a b c] after");
    assert!(matches!(parser.next(), Ok(Token::LBracket)));
    // no nested parser was created, so the whole block is skipped
    assert!(matches!(parser.next(), Ok(Token::Identifier(name)) if name == "after"));
}

#[test]
fn test_delimiter_reports_end_of_file_and_stays_put() {
    let mut parser = Parser::new("; x");
    let error = parser
        .parse_until_before(Delimiters::SEMICOLON, Parser::next)
        .unwrap_err();
    assert!(matches!(error.kind, ParseErrorKind::EndOfFile));
}

#[test]
fn test_state_reset_restores_pending_block() {
    let mut parser = Parser::new("(a) b");
    let state = parser.state();
    assert!(matches!(parser.next(), Ok(Token::LParen)));
    parser.reset(&state);
    assert!(matches!(parser.next(), Ok(Token::LParen)));
    assert!(matches!(parser.next(), Ok(Token::Identifier(name)) if name == "b"));
}

#[test]
fn test_expect_exhausted() {
    let mut parser = Parser::new("  /* just a comment */  ");
    assert!(parser.expect_exhausted().is_ok());

    let mut parser = Parser::new(" x ");
    let error = parser.expect_exhausted().unwrap_err();
    assert!(matches!(error.kind, ParseErrorKind::UnexpectedToken(_)));
}

#[test]
fn test_expect_important() {
    let mut parser = Parser::new("! /* really */ IMPORTANT");
    assert!(parser.expect_important().is_ok());

    let mut parser = Parser::new("!importante");
    assert!(parser.expect_important().is_err());
}

#[test]
fn test_expect_percentage() {
    let mut parser = Parser::new(" 50% ");
    assert_eq!(parser.expect_percentage().unwrap(), 50.0);

    let mut parser = Parser::new("50");
    assert!(parser.expect_percentage().is_err());
}

#[test]
fn test_expect_solidus_and_bang() {
    let mut parser = Parser::new(" / ! ");
    assert!(parser.expect_solidus().is_ok());
    assert!(parser.expect_bang().is_ok());

    let mut parser = Parser::new("!");
    assert!(parser.expect_solidus().is_err());
}

#[test]
fn test_expect_url() {
    let mut parser = Parser::new("url( logo.png )");
    assert_eq!(parser.expect_url().unwrap(), "logo.png");

    let mut parser = Parser::new("'logo.png'");
    assert!(parser.expect_url().is_err());
}

#[test]
fn test_expect_integer_rejects_fractions() {
    let mut parser = Parser::new("1.5");
    assert!(parser.expect_integer().is_err());

    let mut parser = Parser::new("42");
    assert_eq!(parser.expect_integer().unwrap(), 42);
}

#[test]
fn test_skip_whitespace_preserves_next_token() {
    let mut parser = Parser::new("   /* c */  > x");
    parser.skip_whitespace();
    assert!(matches!(parser.next_including_whitespace(), Ok(Token::Gt)));
}
