//! The `An+B` microsyntax.
//!
//! [CSS Syntax Module Level 3 § 6. The An+B microsyntax](https://www.w3.org/TR/css-syntax-3/#anb-microsyntax)

use crate::error::ParseError;
use crate::parser::Parser;
use crate::token::Token;

/// A step-and-offset pair `An+B`, matching the indices `An + B` for every
/// non-negative integer `n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct Nth {
    /// The step.
    pub a: i32,
    /// The offset.
    pub b: i32,
}

impl Nth {
    /// Create a step-and-offset pair.
    #[must_use]
    pub const fn new(a: i32, b: i32) -> Self {
        Self { a, b }
    }
}

/// Parse the `An+B` notation, including the `even` and `odd` keywords.
///
/// The `A` and `B` parts may land in a single token (`2n-1` lexes as one
/// dimension, `-n-3` as one identifier) or be split across several with
/// whitespace around the sign, so every lexical shape is dispatched here.
///
/// # Errors
///
/// Reports an unexpected-token error for anything that is not valid `An+B`
/// notation.
pub fn parse_nth(parser: &mut Parser) -> Result<Nth, ParseError> {
    match parser.next()? {
        Token::Number(number) if number.is_integer() => Ok(Nth::new(0, number.int())),
        Token::Dimension(number, unit) if number.is_integer() => {
            let a = number.int();
            if unit.eq_ignore_ascii_case("n") {
                parse_b(parser, a)
            } else if unit.eq_ignore_ascii_case("n-") {
                parse_signless_b(parser, a, -1)
            } else {
                match parse_dash_digits(&unit) {
                    Some(b) => Ok(Nth::new(a, b)),
                    None => Err(parser.new_unexpected_token_error(Token::Dimension(number, unit))),
                }
            }
        }
        Token::Identifier(value) => {
            if value.eq_ignore_ascii_case("even") {
                Ok(Nth::new(2, 0))
            } else if value.eq_ignore_ascii_case("odd") {
                Ok(Nth::new(2, 1))
            } else if value.eq_ignore_ascii_case("n") {
                parse_b(parser, 1)
            } else if value.eq_ignore_ascii_case("-n") {
                parse_b(parser, -1)
            } else if value.eq_ignore_ascii_case("n-") {
                parse_signless_b(parser, 1, -1)
            } else if value.eq_ignore_ascii_case("-n-") {
                parse_signless_b(parser, -1, -1)
            } else if let Some(rest) = value.strip_prefix('-') {
                match parse_dash_digits(rest) {
                    Some(b) => Ok(Nth::new(-1, b)),
                    None => Err(parser.new_unexpected_token_error(Token::Identifier(value))),
                }
            } else {
                match parse_dash_digits(&value) {
                    Some(b) => Ok(Nth::new(1, b)),
                    None => Err(parser.new_unexpected_token_error(Token::Identifier(value))),
                }
            }
        }
        // a lone `+` must be glued to the `n` that follows it
        Token::Plus => match parser.next_including_whitespace()? {
            Token::Identifier(value) => {
                if value.eq_ignore_ascii_case("n") {
                    parse_b(parser, 1)
                } else if value.eq_ignore_ascii_case("n-") {
                    parse_signless_b(parser, 1, -1)
                } else {
                    match parse_dash_digits(&value) {
                        Some(b) => Ok(Nth::new(1, b)),
                        None => Err(parser.new_unexpected_token_error(Token::Identifier(value))),
                    }
                }
            }
            token => Err(parser.new_unexpected_token_error(token)),
        },
        token => Err(parser.new_unexpected_token_error(token)),
    }
}

/// Parse the `B` part after a standalone `An`, which may be absent, a signed
/// number, or a sign token followed by a signless number.
fn parse_b(parser: &mut Parser, a: i32) -> Result<Nth, ParseError> {
    let state = parser.state();
    match parser.next() {
        Ok(Token::Plus) => parse_signless_b(parser, a, 1),
        Ok(Token::Minus) => parse_signless_b(parser, a, -1),
        Ok(Token::Number(number)) if number.is_integer() && number.has_sign() => {
            Ok(Nth::new(a, number.int()))
        }
        Ok(_) | Err(_) => {
            parser.reset(&state);
            Ok(Nth::new(a, 0))
        }
    }
}

/// Parse the signless integer after an already consumed sign.
fn parse_signless_b(parser: &mut Parser, a: i32, sign: i32) -> Result<Nth, ParseError> {
    match parser.next()? {
        Token::Number(number) if number.is_integer() && !number.has_sign() => {
            Ok(Nth::new(a, sign * number.int()))
        }
        token => Err(parser.new_unexpected_token_error(token)),
    }
}

/// Parse the `n-DDD` tail of a glued identifier or dimension unit, returning
/// the negative offset it denotes.
fn parse_dash_digits(text: &str) -> Option<i32> {
    let rest = text.strip_prefix(['n', 'N'])?;
    let digits = rest.strip_prefix('-')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    rest.parse::<i32>().ok()
}
