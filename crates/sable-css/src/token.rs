//! Lexical token model for CSS Syntax Module Level 3.

use std::fmt;

use serde::Serialize;

/// A numeric value as lexed, keeping the raw representation alongside the
/// converted value.
///
/// [§ 4.3.13 Convert a string to a number](https://www.w3.org/TR/css-syntax-3/#convert-string-to-number)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Number {
    value: f32,
    integer: bool,
    signed: bool,
    text: String,
}

impl Number {
    pub(crate) const fn new(value: f32, integer: bool, signed: bool, text: String) -> Self {
        Self {
            value,
            integer,
            signed,
            text,
        }
    }

    /// The converted value truncated to an integer.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn int(&self) -> i32 {
        self.value as i32
    }

    /// The converted value.
    #[must_use]
    pub const fn float(&self) -> f32 {
        self.value
    }

    /// Whether the token had neither a fractional part nor an exponent.
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        self.integer
    }

    /// Whether the token was written with an explicit leading `+` or `-`.
    ///
    /// The An+B grammar distinguishes signed from signless integers, so the
    /// lexer records whether a sign character was present.
    #[must_use]
    pub const fn has_sign(&self) -> bool {
        self.signed
    }

    /// The raw representation as written in the source.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// One lexical token.
///
/// [§ 4. Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization)
///
/// "Implementations must act as if they used the following algorithms to
/// tokenize CSS. To transform a stream of code points into a stream of
/// tokens, repeatedly consume a token until an `<EOF-token>` is reached."
///
/// Tokens are immutable and produced transiently by the lexer, one per
/// logical position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Token {
    /// `/* ... */` with the enclosed text.
    Comment(String),
    /// A run of whitespace collapsed into a single token.
    Whitespace,

    /// `<ident-token>`.
    Identifier(String),
    /// `<function-token>`: an identifier immediately followed by `(`.
    Function(String),
    /// `<at-keyword-token>`: `@` followed by an identifier.
    AtKeyword(String),
    /// `<hash-token>` whose value is not identifier-shaped.
    Hash(String),
    /// `<hash-token>` with the "id" type flag.
    IdHash(String),

    /// `<string-token>`.
    String(String),
    /// `<bad-string-token>`: a string terminated by a raw newline.
    BadString(String),
    /// `<url-token>`.
    Url(String),
    /// `<bad-url-token>`.
    BadUrl(String),

    /// `<number-token>`.
    Number(Number),
    /// `<dimension-token>`: a number immediately followed by a unit name.
    Dimension(Number, String),
    /// `<percentage-token>`.
    Percentage(Number),

    /// `<unicode-range-token>` with inclusive start and end code points.
    UnicodeRange(u32, u32),

    /// `$=`
    SuffixMatch,
    /// `*=`
    SubstringMatch,
    /// `^=`
    PrefixMatch,
    /// `|=`
    DashMatch,
    /// `~=`
    IncludeMatch,
    /// `||`
    Column,

    /// `*`
    Asterisk,
    /// `-` not starting a number or identifier.
    Minus,
    /// `+` not starting a number.
    Plus,
    /// `.` not starting a number.
    Dot,
    /// `:`
    Colon,
    /// `;`
    SemiColon,
    /// `/` not starting a comment.
    Solidus,
    /// `|`
    Pipe,
    /// `~`
    Tilde,
    /// `,`
    Comma,
    /// `>`
    Gt,
    /// `<` not starting `<!--`.
    Lt,
    /// `=`
    Equal,
    /// `!`
    Bang,

    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `[`
    LBracket,
    /// `]`
    RBracket,

    /// `<!--`
    CDO,
    /// `-->`
    CDC,

    /// Catch-all for any other single code point.
    Delimiter(char),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Comment(text) => write!(f, "/*{text}*/"),
            Self::Whitespace => f.write_str(" "),
            Self::Identifier(name) => f.write_str(name),
            Self::Function(name) => write!(f, "{name}("),
            Self::AtKeyword(name) => write!(f, "@{name}"),
            Self::Hash(value) | Self::IdHash(value) => write!(f, "#{value}"),
            Self::String(value) => write!(f, "\"{value}\""),
            Self::BadString(value) => write!(f, "\"{value}"),
            Self::Url(url) => write!(f, "url({url})"),
            Self::BadUrl(url) => write!(f, "url({url}"),
            Self::Number(number) => write!(f, "{number}"),
            Self::Dimension(number, unit) => write!(f, "{number}{unit}"),
            Self::Percentage(number) => write!(f, "{number}%"),
            Self::UnicodeRange(start, end) => write!(f, "U+{start:X}-{end:X}"),
            Self::SuffixMatch => f.write_str("$="),
            Self::SubstringMatch => f.write_str("*="),
            Self::PrefixMatch => f.write_str("^="),
            Self::DashMatch => f.write_str("|="),
            Self::IncludeMatch => f.write_str("~="),
            Self::Column => f.write_str("||"),
            Self::Asterisk => f.write_str("*"),
            Self::Minus => f.write_str("-"),
            Self::Plus => f.write_str("+"),
            Self::Dot => f.write_str("."),
            Self::Colon => f.write_str(":"),
            Self::SemiColon => f.write_str(";"),
            Self::Solidus => f.write_str("/"),
            Self::Pipe => f.write_str("|"),
            Self::Tilde => f.write_str("~"),
            Self::Comma => f.write_str(","),
            Self::Gt => f.write_str(">"),
            Self::Lt => f.write_str("<"),
            Self::Equal => f.write_str("="),
            Self::Bang => f.write_str("!"),
            Self::LParen => f.write_str("("),
            Self::RParen => f.write_str(")"),
            Self::LBrace => f.write_str("{"),
            Self::RBrace => f.write_str("}"),
            Self::LBracket => f.write_str("["),
            Self::RBracket => f.write_str("]"),
            Self::CDO => f.write_str("<!--"),
            Self::CDC => f.write_str("-->"),
            Self::Delimiter(c) => write!(f, "{c}"),
        }
    }
}

/// The category of a nested bracketed/braced/parenthesized region, used to
/// track correct nesting depth during lenient error recovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BlockType {
    /// `( ... )`, also opened by a `<function-token>`.
    Parenthesis,
    /// `[ ... ]`
    Bracket,
    /// `{ ... }`
    Brace,
}

impl BlockType {
    /// The block opened by `token`, if any.
    #[must_use]
    pub const fn opening(token: &Token) -> Option<Self> {
        match token {
            Token::Function(_) | Token::LParen => Some(Self::Parenthesis),
            Token::LBracket => Some(Self::Bracket),
            Token::LBrace => Some(Self::Brace),
            _ => None,
        }
    }

    /// The block closed by `token`, if any.
    #[must_use]
    pub const fn closing(token: &Token) -> Option<Self> {
        match token {
            Token::RParen => Some(Self::Parenthesis),
            Token::RBracket => Some(Self::Bracket),
            Token::RBrace => Some(Self::Brace),
            _ => None,
        }
    }

    /// The delimiter bit of this block's closing token.
    #[must_use]
    pub const fn closing_delimiter(self) -> Delimiters {
        match self {
            Self::Parenthesis => Delimiters::CLOSE_PARENTHESIS,
            Self::Bracket => Delimiters::CLOSE_BRACKET,
            Self::Brace => Delimiters::CLOSE_BRACE,
        }
    }
}

/// A bitset of token categories that terminate a scoped sub-parser.
///
/// Delimiter sets are composed with `|` and are inherited and widened,
/// never narrowed, by nested parsers. A small bitmask is used because the
/// set is checked on every token read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Delimiters {
    bits: u8,
}

impl Delimiters {
    /// The empty set.
    pub const NONE: Self = Self { bits: 0 };
    /// Stop before `{`.
    pub const LEFT_BRACE: Self = Self { bits: 1 << 1 };
    /// Stop before `;`.
    pub const SEMICOLON: Self = Self { bits: 1 << 2 };
    /// Stop before `!`.
    pub const BANG: Self = Self { bits: 1 << 3 };
    /// Stop before `,`.
    pub const COMMA: Self = Self { bits: 1 << 4 };
    /// Stop before `)`.
    pub const CLOSE_PARENTHESIS: Self = Self { bits: 1 << 5 };
    /// Stop before `}`.
    pub const CLOSE_BRACE: Self = Self { bits: 1 << 6 };
    /// Stop before `]`.
    pub const CLOSE_BRACKET: Self = Self { bits: 1 << 7 };

    /// The delimiter classification of `token`; [`Self::NONE`] for tokens
    /// that never terminate a scope.
    #[must_use]
    pub const fn from_token(token: &Token) -> Self {
        match token {
            Token::LBrace => Self::LEFT_BRACE,
            Token::SemiColon => Self::SEMICOLON,
            Token::Bang => Self::BANG,
            Token::Comma => Self::COMMA,
            Token::RParen => Self::CLOSE_PARENTHESIS,
            Token::RBrace => Self::CLOSE_BRACE,
            Token::RBracket => Self::CLOSE_BRACKET,
            _ => Self::NONE,
        }
    }

    /// Whether any of `other`'s bits are present in this set.
    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        self.bits & other.bits != 0
    }

    /// Whether `token`'s delimiter classification intersects this set.
    #[must_use]
    pub const fn includes_token(self, token: &Token) -> bool {
        self.intersects(Self::from_token(token))
    }

    /// Whether this is the empty set.
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.bits == 0
    }
}

impl std::ops::BitOr for Delimiters {
    type Output = Self;

    fn bitor(self, other: Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }
}
