//! Scoped, backtracking parsing on top of the token stream.
//!
//! [§ 5. Parsing](https://www.w3.org/TR/css-syntax-3/#parsing)

use crate::error::{ParseError, ParseErrorKind, SourceLocation, SourcePosition};
use crate::token::{BlockType, Delimiters, Token};
use crate::tokenizer::{State, Tokenizer};

/// A restorable snapshot of a [`Parser`], including its pending block.
#[derive(Clone)]
pub struct ParserState {
    state: State,
    block_type: Option<BlockType>,
}

impl ParserState {
    /// Character offset at the snapshot.
    #[must_use]
    pub fn position(&self) -> SourcePosition {
        self.state.position()
    }

    /// Line/column at the snapshot.
    #[must_use]
    pub fn location(&self) -> SourceLocation {
        self.state.location()
    }
}

/// A scoped view over a token stream.
///
/// A parser never reads past its `delimiters`, and never reads into a block
/// whose opening token it has consumed. The block is recorded as pending and
/// is skipped wholesale before the next read unless a nested parser is
/// created for it first with [`Parser::parse_nested_block`]. Hitting a
/// delimiter reports [`ParseErrorKind::EndOfFile`] and leaves the delimiter
/// unconsumed, so an enclosing scope can pick it up.
pub struct Parser {
    tokenizer: Tokenizer,
    delimiters: Delimiters,
    block_type: Option<BlockType>,
}

impl Parser {
    /// Create a parser over the given source text, scoped to the whole of it.
    #[must_use]
    pub fn new(text: &str) -> Self {
        Self {
            tokenizer: Tokenizer::new(text),
            delimiters: Delimiters::NONE,
            block_type: None,
        }
    }

    /// Snapshot the parser. O(1).
    #[must_use]
    pub fn state(&self) -> ParserState {
        ParserState {
            state: self.tokenizer.state(),
            block_type: self.block_type,
        }
    }

    /// Restore a snapshot taken from this parser or one of its scoped
    /// children. O(1).
    pub fn reset(&mut self, state: &ParserState) {
        self.tokenizer.reset(&state.state);
        self.block_type = state.block_type;
    }

    /// Character offset after the last consumed token.
    #[must_use]
    pub fn position(&self) -> SourcePosition {
        self.tokenizer.position()
    }

    /// Line/column after the last consumed token.
    #[must_use]
    pub fn location(&self) -> SourceLocation {
        self.tokenizer.location()
    }

    /// The raw source text between two positions.
    #[must_use]
    pub fn slice(&self, from: SourcePosition, to: SourcePosition) -> String {
        self.tokenizer.slice(from, to)
    }

    /// The raw source text from `from` to the current position.
    #[must_use]
    pub fn slice_from(&self, from: SourcePosition) -> String {
        self.tokenizer.slice_from(from)
    }

    /// An error of the given kind at the current location.
    #[must_use]
    pub fn new_error(&self, kind: ParseErrorKind) -> ParseError {
        self.location().new_error(kind)
    }

    /// An unexpected-token error at the current location.
    #[must_use]
    pub fn new_unexpected_token_error(&self, token: Token) -> ParseError {
        self.location().new_unexpected_token_error(token)
    }

    /// Read the next token with no filtering applied.
    ///
    /// Skips a pending block first. A token matching this parser's
    /// delimiters is not consumed and reports `EndOfFile`, as does actual
    /// end of input.
    ///
    /// # Errors
    ///
    /// Reports `EndOfFile` at a delimiter or at actual end of input.
    pub fn next_including_whitespace_and_comment(&mut self) -> Result<Token, ParseError> {
        if let Some(block_type) = self.block_type.take() {
            self.tokenizer.consume_until_end_of_block(block_type);
        }

        let state = self.tokenizer.state();
        let Some(token) = self.tokenizer.next_token() else {
            return Err(self.new_error(ParseErrorKind::EndOfFile));
        };

        if self.delimiters.includes_token(&token) {
            self.tokenizer.reset(&state);
            return Err(self.new_error(ParseErrorKind::EndOfFile));
        }

        self.block_type = BlockType::opening(&token);

        Ok(token)
    }

    /// Read the next token, skipping comments.
    ///
    /// # Errors
    ///
    /// Reports `EndOfFile` at a delimiter or at actual end of input.
    pub fn next_including_whitespace(&mut self) -> Result<Token, ParseError> {
        loop {
            match self.next_including_whitespace_and_comment()? {
                Token::Comment(_) => {}
                token => return Ok(token),
            }
        }
    }

    /// Read the next token, skipping comments and whitespace.
    ///
    /// # Errors
    ///
    /// Reports `EndOfFile` at a delimiter or at actual end of input.
    pub fn next(&mut self) -> Result<Token, ParseError> {
        loop {
            match self.next_including_whitespace()? {
                Token::Whitespace => {}
                token => return Ok(token),
            }
        }
    }

    /// Consume any comments and whitespace at the current position.
    pub fn skip_whitespace(&mut self) {
        loop {
            let state = self.state();
            match self.next_including_whitespace() {
                Ok(Token::Whitespace) => {}
                Ok(_) | Err(_) => {
                    self.reset(&state);
                    return;
                }
            }
        }
    }

    /// Whether this scope holds nothing but comments and whitespace.
    /// Does not consume anything.
    pub fn is_exhausted(&mut self) -> bool {
        let state = self.state();
        let exhausted = self.next().is_err();
        self.reset(&state);
        exhausted
    }

    /// Expect this scope to hold nothing but comments and whitespace,
    /// reporting the offending token otherwise. Does not consume anything.
    ///
    /// # Errors
    ///
    /// Reports an unexpected-token error naming the first remaining token.
    pub fn expect_exhausted(&mut self) -> Result<(), ParseError> {
        let state = self.state();
        let result = match self.next() {
            Ok(token) => Err(self.new_unexpected_token_error(token)),
            Err(_) => Ok(()),
        };
        self.reset(&state);
        result
    }

    /// Run `parse`, restoring the parser on failure.
    ///
    /// Success keeps everything `parse` consumed; failure puts the parser
    /// back exactly where it was, making the attempt side-effect-free.
    ///
    /// # Errors
    ///
    /// Propagates whatever error `parse` returned.
    pub fn try_parse<T, E, F>(&mut self, parse: F) -> Result<T, E>
    where
        F: FnOnce(&mut Self) -> Result<T, E>,
    {
        let state = self.state();
        let result = parse(self);
        if result.is_err() {
            self.reset(&state);
        }
        result
    }

    /// Run `parse` and require it to consume the whole scope.
    ///
    /// # Errors
    ///
    /// Propagates errors from `parse`, or reports `Unexhausted` when tokens
    /// remain afterwards.
    pub fn parse_entirely<T, E, F>(&mut self, parse: F) -> Result<T, E>
    where
        E: From<ParseError>,
        F: FnOnce(&mut Self) -> Result<T, E>,
    {
        let result = parse(self)?;
        if !self.is_exhausted() {
            return Err(E::from(self.new_error(ParseErrorKind::Unexhausted)));
        }
        Ok(result)
    }

    /// Parse a non-empty, comma-separated list, running `parse` in a scope
    /// delimited at each comma so it cannot read across list boundaries.
    ///
    /// # Errors
    ///
    /// A failure of `parse` on any item aborts the whole list.
    pub fn parse_comma_separated<T, E, F>(&mut self, mut parse: F) -> Result<Vec<T>, E>
    where
        E: From<ParseError>,
        F: FnMut(&mut Self) -> Result<T, E>,
    {
        let mut values = Vec::with_capacity(1);

        loop {
            self.skip_whitespace();
            values.push(self.parse_until_before(Delimiters::COMMA, &mut parse)?);
            match self.next() {
                Ok(Token::Comma) => {}
                // the scope guarantees nothing but a comma or exhaustion here
                Ok(_) | Err(_) => return Ok(values),
            }
        }
    }

    /// Run `parse` in a child scope that additionally stops before
    /// `delimiters`, then advance this parser to that stopping point,
    /// skipping whatever the child left unconsumed (blocks included).
    ///
    /// # Errors
    ///
    /// Propagates errors from `parse`; the parser still advances to the
    /// stopping point either way.
    pub fn parse_until_before<T, E, F>(&mut self, delimiters: Delimiters, parse: F) -> Result<T, E>
    where
        E: From<ParseError>,
        F: FnOnce(&mut Self) -> Result<T, E>,
    {
        let combined = self.delimiters | delimiters;

        let mut delimited = Self {
            tokenizer: self.tokenizer.clone(),
            delimiters: combined,
            block_type: self.block_type.take(),
        };
        let result = delimited.parse_entirely(parse);
        if let Some(block_type) = delimited.block_type.take() {
            delimited.tokenizer.consume_until_end_of_block(block_type);
        }

        self.tokenizer.reset(&delimited.tokenizer.state());
        self.tokenizer.consume_until_before(combined);

        result
    }

    /// [`Parser::parse_until_before`], but additionally consume the stopping
    /// delimiter token if one is present.
    ///
    /// # Errors
    ///
    /// Propagates errors from `parse`; the parser still advances past the
    /// delimiter either way.
    pub fn parse_until_after<T, E, F>(&mut self, delimiters: Delimiters, parse: F) -> Result<T, E>
    where
        E: From<ParseError>,
        F: FnOnce(&mut Self) -> Result<T, E>,
    {
        let result = self.parse_until_before(delimiters, parse);

        if let Some(token) = self.tokenizer.peek_token(0) {
            // own delimiters still stop this parser; only the inner ones
            // are stepped over
            if !self.delimiters.includes_token(&token) {
                let _ = self.tokenizer.next_token();
                if let Some(block_type) = BlockType::opening(&token) {
                    self.tokenizer.consume_until_end_of_block(block_type);
                }
            }
        }

        result
    }

    /// Run `parse` in a child scope covering exactly the pending block, then
    /// advance this parser past the block's closing token.
    ///
    /// # Panics
    ///
    /// Panics if the previously consumed token did not open a block; calling
    /// this anywhere else is a programming error.
    ///
    /// # Errors
    ///
    /// Propagates errors from `parse`; the parser still advances past the
    /// block's closing token either way.
    pub fn parse_nested_block<T, E, F>(&mut self, parse: F) -> Result<T, E>
    where
        E: From<ParseError>,
        F: FnOnce(&mut Self) -> Result<T, E>,
    {
        let block_type = self
            .block_type
            .take()
            .expect("parse_nested_block called without a pending block");

        let mut nested = Self {
            tokenizer: self.tokenizer.clone(),
            delimiters: block_type.closing_delimiter(),
            block_type: None,
        };
        let result = nested.parse_entirely(parse);
        if let Some(inner) = nested.block_type.take() {
            nested.tokenizer.consume_until_end_of_block(inner);
        }

        self.tokenizer.reset(&nested.tokenizer.state());
        self.tokenizer.consume_until_end_of_block(block_type);

        result
    }

    /// Expect any `<ident-token>` and return its value.
    ///
    /// # Errors
    ///
    /// Reports any other token as an unexpected-token error.
    pub fn expect_identifier(&mut self) -> Result<String, ParseError> {
        match self.next()? {
            Token::Identifier(name) => Ok(name),
            token => Err(self.new_unexpected_token_error(token)),
        }
    }

    /// Expect an `<ident-token>` with the given value, ASCII
    /// case-insensitively.
    ///
    /// # Errors
    ///
    /// Reports any other token, or a non-matching identifier, as an
    /// unexpected-token error.
    pub fn expect_identifier_matching(&mut self, expected: &str) -> Result<(), ParseError> {
        match self.next()? {
            Token::Identifier(name) if name.eq_ignore_ascii_case(expected) => Ok(()),
            token => Err(self.new_unexpected_token_error(token)),
        }
    }

    /// Expect any `<function-token>` and return its name. The parser is left
    /// with the function's argument block pending.
    ///
    /// # Errors
    ///
    /// Reports any other token as an unexpected-token error.
    pub fn expect_function(&mut self) -> Result<String, ParseError> {
        match self.next()? {
            Token::Function(name) => Ok(name),
            token => Err(self.new_unexpected_token_error(token)),
        }
    }

    /// Expect any `<string-token>` and return its value.
    ///
    /// # Errors
    ///
    /// Reports any other token as an unexpected-token error.
    pub fn expect_string(&mut self) -> Result<String, ParseError> {
        match self.next()? {
            Token::String(value) => Ok(value),
            token => Err(self.new_unexpected_token_error(token)),
        }
    }

    /// Expect an `<ident-token>` or a `<string-token>` and return its value.
    ///
    /// # Errors
    ///
    /// Reports any other token as an unexpected-token error.
    pub fn expect_identifier_or_string(&mut self) -> Result<String, ParseError> {
        match self.next()? {
            Token::Identifier(value) | Token::String(value) => Ok(value),
            token => Err(self.new_unexpected_token_error(token)),
        }
    }

    /// Expect a `<number-token>` and return its value.
    ///
    /// # Errors
    ///
    /// Reports any other token as an unexpected-token error.
    pub fn expect_number(&mut self) -> Result<f32, ParseError> {
        match self.next()? {
            Token::Number(number) => Ok(number.float()),
            token => Err(self.new_unexpected_token_error(token)),
        }
    }

    /// Expect a `<number-token>` with an integer value and return it.
    ///
    /// # Errors
    ///
    /// Reports any other token, or a fractional number, as an
    /// unexpected-token error.
    pub fn expect_integer(&mut self) -> Result<i32, ParseError> {
        match self.next()? {
            Token::Number(number) if number.is_integer() => Ok(number.int()),
            token => Err(self.new_unexpected_token_error(token)),
        }
    }

    /// Expect a `<comma-token>`.
    ///
    /// # Errors
    ///
    /// Reports any other token as an unexpected-token error.
    pub fn expect_comma(&mut self) -> Result<(), ParseError> {
        match self.next()? {
            Token::Comma => Ok(()),
            token => Err(self.new_unexpected_token_error(token)),
        }
    }

    /// Expect a `<colon-token>`.
    ///
    /// # Errors
    ///
    /// Reports any other token as an unexpected-token error.
    pub fn expect_colon(&mut self) -> Result<(), ParseError> {
        match self.next()? {
            Token::Colon => Ok(()),
            token => Err(self.new_unexpected_token_error(token)),
        }
    }

    /// Expect a `<percentage-token>` and return its value.
    ///
    /// # Errors
    ///
    /// Reports any other token as an unexpected-token error.
    pub fn expect_percentage(&mut self) -> Result<f32, ParseError> {
        match self.next()? {
            Token::Percentage(number) => Ok(number.float()),
            token => Err(self.new_unexpected_token_error(token)),
        }
    }

    /// Expect a `/` token.
    ///
    /// # Errors
    ///
    /// Reports any other token as an unexpected-token error.
    pub fn expect_solidus(&mut self) -> Result<(), ParseError> {
        match self.next()? {
            Token::Solidus => Ok(()),
            token => Err(self.new_unexpected_token_error(token)),
        }
    }

    /// Expect a `!` token.
    ///
    /// # Errors
    ///
    /// Reports any other token as an unexpected-token error.
    pub fn expect_bang(&mut self) -> Result<(), ParseError> {
        match self.next()? {
            Token::Bang => Ok(()),
            token => Err(self.new_unexpected_token_error(token)),
        }
    }

    /// Expect a `<url-token>` and return its value.
    ///
    /// # Errors
    ///
    /// Reports any other token as an unexpected-token error.
    pub fn expect_url(&mut self) -> Result<String, ParseError> {
        match self.next()? {
            Token::Url(url) => Ok(url),
            token => Err(self.new_unexpected_token_error(token)),
        }
    }

    /// Expect `! important`, case-insensitively, with optional whitespace
    /// and comments in between.
    ///
    /// # Errors
    ///
    /// Reports the offending token as an unexpected-token error when either
    /// piece is missing.
    pub fn expect_important(&mut self) -> Result<(), ParseError> {
        match self.next()? {
            Token::Bang => {}
            token => return Err(self.new_unexpected_token_error(token)),
        }
        self.expect_identifier_matching("important")
    }
}
