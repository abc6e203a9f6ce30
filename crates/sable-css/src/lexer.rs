//! CSS Syntax Module Level 3 tokenization.

use crate::error::{SourceLocation, SourcePosition};
use crate::reader::Reader;
use crate::token::{Number, Token};

/// [§ 4. Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization)
///
/// Produces one [`Token`] per call on top of [`Reader`]. Malformed
/// constructs degrade to the well-defined `Bad*` token variants rather than
/// aborting; only true end-of-input returns `None`.
pub(crate) struct Lexer {
    reader: Reader,
}

impl Lexer {
    pub(crate) fn new(text: &str) -> Self {
        Self {
            reader: Reader::new(text),
        }
    }

    /// Character offset of the next unread character.
    pub(crate) const fn position(&self) -> SourcePosition {
        SourcePosition(self.reader.position())
    }

    /// Line/column of the next unread character.
    pub(crate) const fn location(&self) -> SourceLocation {
        SourceLocation {
            line: self.reader.line,
            column: self.reader.column,
        }
    }

    /// [§ 4.3.1 Consume a token](https://www.w3.org/TR/css-syntax-3/#consume-token)
    ///
    /// Returns `None` when the reader is at end of input on entry.
    pub(crate) fn next_token(&mut self) -> Option<Token> {
        if self.reader.is_eof() {
            return None;
        }

        let token = match self.reader.c {
            // "whitespace: Consume as much whitespace as possible. Return a
            // <whitespace-token>." Newlines have been canonicalized to \n by
            // the reader.
            ' ' | '\t' | '\n' => {
                while matches!(self.reader.c, ' ' | '\t' | '\n') {
                    self.reader.next_char();
                }
                Token::Whitespace
            }

            // "U+0022 QUOTATION MARK (\") / U+0027 APOSTROPHE (')"
            // "Consume a string token and return it."
            c @ ('"' | '\'') => self.consume_string(c),

            // "U+0023 NUMBER SIGN (#)"
            '#' => {
                self.reader.next_char();
                // "If the next input code point is a name code point or the
                // next two input code points are a valid escape..."
                if is_name(self.reader.c) || is_escape(self.reader.c, self.reader.peek_char(1)) {
                    self.consume_hash()
                } else {
                    Token::Delimiter('#')
                }
            }

            // "U+0024 DOLLAR SIGN ($)"
            // "If the next input code point is U+003D EQUALS SIGN (=),
            // consume it and return a <suffix-match-token>."
            '$' => {
                self.reader.next_char();
                if self.reader.c == '=' {
                    self.reader.next_char();
                    Token::SuffixMatch
                } else {
                    Token::Delimiter('$')
                }
            }

            '(' => {
                self.reader.next_char();
                Token::LParen
            }
            ')' => {
                self.reader.next_char();
                Token::RParen
            }

            // "U+002A ASTERISK (*)"
            '*' => {
                self.reader.next_char();
                if self.reader.c == '=' {
                    self.reader.next_char();
                    Token::SubstringMatch
                } else {
                    Token::Asterisk
                }
            }

            // "U+002B PLUS SIGN (+)"
            // "If the input stream starts with a number, reconsume the
            // current input code point, consume a numeric token..."
            '+' => {
                if self.starts_number() {
                    self.consume_numeric()
                } else {
                    self.reader.next_char();
                    Token::Plus
                }
            }

            ',' => {
                self.reader.next_char();
                Token::Comma
            }

            // "U+002D HYPHEN-MINUS (-)"
            '-' => {
                if self.starts_number() {
                    self.consume_numeric()
                } else if self.reader.peek_char(1) == '-' && self.reader.peek_char(2) == '>' {
                    // "If the next 2 input code points are U+002D HYPHEN-MINUS
                    // U+003E GREATER-THAN SIGN (->), consume them and return
                    // a <CDC-token>." Checked before the ident check so that
                    // `-->` does not lex as `--` followed by `>`.
                    self.reader.next_char();
                    self.reader.next_char();
                    self.reader.next_char();
                    Token::CDC
                } else if self.starts_identifier() {
                    self.consume_identifier_like()
                } else {
                    self.reader.next_char();
                    Token::Minus
                }
            }

            // "U+002E FULL STOP (.)"
            '.' => {
                if self.starts_number() {
                    self.consume_numeric()
                } else {
                    self.reader.next_char();
                    Token::Dot
                }
            }

            // "U+002F SOLIDUS (/)"
            '/' => {
                self.reader.next_char();
                if self.reader.c == '*' {
                    self.consume_comment()
                } else {
                    Token::Solidus
                }
            }

            ':' => {
                self.reader.next_char();
                Token::Colon
            }
            ';' => {
                self.reader.next_char();
                Token::SemiColon
            }

            // "U+003C LESS-THAN SIGN (<)"
            // "If the next 3 input code points are U+0021 EXCLAMATION MARK
            // U+002D HYPHEN-MINUS U+002D HYPHEN-MINUS (!--), consume them
            // and return a <CDO-token>."
            '<' => {
                self.reader.next_char();
                if self.reader.c == '!'
                    && self.reader.peek_char(1) == '-'
                    && self.reader.peek_char(2) == '-'
                {
                    self.reader.next_char();
                    self.reader.next_char();
                    self.reader.next_char();
                    Token::CDO
                } else {
                    Token::Lt
                }
            }

            '>' => {
                self.reader.next_char();
                Token::Gt
            }
            '=' => {
                self.reader.next_char();
                Token::Equal
            }
            '!' => {
                self.reader.next_char();
                Token::Bang
            }

            // "U+0040 COMMERCIAL AT (@)"
            // "If the next 3 input code points would start an ident sequence,
            // consume an ident sequence... return an <at-keyword-token>."
            '@' => {
                self.reader.next_char();
                if self.starts_identifier() {
                    let name = self.consume_name();
                    Token::AtKeyword(name)
                } else {
                    Token::Delimiter('@')
                }
            }

            // "U+005C REVERSE SOLIDUS (\\)"
            '\\' => {
                if is_escape(self.reader.c, self.reader.peek_char(1)) {
                    self.consume_identifier_like()
                } else {
                    self.reader.next_char();
                    Token::Delimiter('\\')
                }
            }

            // "U+005E CIRCUMFLEX ACCENT (^)"
            '^' => {
                self.reader.next_char();
                if self.reader.c == '=' {
                    self.reader.next_char();
                    Token::PrefixMatch
                } else {
                    Token::Delimiter('^')
                }
            }

            // "U+0055 / U+0075 LATIN LETTER U"
            // "If the next 2 input code points are U+002B PLUS SIGN followed
            // by a hex digit or U+003F QUESTION MARK, consume the next input
            // code point... consume a unicode-range token."
            'u' | 'U' => {
                if self.reader.peek_char(1) == '+'
                    && (is_hex_digit(self.reader.peek_char(2)) || self.reader.peek_char(2) == '?')
                {
                    self.reader.next_char();
                    self.reader.next_char();
                    self.consume_unicode_range()
                } else {
                    self.consume_identifier_like()
                }
            }

            // "U+007C VERTICAL LINE (|)"
            '|' => {
                self.reader.next_char();
                match self.reader.c {
                    '=' => {
                        self.reader.next_char();
                        Token::DashMatch
                    }
                    '|' => {
                        self.reader.next_char();
                        Token::Column
                    }
                    _ => Token::Pipe,
                }
            }

            // "U+007E TILDE (~)"
            '~' => {
                self.reader.next_char();
                if self.reader.c == '=' {
                    self.reader.next_char();
                    Token::IncludeMatch
                } else {
                    Token::Tilde
                }
            }

            '{' => {
                self.reader.next_char();
                Token::LBrace
            }
            '}' => {
                self.reader.next_char();
                Token::RBrace
            }
            '[' => {
                self.reader.next_char();
                Token::LBracket
            }
            ']' => {
                self.reader.next_char();
                Token::RBracket
            }

            // "digit: Reconsume the current input code point, consume a
            // numeric token, and return it."
            '0'..='9' => self.consume_numeric(),

            // "name-start code point: Reconsume the current input code point,
            // consume an ident-like token, and return it."
            c if is_name_start(c) => self.consume_identifier_like(),

            // "anything else: Return a <delim-token> with its value set to
            // the current input code point."
            c => {
                self.reader.next_char();
                Token::Delimiter(c)
            }
        };

        Some(token)
    }

    /// [§ 4.3.1](https://www.w3.org/TR/css-syntax-3/#consume-token)
    ///
    /// "Create a <hash-token>. If the next 3 input code points would start
    /// an ident sequence, set the <hash-token>'s type flag to 'id'."
    fn consume_hash(&mut self) -> Token {
        let identifier = self.starts_identifier();
        let name = self.consume_name();

        if identifier {
            Token::IdHash(name)
        } else {
            Token::Hash(name)
        }
    }

    /// [§ 4.3.4 Consume an ident-like token](https://www.w3.org/TR/css-syntax-3/#consume-ident-like-token)
    ///
    /// "If string's value is an ASCII case-insensitive match for 'url', and
    /// the next input code point is U+0028 LEFT PARENTHESIS, consume it...
    /// consume a url token."
    fn consume_identifier_like(&mut self) -> Token {
        let name = self.consume_name();

        if self.reader.c == '(' {
            self.reader.next_char();
            if name.eq_ignore_ascii_case("url") {
                self.consume_url()
            } else {
                Token::Function(name)
            }
        } else {
            Token::Identifier(name)
        }
    }

    /// [§ 4.3.11 Consume an ident sequence](https://www.w3.org/TR/css-syntax-3/#consume-name)
    fn consume_name(&mut self) -> String {
        loop {
            if is_name(self.reader.c) {
                self.reader.put_char();
                self.reader.next_char();
            } else if is_escape(self.reader.c, self.reader.peek_char(1)) {
                // skip the escape character
                self.reader.next_char();
                let escaped = self.read_escaped();
                self.reader.put(escaped);
            } else {
                return self.reader.text();
            }
        }
    }

    /// [§ 4.3.6 Consume a url token](https://www.w3.org/TR/css-syntax-3/#consume-url-token)
    fn consume_url(&mut self) -> Token {
        while is_token_whitespace(self.reader.c) {
            self.reader.next_char();
        }

        if self.reader.c == '"' || self.reader.c == '\'' {
            let quote = self.reader.c;
            return match self.consume_string(quote) {
                Token::BadString(value) => {
                    self.consume_url_remnants();
                    Token::BadUrl(value)
                }
                token => {
                    let value = match token {
                        Token::String(value) => value,
                        _ => unreachable!("string consumption yields String or BadString"),
                    };

                    while is_token_whitespace(self.reader.c) {
                        self.reader.next_char();
                    }

                    if self.reader.c == ')' {
                        self.reader.next_char();
                        Token::Url(value)
                    } else if self.reader.is_eof() {
                        Token::Url(value)
                    } else {
                        self.consume_url_remnants();
                        Token::BadUrl(value)
                    }
                }
            };
        }

        loop {
            if self.reader.is_eof() {
                return Token::Url(self.reader.text());
            }

            match self.reader.c {
                ')' => {
                    self.reader.next_char();
                    return Token::Url(self.reader.text());
                }
                '\\' => {
                    if is_escape(self.reader.c, self.reader.peek_char(1)) {
                        self.reader.next_char();
                        let escaped = self.read_escaped();
                        self.reader.put(escaped);
                    } else {
                        let url = self.reader.text();
                        self.consume_url_remnants();
                        return Token::BadUrl(url);
                    }
                }
                c if is_token_whitespace(c) => {
                    while is_token_whitespace(self.reader.c) {
                        self.reader.next_char();
                    }

                    if self.reader.c == ')' {
                        self.reader.next_char();
                        return Token::Url(self.reader.text());
                    } else if self.reader.is_eof() {
                        return Token::Url(self.reader.text());
                    }

                    let url = self.reader.text();
                    self.consume_url_remnants();
                    return Token::BadUrl(url);
                }
                c if c == '"' || c == '\'' || c == '(' || is_non_printable(c) => {
                    let url = self.reader.text();
                    self.consume_url_remnants();
                    return Token::BadUrl(url);
                }
                _ => {
                    self.reader.put_char();
                    self.reader.next_char();
                }
            }
        }
    }

    /// [§ 4.3.14 Consume the remnants of a bad url](https://www.w3.org/TR/css-syntax-3/#consume-remnants-of-bad-url)
    ///
    /// "Repeatedly consume the next input code point: U+0029 RIGHT
    /// PARENTHESIS or EOF: Return. Valid escape: consume an escaped code
    /// point. This allows an escaped right parenthesis... to be encountered
    /// without ending the <bad-url-token>."
    fn consume_url_remnants(&mut self) {
        loop {
            if self.reader.is_eof() {
                return;
            }
            if self.reader.c == ')' {
                self.reader.next_char();
                return;
            }
            if is_escape(self.reader.c, self.reader.peek_char(1)) {
                self.reader.next_char();
                let _ = self.read_escaped();
            } else {
                self.reader.next_char();
            }
        }
    }

    /// [§ 4.3.3 Consume a numeric token](https://www.w3.org/TR/css-syntax-3/#consume-numeric-token)
    fn consume_numeric(&mut self) -> Token {
        let number = self.consume_number();

        if self.starts_identifier() {
            // "If the next 3 input code points would start an ident sequence,
            // create a <dimension-token>... consume an ident sequence."
            let unit = self.consume_name();
            Token::Dimension(number, unit)
        } else if self.reader.c == '%' {
            self.reader.next_char();
            Token::Percentage(number)
        } else {
            Token::Number(number)
        }
    }

    /// [§ 4.3.12 Consume a number](https://www.w3.org/TR/css-syntax-3/#consume-number)
    fn consume_number(&mut self) -> Number {
        let mut integer = true;

        // "If the next input code point is U+002B PLUS SIGN (+) or U+002D
        // HYPHEN-MINUS (-), consume it and append it to repr."
        let signed = if self.reader.c == '+' || self.reader.c == '-' {
            self.reader.put_char();
            self.reader.next_char();
            true
        } else {
            false
        };

        while is_digit(self.reader.c) {
            self.reader.put_char();
            self.reader.next_char();
        }

        // "If the next 2 input code points are U+002E FULL STOP (.) followed
        // by a digit..."
        if self.reader.c == '.' && is_digit(self.reader.peek_char(1)) {
            self.reader.put_char();
            self.reader.next_char();
            integer = false;

            while is_digit(self.reader.c) {
                self.reader.put_char();
                self.reader.next_char();
            }
        }

        // "If the next 2 or 3 input code points are U+0045 (E) or U+0065 (e),
        // optionally followed by U+002D (-) or U+002B (+), followed by a
        // digit..."
        if self.reader.c == 'e' || self.reader.c == 'E' {
            let consume = if is_digit(self.reader.peek_char(1)) {
                self.reader.put_char();
                self.reader.next_char();
                true
            } else if matches!(self.reader.peek_char(1), '+' | '-')
                && is_digit(self.reader.peek_char(2))
            {
                self.reader.put_char();
                self.reader.next_char();
                self.reader.put_char();
                self.reader.next_char();
                true
            } else {
                false
            };

            if consume {
                integer = false;
                while is_digit(self.reader.c) {
                    self.reader.put_char();
                    self.reader.next_char();
                }
            }
        }

        let text = self.reader.text();
        let value = convert_number(&text);

        Number::new(value, integer, signed, text)
    }

    /// [§ 4.3.5 Consume a string token](https://www.w3.org/TR/css-syntax-3/#consume-string-token)
    fn consume_string(&mut self, delimiter: char) -> Token {
        // skip the opening quote
        self.reader.next_char();

        loop {
            if self.reader.is_eof() {
                return Token::String(self.reader.text());
            }

            match self.reader.c {
                // "newline: This is a parse error. Reconsume the current
                // input code point, return a <bad-string-token>."
                '\n' => return Token::BadString(self.reader.text()),
                '\\' => {
                    if self.reader.peek_char(1) == '\n' {
                        // "If the next input code point is a newline,
                        // consume it." (escaped line continuation)
                        self.reader.next_char();
                        self.reader.next_char();
                    } else if is_escape(self.reader.c, self.reader.peek_char(1)) {
                        self.reader.next_char();
                        let escaped = self.read_escaped();
                        self.reader.put(escaped);
                    } else {
                        // lone backslash at end of input
                        self.reader.next_char();
                    }
                }
                c if c == delimiter => {
                    self.reader.next_char();
                    return Token::String(self.reader.text());
                }
                _ => {
                    self.reader.put_char();
                    self.reader.next_char();
                }
            }
        }
    }

    /// [§ 4.3.2 Consume comments](https://www.w3.org/TR/css-syntax-3/#consume-comment)
    ///
    /// Entered with the cursor on the `*` of `/*`. Unlike the algorithm in
    /// the specification the comment is surfaced as a token; the parser
    /// layer filters it out.
    fn consume_comment(&mut self) -> Token {
        self.reader.next_char();

        loop {
            if self.reader.is_eof() {
                break;
            }
            if self.reader.c == '*' && self.reader.peek_char(1) == '/' {
                self.reader.next_char();
                self.reader.next_char();
                break;
            }
            self.reader.put_char();
            self.reader.next_char();
        }

        Token::Comment(self.reader.text())
    }

    /// [§ 4.3.7 Consume a unicode-range token](https://www.w3.org/TR/css-syntax-3/#consume-unicode-range-token)
    ///
    /// Entered with the cursor on the first hex digit or `?` after `u+`.
    fn consume_unicode_range(&mut self) -> Token {
        let mut contains_wildcard = false;
        for _ in 0..6 {
            if is_hex_digit(self.reader.c) {
                self.reader.put_char();
                self.reader.next_char();
            } else if self.reader.c == '?' {
                self.reader.put_char();
                self.reader.next_char();
                contains_wildcard = true;
            } else {
                break;
            }
        }

        let word = self.reader.text();

        if contains_wildcard {
            // "Interpret the consumed code points as a hexadecimal number,
            // with the U+003F QUESTION MARK code points replaced by U+0030
            // DIGIT ZERO for the start and U+0046 LATIN CAPITAL LETTER F for
            // the end of the range."
            let start = parse_hex(&word.replace('?', "0"));
            let end = parse_hex(&word.replace('?', "F"));
            return Token::UnicodeRange(start, end);
        }

        let start = parse_hex(&word);

        if self.reader.c == '-' && is_hex_digit(self.reader.peek_char(1)) {
            self.reader.next_char();

            for _ in 0..6 {
                if is_hex_digit(self.reader.c) {
                    self.reader.put_char();
                    self.reader.next_char();
                } else {
                    break;
                }
            }

            let end = parse_hex(&self.reader.text());
            Token::UnicodeRange(start, end)
        } else {
            Token::UnicodeRange(start, start)
        }
    }

    /// [§ 4.3.7 Consume an escaped code point](https://www.w3.org/TR/css-syntax-3/#consume-escaped-code-point)
    ///
    /// Entered with the cursor on the code point after the backslash.
    ///
    /// "hex digit: Consume as many hex digits as possible, but no more than
    /// 5... If the next input code point is whitespace, consume it as well."
    fn read_escaped(&mut self) -> char {
        if is_hex_digit(self.reader.c) {
            let mut hex = String::new();
            for _ in 0..6 {
                if is_hex_digit(self.reader.c) {
                    hex.push(self.reader.c);
                    self.reader.next_char();
                } else {
                    break;
                }
            }

            if is_token_whitespace(self.reader.c) {
                self.reader.next_char();
            }

            let code = parse_hex(&hex);

            // "If this number is zero, or is for a surrogate, or is greater
            // than the maximum allowed code point, return U+FFFD REPLACEMENT
            // CHARACTER."
            if code == 0 || (0xD800..=0xDFFF).contains(&code) || code > 0x10_FFFF {
                '\u{FFFD}'
            } else {
                char::from_u32(code).unwrap_or('\u{FFFD}')
            }
        } else if self.reader.is_eof() {
            '\u{FFFD}'
        } else {
            let c = self.reader.c;
            self.reader.next_char();
            c
        }
    }

    /// [§ 4.3.10 Check if three code points would start a number](https://www.w3.org/TR/css-syntax-3/#starts-with-a-number)
    fn starts_number(&self) -> bool {
        starts_number(self.reader.c, self.reader.peek_char(1), self.reader.peek_char(2))
    }

    /// [§ 4.3.9 Check if three code points would start an ident sequence](https://www.w3.org/TR/css-syntax-3/#would-start-an-identifier)
    fn starts_identifier(&self) -> bool {
        starts_identifier(self.reader.c, self.reader.peek_char(1), self.reader.peek_char(2))
    }
}

/// Parse a hexadecimal string, saturating malformed or oversized input to 0.
/// Inputs come from the lexer's own hex-digit scans and are well-formed.
fn parse_hex(hex: &str) -> u32 {
    u32::from_str_radix(hex, 16).unwrap_or(0)
}

/// [§ 4.3.13 Convert a string to a number](https://www.w3.org/TR/css-syntax-3/#convert-string-to-number)
///
/// "Return the number s · (i + f · 10^-d) · 10^te."
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn convert_number(repr: &str) -> f32 {
    let mut chars = repr.chars().peekable();

    // "A sign: a single U+002B PLUS SIGN (+) or U+002D HYPHEN-MINUS (-),
    // or the empty string. Let s be the number -1 if the sign is -;
    // otherwise, let s be the number 1."
    let s = match chars.peek() {
        Some('-') => {
            let _ = chars.next();
            -1.0
        }
        Some('+') => {
            let _ = chars.next();
            1.0
        }
        _ => 1.0,
    };

    // "An integer part... let i be the number formed by interpreting the
    // digits as a base-10 integer."
    let mut i = 0.0_f64;
    while let Some(c) = chars.peek().copied() {
        if c.is_ascii_digit() {
            let _ = chars.next();
            i = i * 10.0 + f64::from(u32::from(c) - u32::from('0'));
        } else {
            break;
        }
    }

    // "A fractional part... let f be the number formed by interpreting the
    // digits as a base-10 integer and d be the number of digits."
    let mut f = 0.0_f64;
    let mut d = 0;
    if chars.peek() == Some(&'.') {
        let _ = chars.next();
        while let Some(c) = chars.peek().copied() {
            if c.is_ascii_digit() {
                let _ = chars.next();
                f = f * 10.0 + f64::from(u32::from(c) - u32::from('0'));
                d += 1;
            } else {
                break;
            }
        }
    }

    // "An exponent indicator... an exponent sign... let t be the number -1
    // if the sign is -; otherwise, let t be the number 1... let e be the
    // number formed by interpreting the digits as a base-10 integer."
    let mut t = 1.0_f64;
    let mut e = 0.0_f64;
    if matches!(chars.peek(), Some('e' | 'E')) {
        let _ = chars.next();
        match chars.peek() {
            Some('-') => {
                let _ = chars.next();
                t = -1.0;
            }
            Some('+') => {
                let _ = chars.next();
            }
            _ => {}
        }
        while let Some(c) = chars.peek().copied() {
            if c.is_ascii_digit() {
                let _ = chars.next();
                e = e * 10.0 + f64::from(u32::from(c) - u32::from('0'));
            } else {
                break;
            }
        }
    }

    (s * (i + f * 10.0_f64.powi(-d)) * 10.0_f64.powf(t * e)) as f32
}

/// [§ 4.2 Definitions: whitespace](https://www.w3.org/TR/css-syntax-3/#whitespace)
///
/// The reader has already canonicalized every newline form to `\n`.
const fn is_token_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n')
}

/// [§ 4.2 Definitions: digit](https://www.w3.org/TR/css-syntax-3/#digit)
const fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

const fn is_hex_digit(c: char) -> bool {
    c.is_ascii_hexdigit()
}

/// [§ 4.2 Definitions: name-start code point](https://www.w3.org/TR/css-syntax-3/#name-start-code-point)
#[allow(clippy::cast_lossless)]
const fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || (c as u32) >= 0x80 || c == '_'
}

/// [§ 4.2 Definitions: name code point](https://www.w3.org/TR/css-syntax-3/#name-code-point)
const fn is_name(c: char) -> bool {
    is_name_start(c) || c.is_ascii_digit() || c == '-'
}

/// [§ 4.2 Definitions: non-printable code point](https://www.w3.org/TR/css-syntax-3/#non-printable-code-point)
const fn is_non_printable(c: char) -> bool {
    matches!(c, '\u{0}'..='\u{8}' | '\u{B}' | '\u{E}'..='\u{1F}' | '\u{7F}')
}

/// [§ 4.3.8 Check if two code points are a valid escape](https://www.w3.org/TR/css-syntax-3/#starts-with-a-valid-escape)
///
/// "If the first code point is not U+005C REVERSE SOLIDUS (\\), return
/// false. Otherwise, if the second code point is a newline, return false."
const fn is_escape(c0: char, c1: char) -> bool {
    c0 == '\\' && c1 != '\n'
}

/// [§ 4.3.9 Check if three code points would start an ident sequence](https://www.w3.org/TR/css-syntax-3/#would-start-an-identifier)
const fn starts_identifier(c0: char, c1: char, c2: char) -> bool {
    if c0 == '-' {
        is_name_start(c1) || c1 == '-' || is_escape(c1, c2)
    } else {
        is_name_start(c0) || is_escape(c0, c1)
    }
}

/// [§ 4.3.10 Check if three code points would start a number](https://www.w3.org/TR/css-syntax-3/#starts-with-a-number)
const fn starts_number(c0: char, c1: char, c2: char) -> bool {
    if c0 == '+' || c0 == '-' {
        is_digit(c1) || (c1 == '.' && is_digit(c2))
    } else if c0 == '.' {
        is_digit(c1)
    } else {
        is_digit(c0)
    }
}
