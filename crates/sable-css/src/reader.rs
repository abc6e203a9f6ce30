//! Raw character cursor over the source text.

/// Sentinel returned for every read past the end of the input.
pub(crate) const EOF_CHAR: char = '\u{1A}';

/// [§ 3.3 Preprocessing the input stream](https://www.w3.org/TR/css-syntax-3/#input-preprocessing)
///
/// "Replace any U+000D CARRIAGE RETURN (CR) code points, U+000C FORM FEED
/// (FF) code points, or pairs of U+000D CARRIAGE RETURN (CR) followed by
/// U+000A LINE FEED (LF) in input by a single U+000A LINE FEED (LF) code
/// point."
///
/// The reader performs this canonicalization on the fly while maintaining
/// the current character, a monotonically increasing character offset, and
/// zero-based line/column counters. It also owns a growable scratch buffer
/// used by the lexer to accumulate decoded text. This layer never fails;
/// out-of-range reads yield the EOF sentinel.
pub(crate) struct Reader {
    /// The raw input characters.
    input: Vec<char>,
    /// Offset of the character following [`Self::c`].
    position: usize,
    /// The current character, canonicalized; [`EOF_CHAR`] at end of input.
    pub c: char,
    /// Zero-based line of the current character.
    pub line: u32,
    /// Zero-based column of the current character.
    pub column: u32,
    /// Scratch buffer drained by [`Self::text`].
    text: String,
}

impl Reader {
    pub(crate) fn new(input: &str) -> Self {
        let mut reader = Self {
            input: input.chars().collect(),
            position: 0,
            c: EOF_CHAR,
            line: 0,
            column: 0,
            text: String::new(),
        };
        reader.load();
        reader
    }

    /// Load the character at `position` into `c`, canonicalizing newlines.
    /// `\r\n` occupies two input slots but reads as a single `\n`.
    fn load(&mut self) {
        self.c = match self.input.get(self.position) {
            Some('\r' | '\u{C}') => '\n',
            Some(&c) => c,
            None => EOF_CHAR,
        };
        self.position += 1;
        if self.input.get(self.position - 1) == Some(&'\r')
            && self.input.get(self.position) == Some(&'\n')
        {
            self.position += 1;
        }
    }

    /// Advance one logical character, updating line/column bookkeeping.
    pub(crate) fn next_char(&mut self) {
        if self.is_eof() {
            return;
        }
        if self.c == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
        self.load();
    }

    /// The nth lookahead character without consuming anything; the EOF
    /// sentinel past the end. `peek_char(1)` is the character after `c`.
    pub(crate) fn peek_char(&self, nth: usize) -> char {
        match self.input.get(self.position + nth - 1) {
            Some('\r' | '\u{C}') => '\n',
            Some(&c) => c,
            None => EOF_CHAR,
        }
    }

    /// Append the current character to the scratch buffer.
    pub(crate) fn put_char(&mut self) {
        self.text.push(self.c);
    }

    /// Append an arbitrary character to the scratch buffer.
    pub(crate) fn put(&mut self, c: char) {
        self.text.push(c);
    }

    /// Drain the scratch buffer, resetting it to empty.
    pub(crate) fn text(&mut self) -> String {
        std::mem::take(&mut self.text)
    }

    /// Character offset of the current character.
    pub(crate) const fn position(&self) -> usize {
        self.position - 1
    }

    pub(crate) const fn is_eof(&self) -> bool {
        self.position > self.input.len()
    }
}

#[cfg(test)]
mod tests {
    use super::{EOF_CHAR, Reader};

    #[test]
    fn test_newline_canonicalization() {
        let mut reader = Reader::new("a\r\nb\rc\u{C}d");
        let mut seen = Vec::new();
        while !reader.is_eof() {
            seen.push(reader.c);
            reader.next_char();
        }
        assert_eq!(seen, vec!['a', '\n', 'b', '\n', 'c', '\n', 'd']);
    }

    #[test]
    fn test_line_column_tracking() {
        let mut reader = Reader::new("ab\ncd");
        assert_eq!((reader.line, reader.column), (0, 0));
        reader.next_char();
        assert_eq!((reader.line, reader.column), (0, 1));
        reader.next_char();
        reader.next_char();
        assert_eq!((reader.line, reader.column), (1, 0));
    }

    #[test]
    fn test_peek_past_end() {
        let reader = Reader::new("x");
        assert_eq!(reader.peek_char(1), EOF_CHAR);
        assert_eq!(reader.peek_char(5), EOF_CHAR);
    }

    #[test]
    fn test_scratch_buffer_drain() {
        let mut reader = Reader::new("ab");
        reader.put_char();
        reader.next_char();
        reader.put_char();
        reader.put('!');
        assert_eq!(reader.text(), "ab!");
        assert_eq!(reader.text(), "");
    }
}
