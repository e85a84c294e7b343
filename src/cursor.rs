//! Position-tracked view over the source bytes.
//!
//! The cursor never fails: running off the end of the input is reported as
//! `None` / `false`, and it is up to the parser to decide whether that is an
//! error at the current point of the grammar.

#[cfg(test)]
#[path = "./cursor_tests.rs"]
mod tests;

/// What [`Cursor::consume_line_whitespace`] stopped at.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum LineEnd {
    /// A `\n` or `\r\n`, left unconsumed.
    Newline,
    /// End of input.
    Eof,
    /// Anything else: the line still has content.
    Content,
}

pub(crate) struct Cursor<'a> {
    /// Always valid UTF-8 (derived from `&str`).
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(input: &'a str) -> Self {
        Cursor {
            bytes: input.as_bytes(),
            pos: 0,
        }
    }

    #[inline]
    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    #[inline]
    pub(crate) fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    #[inline]
    pub(crate) fn is_eof(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    #[inline]
    pub(crate) fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    #[inline]
    pub(crate) fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    /// Consumes one byte.
    #[inline]
    pub(crate) fn advance(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        Some(b)
    }

    #[inline]
    pub(crate) fn starts_with(&self, literal: &[u8]) -> bool {
        self.bytes[self.pos.min(self.bytes.len())..].starts_with(literal)
    }

    /// Skips `n` bytes, clamped to the end of input.
    #[inline]
    pub(crate) fn skip(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.bytes.len());
    }

    #[inline]
    pub(crate) fn eat(&mut self, b: u8) -> bool {
        if self.peek() == Some(b) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Reads the next full character. Multi-byte sequences are decoded so
    /// that error messages can name the offending character.
    pub(crate) fn next_char(&mut self) -> Option<(usize, char)> {
        let i = self.pos;
        let &b = self.bytes.get(i)?;
        if b < 0x80 {
            self.pos = i + 1;
            return Some((i, b as char));
        }
        // The source is valid UTF-8, so the lead byte gives the length.
        let len = match b {
            0xF0.. => 4,
            0xE0.. => 3,
            _ => 2,
        };
        let end = (i + len).min(self.bytes.len());
        let ch = self.slice(i, end).chars().next()?;
        self.pos = i + ch.len_utf8();
        Some((i, ch))
    }

    /// Text between two offsets. Offsets produced by the parser always fall on
    /// character boundaries; anything else yields an empty string.
    #[inline]
    pub(crate) fn slice(&self, start: usize, end: usize) -> &'a str {
        std::str::from_utf8(&self.bytes[start..end]).unwrap_or_default()
    }

    pub(crate) fn eat_whitespace(&mut self) {
        while let Some(b' ' | b'\t') = self.peek() {
            self.pos += 1;
        }
    }

    /// Consumes a `\n` or `\r\n`.
    pub(crate) fn eat_newline(&mut self) -> bool {
        match self.peek() {
            Some(b'\n') => {
                self.pos += 1;
                true
            }
            Some(b'\r') if self.peek_at(1) == Some(b'\n') => {
                self.pos += 2;
                true
            }
            _ => false,
        }
    }

    #[inline]
    pub(crate) fn at_newline(&self) -> bool {
        match self.peek() {
            Some(b'\n') => true,
            Some(b'\r') => self.peek_at(1) == Some(b'\n'),
            _ => false,
        }
    }

    /// Skips spaces, tabs and a trailing `#` comment, stopping before the
    /// newline. A comment ends early at a control character, which is then
    /// reported as [`LineEnd::Content`].
    pub(crate) fn consume_line_whitespace(&mut self) -> LineEnd {
        self.eat_whitespace();
        if self.eat(b'#') {
            while let Some(0x09 | 0x20..=0x7E | 0x80..) = self.peek() {
                self.pos += 1;
            }
        }
        if self.is_eof() {
            LineEnd::Eof
        } else if self.at_newline() {
            LineEnd::Newline
        } else {
            LineEnd::Content
        }
    }
}

#[inline]
pub(crate) fn is_keylike_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_'
}
