//! Decoding of the four string forms: basic, literal, and their multi-line
//! variants.
#![allow(clippy::question_mark)]

#[cfg(test)]
#[path = "./strings_tests.rs"]
mod tests;

use crate::{
    error::ErrorKind,
    parser::{ParseError, Parser},
};

impl Parser<'_> {
    /// Reads a string starting at the opening quote. Returns the decoded text
    /// and whether the multi-line form was used.
    pub(crate) fn read_string(&mut self) -> Result<(String, bool), ParseError> {
        let start = self.cursor.pos();
        let Some(delim) = self.cursor.peek() else {
            return Err(self.set_error(start, None, ErrorKind::UnexpectedEof));
        };
        let multiline = self.cursor.starts_with(&[delim; 3]);
        if multiline {
            self.cursor.skip(3);
            // A newline right after the opening delimiter is trimmed.
            self.cursor.eat_newline();
        } else {
            self.cursor.skip(1);
            if self.cursor.eat(delim) {
                return Ok((String::new(), false));
            }
        }
        self.read_string_loop(start, multiline, delim)
    }

    /// Advances past bytes that need no special handling inside a string.
    ///
    /// Stops at the first byte that is:
    ///   * a control character other than tab
    ///   * DEL (0x7F)
    ///   * the string delimiter
    ///   * a backslash (a false positive for literal strings)
    ///   * past the end of input
    fn skip_string_plain(&mut self, delim: u8) {
        while let Some(b) = self.cursor.peek() {
            if b == delim || b == b'\\' || b == 0x7F || (b < 0x20 && b != 0x09) {
                return;
            }
            self.cursor.skip(1);
        }
    }

    fn read_string_loop(
        &mut self,
        start: usize,
        multiline: bool,
        delim: u8,
    ) -> Result<(String, bool), ParseError> {
        let content_start = self.cursor.pos();
        // Content is sliced straight from the source until the first escape;
        // from then on it is accumulated in `scratch`.
        let mut owned = false;
        loop {
            let plain_start = self.cursor.pos();
            self.skip_string_plain(delim);
            if owned && plain_start < self.cursor.pos() {
                let plain = self.cursor.slice(plain_start, self.cursor.pos());
                self.scratch.push_str(plain);
            }

            let i = self.cursor.pos();
            let Some(b) = self.cursor.advance() else {
                return Err(self.set_error(start, None, ErrorKind::UnterminatedString));
            };

            match b {
                b'\r' => {
                    if !self.cursor.eat(b'\n') {
                        return Err(self.set_error(i, None, ErrorKind::InvalidCharInString('\r')));
                    }
                    if !multiline {
                        return Err(self.set_error(i, None, ErrorKind::InvalidCharInString('\n')));
                    }
                    if owned {
                        self.scratch.push_str("\r\n");
                    }
                }
                b'\n' => {
                    if !multiline {
                        return Err(self.set_error(i, None, ErrorKind::InvalidCharInString('\n')));
                    }
                    if owned {
                        self.scratch.push('\n');
                    }
                }
                d if d == delim => {
                    let end = if multiline {
                        let mut run = 1;
                        while run < 5 && self.cursor.eat(delim) {
                            run += 1;
                        }
                        if run < 3 {
                            // Too short to close: the quotes are content.
                            if owned {
                                for _ in 0..run {
                                    self.scratch.push(delim as char);
                                }
                            }
                            continue;
                        }
                        // Up to two quotes before the closing three belong
                        // to the content.
                        if owned {
                            for _ in 3..run {
                                self.scratch.push(delim as char);
                            }
                        }
                        self.cursor.pos() - 3
                    } else {
                        i
                    };

                    let text = if owned {
                        let text = self.scratch.clone();
                        self.scratch.clear();
                        text
                    } else {
                        self.cursor.slice(content_start, end).to_owned()
                    };
                    return Ok((text, multiline));
                }
                b'\\' if delim == b'"' => {
                    if !owned {
                        self.scratch.clear();
                        let plain = self.cursor.slice(content_start, i);
                        self.scratch.push_str(plain);
                        owned = true;
                    }
                    if let Err(e) = self.read_basic_escape(start, multiline) {
                        return Err(e);
                    }
                }
                // Tab or backslash in a literal string.
                0x09 | 0x20..=0x7E => {
                    if owned {
                        self.scratch.push(b as char);
                    }
                }
                _ => {
                    return Err(self.set_error(i, None, ErrorKind::InvalidCharInString(b as char)));
                }
            }
        }
    }

    fn read_basic_escape(&mut self, string_start: usize, multi: bool) -> Result<(), ParseError> {
        let Some((i, c)) = self.cursor.next_char() else {
            return Err(self.set_error(string_start, None, ErrorKind::UnterminatedString));
        };

        match c {
            '"' => self.scratch.push('"'),
            '\\' => self.scratch.push('\\'),
            'b' => self.scratch.push('\u{8}'),
            'f' => self.scratch.push('\u{c}'),
            'n' => self.scratch.push('\n'),
            'r' => self.scratch.push('\r'),
            't' => self.scratch.push('\t'),
            'u' | 'U' => {
                let digits = if c == 'u' { 4 } else { 8 };
                match self.read_hex(digits, string_start, i) {
                    Ok(ch) => self.scratch.push(ch),
                    Err(e) => return Err(e),
                }
            }
            ' ' | '\t' | '\n' | '\r' if multi => {
                // Line-ending backslash: trailing whitespace, the newline and
                // all whitespace up to the next content are dropped.
                let at_newline = match c {
                    '\n' => true,
                    '\r' => self.cursor.eat(b'\n'),
                    _ => false,
                };
                if !at_newline {
                    if c == '\r' {
                        return Err(self.set_error(i, None, ErrorKind::InvalidEscape(c)));
                    }
                    loop {
                        match self.cursor.peek() {
                            Some(b' ' | b'\t') => self.cursor.skip(1),
                            _ if self.cursor.eat_newline() => break,
                            _ => return Err(self.set_error(i, None, ErrorKind::InvalidEscape(c))),
                        }
                    }
                }
                loop {
                    match self.cursor.peek() {
                        Some(b' ' | b'\t') => self.cursor.skip(1),
                        _ if self.cursor.eat_newline() => {}
                        _ => break,
                    }
                }
            }
            _ => return Err(self.set_error(i, None, ErrorKind::InvalidEscape(c))),
        }
        Ok(())
    }

    /// Reads the digits of a `\u`/`\U` escape.
    ///
    /// Printable characters that are not hex digits count as zero. Quotes,
    /// newlines and control characters end the escape with an error.
    fn read_hex(
        &mut self,
        n: usize,
        string_start: usize,
        escape_start: usize,
    ) -> Result<char, ParseError> {
        let mut value: u32 = 0;
        for _ in 0..n {
            let at = self.cursor.pos();
            match self.cursor.peek() {
                None => {
                    return Err(self.set_error(string_start, None, ErrorKind::UnterminatedString));
                }
                Some(b) if b == b'"' || b < 0x20 || b == 0x7F => {
                    return Err(self.set_error(at, None, ErrorKind::InvalidHexEscape(b as char)));
                }
                Some(_) => {
                    let Some((_, ch)) = self.cursor.next_char() else {
                        return Err(self.set_error(
                            string_start,
                            None,
                            ErrorKind::UnterminatedString,
                        ));
                    };
                    value = value * 16 + ch.to_digit(16).unwrap_or(0);
                }
            }
        }
        match char::from_u32(value) {
            Some(ch) => Ok(ch),
            None => Err(self.set_error(
                escape_start,
                Some(self.cursor.pos()),
                ErrorKind::InvalidEscapeValue(value),
            )),
        }
    }
}
