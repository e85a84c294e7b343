// Deliberately avoid `?` operator throughout the decoder modules for
// compile-time performance: explicit match/if-let prevents the compiler from
// generating From::from conversion and drop-glue machinery at every call site.
#![allow(clippy::question_mark)]

#[cfg(test)]
#[path = "./parser_tests.rs"]
mod tests;

use crate::{
    DecodeOptions, Span, Table,
    arena::{Arena, NodeId, Slot},
    cursor::{Cursor, LineEnd, is_keylike_byte},
    error::{Error, ErrorKind},
    ledger::Ledger,
    number::{self, Literal},
    snippet,
    value::{Key, Value},
};

// ---------------------------------------------------------------------------
// Lightweight internal error -- zero-sized, no drop glue.
// When a method returns Err(ParseError), the full error details have already
// been written into Parser::error_kind / Parser::error_span.
// ---------------------------------------------------------------------------

#[derive(Copy, Clone)]
pub(crate) struct ParseError;

/// One segment of a (possibly dotted) key together with where it was written.
#[derive(Clone, Debug)]
pub(crate) struct KeySegment {
    pub(crate) key: Key,
    pub(crate) span: Span,
}

pub(crate) struct Parser<'a> {
    pub(crate) cursor: Cursor<'a>,
    source: &'a str,
    pub(crate) options: DecodeOptions,
    pub(crate) arena: Arena,
    pub(crate) ledger: Ledger,
    pub(crate) root: NodeId,
    /// Table that unqualified keys are assigned into: the root, or the target
    /// of the last header.
    pub(crate) current: NodeId,
    /// Reused buffer for strings that contain escapes.
    pub(crate) scratch: String,

    // Error context -- populated just before returning ParseError
    error_span: Span,
    error_kind: Option<ErrorKind>,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str, options: DecodeOptions, defaults: Option<Table>) -> Self {
        let mut arena = Arena::new();
        let root = match defaults {
            Some(table) => arena.import_table(table),
            None => arena.new_table(false),
        };
        Parser {
            cursor: Cursor::new(source),
            source,
            options,
            arena,
            ledger: Ledger::default(),
            root,
            current: root,
            scratch: String::new(),
            error_span: Span::default(),
            error_kind: None,
        }
    }

    // -- error helpers ------------------------------------------------------

    #[cold]
    pub(crate) fn set_error(
        &mut self,
        start: usize,
        end: Option<usize>,
        kind: ErrorKind,
    ) -> ParseError {
        self.error_span = Span::new(start as u32, end.unwrap_or(start + 1) as u32);
        self.error_kind = Some(kind);
        ParseError
    }

    fn take_error(&mut self) -> Error {
        let kind = self
            .error_kind
            .take()
            .unwrap_or(ErrorKind::Custom("decoding failed".into()));
        let span = self.error_span;
        let offset = span.start as usize;
        Error {
            kind,
            span,
            line_info: Some(self.to_linecol(offset)),
            context: Some(snippet::render(
                self.source,
                offset,
                snippet::CONTEXT_LINES,
            )),
        }
    }

    fn to_linecol(&self, offset: usize) -> (usize, usize) {
        let mut line_start = 0;
        let mut line_num = 0;
        for (i, &b) in self.cursor.bytes().iter().enumerate() {
            if i >= offset {
                return (line_num, offset - line_start);
            }
            if b == b'\n' {
                line_num += 1;
                line_start = i + 1;
            }
        }
        (line_num, offset.saturating_sub(line_start))
    }

    /// Describes the token under the cursor for [`ErrorKind::Wanted`], along
    /// with where it ends.
    fn scan_token_desc_and_end(&self) -> (&'static str, usize) {
        let bytes = self.cursor.bytes();
        let pos = self.cursor.pos();
        match self.cursor.peek() {
            None => ("eof", bytes.len()),
            Some(b'\n' | b'\r') => ("a newline", pos + 1),
            Some(b' ' | b'\t') => {
                let mut end = pos + 1;
                while end < bytes.len() && (bytes[end] == b' ' || bytes[end] == b'\t') {
                    end += 1;
                }
                ("whitespace", end)
            }
            Some(b'#') => ("a comment", pos + 1),
            Some(b'=') => ("an equals", pos + 1),
            Some(b'.') => ("a period", pos + 1),
            Some(b',') => ("a comma", pos + 1),
            Some(b':') => ("a colon", pos + 1),
            Some(b'+') => ("a plus", pos + 1),
            Some(b'{') => ("a left brace", pos + 1),
            Some(b'}') => ("a right brace", pos + 1),
            Some(b'[') => ("a left bracket", pos + 1),
            Some(b']') => ("a right bracket", pos + 1),
            Some(b'\'' | b'"') => ("a string", pos + 1),
            Some(b) if is_keylike_byte(b) => {
                let mut end = pos + 1;
                while end < bytes.len() && is_keylike_byte(bytes[end]) {
                    end += 1;
                }
                ("an identifier", end)
            }
            Some(_) => ("a character", pos + 1),
        }
    }

    #[cold]
    fn wanted(&mut self, expected: &'static str) -> ParseError {
        let start = self.cursor.pos();
        let (found, end) = self.scan_token_desc_and_end();
        self.set_error(start, Some(end), ErrorKind::Wanted { expected, found })
    }

    fn expect_byte(&mut self, b: u8) -> Result<(), ParseError> {
        if self.cursor.eat(b) {
            Ok(())
        } else {
            Err(self.wanted(byte_describe(b)))
        }
    }

    /// Skips whitespace, newlines and comments between array elements (and
    /// inline table entries when enhanced tables are enabled).
    fn eat_intermediate(&mut self) {
        while let LineEnd::Newline = self.cursor.consume_line_whitespace() {
            self.cursor.eat_newline();
        }
    }

    fn finish_line(&mut self) -> Result<(), ParseError> {
        match self.cursor.consume_line_whitespace() {
            LineEnd::Eof => Ok(()),
            LineEnd::Newline => {
                self.cursor.eat_newline();
                Ok(())
            }
            LineEnd::Content => Err(self.wanted("newline")),
        }
    }

    // -- keys ---------------------------------------------------------------

    fn read_key(&mut self) -> Result<KeySegment, ParseError> {
        let start = self.cursor.pos();
        match self.cursor.peek() {
            Some(b'"' | b'\'') => {
                let (name, multiline) = match self.read_string() {
                    Ok(v) => v,
                    Err(e) => return Err(e),
                };
                let end = self.cursor.pos();
                if multiline {
                    return Err(self.set_error(start, Some(end), ErrorKind::MultilineStringKey));
                }
                Ok(KeySegment {
                    key: Key::Name(name),
                    span: Span::new(start as u32, end as u32),
                })
            }
            Some(b) if is_keylike_byte(b) => {
                let text = self.read_keylike();
                let end = self.cursor.pos();
                let key = match text.parse::<i64>() {
                    Ok(i) if self.options.int_keys && i.to_string() == text => Key::Int(i),
                    _ => Key::Name(text.to_owned()),
                };
                Ok(KeySegment {
                    key,
                    span: Span::new(start as u32, end as u32),
                })
            }
            _ => Err(self.wanted("a table key")),
        }
    }

    fn read_keylike(&mut self) -> &'a str {
        let start = self.cursor.pos();
        while let Some(b) = self.cursor.peek() {
            if !is_keylike_byte(b) {
                break;
            }
            self.cursor.skip(1);
        }
        self.cursor.slice(start, self.cursor.pos())
    }

    /// Reads `a.b.c`, allowing spaces around the dots. Returns the leading
    /// segments and the final one separately.
    fn read_dotted_key(&mut self) -> Result<(Vec<KeySegment>, KeySegment), ParseError> {
        let mut path = Vec::new();
        let mut last = match self.read_key() {
            Ok(k) => k,
            Err(e) => return Err(e),
        };
        loop {
            self.cursor.eat_whitespace();
            if !self.cursor.eat(b'.') {
                break;
            }
            self.cursor.eat_whitespace();
            let next = match self.read_key() {
                Ok(k) => k,
                Err(e) => return Err(e),
            };
            path.push(std::mem::replace(&mut last, next));
        }
        Ok((path, last))
    }

    // -- values -------------------------------------------------------------

    /// Reads the value following `=`. A missing value is reported right
    /// after the equals sign.
    fn value_after_equals(&mut self, eq_end: usize) -> Result<Slot, ParseError> {
        match self.cursor.peek() {
            None | Some(b'\n' | b'\r' | b'#') => {
                let (found, _) = self.scan_token_desc_and_end();
                Err(self.set_error(
                    eq_end,
                    None,
                    ErrorKind::Wanted {
                        expected: "a value",
                        found,
                    },
                ))
            }
            _ => self.value(),
        }
    }

    fn value(&mut self) -> Result<Slot, ParseError> {
        let at = self.cursor.pos();
        let Some(byte) = self.cursor.peek() else {
            return Err(self.set_error(at, None, ErrorKind::UnexpectedEof));
        };
        match byte {
            b'"' | b'\'' => {
                let (text, multiline) = match self.read_string() {
                    Ok(v) => v,
                    Err(e) => return Err(e),
                };
                Ok(Slot::Scalar(if multiline && self.options.multi_strings {
                    Value::MultilineString(text)
                } else {
                    Value::String(text)
                }))
            }
            b'{' => {
                let id = match self.inline_table() {
                    Ok(id) => id,
                    Err(e) => return Err(e),
                };
                self.ledger.close(id);
                Ok(Slot::Node(id))
            }
            b'[' => {
                let id = match self.array() {
                    Ok(id) => id,
                    Err(e) => return Err(e),
                };
                self.ledger.close(id);
                Ok(Slot::Node(id))
            }
            b'+' | b'-' | b'0'..=b'9' => {
                let end = number::literal_end(self.cursor.bytes(), at);
                self.cursor.skip(end - at);
                self.number(at, end)
            }
            b if is_keylike_byte(b) => {
                let text = self.read_keylike();
                let end = self.cursor.pos();
                match text {
                    "true" => Ok(Slot::Scalar(Value::Boolean(true))),
                    "false" => Ok(Slot::Scalar(Value::Boolean(false))),
                    "inf" | "nan" => self.number(at, end),
                    _ => Err(self.set_error(at, Some(end), ErrorKind::UnquotedString)),
                }
            }
            _ => Err(self.wanted("a value")),
        }
    }

    fn number(&mut self, start: usize, end: usize) -> Result<Slot, ParseError> {
        let text = self.cursor.slice(start, end);
        let value = match number::classify(text, &self.options) {
            Ok(Literal::Integer(i)) => Value::Integer(i),
            Ok(Literal::Float(f)) => Value::Float(f),
            Ok(Literal::DateTime(dt)) if self.options.fancy_dates => Value::DateTime(dt),
            Ok(Literal::DateTime(_)) => Value::String(text.to_owned()),
            Err(kind) => return Err(self.set_error(start, Some(end), kind)),
        };
        Ok(Slot::Scalar(value))
    }

    /// Decodes `{ ... }` with a fresh ledger scope. The caller's ledger is
    /// restored whether or not decoding succeeds.
    fn inline_table(&mut self) -> Result<NodeId, ParseError> {
        self.cursor.skip(1);
        let id = self.arena.new_table(self.options.mark_inline);
        let outer = std::mem::take(&mut self.ledger);
        let result = self.inline_table_contents(id);
        self.ledger = outer;
        result.map(|()| id)
    }

    fn inline_table_contents(&mut self, id: NodeId) -> Result<(), ParseError> {
        self.inline_table_whitespace();
        if self.cursor.eat(b'}') {
            return Ok(());
        }
        loop {
            let (path, last) = match self.read_dotted_key() {
                Ok(k) => k,
                Err(e) => return Err(e),
            };
            if let Err(e) = self.expect_byte(b'=') {
                return Err(e);
            }
            let eq_end = self.cursor.pos();
            let table = match self.navigate_dotted(id, &path, &last) {
                Ok(t) => t,
                Err(e) => return Err(e),
            };
            self.cursor.eat_whitespace();
            let slot = match self.value_after_equals(eq_end) {
                Ok(s) => s,
                Err(e) => return Err(e),
            };
            self.arena.insert(table, last.key, slot);

            self.inline_table_whitespace();
            if self.cursor.eat(b'}') {
                return Ok(());
            }
            if let Err(e) = self.expect_byte(b',') {
                return Err(e);
            }
            self.inline_table_whitespace();
            if self.options.enhanced_tables && self.cursor.eat(b'}') {
                return Ok(());
            }
        }
    }

    fn inline_table_whitespace(&mut self) {
        if self.options.enhanced_tables {
            self.eat_intermediate();
        } else {
            self.cursor.eat_whitespace();
        }
    }

    /// Decodes `[ ... ]`. Elements are separated by a comma or by any run of
    /// whitespace, newlines and comments.
    fn array(&mut self) -> Result<NodeId, ParseError> {
        self.cursor.skip(1);
        let id = self.arena.new_array(self.options.mark_inline);
        loop {
            self.eat_intermediate();
            if self.cursor.eat(b']') {
                return Ok(id);
            }
            let slot = match self.value() {
                Ok(s) => s,
                Err(e) => return Err(e),
            };
            self.arena.push(id, slot);
            let value_end = self.cursor.pos();
            self.eat_intermediate();
            if self.cursor.eat(b',') || self.cursor.peek() == Some(b']') {
                continue;
            }
            if self.cursor.pos() == value_end {
                return Err(self.wanted("a comma"));
            }
        }
    }

    // -- document -----------------------------------------------------------

    fn parse_document(&mut self) -> Result<(), ParseError> {
        loop {
            match self.cursor.consume_line_whitespace() {
                LineEnd::Eof => return Ok(()),
                LineEnd::Newline => {
                    self.cursor.eat_newline();
                    continue;
                }
                LineEnd::Content => {}
            }
            let result = match self.cursor.peek() {
                Some(b'[') => self.table_header(),
                Some(b) if b < 0x20 || b == 0x7F => {
                    let at = self.cursor.pos();
                    return Err(self.set_error(at, None, ErrorKind::Unexpected(b as char)));
                }
                _ => self.key_value(),
            };
            if let Err(e) = result {
                return Err(e);
            }
        }
    }

    fn table_header(&mut self) -> Result<(), ParseError> {
        let start = self.cursor.pos();
        self.cursor.skip(1);
        let is_array = self.cursor.eat(b'[');
        self.cursor.eat_whitespace();
        let (path, last) = match self.read_dotted_key() {
            Ok(k) => k,
            Err(e) => return Err(e),
        };
        if let Err(e) = self.expect_byte(b']') {
            return Err(e);
        }
        if is_array && let Err(e) = self.expect_byte(b']') {
            return Err(e);
        }
        let header = Span::new(start as u32, self.cursor.pos() as u32);
        if let Err(e) = self.navigate_header(&path, &last, is_array, header) {
            return Err(e);
        }
        self.finish_line()
    }

    fn key_value(&mut self) -> Result<(), ParseError> {
        let (path, last) = match self.read_dotted_key() {
            Ok(k) => k,
            Err(e) => return Err(e),
        };
        if let Err(e) = self.expect_byte(b'=') {
            return Err(e);
        }
        let eq_end = self.cursor.pos();
        let table = match self.navigate_dotted(self.current, &path, &last) {
            Ok(t) => t,
            Err(e) => return Err(e),
        };
        self.cursor.eat_whitespace();
        let slot = match self.value_after_equals(eq_end) {
            Ok(s) => s,
            Err(e) => return Err(e),
        };
        self.arena.insert(table, last.key, slot);
        self.finish_line()
    }
}

// ---------------------------------------------------------------------------
// Top-level entry points
// ---------------------------------------------------------------------------

/// Decodes a TOML document into a [`Table`].
///
/// When `defaults` is given, the document is decoded on top of it: keys the
/// document assigns must not already exist in the defaults, while tables and
/// arrays of tables from the defaults may be extended by headers.
///
/// # Errors
///
/// Returns the first error encountered. Errors carry the byte span of the
/// offending input, its zero-based line and column, and a rendered excerpt
/// of the surrounding source.
pub fn decode(
    source: &str,
    defaults: Option<Table>,
    options: &DecodeOptions,
) -> Result<Table, Error> {
    if source.len() > u32::MAX as usize {
        return Err(Error::from((ErrorKind::FileTooLarge, Span::default())));
    }
    log::trace!(
        "decoding {} bytes (strict: {})",
        source.len(),
        options.strict
    );

    let mut parser = Parser::new(source, *options, defaults);
    if parser.parse_document().is_err() {
        let err = parser.take_error();
        log::trace!("decode failed at byte {}: {}", err.span.start, err.kind);
        return Err(err);
    }
    let root = parser.root;
    let table = parser.arena.export_table(root);
    log::trace!("decoded {} top-level keys", table.len());
    Ok(table)
}

/// Decodes a TOML document with the default options and no defaults table.
pub fn parse(source: &str) -> Result<Table, Error> {
    decode(source, None, &DecodeOptions::default())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn byte_describe(b: u8) -> &'static str {
    match b {
        b'\n' => "a newline",
        b' ' | b'\t' => "whitespace",
        b'=' => "an equals",
        b'.' => "a period",
        b',' => "a comma",
        b':' => "a colon",
        b'+' => "a plus",
        b'{' => "a left brace",
        b'}' => "a right brace",
        b'[' => "a left bracket",
        b']' => "a right bracket",
        b'\'' | b'"' => "a string",
        _ if is_keylike_byte(b) => "an identifier",
        _ => "a character",
    }
}
