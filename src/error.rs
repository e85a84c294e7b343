#![allow(clippy::question_mark)]
use crate::Span;
use std::borrow::Cow;
use std::fmt::{self, Debug, Display};

#[cfg(test)]
#[path = "./error_tests.rs"]
mod tests;

/// Error returned by [`decode`](crate::decode) and by the fallible
/// [`DateTime`](crate::DateTime) operations.
#[derive(Debug, Clone)]
pub struct Error {
    /// What went wrong.
    pub kind: ErrorKind,
    /// Byte range of the offending input.
    ///
    /// Kinds that point at an earlier definition carry that span themselves.
    pub span: Span,
    /// Zero-based line and column of `span.start`. Set for decode errors.
    pub line_info: Option<(usize, usize)>,
    /// Numbered source lines around the error with a caret under the column.
    /// Set for decode errors.
    pub context: Option<String>,
}

impl std::error::Error for Error {}

impl From<(ErrorKind, Span)> for Error {
    fn from((kind, span): (ErrorKind, Span)) -> Self {
        Error {
            kind,
            span,
            line_info: None,
            context: None,
        }
    }
}

impl Error {
    /// The message alone, without location or source excerpt.
    pub fn message(&self) -> String {
        Message(&self.kind).to_string()
    }
}

/// The reasons decoding can fail.
#[derive(Clone)]
pub enum ErrorKind {
    /// The input ended where more was required.
    UnexpectedEof,

    /// The input exceeds 4GiB, the largest size a [`Span`] can address.
    FileTooLarge,

    /// A string contains a character that must be escaped.
    InvalidCharInString(char),

    /// A backslash is followed by a character that starts no escape.
    InvalidEscape(char),

    /// A `\u` or `\U` escape was cut short by this character.
    InvalidHexEscape(char),

    /// A `\u` or `\U` escape names a surrogate or a value past `U+10FFFF`.
    InvalidEscapeValue(u32),

    /// A character that cannot start a line.
    Unexpected(char),

    /// The input ended inside a string. The span points at the opening quote.
    UnterminatedString,

    /// An integer or float literal is malformed.
    InvalidNumber,

    /// A date or time literal is malformed or names an impossible date.
    InvalidDateTime,

    /// A numeric literal does not fit the named representation. Only raised
    /// with `overflow_errors` or `underflow_errors`.
    OutOfRange(&'static str),

    /// A token other than the one required.
    Wanted {
        /// Description of the required token.
        expected: &'static str,
        /// Description of the token found instead.
        found: &'static str,
    },

    /// A `[header]` names a table another header already declared.
    DuplicateTable {
        /// Dotted name of the table.
        name: String,
        /// The earlier header.
        first: Span,
    },

    /// A key is assigned twice in the same table.
    DuplicateKey {
        /// The key, as written.
        key: String,
        /// The earlier assignment, `None` when the key came from the
        /// defaults table.
        first: Option<Span>,
    },

    /// A `[[header]]` names a table that is not an array of tables.
    RedefineAsArray,

    /// Keys may not be multi-line strings.
    MultilineStringKey,

    /// A dotted key runs through a value that is not a table, or through a
    /// table it may not extend.
    DottedKeyInvalidType {
        /// Where the blocking key was first assigned, if known.
        first: Option<Span>,
    },

    /// Strict mode: a header or dotted key reopens an inline table or array.
    InlineClosed {
        /// Key of the inline value.
        name: String,
        /// Where the inline value was assigned, if known.
        first: Option<Span>,
    },

    /// Strict mode: a dotted key runs through an array of tables.
    ArrayOfTablesIndexed {
        /// Key of the array of tables.
        name: String,
    },

    /// A bare word where a value was expected.
    UnquotedString,

    /// A date/time field name that does not exist, or a value the field
    /// cannot hold.
    InvalidField(String),

    /// Free-form message.
    Custom(Cow<'static, str>),
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorKind::UnexpectedEof => "unexpected-eof",
            ErrorKind::FileTooLarge => "file-too-large",
            ErrorKind::InvalidCharInString(_) => "invalid-char-in-string",
            ErrorKind::InvalidEscape(_) => "invalid-escape",
            ErrorKind::InvalidHexEscape(_) => "invalid-hex-escape",
            ErrorKind::InvalidEscapeValue(_) => "invalid-escape-value",
            ErrorKind::Unexpected(_) => "unexpected",
            ErrorKind::UnterminatedString => "unterminated-string",
            ErrorKind::InvalidNumber => "invalid-number",
            ErrorKind::InvalidDateTime => "invalid-datetime",
            ErrorKind::OutOfRange(_) => "out-of-range",
            ErrorKind::Wanted { .. } => "wanted",
            ErrorKind::DuplicateTable { .. } => "duplicate-table",
            ErrorKind::DuplicateKey { .. } => "duplicate-key",
            ErrorKind::RedefineAsArray => "redefine-as-array",
            ErrorKind::MultilineStringKey => "multiline-string-key",
            ErrorKind::DottedKeyInvalidType { .. } => "dotted-key-invalid-type",
            ErrorKind::InlineClosed { .. } => "inline-closed",
            ErrorKind::ArrayOfTablesIndexed { .. } => "array-of-tables-indexed",
            ErrorKind::UnquotedString => "unquoted-string",
            ErrorKind::InvalidField(_) => "invalid-field",
            ErrorKind::Custom(_) => "custom",
        })
    }
}

impl Debug for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

macro_rules! rtry {
    ($($tt:tt)*) => {
        if let Err(err) = $($tt)* {
            return Err(err);
        }
    };
}

/// Writes `before`, then `c` between backticks (escaped when invisible),
/// then `after`.
fn write_char_message(
    f: &mut fmt::Formatter<'_>,
    before: &str,
    c: char,
    after: &str,
) -> fmt::Result {
    rtry!(f.write_str(before));
    rtry!(f.write_str("`"));
    if c.is_whitespace() || c.is_control() {
        for escaped in c.escape_default() {
            rtry!(fmt::Write::write_char(f, escaped));
        }
    } else {
        rtry!(fmt::Write::write_char(f, c));
    }
    rtry!(f.write_str("`"));
    f.write_str(after)
}

/// Writes `before`, then `name` between backticks, then `after`.
fn write_name_message(
    f: &mut fmt::Formatter<'_>,
    before: &str,
    name: &str,
    after: &str,
) -> fmt::Result {
    write!(f, "{before}`{name}`{after}")
}

struct Message<'a>(&'a ErrorKind);

impl Display for Message<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            ErrorKind::UnexpectedEof => f.write_str("unexpected end of input"),
            ErrorKind::FileTooLarge => f.write_str("input exceeds the 4GiB limit"),
            ErrorKind::InvalidCharInString(c) => {
                write_char_message(f, "character ", *c, " must be escaped in a string")
            }
            ErrorKind::InvalidEscape(c) => {
                write_char_message(f, "unknown escape sequence: backslash followed by ", *c, "")
            }
            ErrorKind::InvalidHexEscape(c) => {
                write_char_message(f, "unicode escape interrupted by ", *c, "")
            }
            ErrorKind::InvalidEscapeValue(value) => {
                write!(f, "unicode escape {value:#x} is not a valid character")
            }
            ErrorKind::Unexpected(c) => write_char_message(f, "unexpected character ", *c, ""),
            ErrorKind::UnterminatedString => f.write_str("string is never closed"),
            ErrorKind::InvalidNumber => f.write_str("invalid number"),
            ErrorKind::InvalidDateTime => f.write_str("invalid date or time"),
            ErrorKind::OutOfRange(repr) => write!(f, "number does not fit in {repr}"),
            ErrorKind::Wanted { expected, found } => write!(f, "expected {expected}, found {found}"),
            ErrorKind::DuplicateTable { name, .. } => {
                write_name_message(f, "table ", name, " is declared more than once")
            }
            ErrorKind::DuplicateKey { key, .. } => {
                write_name_message(f, "key ", key, " is assigned more than once")
            }
            ErrorKind::RedefineAsArray => {
                f.write_str("an array of tables header names an existing table")
            }
            ErrorKind::MultilineStringKey => f.write_str("a key cannot be a multi-line string"),
            ErrorKind::DottedKeyInvalidType { .. } => {
                f.write_str("dotted key cannot extend this value")
            }
            ErrorKind::InlineClosed { name, .. } => {
                write_name_message(f, "cannot extend ", name, ", it was defined inline")
            }
            ErrorKind::ArrayOfTablesIndexed { name } => write_name_message(
                f,
                "dotted keys cannot reach into the array of tables ",
                name,
                "",
            ),
            ErrorKind::UnquotedString => {
                f.write_str("bare words are not values, strings need quotes")
            }
            ErrorKind::InvalidField(field) => {
                write_name_message(f, "invalid date/time field ", field, "")
            }
            ErrorKind::Custom(message) => f.write_str(message),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        rtry!(Display::fmt(&Message(&self.kind), f));
        if let Some((line, column)) = self.line_info {
            rtry!(write!(f, " at line {} column {}", line + 1, column + 1));
        }
        match &self.context {
            Some(context) => write!(f, "\n{context}"),
            None => Ok(()),
        }
    }
}
