#[cfg(test)]
#[path = "./value_tests.rs"]
mod tests;

use crate::time::DateTime;
use crate::{Array, Table};
use std::fmt;

/// A decoded TOML value.
///
/// Use the `as_*` methods ([`as_str`](Self::as_str),
/// [`as_integer`](Self::as_integer), [`as_table`](Self::as_table), etc.) to
/// extract the payload, or match on the variants directly.
///
/// # Examples
///
/// ```
/// let root = toml_decoder::parse("x = 42\nname = \"demo\"")?;
/// assert_eq!(root.get("x").and_then(|v| v.as_integer()), Some(42));
/// assert_eq!(root.get("name").and_then(|v| v.as_str()), Some("demo"));
/// # Ok::<(), toml_decoder::Error>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// A string value. Date/time literals also decode to strings unless
    /// [`fancy_dates`](crate::DecodeOptions::fancy_dates) is set.
    String(String),
    /// A string written with `"""` or `'''` delimiters, only produced when
    /// [`multi_strings`](crate::DecodeOptions::multi_strings) is set.
    MultilineString(String),
    /// An integer value.
    Integer(i64),
    /// A floating-point value.
    Float(f64),
    /// A boolean value.
    Boolean(bool),
    /// A date, time, date-time or offset date-time.
    DateTime(DateTime),
    /// An array value.
    Array(Array),
    /// A table value.
    Table(Table),
}

impl Value {
    /// Returns the TOML type name (e.g. `"string"`, `"integer"`, `"table"`).
    pub fn type_str(&self) -> &'static str {
        match self {
            Value::String(_) | Value::MultilineString(_) => "string",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Boolean(_) => "boolean",
            Value::DateTime(_) => "datetime",
            Value::Array(_) => "array",
            Value::Table(_) => "table",
        }
    }

    /// Returns a borrowed string if this is a string value of either form.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) | Value::MultilineString(s) => Some(s),
            _ => None,
        }
    }

    /// Returns an `i64` if this is an integer value.
    #[inline]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns an `f64` if this is a float or integer value.
    ///
    /// Integer values are converted to `f64` via `as` cast (lossy for large
    /// values outside the 2^53 exact-integer range).
    #[inline]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Returns a `bool` if this is a boolean value.
    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    #[inline]
    pub fn as_datetime(&self) -> Option<&DateTime> {
        match self {
            Value::DateTime(dt) => Some(dt),
            _ => None,
        }
    }

    /// Returns a borrowed array if this is an array value.
    #[inline]
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Returns a borrowed table if this is a table value.
    #[inline]
    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Value::Table(t) => Some(t),
            _ => None,
        }
    }

    #[inline]
    pub fn as_array_mut(&mut self) -> Option<&mut Array> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    #[inline]
    pub fn as_table_mut(&mut self) -> Option<&mut Table> {
        match self {
            Value::Table(t) => Some(t),
            _ => None,
        }
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_owned())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<DateTime> for Value {
    fn from(value: DateTime) -> Self {
        Value::DateTime(value)
    }
}

impl From<Array> for Value {
    fn from(value: Array) -> Self {
        Value::Array(value)
    }
}

impl From<Table> for Value {
    fn from(value: Table) -> Self {
        Value::Table(value)
    }
}

/// A table key.
///
/// Keys are names, except that bare keys spelling a canonical integer become
/// [`Key::Int`] when [`int_keys`](crate::DecodeOptions::int_keys) is set.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    Name(String),
    Int(i64),
}

impl Key {
    /// Returns the name, or `None` for an integer key.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Key::Name(name) => Some(name),
            Key::Int(_) => None,
        }
    }

    #[inline]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Key::Int(i) => Some(*i),
            Key::Name(_) => None,
        }
    }

    /// `true` if this key is spelled `name` in the source: names compare
    /// exactly, integer keys by their decimal form.
    pub fn matches(&self, name: &str) -> bool {
        match self {
            Key::Name(n) => n == name,
            Key::Int(i) => i.to_string() == name,
        }
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Key::Name(value.to_owned())
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Key::Name(value)
    }
}

impl From<i64> for Key {
    fn from(value: i64) -> Self {
        Key::Int(value)
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Name(name) => fmt::Debug::fmt(name, f),
            Key::Int(i) => fmt::Debug::fmt(i, f),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Name(name) => f.write_str(name),
            Key::Int(i) => fmt::Display::fmt(i, f),
        }
    }
}
