/// Flags controlling how [`decode`](crate::decode) builds the document.
///
/// Every flag defaults to `false`, which gives plain TOML 1.0 decoding with
/// dates kept as strings and out-of-range numbers clamped.
///
/// ```
/// use toml_decoder::{DecodeOptions, Value};
///
/// let options = DecodeOptions {
///     fancy_dates: true,
///     ..DecodeOptions::default()
/// };
/// let root = toml_decoder::decode("when = 1979-05-27", None, &options)?;
/// assert!(matches!(root.get("when"), Some(Value::DateTime(_))));
/// # Ok::<(), toml_decoder::Error>(())
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Bare keys spelling a canonical integer (`1`, `-3`, not `01`) become
    /// [`Key::Int`](crate::Key::Int).
    pub int_keys: bool,
    /// Date/time literals decode to [`Value::DateTime`](crate::Value::DateTime)
    /// instead of the literal text.
    pub fancy_dates: bool,
    /// Inline tables may span lines and end with a trailing comma.
    pub enhanced_tables: bool,
    /// Multi-line strings decode to
    /// [`Value::MultilineString`](crate::Value::MultilineString).
    pub multi_strings: bool,
    /// Inline tables and arrays report [`is_inline`](crate::Table::is_inline).
    pub mark_inline: bool,
    /// Integer and float overflow fail with
    /// [`ErrorKind::OutOfRange`](crate::ErrorKind::OutOfRange) instead of
    /// clamping.
    pub overflow_errors: bool,
    /// Float literals that round to zero or a subnormal fail with
    /// [`ErrorKind::OutOfRange`](crate::ErrorKind::OutOfRange).
    pub underflow_errors: bool,
    /// Use the strict navigation rules: dotted keys may not reach into arrays
    /// of tables, and reopening an inline value gets its own error kind.
    pub strict: bool,
}

impl DecodeOptions {
    /// Alias of [`enhanced_tables`](Self::enhanced_tables).
    #[inline]
    pub fn fancy_tables(&self) -> bool {
        self.enhanced_tables
    }
}
