//! A TOML decoder producing an owned, dynamically typed document tree.
//!
//! Documents decode into a [`Table`] of [`Value`]s. Decoding is configured
//! with [`DecodeOptions`]: integer keys, calendar values for date/time
//! literals, relaxed inline tables, numeric range checks and a strict set of
//! redefinition rules. A table of defaults may be supplied for the document
//! to extend.
//!
//! Errors carry the byte span of the offending input along with its line,
//! column and a rendered excerpt of the surrounding source.
//!
//! # Examples
//!
//! ```
//! use toml_decoder::{DecodeOptions, Error, Value};
//!
//! let content = r#"
//! dev-mode = true
//!
//! [[things]]
//! name = "hammer"
//! value = 43
//!
//! [[things]]
//! name = "drill"
//! value = 300
//! color = "green"
//! "#;
//!
//! let root = toml_decoder::parse(content)?;
//! let things = root.get("things").and_then(Value::as_array).unwrap();
//! assert_eq!(things.len(), 2);
//! let drill = things[1].as_table().unwrap();
//! assert_eq!(drill.get("value").and_then(Value::as_integer), Some(300));
//! assert_eq!(root.get("dev-mode").and_then(Value::as_bool), Some(true));
//!
//! let err = toml_decoder::parse("a = 1\na = 2").unwrap_err();
//! assert_eq!(err.line_info, Some((1, 0)));
//! # Ok::<(), Error>(())
//! ```

mod arena;
mod array;
mod cursor;
mod error;
mod ledger;
mod navigate;
mod number;
mod options;
mod parser;
mod snippet;
mod span;
mod strings;
mod table;
mod time;
mod value;

pub use array::Array;
pub use error::{Error, ErrorKind};
pub use options::DecodeOptions;
pub use parser::{decode, parse};
pub use span::Span;
pub use table::Table;
pub use time::{DateTime, DateTimeKind, Field};
pub use value::{Key, Value};

#[cfg(feature = "serde")]
pub mod impl_serde;
