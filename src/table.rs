#[cfg(test)]
#[path = "./table_tests.rs"]
mod tests;

use crate::value::{Key, Value};
use std::fmt;

/// A TOML table: key-value pairs kept in insertion order.
///
/// Lookup is a linear scan; decoded documents rarely have tables large enough
/// for that to matter, and the decoder keeps its own index while building.
///
/// Equality compares entries in order and ignores the inline display hint.
#[derive(Clone, Default)]
pub struct Table {
    entries: Vec<(Key, Value)>,
    inline: bool,
}

impl Table {
    /// Creates an empty table.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Table {
            entries: Vec::with_capacity(capacity),
            inline: false,
        }
    }

    /// Returns the number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `true` if the table was written as an inline `{ ... }` value. Only
    /// recorded when [`mark_inline`](crate::DecodeOptions::mark_inline) is set.
    #[inline]
    pub fn is_inline(&self) -> bool {
        self.inline
    }

    #[inline]
    pub fn set_inline(&mut self, inline: bool) {
        self.inline = inline;
    }

    fn find_index(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|(key, _)| key.matches(name))
    }

    fn find_key(&self, key: &Key) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }

    /// Returns a reference to the value for `name`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        let idx = self.find_index(name)?;
        Some(&self.entries[idx].1)
    }

    /// Returns a reference to the value stored under the integer key `key`.
    pub fn get_int(&self, key: i64) -> Option<&Value> {
        let idx = self.find_key(&Key::Int(key))?;
        Some(&self.entries[idx].1)
    }

    /// Returns a mutable reference to the value for `name`.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        let idx = self.find_index(name)?;
        Some(&mut self.entries[idx].1)
    }

    pub fn get_key_value(&self, name: &str) -> Option<(&Key, &Value)> {
        let idx = self.find_index(name)?;
        let (key, value) = &self.entries[idx];
        Some((key, value))
    }

    /// Returns `true` if the table contains the key.
    #[inline]
    pub fn contains_key(&self, name: &str) -> bool {
        self.find_index(name).is_some()
    }

    /// Inserts a key-value pair. An existing entry for the same key keeps its
    /// position and has its value replaced, the old value is returned.
    pub fn insert(&mut self, key: impl Into<Key>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let value = value.into();
        match self.find_key(&key) {
            Some(idx) => Some(std::mem::replace(&mut self.entries[idx].1, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Appends without checking for an existing entry.
    pub(crate) fn push(&mut self, key: Key, value: Value) {
        self.entries.push((key, value));
    }

    /// Removes the entry for `name`, preserving the order of the others.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        let idx = self.find_index(name)?;
        Some(self.entries.remove(idx).1)
    }

    /// Iterates over the entries in insertion order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&Key, &Value)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn iter_mut(&mut self) -> impl ExactSizeIterator<Item = (&Key, &mut Value)> {
        self.entries.iter_mut().map(|(k, v)| (&*k, v))
    }

    pub fn keys(&self) -> impl ExactSizeIterator<Item = &Key> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl ExactSizeIterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }
}

impl PartialEq for Table {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl fmt::Debug for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl IntoIterator for Table {
    type Item = (Key, Value);
    type IntoIter = std::vec::IntoIter<(Key, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K: Into<Key>, V: Into<Value>> FromIterator<(K, V)> for Table {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = Table::new();
        for (k, v) in iter {
            table.insert(k, v);
        }
        table
    }
}
