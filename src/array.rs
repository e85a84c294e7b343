#[cfg(test)]
#[path = "./array_tests.rs"]
mod tests;

use crate::value::Value;
use std::fmt;

/// An ordered sequence of TOML [`Value`]s.
///
/// Arrays of tables (`[[name]]`) decode to an `Array` whose elements are all
/// [`Value::Table`]. Equality ignores the inline display hint.
#[derive(Clone, Default)]
pub struct Array {
    values: Vec<Value>,
    inline: bool,
}

impl Array {
    /// Creates an empty array.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an array with pre-allocated capacity.
    pub fn with_capacity(cap: usize) -> Self {
        Array {
            values: Vec::with_capacity(cap),
            inline: false,
        }
    }

    /// Appends a value to the end of the array.
    #[inline]
    pub fn push(&mut self, value: impl Into<Value>) {
        self.values.push(value.into());
    }

    /// Removes and returns the last element.
    #[inline]
    pub fn pop(&mut self) -> Option<Value> {
        self.values.pop()
    }

    /// Returns the number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the array contains no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `true` if the array was written as an inline `[ ... ]` value. Only
    /// recorded when [`mark_inline`](crate::DecodeOptions::mark_inline) is set.
    #[inline]
    pub fn is_inline(&self) -> bool {
        self.inline
    }

    #[inline]
    pub fn set_inline(&mut self, inline: bool) {
        self.inline = inline;
    }

    /// Returns a reference to the value at `index`.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Returns a mutable reference to the value at `index`.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Value> {
        self.values.get_mut(index)
    }

    #[inline]
    pub fn last(&self) -> Option<&Value> {
        self.values.last()
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.values.iter()
    }

    #[inline]
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Value> {
        self.values.iter_mut()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Value] {
        &self.values
    }
}

impl PartialEq for Array {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

impl fmt::Debug for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.values.iter()).finish()
    }
}

impl std::ops::Index<usize> for Array {
    type Output = Value;

    #[inline]
    fn index(&self, index: usize) -> &Value {
        &self.values[index]
    }
}

impl IntoIterator for Array {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl<'a> IntoIterator for &'a Array {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl<V: Into<Value>> FromIterator<V> for Array {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Array {
            values: iter.into_iter().map(Into::into).collect(),
            inline: false,
        }
    }
}
