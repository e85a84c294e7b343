//! Per-decode bookkeeping of which tables and keys have been defined.
//!
//! The ledger is keyed by [`NodeId`], independent of the node contents. It is
//! filled lazily: a node without an entry is an implicitly created table (or
//! one that came from the defaults) that nothing has claimed yet.

#[cfg(test)]
#[path = "./ledger_tests.rs"]
mod tests;

use crate::Span;
use crate::arena::NodeId;
use crate::value::Key;
use foldhash::HashMap;

/// How an open table came to be defined.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Declared {
    /// Target of a `[header]` or an `[[array]]` element.
    Header(Span),
    /// Created or extended by a dotted key.
    Dotted(Span),
}

/// An open table: the keys assigned so far and how the table was declared.
#[derive(Default, Debug)]
pub(crate) struct OpenTable {
    claimed: HashMap<Key, Span>,
    pub(crate) declared: Option<Declared>,
}

impl OpenTable {
    /// Records `key` as claimed, keeping the span of the first claim.
    /// Returns that first span if the key was already claimed.
    pub(crate) fn claim(&mut self, key: &Key, span: Span) -> Option<Span> {
        if let Some(first) = self.claimed.get(key) {
            return Some(*first);
        }
        self.claimed.insert(key.clone(), span);
        None
    }

    pub(crate) fn claimed(&self, key: &Key) -> Option<Span> {
        self.claimed.get(key).copied()
    }
}

#[derive(Debug)]
pub(crate) enum LedgerEntry {
    Open(OpenTable),
    /// An array of tables: the 1-based index of the next appended element.
    NextIndex(usize),
    /// Written inline; may never be reopened.
    Closed,
}

#[derive(Default)]
pub(crate) struct Ledger {
    entries: HashMap<NodeId, LedgerEntry>,
}

impl Ledger {
    #[inline]
    pub(crate) fn is_closed(&self, id: NodeId) -> bool {
        matches!(self.entries.get(&id), Some(LedgerEntry::Closed))
    }

    pub(crate) fn close(&mut self, id: NodeId) {
        self.entries.insert(id, LedgerEntry::Closed);
    }

    /// How the table was declared, `None` for implicit tables.
    pub(crate) fn declared(&self, id: NodeId) -> Option<Declared> {
        match self.entries.get(&id) {
            Some(LedgerEntry::Open(table)) => table.declared,
            _ => None,
        }
    }

    /// Span of the first claim of `key` in table `id`.
    pub(crate) fn claimed(&self, id: NodeId, key: &Key) -> Option<Span> {
        match self.entries.get(&id) {
            Some(LedgerEntry::Open(table)) => table.claimed(key),
            _ => None,
        }
    }

    /// The open entry of table `id`, created if absent.
    pub(crate) fn open(&mut self, id: NodeId) -> &mut OpenTable {
        let entry = self
            .entries
            .entry(id)
            .or_insert_with(|| LedgerEntry::Open(OpenTable::default()));
        if !matches!(entry, LedgerEntry::Open(_)) {
            *entry = LedgerEntry::Open(OpenTable::default());
        }
        match entry {
            LedgerEntry::Open(table) => table,
            _ => unreachable!("entry was just opened"),
        }
    }

    /// Index for the next `[[header]]` append to array `id`, advancing the
    /// counter. `len` is the current length of the array; it wins over the
    /// tracked counter when the two disagree, which happens when the array
    /// came from the defaults.
    pub(crate) fn next_index(&mut self, id: NodeId, len: usize) -> usize {
        let tracked = match self.entries.get(&id) {
            Some(LedgerEntry::NextIndex(n)) => *n,
            _ => 1,
        };
        let index = if tracked == len + 1 { tracked } else { len + 1 };
        self.entries.insert(id, LedgerEntry::NextIndex(index + 1));
        index
    }
}
