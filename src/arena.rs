//! Decode-time storage for tables and arrays.
//!
//! While a document is being decoded every table and array lives in a flat
//! node list and is referred to by a [`NodeId`]. Ids stay valid for the whole
//! decode, which lets the definition ledger track nodes by identity. Once
//! decoding succeeds the arena is converted into an owned [`Table`] tree.

#[cfg(test)]
#[path = "./arena_tests.rs"]
mod tests;

use crate::value::{Key, Value};
use crate::{Array, Table};
use foldhash::HashMap;
use std::hash::BuildHasher;

/// Tables with at least this many entries use the hash index for lookups.
const INDEXED_TABLE_THRESHOLD: usize = 6;

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub(crate) struct NodeId(u32);

/// A table entry or array element: either a finished scalar or a container
/// still owned by the arena.
#[derive(Debug)]
pub(crate) enum Slot {
    Scalar(Value),
    Node(NodeId),
}

/// What a table holds under a key, without borrowing the arena.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) enum Entry {
    Vacant,
    Scalar,
    Node(NodeId),
}

#[derive(Debug)]
enum Node {
    Table { entries: Vec<(Key, Slot)>, inline: bool },
    Array { items: Vec<Slot>, inline: bool },
}

pub(crate) struct Arena {
    nodes: Vec<Node>,
    // Maps (table, key hash) to an entry index, for tables past the threshold.
    // On a hash collision the first entry keeps the slot and lookups for the
    // others fall back to a scan.
    index: HashMap<(NodeId, u64), usize>,
}

impl Arena {
    pub(crate) fn new() -> Self {
        Arena {
            nodes: Vec::new(),
            index: HashMap::default(),
        }
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    pub(crate) fn new_table(&mut self, inline: bool) -> NodeId {
        self.alloc(Node::Table {
            entries: Vec::new(),
            inline,
        })
    }

    pub(crate) fn new_array(&mut self, inline: bool) -> NodeId {
        self.alloc(Node::Array {
            items: Vec::new(),
            inline,
        })
    }

    #[inline]
    pub(crate) fn is_table(&self, id: NodeId) -> bool {
        matches!(self.nodes[id.0 as usize], Node::Table { .. })
    }

    #[inline]
    pub(crate) fn is_array(&self, id: NodeId) -> bool {
        matches!(self.nodes[id.0 as usize], Node::Array { .. })
    }

    /// Looks up `key` in a table node. Uses the hash index for tables at or
    /// above the threshold, otherwise falls back to a linear scan.
    pub(crate) fn get(&self, table: NodeId, key: &Key) -> Option<&Slot> {
        let Node::Table { entries, .. } = &self.nodes[table.0 as usize] else {
            return None;
        };
        let scan = || entries.iter().find(|(k, _)| k == key).map(|(_, slot)| slot);
        if entries.len() < INDEXED_TABLE_THRESHOLD {
            return scan();
        }
        let idx = *self.index.get(&(table, self.key_hash(key)))?;
        match entries.get(idx) {
            Some((k, slot)) if k == key => Some(slot),
            _ => scan(),
        }
    }

    fn key_hash(&self, key: &Key) -> u64 {
        self.index.hasher().hash_one(key)
    }

    pub(crate) fn entry(&self, table: NodeId, key: &Key) -> Entry {
        match self.get(table, key) {
            None => Entry::Vacant,
            Some(Slot::Scalar(_)) => Entry::Scalar,
            Some(Slot::Node(id)) => Entry::Node(*id),
        }
    }

    /// Appends an entry to a table node. Does **not** check for duplicates.
    pub(crate) fn insert(&mut self, table: NodeId, key: Key, slot: Slot) {
        let Node::Table { entries, .. } = &mut self.nodes[table.0 as usize] else {
            return;
        };
        entries.push((key, slot));
        let len = entries.len();
        if len < INDEXED_TABLE_THRESHOLD {
            return;
        }
        let first = if len == INDEXED_TABLE_THRESHOLD { 0 } else { len - 1 };
        for i in first..len {
            let hash = self.index.hasher().hash_one(&entries[i].0);
            self.index.entry((table, hash)).or_insert(i);
        }
    }

    pub(crate) fn push(&mut self, array: NodeId, slot: Slot) {
        if let Node::Array { items, .. } = &mut self.nodes[array.0 as usize] {
            items.push(slot);
        }
    }

    pub(crate) fn array_len(&self, array: NodeId) -> usize {
        match &self.nodes[array.0 as usize] {
            Node::Array { items, .. } => items.len(),
            Node::Table { .. } => 0,
        }
    }

    /// The last element of an array node, if it is a table node.
    pub(crate) fn last_table(&self, array: NodeId) -> Option<NodeId> {
        let Node::Array { items, .. } = &self.nodes[array.0 as usize] else {
            return None;
        };
        match items.last()? {
            Slot::Node(id) if self.is_table(*id) => Some(*id),
            _ => None,
        }
    }

    /// Moves an owned table into the arena, turning every nested table and
    /// array into a node of its own.
    pub(crate) fn import_table(&mut self, table: Table) -> NodeId {
        let id = self.new_table(table.is_inline());
        for (key, value) in table {
            let slot = self.import_value(value);
            self.insert(id, key, slot);
        }
        id
    }

    fn import_value(&mut self, value: Value) -> Slot {
        match value {
            Value::Table(table) => Slot::Node(self.import_table(table)),
            Value::Array(array) => {
                let id = self.new_array(array.is_inline());
                for value in array {
                    let slot = self.import_value(value);
                    self.push(id, slot);
                }
                Slot::Node(id)
            }
            scalar => Slot::Scalar(scalar),
        }
    }

    /// Moves a table node and everything below it out of the arena.
    pub(crate) fn export_table(&mut self, id: NodeId) -> Table {
        let (entries, inline) = match &mut self.nodes[id.0 as usize] {
            Node::Table { entries, inline } => (std::mem::take(entries), *inline),
            Node::Array { .. } => return Table::new(),
        };
        let mut table = Table::with_capacity(entries.len());
        table.set_inline(inline);
        for (key, slot) in entries {
            let value = self.export_slot(slot);
            table.push(key, value);
        }
        table
    }

    fn export_array(&mut self, id: NodeId) -> Array {
        let (items, inline) = match &mut self.nodes[id.0 as usize] {
            Node::Array { items, inline } => (std::mem::take(items), *inline),
            Node::Table { .. } => return Array::new(),
        };
        let mut array = Array::with_capacity(items.len());
        array.set_inline(inline);
        for slot in items {
            array.push(self.export_slot(slot));
        }
        array
    }

    fn export_slot(&mut self, slot: Slot) -> Value {
        match slot {
            Slot::Scalar(value) => value,
            Slot::Node(id) if self.is_table(id) => Value::Table(self.export_table(id)),
            Slot::Node(id) => Value::Array(self.export_array(id)),
        }
    }
}
