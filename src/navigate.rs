//! Resolution of table headers and dotted keys against the tables decoded so
//! far.
//!
//! Every step consults the [`Ledger`](crate::ledger::Ledger) to decide
//! whether a table may be extended. The normal and strict rule sets differ in
//! these places:
//!
//! * reopening an inline table or array is [`ErrorKind::InlineClosed`] in
//!   strict mode, and a duplicate key or invalid dotted extension otherwise;
//! * a dotted key passing through an array of tables descends into its last
//!   element, which strict mode rejects with
//!   [`ErrorKind::ArrayOfTablesIndexed`];
//! * a dotted key may pass through a table declared by its own `[header]`,
//!   which strict mode rejects with [`ErrorKind::DottedKeyInvalidType`].
#![allow(clippy::question_mark)]

use crate::{
    Span,
    arena::{Entry, NodeId, Slot},
    error::ErrorKind,
    ledger::Declared,
    parser::{KeySegment, ParseError, Parser},
};

impl Parser<'_> {
    /// Resolves a `[a.b.c]` or `[[a.b.c]]` header and makes its target the
    /// current table.
    pub(crate) fn navigate_header(
        &mut self,
        path: &[KeySegment],
        last: &KeySegment,
        is_array: bool,
        header: Span,
    ) -> Result<(), ParseError> {
        let mut table = self.root;
        for segment in path {
            table = match self.header_intermediate(table, segment) {
                Ok(t) => t,
                Err(e) => return Err(e),
            };
        }
        let target = if is_array {
            self.header_array_final(table, path, last, header)
        } else {
            self.header_table_final(table, path, last, header)
        };
        match target {
            Ok(id) => {
                self.current = id;
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    fn header_intermediate(
        &mut self,
        parent: NodeId,
        segment: &KeySegment,
    ) -> Result<NodeId, ParseError> {
        let id = match self.arena.entry(parent, &segment.key) {
            Entry::Vacant => {
                let id = self.arena.new_table(false);
                self.arena.insert(parent, segment.key.clone(), Slot::Node(id));
                id
            }
            Entry::Scalar => return Err(self.duplicate_key(parent, segment)),
            Entry::Node(id) if self.ledger.is_closed(id) => {
                return Err(self.inline_reopened(parent, segment, false));
            }
            Entry::Node(id) if self.arena.is_table(id) => id,
            Entry::Node(array) => match self.arena.last_table(array) {
                Some(element) if !self.ledger.is_closed(element) => element,
                _ => return Err(self.duplicate_key(parent, segment)),
            },
        };
        self.ledger.open(parent).claim(&segment.key, segment.span);
        Ok(id)
    }

    fn header_table_final(
        &mut self,
        parent: NodeId,
        path: &[KeySegment],
        last: &KeySegment,
        header: Span,
    ) -> Result<NodeId, ParseError> {
        let id = match self.arena.entry(parent, &last.key) {
            Entry::Vacant => {
                let id = self.arena.new_table(false);
                self.arena.insert(parent, last.key.clone(), Slot::Node(id));
                id
            }
            Entry::Scalar => return Err(self.duplicate_key(parent, last)),
            Entry::Node(id) if self.ledger.is_closed(id) => {
                return Err(self.inline_reopened(parent, last, false));
            }
            Entry::Node(id) if !self.arena.is_table(id) => {
                return Err(self.duplicate_key(parent, last));
            }
            Entry::Node(id) => match self.ledger.declared(id) {
                Some(Declared::Header(first)) => {
                    let name = dotted_name(path, last);
                    return Err(self.set_error(
                        header.start as usize,
                        Some(header.end as usize),
                        ErrorKind::DuplicateTable { name, first },
                    ));
                }
                Some(Declared::Dotted(_)) => return Err(self.duplicate_key(parent, last)),
                None => id,
            },
        };
        self.ledger.open(parent).claim(&last.key, last.span);
        self.ledger.open(id).declared = Some(Declared::Header(header));
        log::trace!("entered table [{}]", dotted_name(path, last));
        Ok(id)
    }

    fn header_array_final(
        &mut self,
        parent: NodeId,
        path: &[KeySegment],
        last: &KeySegment,
        header: Span,
    ) -> Result<NodeId, ParseError> {
        let array = match self.arena.entry(parent, &last.key) {
            Entry::Vacant => {
                let id = self.arena.new_array(false);
                self.arena.insert(parent, last.key.clone(), Slot::Node(id));
                id
            }
            Entry::Scalar => return Err(self.duplicate_key(parent, last)),
            Entry::Node(id) if self.ledger.is_closed(id) => {
                return Err(self.inline_reopened(parent, last, false));
            }
            Entry::Node(id) if self.arena.is_table(id) => {
                return Err(self.set_error(
                    header.start as usize,
                    Some(header.end as usize),
                    ErrorKind::RedefineAsArray,
                ));
            }
            Entry::Node(id) => id,
        };
        self.ledger.open(parent).claim(&last.key, last.span);

        let index = self.ledger.next_index(array, self.arena.array_len(array));
        let element = self.arena.new_table(false);
        self.arena.push(array, Slot::Node(element));
        self.ledger.open(element).declared = Some(Declared::Header(header));
        log::trace!(
            "appended element {index} to [[{}]]",
            dotted_name(path, last)
        );
        Ok(element)
    }

    /// Resolves the leading segments of a dotted key starting at `table` and
    /// claims the final segment. Returns the table the value belongs in.
    pub(crate) fn navigate_dotted(
        &mut self,
        table: NodeId,
        path: &[KeySegment],
        last: &KeySegment,
    ) -> Result<NodeId, ParseError> {
        let mut table = table;
        for segment in path {
            table = match self.dotted_intermediate(table, segment) {
                Ok(t) => t,
                Err(e) => return Err(e),
            };
        }

        if let Some(first) = self.ledger.claimed(table, &last.key) {
            return Err(self.error_at(
                last,
                ErrorKind::DuplicateKey {
                    key: last.key.to_string(),
                    first: Some(first),
                },
            ));
        }
        // Present without a claim: the key came from the defaults.
        if self.arena.entry(table, &last.key) != Entry::Vacant {
            return Err(self.error_at(
                last,
                ErrorKind::DuplicateKey {
                    key: last.key.to_string(),
                    first: None,
                },
            ));
        }
        self.ledger.open(table).claim(&last.key, last.span);
        Ok(table)
    }

    fn dotted_intermediate(
        &mut self,
        parent: NodeId,
        segment: &KeySegment,
    ) -> Result<NodeId, ParseError> {
        let id = match self.arena.entry(parent, &segment.key) {
            Entry::Vacant => {
                let id = self.arena.new_table(false);
                self.arena.insert(parent, segment.key.clone(), Slot::Node(id));
                self.ledger.open(id).declared = Some(Declared::Dotted(segment.span));
                id
            }
            Entry::Scalar => return Err(self.dotted_invalid(parent, segment)),
            Entry::Node(id) if self.ledger.is_closed(id) => {
                return Err(self.inline_reopened(parent, segment, true));
            }
            Entry::Node(array) if self.arena.is_array(array) => {
                if self.options.strict {
                    return Err(self.error_at(
                        segment,
                        ErrorKind::ArrayOfTablesIndexed {
                            name: segment.key.to_string(),
                        },
                    ));
                }
                match self.arena.last_table(array) {
                    Some(element) if !self.ledger.is_closed(element) => element,
                    _ => return Err(self.dotted_invalid(parent, segment)),
                }
            }
            Entry::Node(id) => match self.ledger.declared(id) {
                Some(Declared::Header(_)) if self.options.strict => {
                    return Err(self.dotted_invalid(parent, segment));
                }
                Some(_) => id,
                None => {
                    self.ledger.open(id).declared = Some(Declared::Dotted(segment.span));
                    id
                }
            },
        };
        self.ledger.open(parent).claim(&segment.key, segment.span);
        Ok(id)
    }

    // -- errors -------------------------------------------------------------

    fn error_at(&mut self, segment: &KeySegment, kind: ErrorKind) -> ParseError {
        self.set_error(
            segment.span.start as usize,
            Some(segment.span.end as usize),
            kind,
        )
    }

    #[cold]
    fn duplicate_key(&mut self, parent: NodeId, segment: &KeySegment) -> ParseError {
        let first = self.ledger.claimed(parent, &segment.key);
        self.error_at(
            segment,
            ErrorKind::DuplicateKey {
                key: segment.key.to_string(),
                first,
            },
        )
    }

    #[cold]
    fn dotted_invalid(&mut self, parent: NodeId, segment: &KeySegment) -> ParseError {
        let first = self.ledger.claimed(parent, &segment.key);
        self.error_at(segment, ErrorKind::DottedKeyInvalidType { first })
    }

    #[cold]
    fn inline_reopened(&mut self, parent: NodeId, segment: &KeySegment, dotted: bool) -> ParseError {
        if self.options.strict {
            let first = self.ledger.claimed(parent, &segment.key);
            self.error_at(
                segment,
                ErrorKind::InlineClosed {
                    name: segment.key.to_string(),
                    first,
                },
            )
        } else if dotted {
            self.dotted_invalid(parent, segment)
        } else {
            self.duplicate_key(parent, segment)
        }
    }
}

fn dotted_name(path: &[KeySegment], last: &KeySegment) -> String {
    let mut name = String::new();
    for segment in path {
        name.push_str(&segment.key.to_string());
        name.push('.');
    }
    name.push_str(&last.key.to_string());
    name
}
