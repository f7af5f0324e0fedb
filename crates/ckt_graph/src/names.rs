//! Interned name index over all entity names.

use crate::graph::NodeKind;
use ckt_common::{Ident, Interner, NodeId};
use std::fmt;

/// Per-name owners, one slot per node kind.
#[derive(Debug, Clone, Copy, Default)]
struct Owners {
    first: Option<NodeId>,
    by_kind: [Option<NodeId>; 3],
}

/// Maps entity names to node ids through a shared [`Interner`].
///
/// Pins, cells and nets may legitimately share a name (a port and the net
/// it drives usually do), so owners are kept per kind. Within one kind the
/// first registration wins.
#[derive(Default)]
pub struct NameIndex {
    interner: Interner,
    owners: Vec<Owners>,
}

impl NameIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `name` for node `id` of `kind`. Returns `false` if another
    /// node of the same kind already owns the name; the earlier owner is kept.
    pub fn insert(&mut self, name: &str, kind: NodeKind, id: NodeId) -> bool {
        let ident = self.interner.get_or_intern(name);
        let slot = ident.as_raw() as usize;
        if slot == self.owners.len() {
            self.owners.push(Owners::default());
        }
        let owners = &mut self.owners[slot];
        let kind_slot = &mut owners.by_kind[kind.code() as usize];
        if kind_slot.is_some() {
            return false;
        }
        *kind_slot = Some(id);
        owners.first.get_or_insert(id);
        true
    }

    /// Resolves a name to the node of `kind` registered under it.
    pub fn lookup_kind(&self, name: &str, kind: NodeKind) -> Option<NodeId> {
        let ident = self.interner.get(name)?;
        self.owners[ident.as_raw() as usize].by_kind[kind.code() as usize]
    }

    /// Resolves a name to the earliest registered node of any kind.
    pub fn lookup(&self, name: &str) -> Option<NodeId> {
        let ident = self.interner.get(name)?;
        self.owners[ident.as_raw() as usize].first
    }

    /// Resolves a name using an extractor type tag (`"pin"`, `"cell"`,
    /// `"net"`). Unrecognized tags fall back to [`lookup`](Self::lookup).
    pub fn resolve_tagged(&self, name: &str, type_tag: &str) -> Option<NodeId> {
        match NodeKind::from_type_tag(type_tag) {
            Some(kind) => self.lookup_kind(name, kind),
            None => self.lookup(name),
        }
    }

    /// Returns the interned handle of a name, if registered.
    pub fn ident(&self, name: &str) -> Option<Ident> {
        self.interner.get(name)
    }

    /// Returns the string of an interned handle.
    pub fn resolve(&self, ident: Ident) -> &str {
        self.interner.resolve(ident)
    }

    /// Number of distinct registered names.
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    /// Returns `true` if no name is registered.
    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}

impl fmt::Debug for NameIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NameIndex")
            .field("names", &self.owners.len())
            .finish()
    }
}
