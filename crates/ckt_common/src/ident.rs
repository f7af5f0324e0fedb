//! Interned entity names.
//!
//! Pin, cell and net names are long hierarchical strings that are compared
//! over and over during edge resolution. They are interned once and handled
//! as [`Ident`] keys afterwards.

use lasso::Rodeo;
use serde::{Deserialize, Serialize};

/// Key of an interned pin, cell, net or library-cell name.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct Ident(u32);

impl Ident {
    /// Wraps a raw key. Only meaningful for the interner that produced it.
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// The raw key, usable as a dense index: keys are handed out as
    /// `0, 1, 2, ...` in first-interned order.
    pub fn as_raw(self) -> u32 {
        self.0
    }
}

// SAFETY: `into_usize` and `try_from_usize` are inverse on every value that
// fits in a `u32`; larger values are rejected.
unsafe impl lasso::Key for Ident {
    fn into_usize(self) -> usize {
        self.0 as usize
    }

    fn try_from_usize(int: usize) -> Option<Self> {
        u32::try_from(int).ok().map(Ident)
    }
}

/// Name interner for one design, backed by [`lasso::Rodeo`].
///
/// Interning happens while the graph is built; lookups afterwards only need
/// a shared reference.
pub struct Interner {
    rodeo: Rodeo<Ident>,
}

impl Interner {
    /// Creates an empty interner.
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns `name`, returning the existing key if it was seen before.
    pub fn get_or_intern(&mut self, name: &str) -> Ident {
        self.rodeo.get_or_intern(name)
    }

    /// The key of `name` if it has been interned.
    pub fn get(&self, name: &str) -> Option<Ident> {
        self.rodeo.get(name)
    }

    /// The string behind `ident`.
    ///
    /// # Panics
    ///
    /// Panics if `ident` was not produced by this interner.
    pub fn resolve(&self, ident: Ident) -> &str {
        self.rodeo.resolve(&ident)
    }

    /// The string behind `ident`, or `None` for a foreign key.
    pub fn try_resolve(&self, ident: Ident) -> Option<&str> {
        self.rodeo.try_resolve(&ident)
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        self.rodeo.len()
    }

    /// Returns `true` if no name has been interned.
    pub fn is_empty(&self) -> bool {
        self.rodeo.is_empty()
    }
}

impl Default for Interner {
    fn default() -> Self {
        Self {
            rodeo: Rodeo::new(),
        }
    }
}

impl std::fmt::Debug for Interner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interner").field("names", &self.len()).finish()
    }
}
