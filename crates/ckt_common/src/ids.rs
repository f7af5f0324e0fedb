//! Opaque ID newtypes for the unified circuit graph.
//!
//! [`NodeId`] addresses pins, cells and nets in one contiguous space, [`EdgeId`]
//! addresses resolved edges, and [`LibCellId`] is the row index of a library
//! cell. All are thin `u32` wrappers that are `Copy`, `Ord` and
//! `Serialize`/`Deserialize` (transparently, as plain integers).

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Creates an ID from a raw `u32` index.
            pub fn from_raw(index: u32) -> Self {
                Self(index)
            }

            /// Returns the raw `u32` index.
            pub fn as_raw(self) -> u32 {
                self.0
            }

            /// Returns the raw index widened to `usize` for slice indexing.
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// Opaque, copyable ID for a pin, cell or net node.
    NodeId
);

define_id!(
    /// Opaque, copyable ID for a resolved graph edge.
    EdgeId
);

define_id!(
    /// Row index of a library cell in the libcell table.
    LibCellId
);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn node_id_roundtrip() {
        let id = NodeId::from_raw(42);
        assert_eq!(id.as_raw(), 42);
        assert_eq!(id.index(), 42);
    }

    #[test]
    fn ids_order_by_raw_value() {
        assert!(NodeId::from_raw(3) < NodeId::from_raw(7));
        let mut ids = vec![EdgeId::from_raw(5), EdgeId::from_raw(1), EdgeId::from_raw(3)];
        ids.sort();
        assert_eq!(ids, vec![EdgeId::from_raw(1), EdgeId::from_raw(3), EdgeId::from_raw(5)]);
    }

    #[test]
    fn node_id_hash_in_set() {
        let mut set = HashSet::new();
        set.insert(NodeId::from_raw(1));
        set.insert(NodeId::from_raw(2));
        set.insert(NodeId::from_raw(1));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn serializes_as_plain_integer() {
        let json = serde_json::to_string(&NodeId::from_raw(99)).unwrap();
        assert_eq!(json, "99");
        let back: LibCellId = serde_json::from_str("7").unwrap();
        assert_eq!(back, LibCellId::from_raw(7));
    }

    #[test]
    fn display_is_raw_value() {
        assert_eq!(format!("{}", EdgeId::from_raw(12)), "12");
    }
}
