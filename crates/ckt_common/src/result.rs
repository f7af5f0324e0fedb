//! Fallible results of the graph-building passes.
//!
//! Bad rows never surface here: they are dropped and reported as
//! diagnostics. An [`InternalError`] means the design cannot be represented
//! at all.

/// Result of a pass that can hit an [`InternalError`].
pub type CktResult<T> = Result<T, InternalError>;

/// A design that does not fit the graph's fixed-width id spaces.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InternalError {
    /// Pins, cells and nets together exceed the `u32` node id range.
    #[error("{pins} pins + {cells} cells + {nets} nets exceed the u32 node id space")]
    NodeSpaceOverflow {
        /// Pin rows.
        pins: usize,
        /// Cell rows.
        cells: usize,
        /// Net rows.
        nets: usize,
    },
    /// The five edge tables together exceed the `u32` edge id range.
    #[error("{rows} edge rows exceed the u32 edge id space")]
    EdgeSpaceOverflow {
        /// Edge rows across all tables.
        rows: usize,
    },
}
