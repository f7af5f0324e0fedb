//! Typed input tables produced by the physical-design extractor.
//!
//! The extractor hands over four property tables (pins, cells, nets, library
//! cells) and five connectivity tables (pin-pin, cell-pin, net-pin, net-cell,
//! cell-cell). This crate defines one record type per row shape, loads a
//! bundle of all nine tables from JSON, and offers the optional
//! unconstrained-pin pre-filter that runs before graph construction.
//!
//! Field names on the records follow the extractor's column names; the
//! downstream output names are applied when rows are exported.

#![warn(missing_docs)]

pub mod error;
pub mod preprocess;
pub mod records;
pub mod table_set;

pub use error::TableError;
pub use preprocess::{drop_unconstrained, is_unconstrained, PreprocessReport};
pub use records::{
    CellRecord, EdgeRecord, LibCellRecord, NetRecord, PinDirection, PinEdgeRecord, PinRecord,
};
pub use table_set::{TableKind, TableSet};
