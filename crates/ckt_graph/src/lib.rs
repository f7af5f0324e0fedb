//! The unified circuit graph: one id space over pins, cells and nets.
//!
//! Graph construction takes the extractor's [`TableSet`](ckt_tables::TableSet),
//! assigns contiguous node ids (pins first, then cells, then nets, each in
//! row order), resolves every edge row's endpoint names to ids and drops rows
//! that do not resolve. Node properties live in typed per-kind columns
//! indexed by the node's offset within its kind range.
//!
//! # Architecture
//!
//! - [`graph`]: id space, node/edge kinds, the [`CircuitGraph`] container
//! - [`columns`]: struct-of-arrays property storage for pins, cells and nets
//! - [`names`]: interned name index used for endpoint resolution
//! - [`builder`]: table-to-graph construction
//! - [`subgraph`]: pin-pin and cell-cell induced subgraphs, connected components

#![warn(missing_docs)]

pub mod builder;
pub mod columns;
pub mod graph;
pub mod names;
pub mod subgraph;

pub use builder::{build_graph, ResolutionReport, TableResolution};
pub use columns::{CellColumns, NetColumns, PinColumns, UNCLASSIFIED_LIBCELL};
pub use graph::{ArcColumns, CircuitGraph, Edge, EdgeKind, IdSpace, NodeKind};
pub use names::NameIndex;
pub use subgraph::{pin_components, CellSubgraph, Components, PinSubgraph};
