//! Feature derivation over the unified circuit graph.
//!
//! This crate runs the analysis passes on a [`CircuitGraph`] built by
//! `ckt_graph` and produces the augmented pin, cell and net tables plus the
//! `driver_pin_info` and `sink_pin_info` tables consumed by delay models.
//!
//! # Pipeline
//!
//! 1. **Pre-filter**: optionally drop unconstrained pins and their cells
//! 2. **Build**: id assignment and edge resolution
//! 3. **Classify**: library-cell groups, ranks and size buckets, attached to cells
//! 4. **Filter**: keep pins of large pin-pin components
//! 5. **Segment**: buffer trees, collapsed nets and polarity
//! 6. **Synthesize**: driver/sink joins and per-net statistics
//!
//! # Usage
//!
//! ```ignore
//! use ckt_features::analyze_design;
//!
//! let analysis = analyze_design(tables, &config, &sink)?;
//! let sinks = &analysis.driver_sink.sinks;
//! ```

#![warn(missing_docs)]

pub mod buffer_tree;
pub mod driver_sink;
pub mod export;
pub mod filter;
pub mod libcell;

#[cfg(test)]
mod testutil;

pub use buffer_tree::{segment_buffer_trees, BufferTrees};
pub use driver_sink::{
    arc_delay_by_target, synthesize_driver_sink, DriverPinInfo, DriverSinkTables, SinkPinInfo,
    Summary,
};
pub use export::{cell_rows, edge_rows, net_rows, pin_rows, CellRow, EdgeRow, NetRow, PinRow};
pub use filter::{filter_components, ValidityMask};
pub use libcell::{
    attach_libcell_classes, classify_libcells, LibCellClass, LibCellGroup, LibCellTable,
};

use ckt_common::CktResult;
use ckt_config::AnalysisConfig;
use ckt_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};
use ckt_graph::{build_graph, CellSubgraph, CircuitGraph};
use ckt_tables::{drop_unconstrained, PreprocessReport, TableSet};

/// Everything derived from one design.
#[derive(Debug)]
pub struct DesignAnalysis {
    /// The unified graph with classification attached to its cells.
    pub graph: CircuitGraph,
    /// Rows removed by the pre-filter, if it ran.
    pub preprocess: Option<PreprocessReport>,
    /// The classified library cells.
    pub libcells: LibCellTable,
    /// Pin and pin-pin edge validity.
    pub validity: ValidityMask,
    /// Buffer-tree labels.
    pub trees: BufferTrees,
    /// Driver and sink tables.
    pub driver_sink: DriverSinkTables,
}

impl DesignAnalysis {
    /// The augmented pin table.
    pub fn pin_rows(&self) -> Vec<PinRow> {
        pin_rows(&self.graph, &self.validity, &self.trees)
    }

    /// The augmented cell table.
    pub fn cell_rows(&self) -> Vec<CellRow> {
        cell_rows(&self.graph)
    }

    /// The net table.
    pub fn net_rows(&self) -> Vec<NetRow> {
        net_rows(&self.graph)
    }

    /// The unified edge list.
    pub fn edge_rows(&self) -> Vec<EdgeRow> {
        edge_rows(&self.graph)
    }

    /// The cell-cell subgraph over the cells owning valid pins.
    pub fn valid_cell_subgraph(&self) -> CellSubgraph {
        CellSubgraph::from_pins(&self.graph, &self.validity.pins)
    }
}

/// Runs the complete analysis on one design.
///
/// The passes execute in a fixed order; each reads the results of the ones
/// before it. Per-row anomalies are recovered from and reported through
/// `sink`. Fails only on internal invariant breaches.
pub fn analyze_design(
    mut tables: TableSet,
    config: &AnalysisConfig,
    sink: &DiagnosticSink,
) -> CktResult<DesignAnalysis> {
    // 1. Optional pre-filter
    let preprocess = config.preprocess.drop_unconstrained.then(|| {
        let report = drop_unconstrained(&mut tables);
        if report.dropped_pins + report.dropped_cells > 0 {
            sink.emit(
                Diagnostic::note(
                    DiagnosticCode::new(Category::Input, 101),
                    "unconstrained pins and their cells dropped",
                )
                .with_note(format!(
                    "{} pins, {} cells",
                    report.dropped_pins, report.dropped_cells
                )),
            );
        }
        report
    });

    // 2. Build
    let mut graph = build_graph(&tables, sink)?;

    // 3. Classify
    let libcells = classify_libcells(&tables.libcells, config.classify.size_buckets, sink);
    attach_libcell_classes(&mut graph.cells, &libcells, sink);

    // 4. Filter
    let validity = filter_components(&graph, config.filter.component_threshold);
    let valid = validity.subgraph(&graph);
    if !valid.is_acyclic() {
        tracing::warn!("valid pin-pin subgraph contains a cycle");
    }

    // 5. Segment
    let trees = segment_buffer_trees(&graph, &valid, &config.buffer_tree, sink);

    // 6. Synthesize
    let driver_sink = synthesize_driver_sink(
        &graph,
        &validity,
        &trees,
        config.features.join_on_collapsed_net,
        sink,
    );

    Ok(DesignAnalysis {
        graph,
        preprocess,
        libcells,
        validity,
        trees,
        driver_sink,
    })
}
