//! Table-to-graph construction.
//!
//! Ids are assigned first, then every edge table is resolved in the fixed
//! kind order. Rows whose endpoints do not resolve are dropped and reported
//! once per table.

use crate::columns::{CellColumns, NetColumns, PinColumns};
use crate::graph::{ArcColumns, CircuitGraph, Edge, EdgeKind, IdSpace, NodeKind};
use crate::names::NameIndex;
use ckt_common::{CktResult, EdgeId, InternalError};
use ckt_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};
use ckt_tables::{EdgeRecord, PinEdgeRecord, TableSet};
use serde::Serialize;

/// Resolution counts of one edge table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TableResolution {
    /// The edge kind the table produces.
    pub kind: EdgeKind,
    /// Rows read from the table.
    pub rows: usize,
    /// Rows that became edges.
    pub resolved: usize,
}

impl TableResolution {
    /// Rows dropped because an endpoint name did not resolve.
    pub fn dropped(&self) -> usize {
        self.rows - self.resolved
    }
}

/// Summary of name resolution during graph construction.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResolutionReport {
    /// One entry per edge table, in kind order.
    pub tables: Vec<TableResolution>,
    /// Names that occurred more than once within one entity kind.
    pub duplicate_names: usize,
}

impl ResolutionReport {
    /// Total rows dropped across all edge tables.
    pub fn dropped(&self) -> usize {
        self.tables.iter().map(TableResolution::dropped).sum()
    }

    /// Resolution counts of the table producing `kind`.
    pub fn table(&self, kind: EdgeKind) -> Option<&TableResolution> {
        self.tables.iter().find(|t| t.kind == kind)
    }
}

/// Any edge row: a name pair plus the endpoint type tags.
trait EdgeRow {
    fn endpoints(&self) -> (&str, &str, &str, &str);
}

impl EdgeRow for EdgeRecord {
    fn endpoints(&self) -> (&str, &str, &str, &str) {
        (&self.src, &self.tar, &self.src_type, &self.tar_type)
    }
}

impl EdgeRow for PinEdgeRecord {
    fn endpoints(&self) -> (&str, &str, &str, &str) {
        (&self.src, &self.tar, &self.src_type, &self.tar_type)
    }
}

/// Builds the unified graph from a (pre-processed) table set.
///
/// Unresolved edge rows and duplicate names are recovered from and reported
/// through `sink`. Fails only if the design does not fit the `u32` id width.
pub fn build_graph(tables: &TableSet, sink: &DiagnosticSink) -> CktResult<CircuitGraph> {
    let space = IdSpace::assign(tables.pins.len(), tables.cells.len(), tables.nets.len())?;

    let mut names = NameIndex::new();
    let mut duplicate_names = 0;
    let entity_names = [
        (NodeKind::Pin, tables.pins.iter().map(|p| p.name.as_str()).collect::<Vec<_>>()),
        (NodeKind::Cell, tables.cells.iter().map(|c| c.name.as_str()).collect()),
        (NodeKind::Net, tables.nets.iter().map(|n| n.name.as_str()).collect()),
    ];
    for (kind, kind_names) in &entity_names {
        for (i, name) in kind_names.iter().enumerate() {
            if !names.insert(name, *kind, space.id(*kind, i)) {
                duplicate_names += 1;
                sink.emit(
                    Diagnostic::warning(
                        DiagnosticCode::new(Category::Graph, 102),
                        format!("duplicate {kind:?} name; the first occurrence is kept"),
                    )
                    .with_subject(*name),
                );
            }
        }
    }

    let cells = CellColumns::from_records(&tables.cells);
    let nets = NetColumns::from_records(&tables.nets);
    let mut pins = PinColumns::from_records(&tables.pins);
    enrich_pins(&mut pins, &cells, &nets, &names, &space);

    let edge_rows = tables.edge_row_count();
    if u32::try_from(edge_rows).is_err() {
        return Err(InternalError::EdgeSpaceOverflow { rows: edge_rows });
    }

    let mut edges = Vec::with_capacity(edge_rows);
    let mut arcs = ArcColumns::default();
    let mut report = ResolutionReport {
        tables: Vec::with_capacity(EdgeKind::ALL.len()),
        duplicate_names,
    };
    for kind in EdgeKind::ALL {
        let resolution = match kind {
            EdgeKind::PinPin => {
                let kept = resolve_table(&tables.pin_pin, kind, &names, &mut edges);
                for row in kept {
                    let record = &tables.pin_pin[row];
                    arcs.is_net.push(record.is_net);
                    arcs.arc_delay.push(record.arc_delay);
                }
                TableResolution {
                    kind,
                    rows: tables.pin_pin.len(),
                    resolved: arcs.is_net.len(),
                }
            }
            EdgeKind::CellPin => resolve_counted(&tables.cell_pin, kind, &names, &mut edges),
            EdgeKind::NetPin => resolve_counted(&tables.net_pin, kind, &names, &mut edges),
            EdgeKind::NetCell => resolve_counted(&tables.net_cell, kind, &names, &mut edges),
            EdgeKind::CellCell => resolve_counted(&tables.cell_cell, kind, &names, &mut edges),
        };
        tracing::info!(
            table = kind.table_name(),
            rows = resolution.rows,
            resolved = resolution.resolved,
            "edge table resolved"
        );
        if resolution.dropped() > 0 {
            sink.emit(
                Diagnostic::warning(
                    DiagnosticCode::new(Category::Graph, 101),
                    "edge rows with unresolved endpoints dropped",
                )
                .with_subject(kind.table_name())
                .with_note(format!(
                    "{} of {} rows dropped",
                    resolution.dropped(),
                    resolution.rows
                )),
            );
        }
        report.tables.push(resolution);
    }

    tracing::info!(
        pins = space.pin_count(),
        cells = space.cell_count(),
        nets = space.net_count(),
        edges = edges.len(),
        "circuit graph built"
    );
    Ok(CircuitGraph::from_parts(
        space, names, pins, cells, nets, arcs, report, edges,
    ))
}

fn resolve_counted<R: EdgeRow>(
    rows: &[R],
    kind: EdgeKind,
    names: &NameIndex,
    edges: &mut Vec<Edge>,
) -> TableResolution {
    let resolved = resolve_table(rows, kind, names, edges).len();
    TableResolution {
        kind,
        rows: rows.len(),
        resolved,
    }
}

/// Appends the resolvable rows of one table as edges of `kind` and returns
/// the row indices that were kept.
fn resolve_table<R: EdgeRow>(
    rows: &[R],
    kind: EdgeKind,
    names: &NameIndex,
    edges: &mut Vec<Edge>,
) -> Vec<usize> {
    let mut kept = Vec::with_capacity(rows.len());
    for (row, record) in rows.iter().enumerate() {
        let (src, tar, src_type, tar_type) = record.endpoints();
        let (Some(src), Some(tar)) = (
            names.resolve_tagged(src, src_type),
            names.resolve_tagged(tar, tar_type),
        ) else {
            continue;
        };
        edges.push(Edge {
            id: EdgeId::from_raw(edges.len() as u32),
            src,
            tar,
            kind,
        });
        kept.push(row);
    }
    kept
}

/// Fills the pin columns derived from the owning cell and net.
fn enrich_pins(
    pins: &mut PinColumns,
    cells: &CellColumns,
    nets: &NetColumns,
    names: &NameIndex,
    space: &IdSpace,
) {
    let mut ports = 0;
    for i in 0..pins.len() {
        let own_id = space.id(NodeKind::Pin, i);
        let cell = names
            .lookup_kind(&pins.cellname[i], NodeKind::Cell)
            .and_then(|id| space.cell_index(id).map(|c| (id, c)));
        match cell {
            Some((cell_id, c)) => {
                pins.is_macro[i] = cells.is_macro[c];
                pins.is_seq[i] = cells.is_seq[c];
                pins.is_buf[i] = cells.is_buf[c];
                pins.is_inv[i] = cells.is_inv[c];
                pins.cell_id[i] = if cells.is_macro[c] { own_id } else { cell_id };
                pins.new_cellname[i] = cells.new_cellname[c].clone();
            }
            None => {
                pins.cell_id[i] = own_id;
                pins.new_cellname[i] = format!("port{ports}");
                ports += 1;
            }
        }

        let net = pins.netname[i]
            .as_deref()
            .and_then(|name| names.lookup_kind(name, NodeKind::Net))
            .and_then(|id| space.net_index(id).map(|j| (id, j)));
        if let Some((net_id, j)) = net {
            pins.net_id[i] = Some(net_id);
            pins.new_netname[i] = Some(nets.new_netname[j].clone());
        }
    }
}
