//! Id space, node and edge kinds, and the [`CircuitGraph`] container.
//!
//! Pins occupy `[0, Npin)`, cells `[Npin, Npin+Ncell)` and nets
//! `[Npin+Ncell, Npin+Ncell+Nnet)`. Edges are stored grouped by kind in the
//! fixed order pin-pin, cell-pin, net-pin, net-cell, cell-cell, and each edge
//! also carries its kind tag.

use crate::builder::ResolutionReport;
use crate::columns::{CellColumns, NetColumns, PinColumns};
use crate::names::NameIndex;
use ckt_common::{CktResult, EdgeId, InternalError, NodeId};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// The kind of a graph node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// A cell or port pin.
    Pin,
    /// A cell instance.
    Cell,
    /// A net.
    Net,
}

impl NodeKind {
    /// Returns the integer type tag exported to downstream consumers.
    pub fn code(self) -> u8 {
        match self {
            NodeKind::Pin => 0,
            NodeKind::Cell => 1,
            NodeKind::Net => 2,
        }
    }

    /// Parses an extractor endpoint type tag (`"pin"`, `"cell"`, `"net"`).
    pub fn from_type_tag(tag: &str) -> Option<Self> {
        match tag {
            "pin" => Some(NodeKind::Pin),
            "cell" => Some(NodeKind::Cell),
            "net" => Some(NodeKind::Net),
            _ => None,
        }
    }
}

/// The kind of a graph edge, fixed by the table the edge came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EdgeKind {
    /// Timing arc between two pins.
    PinPin,
    /// Membership of a pin in a cell.
    CellPin,
    /// Connection of a pin to a net.
    NetPin,
    /// Connection of a cell to a net.
    NetCell,
    /// Fan-in/fan-out relation between two cells.
    CellCell,
}

impl EdgeKind {
    /// All kinds, in storage order.
    pub const ALL: [EdgeKind; 5] = [
        EdgeKind::PinPin,
        EdgeKind::CellPin,
        EdgeKind::NetPin,
        EdgeKind::NetCell,
        EdgeKind::CellCell,
    ];

    /// Returns the integer type tag (`0..=4`) exported to downstream consumers.
    pub fn code(self) -> u8 {
        match self {
            EdgeKind::PinPin => 0,
            EdgeKind::CellPin => 1,
            EdgeKind::NetPin => 2,
            EdgeKind::NetCell => 3,
            EdgeKind::CellCell => 4,
        }
    }

    /// Returns the name of the source table.
    pub fn table_name(self) -> &'static str {
        match self {
            EdgeKind::PinPin => "pin_pin_edge",
            EdgeKind::CellPin => "cell_pin_edge",
            EdgeKind::NetPin => "net_pin_edge",
            EdgeKind::NetCell => "cell_net_edge",
            EdgeKind::CellCell => "cell_cell_edge",
        }
    }
}

/// A resolved directed edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// The unique ID of this edge.
    pub id: EdgeId,
    /// Source node.
    pub src: NodeId,
    /// Target node.
    pub tar: NodeId,
    /// Kind tag, fixed by the table of origin.
    pub kind: EdgeKind,
}

/// The contiguous node id space of one design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IdSpace {
    pin_count: u32,
    cell_count: u32,
    net_count: u32,
}

impl IdSpace {
    /// Assigns the id ranges for the given entity counts.
    ///
    /// Fails if the total does not fit the `u32` id width.
    pub fn assign(pin_count: usize, cell_count: usize, net_count: usize) -> CktResult<Self> {
        let total = pin_count
            .checked_add(cell_count)
            .and_then(|n| n.checked_add(net_count))
            .filter(|n| u32::try_from(*n).is_ok())
            .ok_or(InternalError::NodeSpaceOverflow {
                pins: pin_count,
                cells: cell_count,
                nets: net_count,
            })?;
        debug_assert!(total <= u32::MAX as usize);
        Ok(Self {
            pin_count: pin_count as u32,
            cell_count: cell_count as u32,
            net_count: net_count as u32,
        })
    }

    /// Number of pin nodes.
    pub fn pin_count(&self) -> usize {
        self.pin_count as usize
    }

    /// Number of cell nodes.
    pub fn cell_count(&self) -> usize {
        self.cell_count as usize
    }

    /// Number of net nodes.
    pub fn net_count(&self) -> usize {
        self.net_count as usize
    }

    /// Total number of nodes.
    pub fn node_count(&self) -> usize {
        self.pin_count() + self.cell_count() + self.net_count()
    }

    /// Number of nodes of the given kind.
    pub fn count(&self, kind: NodeKind) -> usize {
        match kind {
            NodeKind::Pin => self.pin_count(),
            NodeKind::Cell => self.cell_count(),
            NodeKind::Net => self.net_count(),
        }
    }

    /// The raw id range of the given kind.
    pub fn range(&self, kind: NodeKind) -> Range<u32> {
        let cell_start = self.pin_count;
        let net_start = cell_start + self.cell_count;
        match kind {
            NodeKind::Pin => 0..cell_start,
            NodeKind::Cell => cell_start..net_start,
            NodeKind::Net => net_start..net_start + self.net_count,
        }
    }

    /// Returns the kind of the node, or `None` if the id is out of range.
    pub fn kind_of(&self, id: NodeId) -> Option<NodeKind> {
        [NodeKind::Pin, NodeKind::Cell, NodeKind::Net]
            .into_iter()
            .find(|kind| self.range(*kind).contains(&id.as_raw()))
    }

    /// The id of the `index`-th node of `kind`.
    pub fn id(&self, kind: NodeKind, index: usize) -> NodeId {
        NodeId::from_raw(self.range(kind).start + index as u32)
    }

    /// The offset of `id` within the range of `kind`, if it belongs there.
    pub fn offset(&self, kind: NodeKind, id: NodeId) -> Option<usize> {
        let range = self.range(kind);
        range
            .contains(&id.as_raw())
            .then(|| (id.as_raw() - range.start) as usize)
    }

    /// Pin index of a node id, if it is a pin.
    pub fn pin_index(&self, id: NodeId) -> Option<usize> {
        self.offset(NodeKind::Pin, id)
    }

    /// Cell index of a node id, if it is a cell.
    pub fn cell_index(&self, id: NodeId) -> Option<usize> {
        self.offset(NodeKind::Cell, id)
    }

    /// Net index of a node id, if it is a net.
    pub fn net_index(&self, id: NodeId) -> Option<usize> {
        self.offset(NodeKind::Net, id)
    }
}

/// Per-arc attributes of the pin-pin edges, aligned with
/// [`CircuitGraph::edges_of`]`(EdgeKind::PinPin)`.
#[derive(Debug, Clone, Default)]
pub struct ArcColumns {
    /// `true` for net arcs, `false` for cell arcs.
    pub is_net: Vec<bool>,
    /// Annotated arc delay, if any.
    pub arc_delay: Vec<Option<f64>>,
}

/// The unified circuit graph of one design.
///
/// Built once by [`build_graph`](crate::build_graph). Later passes attach
/// derived columns but never add or remove nodes or edges.
#[derive(Debug)]
pub struct CircuitGraph {
    /// The node id ranges.
    pub space: IdSpace,
    /// Name-to-id lookup over all entity names.
    pub names: NameIndex,
    /// Pin property columns.
    pub pins: PinColumns,
    /// Cell property columns.
    pub cells: CellColumns,
    /// Net property columns.
    pub nets: NetColumns,
    /// Pin-pin arc attributes.
    pub arcs: ArcColumns,
    /// Per-table edge resolution counts.
    pub resolution: ResolutionReport,
    edges: Vec<Edge>,
    kind_ranges: [Range<usize>; 5],
}

impl CircuitGraph {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        space: IdSpace,
        names: NameIndex,
        pins: PinColumns,
        cells: CellColumns,
        nets: NetColumns,
        arcs: ArcColumns,
        resolution: ResolutionReport,
        edges: Vec<Edge>,
    ) -> Self {
        let mut kind_ranges: [Range<usize>; 5] = Default::default();
        let mut start = 0;
        for kind in EdgeKind::ALL {
            let len = edges[start..]
                .iter()
                .take_while(|e| e.kind == kind)
                .count();
            kind_ranges[kind.code() as usize] = start..start + len;
            start += len;
        }
        debug_assert_eq!(start, edges.len(), "edges must be grouped by kind");
        Self {
            space,
            names,
            pins,
            cells,
            nets,
            arcs,
            resolution,
            edges,
            kind_ranges,
        }
    }

    /// Returns the total number of nodes.
    pub fn node_count(&self) -> usize {
        self.space.node_count()
    }

    /// Returns the number of nodes of the given kind.
    pub fn count(&self, kind: NodeKind) -> usize {
        self.space.count(kind)
    }

    /// Returns the total number of resolved edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// All resolved edges, grouped by kind in storage order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// The resolved edges of one kind, in original row order.
    pub fn edges_of(&self, kind: EdgeKind) -> &[Edge] {
        &self.edges[self.kind_ranges[kind.code() as usize].clone()]
    }

    /// Returns the edge with the given ID.
    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.index()]
    }

    /// Returns the kind of a node, or `None` for an id outside the space.
    pub fn node_kind(&self, id: NodeId) -> Option<NodeKind> {
        self.space.kind_of(id)
    }

    /// Returns the name of any node.
    pub fn node_name(&self, id: NodeId) -> Option<&str> {
        match self.space.kind_of(id)? {
            NodeKind::Pin => Some(&self.pins.name[self.space.pin_index(id)?]),
            NodeKind::Cell => Some(&self.cells.name[self.space.cell_index(id)?]),
            NodeKind::Net => Some(&self.nets.name[self.space.net_index(id)?]),
        }
    }

    /// Resolves an entity name to its node id.
    pub fn lookup(&self, name: &str) -> Option<NodeId> {
        self.names.lookup(name)
    }

    /// Returns the node id of the cell owning the pin at `pin_index`, or
    /// `None` for ports and macro pins.
    pub fn owning_cell(&self, pin_index: usize) -> Option<NodeId> {
        let id = self.pins.cell_id[pin_index];
        self.space.cell_index(id).map(|_| id)
    }

    /// Returns `true` if the pin at `index` belongs to a buffer or inverter cell.
    pub fn is_chain_member(&self, pin_index: usize) -> bool {
        self.pins.is_buf[pin_index] || self.pins.is_inv[pin_index]
    }
}
