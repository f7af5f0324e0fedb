//! Induced subgraph views and connected components.
//!
//! Subgraphs are materialized as petgraph [`DiGraph`]s whose node weights are
//! the original [`NodeId`]s and whose edge weights are the original
//! [`EdgeId`]s. Nodes and edges are inserted in ascending id order, so
//! petgraph indices iterate in the same order as the unified graph.

use crate::graph::{CircuitGraph, EdgeKind, NodeKind};
use ckt_common::{EdgeId, NodeId};
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::unionfind::UnionFind;
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::BTreeSet;

/// The pin-pin subgraph induced by a pin mask.
#[derive(Debug, Clone)]
pub struct PinSubgraph {
    graph: DiGraph<NodeId, EdgeId>,
    index: Vec<Option<NodeIndex>>,
}

impl PinSubgraph {
    /// Induces the subgraph over all pins.
    pub fn full(graph: &CircuitGraph) -> Self {
        Self::induced(graph, &vec![true; graph.pins.len()])
    }

    /// Induces the subgraph over the pins whose `mask` entry is `true`.
    ///
    /// A pin-pin edge is kept iff both endpoints are pins in the mask.
    pub fn induced(graph: &CircuitGraph, mask: &[bool]) -> Self {
        let space = &graph.space;
        let mut sub = DiGraph::with_capacity(mask.len(), graph.edges_of(EdgeKind::PinPin).len());
        let mut index = vec![None; mask.len()];
        for (i, keep) in mask.iter().enumerate() {
            if *keep {
                index[i] = Some(sub.add_node(space.id(NodeKind::Pin, i)));
            }
        }
        for edge in graph.edges_of(EdgeKind::PinPin) {
            let endpoints = space
                .pin_index(edge.src)
                .zip(space.pin_index(edge.tar))
                .and_then(|(s, t)| index[s].zip(index[t]));
            if let Some((s, t)) = endpoints {
                sub.add_edge(s, t, edge.id);
            }
        }
        Self { graph: sub, index }
    }

    /// Number of pins in the subgraph.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of pin-pin edges in the subgraph.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns `true` if the pin at `pin_index` is in the subgraph.
    pub fn contains(&self, pin_index: usize) -> bool {
        self.index.get(pin_index).is_some_and(Option::is_some)
    }

    /// The pins of the subgraph in ascending id order.
    pub fn pins(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.graph.node_weights().copied()
    }

    /// The edges of the subgraph as `(edge, src, tar)` in ascending edge id
    /// order.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, NodeId, NodeId)> + '_ {
        self.graph
            .edge_references()
            .map(|e| (*e.weight(), self.graph[e.source()], self.graph[e.target()]))
    }

    /// Out-edges of the pin at `pin_index` as `(edge, target)`, in ascending
    /// edge id order.
    pub fn successors(&self, pin_index: usize) -> Vec<(EdgeId, NodeId)> {
        self.neighbors(pin_index, Direction::Outgoing)
    }

    /// In-edges of the pin at `pin_index` as `(edge, source)`, in ascending
    /// edge id order.
    pub fn predecessors(&self, pin_index: usize) -> Vec<(EdgeId, NodeId)> {
        self.neighbors(pin_index, Direction::Incoming)
    }

    fn neighbors(&self, pin_index: usize, dir: Direction) -> Vec<(EdgeId, NodeId)> {
        let Some(node) = self.index.get(pin_index).copied().flatten() else {
            return Vec::new();
        };
        let mut out: Vec<(EdgeId, NodeId)> = self
            .graph
            .edges_directed(node, dir)
            .map(|e| {
                let other = match dir {
                    Direction::Outgoing => e.target(),
                    Direction::Incoming => e.source(),
                };
                (*e.weight(), self.graph[other])
            })
            .collect();
        out.sort_unstable_by_key(|(edge, _)| *edge);
        out
    }

    /// Returns `true` if the subgraph has no directed cycle.
    ///
    /// The check is iterative and safe on arbitrarily long pin paths.
    pub fn is_acyclic(&self) -> bool {
        toposort(&self.graph, None).is_ok()
    }

    /// The underlying petgraph graph.
    pub fn as_petgraph(&self) -> &DiGraph<NodeId, EdgeId> {
        &self.graph
    }
}

/// Weakly connected components of the pin-pin subgraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Components {
    labels: Vec<usize>,
    sizes: Vec<usize>,
}

impl Components {
    /// Component index of the pin at `pin_index`. Components are numbered in
    /// order of their lowest pin id.
    pub fn component_of(&self, pin_index: usize) -> usize {
        self.labels[pin_index]
    }

    /// Size of the component containing the pin at `pin_index`.
    pub fn size_of(&self, pin_index: usize) -> usize {
        self.sizes[self.labels[pin_index]]
    }

    /// Component sizes by component index.
    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    /// Number of components.
    pub fn count(&self) -> usize {
        self.sizes.len()
    }
}

/// Computes the weakly connected components of the pin-pin subgraph over all
/// pins. Edge direction is ignored.
pub fn pin_components(graph: &CircuitGraph) -> Components {
    let n = graph.pins.len();
    let mut sets = UnionFind::<usize>::new(n);
    for edge in graph.edges_of(EdgeKind::PinPin) {
        if let (Some(s), Some(t)) = (
            graph.space.pin_index(edge.src),
            graph.space.pin_index(edge.tar),
        ) {
            sets.union(s, t);
        }
    }

    let roots = sets.into_labeling();
    let mut component_of_root = vec![usize::MAX; n];
    let mut labels = Vec::with_capacity(n);
    let mut sizes = Vec::new();
    for root in roots {
        if component_of_root[root] == usize::MAX {
            component_of_root[root] = sizes.len();
            sizes.push(0);
        }
        let label = component_of_root[root];
        sizes[label] += 1;
        labels.push(label);
    }
    tracing::debug!(pins = n, components = sizes.len(), "pin components");
    Components { labels, sizes }
}

/// The cell-cell subgraph induced by a set of cells.
#[derive(Debug, Clone)]
pub struct CellSubgraph {
    graph: DiGraph<NodeId, EdgeId>,
}

impl CellSubgraph {
    /// Induces the subgraph over the given cell ids. A cell-cell edge is kept
    /// iff both endpoints are in the set.
    pub fn from_cells(graph: &CircuitGraph, cells: &BTreeSet<NodeId>) -> Self {
        let mut sub = DiGraph::with_capacity(cells.len(), 0);
        let mut index = vec![None; graph.cells.len()];
        for cell in cells {
            if let Some(c) = graph.space.cell_index(*cell) {
                index[c] = Some(sub.add_node(*cell));
            }
        }
        for edge in graph.edges_of(EdgeKind::CellCell) {
            let endpoints = graph
                .space
                .cell_index(edge.src)
                .zip(graph.space.cell_index(edge.tar))
                .and_then(|(s, t)| index[s].zip(index[t]));
            if let Some((s, t)) = endpoints {
                sub.add_edge(s, t, edge.id);
            }
        }
        Self { graph: sub }
    }

    /// Induces the subgraph over the cells owning the pins whose `mask`
    /// entry is `true`. Ports and macro pins contribute no cell.
    pub fn from_pins(graph: &CircuitGraph, mask: &[bool]) -> Self {
        let cells: BTreeSet<NodeId> = mask
            .iter()
            .enumerate()
            .filter(|(_, keep)| **keep)
            .filter_map(|(i, _)| graph.owning_cell(i))
            .collect();
        Self::from_cells(graph, &cells)
    }

    /// Number of cells in the subgraph.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of cell-cell edges in the subgraph.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// The cells of the subgraph in ascending id order.
    pub fn cells(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.graph.node_weights().copied()
    }

    /// The edges as `(edge, src, tar)` in ascending edge id order.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, NodeId, NodeId)> + '_ {
        self.graph
            .edge_references()
            .map(|e| (*e.weight(), self.graph[e.source()], self.graph[e.target()]))
    }

    /// The underlying petgraph graph.
    pub fn as_petgraph(&self) -> &DiGraph<NodeId, EdgeId> {
        &self.graph
    }
}
