//! Buffer-tree segmentation.
//!
//! Chains of buffer and inverter pins between a true driver and its true
//! sinks are labelled as one tree. Each tree carries the net of its start pin
//! downstream, and inverter hops toggle the accumulated polarity.
//!
//! Propagation is a frontier expansion over the valid pin-pin subgraph.
//! Every pin is claimed by at most one tree and expanded at most once, so
//! the expansion terminates on cyclic or reconvergent input; such anomalies
//! are reported instead.

use ckt_common::NodeId;
use ckt_config::BufferTreeConfig;
use ckt_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};
use ckt_graph::{CircuitGraph, EdgeKind, PinSubgraph};
use ckt_tables::PinDirection;
use serde::Serialize;

/// Per-pin and per-edge buffer-tree labels.
///
/// An edge carries the id of the tree that claimed its target through it;
/// edges into pins that were already claimed keep `0`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BufferTrees {
    /// Pin is a tree start.
    pub bt_s: Vec<bool>,
    /// Pin is a tree end.
    pub bt_e: Vec<bool>,
    /// Own net for starts, propagated net for claimed pins, `None` otherwise.
    pub net_id: Vec<Option<NodeId>>,
    /// Tree id, `0` for pins outside every tree.
    pub tree_id: Vec<u32>,
    /// Accumulated polarity; `true` is non-inverted.
    pub polarity: Vec<bool>,
    /// Tree id per pin-pin edge, `0` for edges outside every tree.
    pub edge_tree_id: Vec<u32>,
    /// Net id with tree ends collapsed onto their tree's start net.
    pub net_id_rm_bt: Vec<Option<NodeId>>,
    /// Number of trees.
    pub tree_count: usize,
    /// Propagation rounds executed.
    pub rounds: usize,
}

impl BufferTrees {
    /// Pin indices of the tree with the given id, in ascending order.
    pub fn members(&self, tree_id: u32) -> Vec<usize> {
        if tree_id == 0 {
            return Vec::new();
        }
        (0..self.tree_id.len())
            .filter(|i| self.tree_id[*i] == tree_id)
            .collect()
    }
}

fn revisit(pin: &str) -> Diagnostic {
    Diagnostic::warning(
        DiagnosticCode::new(Category::BufferTree, 301),
        "buffer chain loops back to a pin of its own tree; propagation halted there",
    )
    .with_subject(pin)
}

fn rejoin(pin: &str, tree: u32) -> Diagnostic {
    Diagnostic::note(
        DiagnosticCode::new(Category::BufferTree, 304),
        "pin reached twice within one buffer tree; the first path is kept",
    )
    .with_subject(pin)
    .with_note(format!("tree {tree}"))
}

/// Returns `true` if `ancestor` lies on the claim path from `pin` back to its
/// tree start.
fn claimed_through(parent: &[Option<usize>], pin: usize, ancestor: usize) -> bool {
    let mut cur = Some(pin);
    while let Some(p) = cur {
        if p == ancestor {
            return true;
        }
        cur = parent[p];
    }
    false
}

fn reconvergence(pin: &str, owner: u32, other: u32) -> Diagnostic {
    Diagnostic::warning(
        DiagnosticCode::new(Category::BufferTree, 302),
        "pin reached by two buffer trees; the first claim is kept",
    )
    .with_subject(pin)
    .with_note(format!("claimed by tree {owner}, also reached from tree {other}"))
}

/// Segments the buffer trees of the pin-pin subgraph `sub`.
///
/// A pin is a chain member when its owning cell is a buffer or inverter.
/// Starts are non-member pins driving a member; they are numbered from 1 in
/// ascending pin id order. Polarity toggles on a hop whose source is an input
/// pin of an inverter cell.
pub fn segment_buffer_trees(
    graph: &CircuitGraph,
    sub: &PinSubgraph,
    config: &BufferTreeConfig,
    sink: &DiagnosticSink,
) -> BufferTrees {
    let n = graph.pins.len();
    let space = &graph.space;
    let chain = |i: usize| graph.is_chain_member(i);
    let pin_pairs: Vec<(usize, usize)> = sub
        .edges()
        .filter_map(|(_, s, t)| space.pin_index(s).zip(space.pin_index(t)))
        .collect();

    let mut bt_s = vec![false; n];
    for &(u, v) in &pin_pairs {
        if chain(v) && !chain(u) {
            bt_s[u] = true;
        }
    }
    let seed_ends = pin_pairs
        .iter()
        .filter(|(u, v)| (chain(*u) || bt_s[*u]) && !chain(*v))
        .map(|(_, v)| *v)
        .collect::<std::collections::BTreeSet<_>>()
        .len();

    let mut tree_id = vec![0u32; n];
    let mut net_id: Vec<Option<NodeId>> = vec![None; n];
    let mut polarity = vec![true; n];
    let mut edge_tree_id = vec![0u32; graph.edges_of(EdgeKind::PinPin).len()];
    let mut bt_e = vec![false; n];
    let mut parent: Vec<Option<usize>> = vec![None; n];

    let mut frontier: Vec<usize> = Vec::new();
    for i in (0..n).filter(|i| bt_s[*i]) {
        frontier.push(i);
        tree_id[i] = frontier.len() as u32;
        net_id[i] = graph.pins.net_id[i];
    }
    let tree_count = frontier.len();
    tracing::info!(starts = tree_count, seed_ends, "buffer tree seeds");

    let limit = if config.max_rounds == 0 {
        n.max(1)
    } else {
        config.max_rounds
    };
    let mut rounds = 0;
    while !frontier.is_empty() {
        if rounds == limit {
            sink.emit(
                Diagnostic::warning(
                    DiagnosticCode::new(Category::BufferTree, 303),
                    "buffer tree propagation stopped at the round limit",
                )
                .with_note(format!("{limit} rounds, {} pins pending", frontier.len())),
            );
            break;
        }
        rounds += 1;

        let mut next = Vec::new();
        for u in frontier {
            let tid = tree_id[u];
            let inverting =
                graph.pins.is_inv[u] && graph.pins.dir[u] == PinDirection::Sink;
            let hop_polarity = polarity[u] ^ inverting;
            for (edge, target) in sub.successors(u) {
                let Some(v) = space.pin_index(target) else {
                    continue;
                };
                match tree_id[v] {
                    0 => {}
                    owner if owner == tid => {
                        if claimed_through(&parent, u, v) {
                            sink.emit(revisit(&graph.pins.name[v]));
                        } else {
                            sink.emit(rejoin(&graph.pins.name[v], tid));
                        }
                        continue;
                    }
                    owner => {
                        sink.emit(reconvergence(&graph.pins.name[v], owner, tid));
                        continue;
                    }
                }
                edge_tree_id[edge.index()] = tid;
                tree_id[v] = tid;
                parent[v] = Some(u);
                net_id[v] = net_id[u];
                polarity[v] = hop_polarity;
                if chain(v) {
                    next.push(v);
                } else {
                    bt_e[v] = true;
                }
            }
        }
        tracing::info!(round = rounds, frontier = next.len(), "buffer tree out pins");
        frontier = next;
    }

    let mut net_id_rm_bt = graph.pins.net_id.clone();
    for i in (0..n).filter(|i| bt_e[*i]) {
        net_id_rm_bt[i] = net_id[i];
    }
    tracing::info!(
        trees = tree_count,
        ends = bt_e.iter().filter(|e| **e).count(),
        rounds,
        "buffer trees segmented"
    );

    BufferTrees {
        bt_s,
        bt_e,
        net_id,
        tree_id,
        polarity,
        edge_tree_id,
        net_id_rm_bt,
        tree_count,
        rounds,
    }
}
