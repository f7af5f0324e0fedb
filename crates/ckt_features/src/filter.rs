//! Connected-component noise filter over the pin-pin subgraph.

use ckt_graph::{pin_components, CircuitGraph, EdgeKind, PinSubgraph};
use serde::Serialize;

/// Pin and pin-pin edge validity after component filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidityMask {
    /// Per pin: belongs to a kept component.
    pub pins: Vec<bool>,
    /// Per pin-pin edge: both endpoints are valid pins.
    pub edges: Vec<bool>,
    /// Number of valid pins.
    pub valid_pin_count: usize,
    /// Number of components kept.
    pub kept_components: usize,
}

impl ValidityMask {
    /// The pin-pin subgraph induced on the valid pins.
    pub fn subgraph(&self, graph: &CircuitGraph) -> PinSubgraph {
        PinSubgraph::induced(graph, &self.pins)
    }
}

/// Marks as valid the pins of every component with more than `threshold`
/// members, and the pin-pin edges whose endpoints are both valid.
///
/// Nothing is removed from the graph.
pub fn filter_components(graph: &CircuitGraph, threshold: usize) -> ValidityMask {
    let components = pin_components(graph);
    let kept: Vec<bool> = components.sizes().iter().map(|s| *s > threshold).collect();
    let pins: Vec<bool> = (0..graph.pins.len())
        .map(|i| kept[components.component_of(i)])
        .collect();
    let valid_pin_count = pins.iter().filter(|v| **v).count();

    let space = &graph.space;
    let edges: Vec<bool> = graph
        .edges_of(EdgeKind::PinPin)
        .iter()
        .map(|e| {
            let valid = |id| space.pin_index(id).is_some_and(|i| pins[i]);
            valid(e.src) && valid(e.tar)
        })
        .collect();

    let kept_components = kept.iter().filter(|k| **k).count();
    tracing::info!(
        valid_pins = valid_pin_count,
        components = components.count(),
        kept_components,
        threshold,
        "pin components filtered"
    );
    ValidityMask {
        pins,
        edges,
        valid_pin_count,
        kept_components,
    }
}
