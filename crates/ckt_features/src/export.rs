//! Augmented output tables with the downstream column names.
//!
//! Row fields mirror the graph columns of the same name.

#![allow(missing_docs)]

use crate::buffer_tree::BufferTrees;
use crate::filter::ValidityMask;
use ckt_common::NodeId;
use ckt_graph::{CircuitGraph, NodeKind};
use ckt_tables::PinDirection;
use serde::Serialize;

/// One row of the augmented pin table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PinRow {
    pub id: NodeId,
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub is_in_clk: bool,
    pub is_port: bool,
    pub is_start: bool,
    pub is_end: bool,
    pub dir: PinDirection,
    pub maxcap: f64,
    pub maxtran: f64,
    pub num_reachable_endpoint: i64,
    pub cellname: String,
    pub netname: Option<String>,
    pub tran: f64,
    pub slack: f64,
    pub risearr: f64,
    pub fallarr: f64,
    pub cap: f64,
    pub is_macro: bool,
    pub is_seq: bool,
    pub is_buf: bool,
    pub is_inv: bool,
    pub cell_id: NodeId,
    pub net_id: Option<NodeId>,
    pub new_cellname: String,
    pub new_netname: Option<String>,
    pub valid_pins: bool,
    pub bt_s: bool,
    pub bt_e: bool,
    pub tree_id: u32,
    pub polarity: bool,
    pub net_id_rm_bt: Option<NodeId>,
}

/// One row of the augmented cell table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellRow {
    pub id: NodeId,
    pub name: String,
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
    pub x: f64,
    pub y: f64,
    pub is_seq: bool,
    pub is_macro: bool,
    pub is_in_clk: bool,
    pub is_buf: bool,
    pub is_inv: bool,
    #[serde(rename = "ref")]
    pub lib_ref: String,
    pub staticpower: f64,
    pub dynamicpower: f64,
    pub new_cellname: String,
    pub fo4_delay: Option<f64>,
    pub fix_load_delay: Option<f64>,
    pub group_id: Option<u32>,
    pub libcell_id: i64,
    pub size_class: Option<u32>,
    pub size_class2: Option<u32>,
    pub size_cnt: Option<u32>,
}

/// One row of the net table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetRow {
    pub id: NodeId,
    pub name: String,
    pub net_route_length: f64,
    pub net_steiner_length: f64,
    pub fanout: i64,
    pub total_cap: f64,
    pub net_cap: f64,
    pub net_coupling: f64,
    pub net_res: f64,
    pub new_netname: String,
}

/// One row of the unified edge list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EdgeRow {
    pub src_id: NodeId,
    pub tar_id: NodeId,
    #[serde(rename = "type")]
    pub kind: u8,
}

/// Builds the pin table with validity and buffer-tree columns.
pub fn pin_rows(graph: &CircuitGraph, mask: &ValidityMask, trees: &BufferTrees) -> Vec<PinRow> {
    let p = &graph.pins;
    (0..p.len())
        .map(|i| PinRow {
            id: graph.space.id(NodeKind::Pin, i),
            name: p.name[i].clone(),
            x: p.x[i],
            y: p.y[i],
            is_in_clk: p.is_in_clk[i],
            is_port: p.is_port[i],
            is_start: p.is_start[i],
            is_end: p.is_end[i],
            dir: p.dir[i],
            maxcap: p.maxcap[i],
            maxtran: p.maxtran[i],
            num_reachable_endpoint: p.num_reachable_endpoint[i],
            cellname: p.cellname[i].clone(),
            netname: p.netname[i].clone(),
            tran: p.tran[i],
            slack: p.slack[i],
            risearr: p.risearr[i],
            fallarr: p.fallarr[i],
            cap: p.cap[i],
            is_macro: p.is_macro[i],
            is_seq: p.is_seq[i],
            is_buf: p.is_buf[i],
            is_inv: p.is_inv[i],
            cell_id: p.cell_id[i],
            net_id: p.net_id[i],
            new_cellname: p.new_cellname[i].clone(),
            new_netname: p.new_netname[i].clone(),
            valid_pins: mask.pins[i],
            bt_s: trees.bt_s[i],
            bt_e: trees.bt_e[i],
            tree_id: trees.tree_id[i],
            polarity: trees.polarity[i],
            net_id_rm_bt: trees.net_id_rm_bt[i],
        })
        .collect()
}

/// Builds the cell table with the attached classification.
pub fn cell_rows(graph: &CircuitGraph) -> Vec<CellRow> {
    let c = &graph.cells;
    (0..c.len())
        .map(|i| CellRow {
            id: graph.space.id(NodeKind::Cell, i),
            name: c.name[i].clone(),
            x0: c.x0[i],
            y0: c.y0[i],
            x1: c.x1[i],
            y1: c.y1[i],
            x: c.x[i],
            y: c.y[i],
            is_seq: c.is_seq[i],
            is_macro: c.is_macro[i],
            is_in_clk: c.is_in_clk[i],
            is_buf: c.is_buf[i],
            is_inv: c.is_inv[i],
            lib_ref: c.lib_ref[i].clone(),
            staticpower: c.static_power[i],
            dynamicpower: c.dynamic_power[i],
            new_cellname: c.new_cellname[i].clone(),
            fo4_delay: c.fo4_delay[i],
            fix_load_delay: c.fix_load_delay[i],
            group_id: c.group_id[i],
            libcell_id: c.libcell_id[i],
            size_class: c.size_class[i],
            size_class2: c.size_class2[i],
            size_cnt: c.size_cnt[i],
        })
        .collect()
}

/// Builds the net table.
pub fn net_rows(graph: &CircuitGraph) -> Vec<NetRow> {
    let n = &graph.nets;
    (0..n.len())
        .map(|i| NetRow {
            id: graph.space.id(NodeKind::Net, i),
            name: n.name[i].clone(),
            net_route_length: n.route_length[i],
            net_steiner_length: n.steiner_length[i],
            fanout: n.fanout[i],
            total_cap: n.total_cap[i],
            net_cap: n.net_cap[i],
            net_coupling: n.coupling[i],
            net_res: n.res[i],
            new_netname: n.new_netname[i].clone(),
        })
        .collect()
}

/// Builds the unified edge list in storage order.
pub fn edge_rows(graph: &CircuitGraph) -> Vec<EdgeRow> {
    graph
        .edges()
        .iter()
        .map(|e| EdgeRow {
            src_id: e.src,
            tar_id: e.tar,
            kind: e.kind.code(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer_tree::segment_buffer_trees;
    use crate::filter::filter_components;
    use crate::testutil::DesignBuilder;
    use ckt_config::BufferTreeConfig;
    use ckt_diagnostics::DiagnosticSink;

    fn graph() -> CircuitGraph {
        DesignBuilder::new()
            .cell("d", "INV_X1", false, false)
            .cell("s", "AND2_X1", false, false)
            .pin("d/Z", "d", Some("n0"), 0, 0.0, 0.0)
            .pin("s/A", "s", Some("n0"), 1, 1.0, 0.0)
            .pin("out", "out", None, 1, 5.0, 5.0)
            .arc("d/Z", "s/A", Some(0.1))
            .graph()
    }

    #[test]
    fn pin_columns_use_downstream_names() {
        let graph = graph();
        let mask = filter_components(&graph, 1);
        let sub = mask.subgraph(&graph);
        let trees =
            segment_buffer_trees(&graph, &sub, &BufferTreeConfig::default(), &DiagnosticSink::new());
        let rows = pin_rows(&graph, &mask, &trees);
        let value = serde_json::to_value(&rows[1]).unwrap();
        assert_eq!(value["name"], "s/A");
        assert_eq!(value["cellname"], "s");
        assert_eq!(value["netname"], "n0");
        assert_eq!(value["dir"], 1);
        assert_eq!(value["new_cellname"], "cell1");
        assert_eq!(value["valid_pins"], true);
        assert_eq!(value["id"], 1);
        assert!(value.get("pin_name").is_none());

        let port = serde_json::to_value(&rows[2]).unwrap();
        assert_eq!(port["new_cellname"], "port0");
        assert_eq!(port["valid_pins"], false);
        assert!(port["net_id"].is_null());
    }

    #[test]
    fn cell_columns_use_downstream_names() {
        let rows = cell_rows(&graph());
        let value = serde_json::to_value(&rows[0]).unwrap();
        assert_eq!(value["ref"], "INV_X1");
        assert_eq!(value["id"], 3);
        assert_eq!(value["x"], 1.0);
        assert_eq!(value["libcell_id"], -1);
        assert!(value.get("staticpower").is_some());
        assert!(value["group_id"].is_null());
    }

    #[test]
    fn net_and_edge_rows() {
        let graph = graph();
        let nets = net_rows(&graph);
        assert_eq!(nets.len(), 1);
        assert_eq!(nets[0].id, NodeId::from_raw(5));
        assert_eq!(nets[0].new_netname, "net0");

        let edges = edge_rows(&graph);
        let value = serde_json::to_value(edges).unwrap();
        assert_eq!(value[0]["src_id"], 0);
        assert_eq!(value[0]["tar_id"], 1);
        assert_eq!(value[0]["type"], 0);
    }
}
