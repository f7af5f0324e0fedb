//! Id-space layout and edge resolution over a small design with ports,
//! membership edges and a few rows naming entities that do not exist.

use ckt_conformance::{make_config, CellRole, Fixture, PipelineResult};
use ckt_graph::{EdgeKind, NodeKind};
use ckt_tables::PinDirection::{Driver, Sink};

/// in -> u1 -> u2 -> out, with the input port sharing its net's name.
fn two_stage() -> Fixture {
    Fixture::new()
        .cell("u1", "INV_X1", CellRole::Logic)
        .cell("u2", "DFF_X1", CellRole::Sequential)
        .port("in", "in", Driver)
        .pin("u1/A", "u1", Some("in"), Sink)
        .pin("u1/Z", "u1", Some("mid"), Driver)
        .pin("u2/D", "u2", Some("mid"), Sink)
        .pin("u2/Q", "u2", Some("out"), Driver)
        .port("out", "out", Sink)
        .net_arc("in", "u1/A", Some(0.01))
        .cell_arc("u1/A", "u1/Z", Some(0.03))
        .net_arc("u1/Z", "u2/D", Some(0.01))
        .net_arc("u2/Q", "out", Some(0.02))
        .with_membership_edges()
        .edge(EdgeKind::CellPin, ("ghost", "cell"), ("u1/A", "pin"))
        .edge(EdgeKind::NetCell, ("nowhere", "net"), ("u2", "cell"))
        .net_arc("u2/Q", "missing", None)
}

fn run() -> PipelineResult {
    two_stage().run(&make_config(0)).unwrap()
}

#[test]
fn id_ranges_are_contiguous_and_disjoint() {
    let result = run();
    let space = &result.analysis.graph.space;

    assert_eq!(space.range(NodeKind::Pin), 0..6);
    assert_eq!(space.range(NodeKind::Cell), 6..8);
    assert_eq!(space.range(NodeKind::Net), 8..11);
    assert_eq!(space.node_count(), 11);

    let graph = &result.analysis.graph;
    assert_eq!(graph.node_name(space.id(NodeKind::Cell, 1)), Some("u2"));
    assert_eq!(graph.node_name(space.id(NodeKind::Net, 1)), Some("mid"));
}

#[test]
fn every_edge_joins_existing_nodes_of_its_table_kinds() {
    let result = run();
    let graph = &result.analysis.graph;

    for edge in graph.edges() {
        let src = graph.node_kind(edge.src).unwrap();
        let tar = graph.node_kind(edge.tar).unwrap();
        let mut kinds = [src, tar];
        kinds.sort_by_key(|k| k.code());
        let expected = match edge.kind {
            EdgeKind::PinPin => [NodeKind::Pin, NodeKind::Pin],
            EdgeKind::CellPin => [NodeKind::Pin, NodeKind::Cell],
            EdgeKind::NetPin => [NodeKind::Pin, NodeKind::Net],
            EdgeKind::NetCell => [NodeKind::Cell, NodeKind::Net],
            EdgeKind::CellCell => [NodeKind::Cell, NodeKind::Cell],
        };
        assert_eq!(kinds, expected, "{edge:?}");
    }
    assert_eq!(graph.edge_count(), 18);
}

#[test]
fn unresolved_rows_are_dropped_and_reported() {
    let result = run();
    let report = &result.analysis.graph.resolution;

    assert_eq!(report.table(EdgeKind::PinPin).unwrap().dropped(), 1);
    assert_eq!(report.table(EdgeKind::CellPin).unwrap().dropped(), 1);
    assert_eq!(report.table(EdgeKind::NetPin).unwrap().dropped(), 0);
    assert_eq!(report.table(EdgeKind::NetCell).unwrap().dropped(), 1);
    assert_eq!(report.dropped(), 3);

    let g101 = result.with_code("G101");
    assert_eq!(g101.len(), 3);
    assert_eq!(g101[0].subject.as_deref(), Some("pin_pin_edge"));
    assert_eq!(g101[0].notes, vec!["1 of 5 rows dropped".to_string()]);
    assert!(!result.has_code("G102"));
}

#[test]
fn port_and_net_with_one_name_resolve_separately() {
    let result = run();
    let graph = &result.analysis.graph;
    let port = graph.names.lookup_kind("in", NodeKind::Pin).unwrap();
    let net = graph.names.lookup_kind("in", NodeKind::Net).unwrap();

    assert_ne!(port, net);
    assert!(graph
        .edges_of(EdgeKind::NetPin)
        .iter()
        .any(|e| e.src == port && e.tar == net));
    assert_eq!(graph.pins.net_id[0], Some(net));
}

#[test]
fn edge_rows_are_grouped_by_type() {
    let result = run();
    let rows = result.analysis.edge_rows();

    assert_eq!(rows.len(), 18);
    assert!(rows.windows(2).all(|w| w[0].kind <= w[1].kind));
    assert_eq!(rows.iter().filter(|r| r.kind == 0).count(), 4);
    assert_eq!(rows.iter().filter(|r| r.kind == 2).count(), 6);
    assert!(rows.iter().all(|r| r.kind != 4));
}

#[test]
fn pins_are_enriched_from_their_cells() {
    let result = run();
    let rows = result.analysis.pin_rows();
    let space = &result.analysis.graph.space;

    // Ports own themselves and are numbered in pin order.
    assert_eq!(rows[0].cell_id, space.id(NodeKind::Pin, 0));
    assert_eq!(rows[0].new_cellname, "port0");
    assert_eq!(rows[5].new_cellname, "port1");
    assert_eq!(rows[1].cell_id, space.id(NodeKind::Cell, 0));
    assert_eq!(rows[1].new_cellname, "cell0");
    assert_eq!(rows[3].new_cellname, "cell1");
    assert!(rows[3].is_seq && !rows[1].is_seq);
    assert_eq!(rows[2].new_netname.as_deref(), Some("net1"));

    let cells = result.analysis.cell_rows();
    assert_eq!(cells[0].x, 1.0);
    assert_eq!(cells[0].lib_ref, "INV_X1");
}

#[test]
fn duplicate_names_within_one_kind_keep_the_first() {
    let result = Fixture::new()
        .cell("u1", "INV_X1", CellRole::Logic)
        .cell("u1", "INV_X2", CellRole::Logic)
        .pin("u1/A", "u1", None, Sink)
        .edge(EdgeKind::CellPin, ("u1/A", "pin"), ("u1", "cell"))
        .run(&make_config(0))
        .unwrap();
    let graph = &result.analysis.graph;

    assert_eq!(result.with_code("G102").len(), 1);
    assert_eq!(graph.resolution.duplicate_names, 1);
    let first = graph.space.id(NodeKind::Cell, 0);
    assert_eq!(graph.edges_of(EdgeKind::CellPin)[0].tar, first);
    assert_eq!(graph.pins.cell_id[0], first);
}

#[test]
fn empty_design_runs_clean() {
    let result = Fixture::new().run(&make_config(0)).unwrap();

    assert_eq!(result.analysis.graph.node_count(), 0);
    assert_eq!(result.analysis.graph.edge_count(), 0);
    assert_eq!(result.analysis.trees.tree_count, 0);
    assert!(result.analysis.driver_sink.sinks.is_empty());
    assert!(result.diagnostics.is_empty());
}
