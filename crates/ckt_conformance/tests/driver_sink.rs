//! Driver/sink join and per-net statistics.

use ckt_conformance::{make_config, CellRole, Fixture};
use ckt_config::load_config_from_str;
use ckt_graph::NodeKind;
use ckt_tables::PinDirection::{Driver, Sink};

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

/// d/A -> d/Z drives s/A on n0; o/A sits alone on n_orphan.
fn driver_and_orphan() -> Fixture {
    Fixture::new()
        .libcell("INV_X1", 1, 0.5)
        .cell("d", "INV_X1", CellRole::Logic)
        .cell("s", "NAND2_X1", CellRole::Logic)
        .cell("o", "NAND2_X1", CellRole::Logic)
        .pin("d/A", "d", Some("n_in"), Sink)
        .pin("d/Z", "d", Some("n0"), Driver)
        .at(1.0, 1.0)
        .timing(0.0, 2.0, 3.0)
        .pin("s/A", "s", Some("n0"), Sink)
        .at(4.0, 1.0)
        .timing(0.5, 5.0, 4.0)
        .pin("o/A", "o", Some("n_orphan"), Sink)
        .at(9.0, 9.0)
        .cell_arc("d/A", "d/Z", Some(1.0))
        .net_arc("d/Z", "s/A", Some(0.2))
}

#[test]
fn sink_without_driver_is_dropped() {
    let result = driver_and_orphan().run(&make_config(0)).unwrap();
    let graph = &result.analysis.graph;
    let tables = &result.analysis.driver_sink;

    let orphan = graph.names.lookup_kind("o/A", NodeKind::Pin).unwrap();
    let s = graph.names.lookup_kind("s/A", NodeKind::Pin).unwrap();
    assert!(tables.sinks.iter().all(|row| row.id != orphan));
    assert_eq!(tables.sinks.len(), 1);
    assert_eq!(tables.sinks[0].id, s);

    let f401 = result.with_code("F401");
    assert_eq!(f401.len(), 1);
    assert_eq!(f401[0].notes, vec!["2 sink pins dropped".to_string()]);
    assert!(!result.has_errors());
}

#[test]
fn sink_row_carries_driver_context() {
    let result = driver_and_orphan().run(&make_config(0)).unwrap();
    let graph = &result.analysis.graph;
    let tables = &result.analysis.driver_sink;

    assert_eq!(tables.drivers.len(), 1);
    let driver = &tables.drivers[0];
    assert_eq!(driver.libcell_id, Some(0));
    assert_eq!(driver.fix_load_delay, Some(0.5));
    assert_eq!(driver.fo4_delay, Some(2.0));
    assert_eq!(driver.driver_id, graph.names.lookup_kind("d", NodeKind::Cell).unwrap());

    let row = &tables.sinks[0];
    assert_eq!(row.driver_pin_id, driver.driver_pin_id);
    assert_eq!(row.net_id, graph.names.lookup_kind("n0", NodeKind::Net).unwrap());
    assert!(close(row.x, 3.0) && close(row.y, 0.0));
    assert!(close(row.cap, 0.5) && close(row.cap_sum, 0.5));
    assert!(close(row.context_x_mean, 3.0));
    assert_eq!(row.context_x_std, 0.0);
    assert!(close(row.sink_arr, 4.0));
    assert!(close(row.driver_arr, 2.0));
    assert!(close(row.arc_delay, 1.0));
    assert_eq!(row.net_delay, Some(0.2));
    assert!(row.stage_delay.is_some_and(|d| close(d, 1.2)));
    assert_eq!(row.driver_fix_load_delay, Some(0.5));
}

#[test]
fn every_driver_on_a_net_gets_a_row() {
    let result = Fixture::new()
        .cell("d1", "INV_X1", CellRole::Logic)
        .cell("d2", "INV_X1", CellRole::Logic)
        .cell("s", "NAND2_X1", CellRole::Logic)
        .pin("d1/A", "d1", Some("a"), Sink)
        .pin("d1/Z", "d1", Some("n0"), Driver)
        .pin("d2/A", "d2", Some("b"), Sink)
        .pin("d2/Z", "d2", Some("n0"), Driver)
        .at(2.0, 0.0)
        .pin("s/A", "s", Some("n0"), Sink)
        .at(4.0, 0.0)
        .cell_arc("d1/A", "d1/Z", Some(1.0))
        .cell_arc("d2/A", "d2/Z", Some(2.0))
        .net_arc("d1/Z", "s/A", Some(0.1))
        .net_arc("d2/Z", "s/A", Some(0.3))
        .run(&make_config(0))
        .unwrap();
    let sinks = &result.analysis.driver_sink.sinks;

    assert_eq!(sinks.len(), 2);
    assert_eq!(sinks[0].id, sinks[1].id);
    assert_ne!(sinks[0].driver_pin_id, sinks[1].driver_pin_id);
    assert!(close(sinks[0].arc_delay, 1.0));
    assert!(close(sinks[1].arc_delay, 2.0));
    // Both rows see the same net-delay aggregate of the sink.
    assert_eq!(sinks[0].net_delay_max, Some(0.3));
    assert_eq!(sinks[1].net_delay_min, Some(0.1));
    // Context spans both (sink, driver) offsets: 4 and 2.
    assert!(close(sinks[0].context_x_min, 2.0));
    assert!(close(sinks[0].context_x_max, 4.0));
    assert!(close(sinks[0].context_x_std, 2.0_f64.sqrt()));
}

#[test]
fn driver_without_arc_delay_drops_its_rows() {
    let result = Fixture::new()
        .cell("d", "INV_X1", CellRole::Logic)
        .cell("s", "NAND2_X1", CellRole::Logic)
        .pin("d/Z", "d", Some("n0"), Driver)
        .pin("s/A", "s", Some("n0"), Sink)
        .net_arc("d/Z", "s/A", Some(0.2))
        .run(&make_config(0))
        .unwrap();
    let tables = &result.analysis.driver_sink;

    assert_eq!(tables.drivers.len(), 1);
    assert!(tables.sinks.is_empty());
    assert!(result.has_code("F402"));
    assert!(!result.has_code("F401"));
}

/// drv drives s/A through one buffer.
fn buffered() -> Fixture {
    Fixture::new()
        .cell("drv", "NAND2_X1", CellRole::Logic)
        .cell("b", "BUF_X1", CellRole::Buffer)
        .cell("s", "DFF_X1", CellRole::Sequential)
        .pin("drv/A", "drv", Some("n_in"), Sink)
        .pin("drv/Z", "drv", Some("n0"), Driver)
        .pin("b/A", "b", Some("n0"), Sink)
        .pin("b/Z", "b", Some("n1"), Driver)
        .pin("s/D", "s", Some("n1"), Sink)
        .cell_arc("drv/A", "drv/Z", Some(1.0))
        .net_arc("drv/Z", "b/A", Some(0.1))
        .cell_arc("b/A", "b/Z", Some(0.4))
        .net_arc("b/Z", "s/D", Some(0.05))
}

#[test]
fn sinks_behind_buffers_need_the_collapsed_join() {
    let direct = buffered().run(&make_config(0)).unwrap();
    assert!(direct.analysis.driver_sink.sinks.is_empty());

    let config = load_config_from_str(
        "[filter]\ncomponent_threshold = 0\n\n[features]\njoin_on_collapsed_net = true\n",
    )
    .unwrap();
    let collapsed = buffered().run(&config).unwrap();
    let graph = &collapsed.analysis.graph;
    let sinks = &collapsed.analysis.driver_sink.sinks;

    assert_eq!(sinks.len(), 1);
    assert_eq!(sinks[0].id, graph.names.lookup_kind("s/D", NodeKind::Pin).unwrap());
    assert_eq!(sinks[0].net_id, graph.names.lookup_kind("n0", NodeKind::Net).unwrap());
    assert_eq!(
        sinks[0].driver_pin_id,
        graph.names.lookup_kind("drv/Z", NodeKind::Pin).unwrap()
    );
    assert_eq!(sinks[0].net_delay, Some(0.05));
}

#[test]
fn rows_serialize_with_downstream_columns() {
    let result = driver_and_orphan().run(&make_config(0)).unwrap();
    let tables = &result.analysis.driver_sink;

    let sink = serde_json::to_value(&tables.sinks[0]).unwrap();
    for column in [
        "id",
        "driver_pin_id",
        "driver_libcell_id",
        "context_y_std",
        "cap_sum",
        "stage_delay",
        "net_delay",
    ] {
        assert!(sink.get(column).is_some(), "missing {column}");
    }
    let driver = serde_json::to_value(&tables.drivers[0]).unwrap();
    assert_eq!(driver["libcell_id"], 0);
    assert_eq!(driver["fix_load_delay"], 0.5);
}
