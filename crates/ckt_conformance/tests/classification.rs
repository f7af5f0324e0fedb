//! Library-cell grouping, ranking and delay buckets.

use ckt_conformance::{make_config, CellRole, Fixture, PipelineResult};
use ckt_config::load_config_from_str;
use ckt_features::LibCellTable;
use ckt_graph::NodeKind;

/// Three function groups with rows interleaved: four inverters, a lone
/// buffer and two AND gates of identical delay.
fn library() -> Fixture {
    Fixture::new()
        .libcell("INV_X2", 1, 20.0)
        .libcell("BUF_X1", 2, 12.0)
        .libcell("INV_X8", 1, 5.0)
        .libcell("AND2_X1", 3, 7.0)
        .libcell("INV_X1", 1, 40.0)
        .libcell("AND2_X2", 3, 7.0)
        .libcell("INV_X4", 1, 10.0)
}

fn classify(fixture: Fixture, toml: &str) -> PipelineResult {
    let config = load_config_from_str(toml).unwrap();
    fixture.run(&config).unwrap()
}

fn assert_group_properties(table: &LibCellTable, buckets: u32) {
    for group in &table.groups {
        let members: Vec<_> = group.ranked.iter().map(|r| &table.classes[*r]).collect();
        let mut ranks: Vec<u32> = members.iter().map(|c| c.size_class).collect();
        ranks.sort_unstable();
        assert_eq!(ranks, (0..members.len() as u32).collect::<Vec<_>>());
        assert!(members
            .windows(2)
            .all(|w| w[0].fix_load_delay >= w[1].fix_load_delay));
        assert!(members.iter().all(|c| c.size_cnt == members.len() as u32));

        let fastest = members.last().unwrap();
        let expected = if group.degenerate { 0 } else { buckets - 1 };
        assert_eq!(fastest.size_class2, expected, "group {}", group.group_id);
        assert!(members.iter().all(|c| c.size_class2 < buckets));
    }
}

#[test]
fn ranks_and_buckets_hold_for_every_group() {
    let result = classify(library(), "");
    let table = &result.analysis.libcells;

    assert_eq!(table.groups.len(), 3);
    assert_group_properties(table, 50);
    assert_eq!(table.get("INV_X1").unwrap().size_class2, 0);
    assert_eq!(table.get("INV_X8").unwrap().size_class2, 49);
}

#[test]
fn bucket_count_follows_configuration() {
    let result = classify(library(), "[classify]\nsize_buckets = 10\n");
    let table = &result.analysis.libcells;

    assert_group_properties(table, 10);
    assert_eq!(table.get("INV_X8").unwrap().size_class2, 9);
}

#[test]
fn groups_are_numbered_by_first_appearance() {
    let result = classify(library(), "");
    let table = &result.analysis.libcells;

    assert_eq!(table.get("INV_X2").unwrap().group_id, 1);
    assert_eq!(table.get("BUF_X1").unwrap().group_id, 2);
    assert_eq!(table.get("AND2_X2").unwrap().group_id, 3);
    assert_eq!(table.min_size_cell(1), Some("INV_X1"));
    assert_eq!(table.get("INV_X4").unwrap().size_class, 2);
}

#[test]
fn degenerate_groups_get_bucket_zero() {
    let result = classify(library(), "");
    let table = &result.analysis.libcells;

    let buf = table.get("BUF_X1").unwrap();
    assert_eq!((buf.size_class, buf.size_class2, buf.size_cnt), (0, 0, 1));
    assert_eq!(table.get("AND2_X1").unwrap().size_class2, 0);
    assert_eq!(table.get("AND2_X2").unwrap().size_class2, 0);

    // Only the two-member group is reported.
    let l201 = result.with_code("L201");
    assert_eq!(l201.len(), 1);
    assert_eq!(l201[0].subject.as_deref(), Some("group 3"));
}

#[test]
fn cells_inherit_their_library_classification() {
    let result = library()
        .cell("u1", "INV_X4", CellRole::Logic)
        .cell("u2", "NOPE_X1", CellRole::Logic)
        .cell("u3", "NOPE_X1", CellRole::Logic)
        .run(&make_config(0))
        .unwrap();
    let graph = &result.analysis.graph;
    let cells = &graph.cells;

    assert_eq!(cells.libcell_id[0], 6);
    assert_eq!(cells.size_class[0], Some(2));
    assert_eq!(cells.size_cnt[0], Some(4));
    assert_eq!(cells.fix_load_delay[0], Some(10.0));
    assert_eq!(cells.libcell_id[1], -1);
    assert_eq!(cells.size_class[2], None);

    let l202 = result.with_code("L202");
    assert_eq!(l202.len(), 1);
    assert_eq!(l202[0].subject.as_deref(), Some("NOPE_X1"));

    let row = &result.analysis.cell_rows()[0];
    assert_eq!(row.id, graph.names.lookup_kind("u1", NodeKind::Cell).unwrap());
    assert_eq!(row.size_class2, Some(table_bucket(&result, "INV_X4")));
}

fn table_bucket(result: &PipelineResult, name: &str) -> u32 {
    result.analysis.libcells.get(name).unwrap().size_class2
}
