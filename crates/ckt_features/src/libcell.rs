//! Library-cell drive-strength classification.
//!
//! Library cells are grouped by logical function (`func_id`) and ranked by
//! fixed-load delay within each group. The classification is then attached
//! to every cell instance through its library reference.

use ckt_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};
use ckt_graph::CellColumns;
use ckt_tables::LibCellRecord;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;

/// Derived classification of one library cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LibCellClass {
    /// Library cell name.
    #[serde(rename = "ref")]
    pub name: String,
    /// Logical function id as extracted.
    pub func_id: i64,
    /// Cell area.
    pub area: f64,
    /// Worst input pin capacitance.
    pub worst_input_cap: f64,
    /// Leakage power.
    pub leakage: f64,
    /// FO4 delay.
    pub fo4_delay: f64,
    /// Fixed-load delay used for ranking.
    pub fix_load_delay: f64,
    /// Function group, numbered from 1 in first-seen order of `func_id`.
    pub group_id: u32,
    /// Row index in the library-cell table.
    pub libcell_id: u32,
    /// Rank within the group by descending delay; 0 is the weakest drive.
    pub size_class: u32,
    /// Coarse delay bucket within the group.
    pub size_class2: u32,
    /// Number of members in the group.
    pub size_cnt: u32,
}

/// One function group.
#[derive(Debug, Clone, PartialEq)]
pub struct LibCellGroup {
    /// Group id.
    pub group_id: u32,
    /// Shared function id.
    pub func_id: i64,
    /// Member row indices in rank order.
    pub ranked: Vec<usize>,
    /// Name of the rank-0 member.
    pub min_size_cell: String,
    /// The group's delays span a zero-width range.
    pub degenerate: bool,
}

/// The classified library-cell table.
#[derive(Debug, Clone, Default)]
pub struct LibCellTable {
    /// Per-row classification, in table order.
    pub classes: Vec<LibCellClass>,
    /// Function groups, in `group_id` order.
    pub groups: Vec<LibCellGroup>,
    by_name: HashMap<String, usize>,
}

impl LibCellTable {
    /// Looks up a library cell by name. With duplicate names the first row wins.
    pub fn get(&self, name: &str) -> Option<&LibCellClass> {
        self.by_name.get(name).map(|i| &self.classes[*i])
    }

    /// The group with the given id.
    pub fn group(&self, group_id: u32) -> Option<&LibCellGroup> {
        group_id
            .checked_sub(1)
            .and_then(|i| self.groups.get(i as usize))
    }

    /// Name of the weakest (rank-0) cell of a group.
    pub fn min_size_cell(&self, group_id: u32) -> Option<&str> {
        self.group(group_id).map(|g| g.min_size_cell.as_str())
    }

    /// Number of classified library cells.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Returns `true` if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

struct Ranking {
    ranked: Vec<usize>,
    buckets: Option<Vec<u32>>,
}

/// Classifies the library cells into function groups, ranks and buckets.
///
/// Groups whose delays span a zero-width range get bucket 0 for every
/// member; multi-member groups of that kind are reported as `L201`.
pub fn classify_libcells(
    records: &[LibCellRecord],
    size_buckets: usize,
    sink: &DiagnosticSink,
) -> LibCellTable {
    let mut group_of_func: HashMap<i64, u32> = HashMap::new();
    let mut members: Vec<Vec<usize>> = Vec::new();
    let mut group_ids = Vec::with_capacity(records.len());
    for (row, record) in records.iter().enumerate() {
        let next = members.len() as u32 + 1;
        let group_id = *group_of_func.entry(record.func_id).or_insert(next);
        if group_id == next {
            members.push(Vec::new());
        }
        members[(group_id - 1) as usize].push(row);
        group_ids.push(group_id);
    }

    let rankings: Vec<Ranking> = members
        .par_iter()
        .map(|rows| {
            let mut ranked = rows.clone();
            ranked.sort_by(|a, b| {
                records[*b]
                    .fix_load_delay
                    .total_cmp(&records[*a].fix_load_delay)
            });
            let delays: Vec<f64> = ranked.iter().map(|r| records[*r].fix_load_delay).collect();
            Ranking {
                buckets: delay_buckets(&delays, size_buckets),
                ranked,
            }
        })
        .collect();

    let mut classes: Vec<LibCellClass> = records
        .iter()
        .enumerate()
        .map(|(row, record)| LibCellClass {
            name: record.name.clone(),
            func_id: record.func_id,
            area: record.area,
            worst_input_cap: record.worst_input_cap,
            leakage: record.leakage,
            fo4_delay: record.fo4_delay,
            fix_load_delay: record.fix_load_delay,
            group_id: group_ids[row],
            libcell_id: row as u32,
            size_class: 0,
            size_class2: 0,
            size_cnt: 0,
        })
        .collect();

    let mut groups = Vec::with_capacity(rankings.len());
    for (g, ranking) in rankings.into_iter().enumerate() {
        let size_cnt = ranking.ranked.len() as u32;
        for (rank, row) in ranking.ranked.iter().enumerate() {
            let class = &mut classes[*row];
            class.size_class = rank as u32;
            class.size_cnt = size_cnt;
            class.size_class2 = ranking.buckets.as_ref().map_or(0, |b| b[rank]);
        }
        let degenerate = ranking.buckets.is_none();
        let first = ranking.ranked[0];
        if degenerate && size_cnt > 1 {
            sink.emit(
                Diagnostic::warning(
                    DiagnosticCode::new(Category::Classify, 201),
                    "function group has a zero delay range; all members get bucket 0",
                )
                .with_subject(format!("group {}", g + 1))
                .with_note(format!("func_id {}, {size_cnt} members", records[first].func_id)),
            );
        }
        tracing::debug!(group = g + 1, size_cnt, degenerate, "libcell group classified");
        groups.push(LibCellGroup {
            group_id: g as u32 + 1,
            func_id: records[first].func_id,
            min_size_cell: records[first].name.clone(),
            ranked: ranking.ranked,
            degenerate,
        });
    }

    let mut by_name = HashMap::with_capacity(classes.len());
    for (row, class) in classes.iter().enumerate() {
        by_name.entry(class.name.clone()).or_insert(row);
    }
    tracing::info!(libcells = classes.len(), groups = groups.len(), "libcells classified");
    LibCellTable {
        classes,
        groups,
        by_name,
    }
}

/// Splits `[min, max]` of a descending delay list into `buckets` equal bins
/// counted from the high end. Bin 0 only holds delays at the maximum; the last
/// bin is widened down to the minimum. Returns `None` for a zero-width range.
fn delay_buckets(desc: &[f64], buckets: usize) -> Option<Vec<u32>> {
    let max = desc.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = desc.iter().copied().fold(f64::INFINITY, f64::min);
    let interval = (max - min) / buckets as f64;
    if !(interval > 0.0 && interval.is_finite()) {
        return None;
    }
    let mut assigned = vec![0u32; desc.len()];
    for j in 1..buckets {
        let high = max - j as f64 * interval;
        let low = if j == buckets - 1 {
            min
        } else {
            max - (j + 1) as f64 * interval
        };
        for (slot, delay) in assigned.iter_mut().zip(desc) {
            if *delay < high && *delay >= low {
                *slot = j as u32;
            }
        }
    }
    Some(assigned)
}

/// Attaches the classification to every cell through its library reference.
///
/// Cells whose reference has no library cell keep `libcell_id = -1` and are
/// reported as `L202`, once per distinct reference. Returns the number of
/// unclassified cells.
pub fn attach_libcell_classes(
    cells: &mut CellColumns,
    table: &LibCellTable,
    sink: &DiagnosticSink,
) -> usize {
    let mut unknown: Vec<(String, usize)> = Vec::new();
    let mut unknown_index: HashMap<String, usize> = HashMap::new();
    for c in 0..cells.len() {
        match table.get(&cells.lib_ref[c]) {
            Some(class) => {
                cells.fo4_delay[c] = Some(class.fo4_delay);
                cells.fix_load_delay[c] = Some(class.fix_load_delay);
                cells.group_id[c] = Some(class.group_id);
                cells.libcell_id[c] = i64::from(class.libcell_id);
                cells.size_class[c] = Some(class.size_class);
                cells.size_class2[c] = Some(class.size_class2);
                cells.size_cnt[c] = Some(class.size_cnt);
            }
            None => {
                let lib_ref = &cells.lib_ref[c];
                let slot = *unknown_index.entry(lib_ref.clone()).or_insert_with(|| {
                    unknown.push((lib_ref.clone(), 0));
                    unknown.len() - 1
                });
                unknown[slot].1 += 1;
            }
        }
    }

    let mut unclassified = 0;
    for (lib_ref, count) in unknown {
        unclassified += count;
        sink.emit(
            Diagnostic::warning(
                DiagnosticCode::new(Category::Classify, 202),
                "cells reference an unknown library cell",
            )
            .with_subject(lib_ref)
            .with_note(format!("{count} cells left unclassified")),
        );
    }
    tracing::info!(
        cells = cells.len(),
        unclassified,
        "libcell classes attached"
    );
    unclassified
}
