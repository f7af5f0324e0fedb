//! Removal of pins and cells without usable timing.
//!
//! A pin whose slack is unconstrained carries no timing information. Its cell
//! is considered invalid as a whole, and non-port pins of invalid cells are
//! dropped with it. Ports are judged on their own slack. Macro and sequential
//! cells are kept regardless so that the design boundary stays intact.

use crate::records::PinRecord;
use crate::table_set::TableSet;
use std::collections::HashSet;

/// Slack magnitude at or above which a value is treated as "no constraint".
pub const UNCONSTRAINED_SLACK: f64 = 1.0e30;

/// Counts of rows removed by [`drop_unconstrained`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreprocessReport {
    /// Pins removed.
    pub dropped_pins: usize,
    /// Cells removed.
    pub dropped_cells: usize,
}

/// Returns `true` if the pin's slack is non-finite or at the unconstrained sentinel.
pub fn is_unconstrained(pin: &PinRecord) -> bool {
    !pin.slack.is_finite() || pin.slack.abs() >= UNCONSTRAINED_SLACK
}

/// Drops unconstrained pins and the cells they invalidate.
///
/// Edge tables are left untouched; edges to removed entities no longer
/// resolve and are dropped during graph construction.
pub fn drop_unconstrained(tables: &mut TableSet) -> PreprocessReport {
    // Owning-cell names that have at least one pin, and those with an unconstrained pin.
    let mut seen_cells: HashSet<&str> = HashSet::new();
    let mut invalid_cells: HashSet<&str> = HashSet::new();
    for pin in &tables.pins {
        seen_cells.insert(pin.cellname.as_str());
        if is_unconstrained(pin) {
            invalid_cells.insert(pin.cellname.as_str());
        }
    }

    let keep_pin: Vec<bool> = tables
        .pins
        .iter()
        .map(|pin| {
            if pin.is_port {
                !is_unconstrained(pin)
            } else {
                !invalid_cells.contains(pin.cellname.as_str())
            }
        })
        .collect();

    // Cells without pins count as invalid.
    let keep_cell: Vec<bool> = tables
        .cells
        .iter()
        .map(|cell| {
            let valid = seen_cells.contains(cell.name.as_str())
                && !invalid_cells.contains(cell.name.as_str());
            cell.is_macro || cell.is_seq || valid
        })
        .collect();

    let report = PreprocessReport {
        dropped_pins: keep_pin.iter().filter(|k| !**k).count(),
        dropped_cells: keep_cell.iter().filter(|k| !**k).count(),
    };

    let mut keep = keep_pin.into_iter();
    tables.pins.retain(|_| keep.next().unwrap_or(false));
    let mut keep = keep_cell.into_iter();
    tables.cells.retain(|_| keep.next().unwrap_or(false));

    tracing::info!(
        dropped_pins = report.dropped_pins,
        dropped_cells = report.dropped_cells,
        "dropped unconstrained pins and cells"
    );
    report
}
