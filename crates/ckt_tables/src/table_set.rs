//! The bundle of all input tables for one design.

use crate::error::TableError;
use crate::records::{CellRecord, EdgeRecord, LibCellRecord, NetRecord, PinEdgeRecord, PinRecord};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::io::Read;

/// Identifies one of the nine input tables by its bundle key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    /// `pin_properties`
    Pins,
    /// `cell_properties`
    Cells,
    /// `net_properties`
    Nets,
    /// `libcell_properties`
    LibCells,
    /// `pin_pin_edge`
    PinPin,
    /// `cell_pin_edge`
    CellPin,
    /// `net_pin_edge`
    NetPin,
    /// `cell_net_edge`
    NetCell,
    /// `cell_cell_edge`
    CellCell,
}

impl TableKind {
    /// All tables, in bundle order.
    pub const ALL: [TableKind; 9] = [
        TableKind::Pins,
        TableKind::Cells,
        TableKind::Nets,
        TableKind::LibCells,
        TableKind::PinPin,
        TableKind::CellPin,
        TableKind::NetPin,
        TableKind::NetCell,
        TableKind::CellCell,
    ];

    /// Returns the bundle key of this table.
    pub fn name(self) -> &'static str {
        match self {
            TableKind::Pins => "pin_properties",
            TableKind::Cells => "cell_properties",
            TableKind::Nets => "net_properties",
            TableKind::LibCells => "libcell_properties",
            TableKind::PinPin => "pin_pin_edge",
            TableKind::CellPin => "cell_pin_edge",
            TableKind::NetPin => "net_pin_edge",
            TableKind::NetCell => "cell_net_edge",
            TableKind::CellCell => "cell_cell_edge",
        }
    }
}

/// All input tables for one design, rows in extractor order.
///
/// Row order matters: node ids are assigned in this order.
#[derive(Debug, Clone, Default)]
pub struct TableSet {
    /// Pin property rows.
    pub pins: Vec<PinRecord>,
    /// Cell property rows.
    pub cells: Vec<CellRecord>,
    /// Net property rows.
    pub nets: Vec<NetRecord>,
    /// Library cell property rows.
    pub libcells: Vec<LibCellRecord>,
    /// Pin-to-pin timing arcs.
    pub pin_pin: Vec<PinEdgeRecord>,
    /// Cell-to-pin and pin-to-cell membership edges.
    pub cell_pin: Vec<EdgeRecord>,
    /// Net-to-pin and pin-to-net connectivity edges.
    pub net_pin: Vec<EdgeRecord>,
    /// Net-to-cell and cell-to-net connectivity edges.
    pub net_cell: Vec<EdgeRecord>,
    /// Cell-to-cell fan-in/fan-out edges.
    pub cell_cell: Vec<EdgeRecord>,
}

impl TableSet {
    /// Creates an empty table set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON bundle: an object keyed by table name whose values are
    /// arrays of row objects.
    ///
    /// Fails with [`TableError::MissingTable`] if any of the nine tables is
    /// absent and [`TableError::MalformedTable`] if a row lacks a required
    /// column. Extra keys and extra columns are ignored.
    pub fn from_json_str(content: &str) -> Result<Self, TableError> {
        let value: Value =
            serde_json::from_str(content).map_err(|e| TableError::Parse(e.to_string()))?;
        Self::from_json_value(value)
    }

    /// Reads a JSON bundle from any reader. See [`from_json_str`](Self::from_json_str).
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, TableError> {
        let value: Value =
            serde_json::from_reader(reader).map_err(|e| TableError::Parse(e.to_string()))?;
        Self::from_json_value(value)
    }

    fn from_json_value(value: Value) -> Result<Self, TableError> {
        let Value::Object(mut bundle) = value else {
            return Err(TableError::Parse(
                "table bundle must be a JSON object".to_string(),
            ));
        };
        let tables = Self {
            pins: take_table(&mut bundle, TableKind::Pins)?,
            cells: take_table(&mut bundle, TableKind::Cells)?,
            nets: take_table(&mut bundle, TableKind::Nets)?,
            libcells: take_table(&mut bundle, TableKind::LibCells)?,
            pin_pin: take_table(&mut bundle, TableKind::PinPin)?,
            cell_pin: take_table(&mut bundle, TableKind::CellPin)?,
            net_pin: take_table(&mut bundle, TableKind::NetPin)?,
            net_cell: take_table(&mut bundle, TableKind::NetCell)?,
            cell_cell: take_table(&mut bundle, TableKind::CellCell)?,
        };
        tracing::info!(
            pins = tables.pins.len(),
            cells = tables.cells.len(),
            nets = tables.nets.len(),
            libcells = tables.libcells.len(),
            edges = tables.edge_row_count(),
            "loaded table bundle"
        );
        Ok(tables)
    }

    /// Returns the number of rows in the given table.
    pub fn row_count(&self, kind: TableKind) -> usize {
        match kind {
            TableKind::Pins => self.pins.len(),
            TableKind::Cells => self.cells.len(),
            TableKind::Nets => self.nets.len(),
            TableKind::LibCells => self.libcells.len(),
            TableKind::PinPin => self.pin_pin.len(),
            TableKind::CellPin => self.cell_pin.len(),
            TableKind::NetPin => self.net_pin.len(),
            TableKind::NetCell => self.net_cell.len(),
            TableKind::CellCell => self.cell_cell.len(),
        }
    }

    /// Returns the total number of rows across the five edge tables.
    pub fn edge_row_count(&self) -> usize {
        self.pin_pin.len()
            + self.cell_pin.len()
            + self.net_pin.len()
            + self.net_cell.len()
            + self.cell_cell.len()
    }
}

fn take_table<T: DeserializeOwned>(
    bundle: &mut Map<String, Value>,
    kind: TableKind,
) -> Result<Vec<T>, TableError> {
    let rows = bundle
        .remove(kind.name())
        .ok_or(TableError::MissingTable(kind.name()))?;
    serde_json::from_value(rows).map_err(|e| TableError::MalformedTable {
        table: kind.name(),
        message: e.to_string(),
    })
}
