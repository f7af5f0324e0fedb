//! Struct-of-arrays property storage for pins, cells and nets.
//!
//! Every column of a kind has exactly as many entries as there are nodes of
//! that kind; entry `i` belongs to the node with id
//! `space.id(kind, i)`.

use ckt_common::NodeId;
use ckt_tables::{CellRecord, NetRecord, PinDirection, PinRecord};

/// `libcell_id` of a cell whose library reference has no library cell.
pub const UNCLASSIFIED_LIBCELL: i64 = -1;

/// Pin property columns.
#[derive(Debug, Clone, Default)]
pub struct PinColumns {
    /// Hierarchical pin name.
    pub name: Vec<String>,
    /// Placement x coordinate.
    pub x: Vec<f64>,
    /// Placement y coordinate.
    pub y: Vec<f64>,
    /// Pin lies in a clock network.
    pub is_in_clk: Vec<bool>,
    /// Pin is a top-level port.
    pub is_port: Vec<bool>,
    /// Pin is a timing startpoint.
    pub is_start: Vec<bool>,
    /// Pin is a timing endpoint.
    pub is_end: Vec<bool>,
    /// Driver or sink.
    pub dir: Vec<PinDirection>,
    /// Maximum capacitance constraint.
    pub maxcap: Vec<f64>,
    /// Maximum transition constraint.
    pub maxtran: Vec<f64>,
    /// Number of reachable timing endpoints.
    pub num_reachable_endpoint: Vec<i64>,
    /// Transition time.
    pub tran: Vec<f64>,
    /// Worst slack.
    pub slack: Vec<f64>,
    /// Rise arrival time.
    pub risearr: Vec<f64>,
    /// Fall arrival time.
    pub fallarr: Vec<f64>,
    /// Input pin capacitance.
    pub cap: Vec<f64>,
    /// Name of the owning cell, or the port name for ports.
    pub cellname: Vec<String>,
    /// Name of the connected net.
    pub netname: Vec<Option<String>>,
    /// Owning cell's node id; the pin's own id for ports and macro pins.
    pub cell_id: Vec<NodeId>,
    /// Connected net's node id.
    pub net_id: Vec<Option<NodeId>>,
    /// Owning cell is a macro.
    pub is_macro: Vec<bool>,
    /// Owning cell is sequential.
    pub is_seq: Vec<bool>,
    /// Owning cell is a buffer.
    pub is_buf: Vec<bool>,
    /// Owning cell is an inverter.
    pub is_inv: Vec<bool>,
    /// Anonymized owning-cell alias (`cell<i>` or `port<k>`).
    pub new_cellname: Vec<String>,
    /// Anonymized net alias (`net<j>`).
    pub new_netname: Vec<Option<String>>,
}

impl PinColumns {
    /// Builds the raw pin columns. Derived columns are filled with
    /// placeholders and set by the builder.
    pub fn from_records(records: &[PinRecord]) -> Self {
        let n = records.len();
        let mut cols = Self {
            cell_id: Vec::with_capacity(n),
            net_id: vec![None; n],
            is_macro: vec![false; n],
            is_seq: vec![false; n],
            is_buf: vec![false; n],
            is_inv: vec![false; n],
            new_cellname: Vec::with_capacity(n),
            new_netname: vec![None; n],
            ..Default::default()
        };
        for (i, pin) in records.iter().enumerate() {
            cols.name.push(pin.name.clone());
            cols.x.push(pin.x);
            cols.y.push(pin.y);
            cols.is_in_clk.push(pin.is_in_clk);
            cols.is_port.push(pin.is_port);
            cols.is_start.push(pin.is_start);
            cols.is_end.push(pin.is_end);
            cols.dir.push(pin.dir);
            cols.maxcap.push(pin.maxcap);
            cols.maxtran.push(pin.maxtran);
            cols.num_reachable_endpoint.push(pin.num_reachable_endpoint);
            cols.tran.push(pin.tran);
            cols.slack.push(pin.slack);
            cols.risearr.push(pin.risearr);
            cols.fallarr.push(pin.fallarr);
            cols.cap.push(pin.cap);
            cols.cellname.push(pin.cellname.clone());
            cols.netname.push(pin.netname.clone());
            cols.cell_id.push(NodeId::from_raw(i as u32));
            cols.new_cellname.push(String::new());
        }
        cols
    }

    /// Number of pins.
    pub fn len(&self) -> usize {
        self.name.len()
    }

    /// Returns `true` if there are no pins.
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }

    /// The earlier of the rise and fall arrival times.
    pub fn arrival(&self, index: usize) -> f64 {
        self.risearr[index].min(self.fallarr[index])
    }
}

/// Cell property columns, including the library-cell classification
/// attached after construction.
#[derive(Debug, Clone, Default)]
pub struct CellColumns {
    /// Instance name.
    pub name: Vec<String>,
    /// Bounding box lower-left x.
    pub x0: Vec<f64>,
    /// Bounding box lower-left y.
    pub y0: Vec<f64>,
    /// Bounding box upper-right x.
    pub x1: Vec<f64>,
    /// Bounding box upper-right y.
    pub y1: Vec<f64>,
    /// Bounding box centre x.
    pub x: Vec<f64>,
    /// Bounding box centre y.
    pub y: Vec<f64>,
    /// Sequential cell.
    pub is_seq: Vec<bool>,
    /// Macro cell.
    pub is_macro: Vec<bool>,
    /// Cell lies in a clock network.
    pub is_in_clk: Vec<bool>,
    /// Buffer cell.
    pub is_buf: Vec<bool>,
    /// Inverter cell.
    pub is_inv: Vec<bool>,
    /// Library cell reference.
    pub lib_ref: Vec<String>,
    /// Static power.
    pub static_power: Vec<f64>,
    /// Dynamic power.
    pub dynamic_power: Vec<f64>,
    /// Anonymized alias (`cell<i>`).
    pub new_cellname: Vec<String>,
    /// FO4 delay of the referenced library cell.
    pub fo4_delay: Vec<Option<f64>>,
    /// Fixed-load delay of the referenced library cell.
    pub fix_load_delay: Vec<Option<f64>>,
    /// Functional group of the referenced library cell.
    pub group_id: Vec<Option<u32>>,
    /// Row index of the referenced library cell, or [`UNCLASSIFIED_LIBCELL`].
    pub libcell_id: Vec<i64>,
    /// Rank of the library cell within its group.
    pub size_class: Vec<Option<u32>>,
    /// Delay-bucket index of the library cell within its group.
    pub size_class2: Vec<Option<u32>>,
    /// Size of the library cell's group.
    pub size_cnt: Vec<Option<u32>>,
}

impl CellColumns {
    /// Builds the cell columns with every cell unclassified.
    pub fn from_records(records: &[CellRecord]) -> Self {
        let n = records.len();
        let mut cols = Self {
            fo4_delay: vec![None; n],
            fix_load_delay: vec![None; n],
            group_id: vec![None; n],
            libcell_id: vec![UNCLASSIFIED_LIBCELL; n],
            size_class: vec![None; n],
            size_class2: vec![None; n],
            size_cnt: vec![None; n],
            ..Default::default()
        };
        for (i, cell) in records.iter().enumerate() {
            cols.name.push(cell.name.clone());
            cols.x0.push(cell.x0);
            cols.y0.push(cell.y0);
            cols.x1.push(cell.x1);
            cols.y1.push(cell.y1);
            cols.x.push((cell.x0 + cell.x1) / 2.0);
            cols.y.push((cell.y0 + cell.y1) / 2.0);
            cols.is_seq.push(cell.is_seq);
            cols.is_macro.push(cell.is_macro);
            cols.is_in_clk.push(cell.is_in_clk);
            cols.is_buf.push(cell.is_buf);
            cols.is_inv.push(cell.is_inv);
            cols.lib_ref.push(cell.lib_ref.clone());
            cols.static_power.push(cell.static_power);
            cols.dynamic_power.push(cell.dynamic_power);
            cols.new_cellname.push(format!("cell{i}"));
        }
        cols
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.name.len()
    }

    /// Returns `true` if there are no cells.
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }
}

/// Net property columns.
#[derive(Debug, Clone, Default)]
pub struct NetColumns {
    /// Net name.
    pub name: Vec<String>,
    /// Routed wire length.
    pub route_length: Vec<f64>,
    /// Steiner tree length estimate.
    pub steiner_length: Vec<f64>,
    /// Fan-out count.
    pub fanout: Vec<i64>,
    /// Total capacitance.
    pub total_cap: Vec<f64>,
    /// Wire capacitance.
    pub net_cap: Vec<f64>,
    /// Coupling capacitance.
    pub coupling: Vec<f64>,
    /// Wire resistance.
    pub res: Vec<f64>,
    /// Anonymized alias (`net<j>`).
    pub new_netname: Vec<String>,
}

impl NetColumns {
    /// Builds the net columns.
    pub fn from_records(records: &[NetRecord]) -> Self {
        let mut cols = Self::default();
        for (j, net) in records.iter().enumerate() {
            cols.name.push(net.name.clone());
            cols.route_length.push(net.net_route_length);
            cols.steiner_length.push(net.net_steiner_length);
            cols.fanout.push(net.fanout);
            cols.total_cap.push(net.total_cap);
            cols.net_cap.push(net.net_cap);
            cols.coupling.push(net.net_coupling);
            cols.res.push(net.net_res);
            cols.new_netname.push(format!("net{j}"));
        }
        cols
    }

    /// Number of nets.
    pub fn len(&self) -> usize {
        self.name.len()
    }

    /// Returns `true` if there are no nets.
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(name: &str, x0: f64, x1: f64) -> CellRecord {
        serde_json::from_value(serde_json::json!({
            "cell_name": name, "is_seq": 0, "is_macro": 0, "is_in_clk": 0,
            "x0": x0, "y0": 0.0, "x1": x1, "y1": 2.0,
            "is_buf": 1, "is_inv": 0, "libcell_name": "BUF_X1",
            "cell_static_power": 0.1, "cell_dynamic_power": 0.2
        }))
        .unwrap()
    }

    #[test]
    fn cell_centre_and_alias() {
        let cols = CellColumns::from_records(&[cell("u0", 0.0, 4.0), cell("u1", 2.0, 2.0)]);
        assert_eq!(cols.x, vec![2.0, 2.0]);
        assert_eq!(cols.y, vec![1.0, 1.0]);
        assert_eq!(cols.new_cellname, vec!["cell0", "cell1"]);
        assert_eq!(cols.libcell_id, vec![UNCLASSIFIED_LIBCELL; 2]);
        assert!(cols.group_id.iter().all(Option::is_none));
    }

    #[test]
    fn empty_columns() {
        let cols = PinColumns::from_records(&[]);
        assert!(cols.is_empty());
        assert!(NetColumns::from_records(&[]).is_empty());
    }
}
