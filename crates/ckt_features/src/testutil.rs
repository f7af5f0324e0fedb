//! Small design builder shared by the unit tests of this crate.

use ckt_diagnostics::DiagnosticSink;
use ckt_graph::{build_graph, CircuitGraph};
use ckt_tables::TableSet;
use serde_json::{json, Value};

#[derive(Default)]
pub(crate) struct DesignBuilder {
    pins: Vec<Value>,
    cells: Vec<Value>,
    nets: Vec<String>,
    libcells: Vec<Value>,
    arcs: Vec<Value>,
}

impl DesignBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn cell(mut self, name: &str, lib_ref: &str, is_buf: bool, is_inv: bool) -> Self {
        self.cells.push(json!({
            "cell_name": name, "is_seq": 0, "is_macro": 0, "is_in_clk": 0,
            "x0": 0.0, "y0": 0.0, "x1": 2.0, "y1": 2.0, "is_buf": is_buf, "is_inv": is_inv,
            "libcell_name": lib_ref, "cell_static_power": 0.0, "cell_dynamic_power": 0.0
        }));
        self
    }

    /// Adds a pin; `dir` is 0 for drivers and 1 for sinks.
    pub(crate) fn pin(mut self, name: &str, cell: &str, net: Option<&str>, dir: i64, x: f64, y: f64) -> Self {
        if let Some(net) = net {
            if !self.nets.iter().any(|n| n == net) {
                self.nets.push(net.to_string());
            }
        }
        self.pins.push(json!({
            "pin_name": name, "x": x, "y": y, "is_in_clk": 0, "is_port": 0,
            "is_startpoint": 0, "is_endpoint": 0, "dir": dir,
            "num_reachable_endpoint": 1, "cell_name": cell, "net_name": net,
            "pin_tran": 0.1, "pin_slack": 0.0, "pin_rise_arr": 1.0,
            "pin_fall_arr": 1.0, "input_pin_cap": 0.0
        }));
        self
    }

    /// Sets capacitance and arrival times of the last added pin.
    pub(crate) fn timing(mut self, cap: f64, rise: f64, fall: f64) -> Self {
        if let Some(pin) = self.pins.last_mut() {
            pin["input_pin_cap"] = json!(cap);
            pin["pin_rise_arr"] = json!(rise);
            pin["pin_fall_arr"] = json!(fall);
        }
        self
    }

    pub(crate) fn arc(mut self, src: &str, tar: &str, delay: Option<f64>) -> Self {
        self.arcs.push(json!({
            "src": src, "tar": tar, "src_type": "pin", "tar_type": "pin",
            "is_net": 1, "arc_delay": delay
        }));
        self
    }

    pub(crate) fn libcell(mut self, name: &str, func_id: i64, delay: f64) -> Self {
        self.libcells.push(json!({
            "libcell_name": name, "func_id": func_id, "libcell_area": 1.0,
            "worst_input_cap": 0.01, "libcell_leakage": 0.0,
            "fo4_delay": delay * 2.0, "libcell_delay_fixed_load": delay
        }));
        self
    }

    pub(crate) fn tables(&self) -> TableSet {
        let nets: Vec<Value> = self
            .nets
            .iter()
            .map(|n| {
                json!({
                    "net_name": n, "net_route_length": 1.0, "fanout": 1, "total_cap": 0.0,
                    "net_cap": 0.0, "net_coupling": 0.0, "net_res": 0.0
                })
            })
            .collect();
        let bundle = json!({
            "pin_properties": self.pins,
            "cell_properties": self.cells,
            "net_properties": nets,
            "libcell_properties": self.libcells,
            "pin_pin_edge": self.arcs,
            "cell_pin_edge": [], "net_pin_edge": [], "cell_net_edge": [], "cell_cell_edge": []
        });
        TableSet::from_json_str(&bundle.to_string()).unwrap()
    }

    pub(crate) fn graph(&self) -> CircuitGraph {
        build_graph(&self.tables(), &DiagnosticSink::new()).unwrap()
    }
}
