//! Shared helpers for cktgraph conformance tests.
//!
//! Scenario tests describe a design with [`Fixture`], render it to the JSON
//! bundle the extractor hands over, and run it through the complete analysis
//! pipeline. The [`PipelineResult`] keeps the analysis together with every
//! diagnostic emitted along the way.

#![warn(missing_docs)]

use ckt_common::InternalError;
use ckt_config::{AnalysisConfig, FilterConfig};
use ckt_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink, Severity};
use ckt_features::{analyze_design, DesignAnalysis};
use ckt_graph::{EdgeKind, NodeKind};
use ckt_tables::{PinDirection, TableError, TableSet};
use serde_json::{json, Value};

/// The result of running the full pipeline on one design.
pub struct PipelineResult {
    /// Everything derived from the design.
    pub analysis: DesignAnalysis,
    /// All diagnostics emitted during the run, in emission order.
    pub diagnostics: Vec<Diagnostic>,
}

impl PipelineResult {
    /// Returns `true` if any error-level diagnostics were emitted.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity.is_error())
    }

    /// Returns the number of warning-level diagnostics.
    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    /// Returns the diagnostics with the given code, e.g. `"B302"`. A
    /// malformed code matches nothing.
    pub fn with_code(&self, code: &str) -> Vec<&Diagnostic> {
        let Ok(code) = code.parse::<DiagnosticCode>() else {
            return Vec::new();
        };
        self.diagnostics.iter().filter(|d| d.code == code).collect()
    }

    /// Returns `true` if a diagnostic with the given code was emitted.
    pub fn has_code(&self, code: &str) -> bool {
        !self.with_code(code).is_empty()
    }

    /// Pin index of the named pin.
    pub fn pin(&self, name: &str) -> Option<usize> {
        let graph = &self.analysis.graph;
        graph
            .names
            .lookup_kind(name, NodeKind::Pin)
            .and_then(|id| graph.space.pin_index(id))
    }
}

/// Errors that stop a pipeline run before any analysis is produced.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The input bundle could not be loaded.
    #[error(transparent)]
    Tables(#[from] TableError),
    /// An internal invariant was broken.
    #[error(transparent)]
    Internal(#[from] InternalError),
}

/// Builds an [`AnalysisConfig`] with the given component threshold and
/// defaults everywhere else.
pub fn make_config(component_threshold: usize) -> AnalysisConfig {
    AnalysisConfig {
        filter: FilterConfig {
            component_threshold,
        },
        ..Default::default()
    }
}

/// Runs the full pipeline on a JSON table bundle.
pub fn run_json(bundle: &str, config: &AnalysisConfig) -> Result<PipelineResult, PipelineError> {
    let tables = TableSet::from_json_str(bundle)?;
    run_tables(tables, config)
}

/// Runs the full pipeline on already loaded tables.
pub fn run_tables(
    tables: TableSet,
    config: &AnalysisConfig,
) -> Result<PipelineResult, PipelineError> {
    let sink = DiagnosticSink::new();
    let analysis = analyze_design(tables, config, &sink)?;
    Ok(PipelineResult {
        analysis,
        diagnostics: sink.take_all(),
    })
}

/// The role of a cell instance in a fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellRole {
    /// Combinational logic.
    Logic,
    /// Non-inverting buffer.
    Buffer,
    /// Inverter.
    Inverter,
    /// Flip-flop or latch.
    Sequential,
    /// Macro block.
    Macro,
}

/// A small design description rendered to the extractor's table bundle.
///
/// Nets are created on first use by a pin. Pins default to location `(0, 0)`,
/// zero slack and unit arrival times; [`at`](Self::at), [`timing`](Self::timing)
/// and [`slack`](Self::slack) adjust the most recently added pin.
#[derive(Debug, Clone, Default)]
pub struct Fixture {
    pins: Vec<Value>,
    cells: Vec<Value>,
    nets: Vec<Value>,
    libcells: Vec<Value>,
    edges: [Vec<Value>; 5],
}

impl Fixture {
    /// Creates an empty fixture.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a cell instance of library cell `lib_ref`.
    pub fn cell(mut self, name: &str, lib_ref: &str, role: CellRole) -> Self {
        self.cells.push(json!({
            "cell_name": name,
            "is_seq": role == CellRole::Sequential,
            "is_macro": role == CellRole::Macro,
            "is_in_clk": 0,
            "x0": 0.0, "y0": 0.0, "x1": 2.0, "y1": 2.0,
            "is_buf": role == CellRole::Buffer,
            "is_inv": role == CellRole::Inverter,
            "libcell_name": lib_ref,
            "cell_static_power": 0.0,
            "cell_dynamic_power": 0.0
        }));
        self
    }

    /// Adds a pin of `cell` on `net`.
    pub fn pin(mut self, name: &str, cell: &str, net: Option<&str>, dir: PinDirection) -> Self {
        if let Some(net) = net {
            self = self.net(net);
        }
        self.pins.push(json!({
            "pin_name": name,
            "x": 0.0, "y": 0.0,
            "is_in_clk": 0, "is_port": 0, "is_startpoint": 0, "is_endpoint": 0,
            "dir": dir.code(),
            "num_reachable_endpoint": 1,
            "cell_name": cell,
            "net_name": net,
            "pin_tran": 0.05,
            "pin_slack": 0.0,
            "pin_rise_arr": 1.0,
            "pin_fall_arr": 1.0,
            "input_pin_cap": 0.0
        }));
        self
    }

    /// Adds a primary I/O port. Its owning cell name is the port name.
    pub fn port(self, name: &str, net: &str, dir: PinDirection) -> Self {
        let mut fixture = self.pin(name, name, Some(net), dir);
        if let Some(pin) = fixture.pins.last_mut() {
            pin["is_port"] = json!(1);
        }
        fixture
    }

    /// Adds a net if it does not exist yet.
    pub fn net(mut self, name: &str) -> Self {
        if !self.nets.iter().any(|n| n["net_name"] == name) {
            self.nets.push(json!({
                "net_name": name,
                "net_route_length": 1.0,
                "fanout": 1,
                "total_cap": 0.0,
                "net_cap": 0.0,
                "net_coupling": 0.0,
                "net_res": 0.0
            }));
        }
        self
    }

    /// Moves the last added pin.
    pub fn at(self, x: f64, y: f64) -> Self {
        self.set_last_pin(&[("x", json!(x)), ("y", json!(y))])
    }

    /// Sets capacitance and arrival times of the last added pin.
    pub fn timing(self, cap: f64, rise: f64, fall: f64) -> Self {
        self.set_last_pin(&[
            ("input_pin_cap", json!(cap)),
            ("pin_rise_arr", json!(rise)),
            ("pin_fall_arr", json!(fall)),
        ])
    }

    /// Sets the slack of the last added pin; `None` writes `null`.
    pub fn slack(self, slack: Option<f64>) -> Self {
        self.set_last_pin(&[("pin_slack", json!(slack))])
    }

    fn set_last_pin(mut self, fields: &[(&str, Value)]) -> Self {
        if let Some(pin) = self.pins.last_mut() {
            for (key, value) in fields {
                pin[*key] = value.clone();
            }
        }
        self
    }

    /// Adds a library cell with the given fixed-load delay.
    pub fn libcell(mut self, name: &str, func_id: i64, fix_load_delay: f64) -> Self {
        self.libcells.push(json!({
            "libcell_name": name,
            "func_id": func_id,
            "libcell_area": 1.0,
            "worst_input_cap": 0.001,
            "libcell_leakage": 0.0,
            "fo4_delay": fix_load_delay * 4.0,
            "libcell_delay_fixed_load": fix_load_delay
        }));
        self
    }

    /// Adds a net arc from a driver pin to a sink pin.
    pub fn net_arc(self, src: &str, tar: &str, delay: Option<f64>) -> Self {
        self.arc(src, tar, true, delay)
    }

    /// Adds a cell arc from an input pin to an output pin of the same cell.
    pub fn cell_arc(self, src: &str, tar: &str, delay: Option<f64>) -> Self {
        self.arc(src, tar, false, delay)
    }

    fn arc(mut self, src: &str, tar: &str, is_net: bool, delay: Option<f64>) -> Self {
        self.edges[0].push(json!({
            "src": src, "tar": tar, "src_type": "pin", "tar_type": "pin",
            "is_net": is_net, "arc_delay": delay
        }));
        self
    }

    /// Adds a row to one of the four non-timing edge tables.
    pub fn edge(mut self, kind: EdgeKind, src: (&str, &str), tar: (&str, &str)) -> Self {
        self.edges[usize::from(kind.code())].push(json!({
            "src": src.0, "src_type": src.1, "tar": tar.0, "tar_type": tar.1
        }));
        self
    }

    /// Adds a pin-to-pin chain of `len` port-like pins named `<prefix><k>`,
    /// forming one connected component.
    pub fn chain(mut self, prefix: &str, len: usize) -> Self {
        for k in 0..len {
            let name = format!("{prefix}{k}");
            let dir = if k == 0 {
                PinDirection::Driver
            } else {
                PinDirection::Sink
            };
            self = self.pin(&name, &name, None, dir);
            if k > 0 {
                self = self.net_arc(&format!("{prefix}{}", k - 1), &name, Some(0.01));
            }
        }
        self
    }

    /// Emits the membership and connectivity rows an extractor writes for the
    /// current pins: cell-pin, net-pin and cell-net edges in both directions
    /// following pin direction.
    pub fn with_membership_edges(mut self) -> Self {
        let cell_names: Vec<String> = self
            .cells
            .iter()
            .filter_map(|c| c["cell_name"].as_str().map(str::to_string))
            .collect();
        let mut rows: Vec<(EdgeKind, (String, &str), (String, &str))> = Vec::new();
        for pin in &self.pins {
            let (Some(name), Some(cell)) = (pin["pin_name"].as_str(), pin["cell_name"].as_str())
            else {
                continue;
            };
            let driver = pin["dir"] == 0;
            let net = pin["net_name"].as_str();
            if cell_names.iter().any(|c| c == cell) {
                let (c, p) = ((cell.to_string(), "cell"), (name.to_string(), "pin"));
                rows.push(if driver {
                    (EdgeKind::CellPin, c, p)
                } else {
                    (EdgeKind::CellPin, p, c)
                });
                if let Some(net) = net {
                    let (c, n) = ((cell.to_string(), "cell"), (net.to_string(), "net"));
                    rows.push(if driver {
                        (EdgeKind::NetCell, c, n)
                    } else {
                        (EdgeKind::NetCell, n, c)
                    });
                }
            }
            if let Some(net) = net {
                let (n, p) = ((net.to_string(), "net"), (name.to_string(), "pin"));
                rows.push(if driver {
                    (EdgeKind::NetPin, p, n)
                } else {
                    (EdgeKind::NetPin, n, p)
                });
            }
        }
        for (kind, src, tar) in rows {
            self = self.edge(kind, (&src.0, src.1), (&tar.0, tar.1));
        }
        self
    }

    /// Renders the fixture as a JSON table bundle.
    pub fn bundle(&self) -> Value {
        let mut bundle = json!({
            "pin_properties": self.pins,
            "cell_properties": self.cells,
            "net_properties": self.nets,
            "libcell_properties": self.libcells,
        });
        for kind in EdgeKind::ALL {
            bundle[kind.table_name()] = json!(self.edges[usize::from(kind.code())]);
        }
        bundle
    }

    /// Loads the rendered bundle into typed tables.
    pub fn tables(&self) -> Result<TableSet, TableError> {
        TableSet::from_json_str(&self.bundle().to_string())
    }

    /// Runs the full pipeline on this fixture.
    pub fn run(&self, config: &AnalysisConfig) -> Result<PipelineResult, PipelineError> {
        run_json(&self.bundle().to_string(), config)
    }
}
