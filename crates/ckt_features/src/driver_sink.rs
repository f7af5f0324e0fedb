//! Driver/sink feature synthesis.
//!
//! Selected pins (valid and not on a buffer or inverter cell) are split into
//! drivers and sinks and joined per net. Each sink row carries its offset
//! from the driver, per-net context statistics over all sinks of the net,
//! and the arc delays into the driver and into the sink.

use crate::buffer_tree::BufferTrees;
use crate::filter::ValidityMask;
use ckt_common::NodeId;
use ckt_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};
use ckt_graph::{CircuitGraph, EdgeKind, NodeKind};
use ckt_tables::PinDirection;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;

/// One row of `driver_pin_info`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DriverPinInfo {
    /// Driver pin id.
    pub driver_pin_id: NodeId,
    /// Join net of the driver.
    pub net_id: Option<NodeId>,
    /// Driver x.
    pub driver_x: f64,
    /// Driver y.
    pub driver_y: f64,
    /// Owning cell id (the pin's own id for ports and macro pins).
    pub driver_id: NodeId,
    /// Driver rise arrival.
    pub driver_risearr: f64,
    /// Driver fall arrival.
    pub driver_fallarr: f64,
    /// Library cell id of the owning cell; `None` without an owning cell.
    pub libcell_id: Option<i64>,
    /// FO4 delay of the owning cell's library cell.
    pub fo4_delay: Option<f64>,
    /// Fixed-load delay of the owning cell's library cell.
    pub fix_load_delay: Option<f64>,
}

/// One row of `sink_pin_info`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SinkPinInfo {
    /// Sink pin id.
    pub id: NodeId,
    /// Sink x offset from the driver.
    pub x: f64,
    /// Sink y offset from the driver.
    pub y: f64,
    /// Sink input capacitance.
    pub cap: f64,
    /// Join net.
    pub net_id: NodeId,
    /// Owning cell id of the sink.
    pub cell_id: NodeId,
    /// Sink rise arrival.
    pub sink_risearr: f64,
    /// Sink fall arrival.
    pub sink_fallarr: f64,
    /// Driver pin id.
    pub driver_pin_id: NodeId,
    /// Driver x.
    pub driver_x: f64,
    /// Driver y.
    pub driver_y: f64,
    /// Driver's owning cell id.
    pub driver_id: NodeId,
    /// Driver rise arrival.
    pub driver_risearr: f64,
    /// Driver fall arrival.
    pub driver_fallarr: f64,
    /// Library cell id of the driver cell.
    pub driver_libcell_id: Option<i64>,
    /// FO4 delay of the driver cell.
    pub driver_fo4_delay: Option<f64>,
    /// Fixed-load delay of the driver cell.
    pub driver_fix_load_delay: Option<f64>,
    /// Mean sink x offset over the net.
    pub context_x_mean: f64,
    /// Minimum sink x offset over the net.
    pub context_x_min: f64,
    /// Maximum sink x offset over the net.
    pub context_x_max: f64,
    /// Sample standard deviation of sink x offsets; 0 for one sink.
    pub context_x_std: f64,
    /// Mean sink y offset over the net.
    pub context_y_mean: f64,
    /// Minimum sink y offset over the net.
    pub context_y_min: f64,
    /// Maximum sink y offset over the net.
    pub context_y_max: f64,
    /// Sample standard deviation of sink y offsets; 0 for one sink.
    pub context_y_std: f64,
    /// Total sink capacitance on the net.
    pub cap_sum: f64,
    /// Earlier of the sink's rise and fall arrivals.
    pub sink_arr: f64,
    /// Earlier of the driver's rise and fall arrivals.
    pub driver_arr: f64,
    /// Mean delay of the arcs into the driver.
    pub arc_delay_mean: f64,
    /// Minimum delay of the arcs into the driver.
    pub arc_delay_min: f64,
    /// Maximum delay of the arcs into the driver.
    pub arc_delay_max: f64,
    /// Mean delay of the arcs into the sink.
    pub net_delay_mean: Option<f64>,
    /// Minimum delay of the arcs into the sink.
    pub net_delay_min: Option<f64>,
    /// Maximum delay of the arcs into the sink.
    pub net_delay_max: Option<f64>,
    /// `arc_delay_max + net_delay_max`.
    pub stage_delay: Option<f64>,
    /// Same as `arc_delay_max`.
    pub arc_delay: f64,
    /// Same as `net_delay_max`.
    pub net_delay: Option<f64>,
}

/// Mean, minimum and maximum of a set of values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    /// Arithmetic mean.
    pub mean: f64,
    /// Minimum.
    pub min: f64,
    /// Maximum.
    pub max: f64,
}

impl Summary {
    fn of(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let sum: f64 = values.iter().sum();
        Some(Self {
            mean: sum / values.len() as f64,
            min: values.iter().copied().fold(f64::INFINITY, f64::min),
            max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        })
    }
}

/// Sample standard deviation; 0 for fewer than two values.
fn sample_std(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    var.sqrt()
}

#[derive(Debug, Clone, Copy)]
struct NetContext {
    x: Summary,
    x_std: f64,
    y: Summary,
    y_std: f64,
    cap_sum: f64,
}

/// Aggregates the annotated pin-pin arc delays by target pin. Arcs without a
/// delay are ignored.
pub fn arc_delay_by_target(graph: &CircuitGraph) -> Vec<Option<Summary>> {
    let mut delays: Vec<Vec<f64>> = vec![Vec::new(); graph.pins.len()];
    for (edge, delay) in graph
        .edges_of(EdgeKind::PinPin)
        .iter()
        .zip(&graph.arcs.arc_delay)
    {
        if let (Some(tar), Some(delay)) = (graph.space.pin_index(edge.tar), delay) {
            delays[tar].push(*delay);
        }
    }
    delays.iter().map(|d| Summary::of(d)).collect()
}

/// The driver and sink tables of one design.
#[derive(Debug, Clone, Default)]
pub struct DriverSinkTables {
    /// Every selected driver pin, in pin order.
    pub drivers: Vec<DriverPinInfo>,
    /// Joined sink rows, in sink pin order then driver order.
    pub sinks: Vec<SinkPinInfo>,
}

/// Builds the driver and sink tables.
///
/// With `collapsed_net` the join uses `net_id_rm_bt`, so sinks behind a
/// buffer tree join to the tree's true driver. Sinks whose net has no
/// selected driver are dropped (`F401`), as are rows whose driver has no
/// incoming arc delay (`F402`).
pub fn synthesize_driver_sink(
    graph: &CircuitGraph,
    mask: &ValidityMask,
    trees: &BufferTrees,
    collapsed_net: bool,
    sink: &DiagnosticSink,
) -> DriverSinkTables {
    let pins = &graph.pins;
    let join_net = |i: usize| {
        if collapsed_net {
            trees.net_id_rm_bt[i]
        } else {
            pins.net_id[i]
        }
    };
    let selected: Vec<usize> = (0..pins.len())
        .filter(|i| mask.pins[*i] && !graph.is_chain_member(*i))
        .collect();

    let drivers: Vec<DriverPinInfo> = selected
        .iter()
        .filter(|i| pins.dir[**i] == PinDirection::Driver)
        .map(|&i| {
            let cell = graph.owning_cell(i).and_then(|id| graph.space.cell_index(id));
            DriverPinInfo {
                driver_pin_id: graph.space.id(NodeKind::Pin, i),
                net_id: join_net(i),
                driver_x: pins.x[i],
                driver_y: pins.y[i],
                driver_id: pins.cell_id[i],
                driver_risearr: pins.risearr[i],
                driver_fallarr: pins.fallarr[i],
                libcell_id: cell.map(|c| graph.cells.libcell_id[c]),
                fo4_delay: cell.and_then(|c| graph.cells.fo4_delay[c]),
                fix_load_delay: cell.and_then(|c| graph.cells.fix_load_delay[c]),
            }
        })
        .collect();

    let mut drivers_on_net: BTreeMap<NodeId, Vec<usize>> = BTreeMap::new();
    for (d, driver) in drivers.iter().enumerate() {
        if let Some(net) = driver.net_id {
            drivers_on_net.entry(net).or_default().push(d);
        }
    }

    // (sink pin index, net, driver row)
    let mut joined: Vec<(usize, NodeId, usize)> = Vec::new();
    let mut driverless = 0;
    for &i in selected
        .iter()
        .filter(|i| pins.dir[**i] == PinDirection::Sink)
    {
        match join_net(i).and_then(|net| drivers_on_net.get(&net).map(|d| (net, d))) {
            Some((net, rows)) => joined.extend(rows.iter().map(|d| (i, net, *d))),
            None => driverless += 1,
        }
    }
    if driverless > 0 {
        sink.emit(
            Diagnostic::warning(
                DiagnosticCode::new(Category::Feature, 401),
                "sink pins without a driver on their net dropped",
            )
            .with_note(format!("{driverless} sink pins dropped")),
        );
    }

    let offset = |(i, _, d): &(usize, NodeId, usize)| {
        (pins.x[*i] - drivers[*d].driver_x, pins.y[*i] - drivers[*d].driver_y)
    };

    let mut rows_on_net: BTreeMap<NodeId, Vec<usize>> = BTreeMap::new();
    for (r, (_, net, _)) in joined.iter().enumerate() {
        rows_on_net.entry(*net).or_default().push(r);
    }
    let contexts: BTreeMap<NodeId, NetContext> = rows_on_net
        .into_iter()
        .collect::<Vec<_>>()
        .par_iter()
        .filter_map(|(net, rows)| {
            let (xs, ys): (Vec<f64>, Vec<f64>) = rows.iter().map(|r| offset(&joined[*r])).unzip();
            let cap_sum: f64 = rows
                .iter()
                .map(|r| pins.cap[joined[*r].0])
                .filter(|c| !c.is_nan())
                .sum();
            let x = Summary::of(&xs)?;
            let y = Summary::of(&ys)?;
            Some((
                *net,
                NetContext {
                    x_std: sample_std(&xs, x.mean),
                    y_std: sample_std(&ys, y.mean),
                    x,
                    y,
                    cap_sum,
                },
            ))
        })
        .collect();

    let arcs = arc_delay_by_target(graph);
    let mut arcless = 0;
    let mut sinks = Vec::with_capacity(joined.len());
    for row in &joined {
        let (i, net, d) = *row;
        let driver = &drivers[d];
        let Some(driver_pin) = graph.space.pin_index(driver.driver_pin_id) else {
            continue;
        };
        let Some(arc) = arcs[driver_pin] else {
            arcless += 1;
            continue;
        };
        let Some(ctx) = contexts.get(&net) else {
            continue;
        };
        let net_delay = arcs[i];
        let (x, y) = offset(row);
        sinks.push(SinkPinInfo {
            id: graph.space.id(NodeKind::Pin, i),
            x,
            y,
            cap: pins.cap[i],
            net_id: net,
            cell_id: pins.cell_id[i],
            sink_risearr: pins.risearr[i],
            sink_fallarr: pins.fallarr[i],
            driver_pin_id: driver.driver_pin_id,
            driver_x: driver.driver_x,
            driver_y: driver.driver_y,
            driver_id: driver.driver_id,
            driver_risearr: driver.driver_risearr,
            driver_fallarr: driver.driver_fallarr,
            driver_libcell_id: driver.libcell_id,
            driver_fo4_delay: driver.fo4_delay,
            driver_fix_load_delay: driver.fix_load_delay,
            context_x_mean: ctx.x.mean,
            context_x_min: ctx.x.min,
            context_x_max: ctx.x.max,
            context_x_std: ctx.x_std,
            context_y_mean: ctx.y.mean,
            context_y_min: ctx.y.min,
            context_y_max: ctx.y.max,
            context_y_std: ctx.y_std,
            cap_sum: ctx.cap_sum,
            sink_arr: pins.arrival(i),
            driver_arr: driver.driver_risearr.min(driver.driver_fallarr),
            arc_delay_mean: arc.mean,
            arc_delay_min: arc.min,
            arc_delay_max: arc.max,
            net_delay_mean: net_delay.map(|s| s.mean),
            net_delay_min: net_delay.map(|s| s.min),
            net_delay_max: net_delay.map(|s| s.max),
            stage_delay: net_delay.map(|s| arc.max + s.max),
            arc_delay: arc.max,
            net_delay: net_delay.map(|s| s.max),
        });
    }
    if arcless > 0 {
        sink.emit(
            Diagnostic::warning(
                DiagnosticCode::new(Category::Feature, 402),
                "sink rows whose driver has no arc delay dropped",
            )
            .with_note(format!("{arcless} rows dropped")),
        );
    }

    tracing::info!(
        drivers = drivers.len(),
        sinks = sinks.len(),
        driverless,
        arcless,
        "driver/sink tables synthesized"
    );
    DriverSinkTables { drivers, sinks }
}
