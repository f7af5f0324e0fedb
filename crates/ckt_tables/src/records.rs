//! Row types for the nine extractor tables.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Direction of a pin relative to its net.
///
/// Encoded in the tables as `0` (driver) and `1` (sink).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub enum PinDirection {
    /// The pin drives its net (a cell output or a primary input port).
    Driver,
    /// The pin is driven by its net (a cell input or a primary output port).
    Sink,
}

impl PinDirection {
    /// Returns the table encoding of this direction.
    pub fn code(self) -> u8 {
        match self {
            PinDirection::Driver => 0,
            PinDirection::Sink => 1,
        }
    }
}

impl TryFrom<i64> for PinDirection {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(PinDirection::Driver),
            1 => Ok(PinDirection::Sink),
            other => Err(format!("invalid pin direction {other}, expected 0 or 1")),
        }
    }
}

impl From<PinDirection> for u8 {
    fn from(dir: PinDirection) -> u8 {
        dir.code()
    }
}

/// One row of `pin_properties`.
#[derive(Debug, Clone, Deserialize)]
pub struct PinRecord {
    /// Hierarchical pin name, unique across the design.
    #[serde(rename = "pin_name")]
    pub name: String,
    /// Pin x location.
    pub x: f64,
    /// Pin y location.
    pub y: f64,
    /// Pin is on a clock network.
    #[serde(deserialize_with = "flag")]
    pub is_in_clk: bool,
    /// Pin is a primary I/O port.
    #[serde(deserialize_with = "flag")]
    pub is_port: bool,
    /// Pin is a timing startpoint.
    #[serde(rename = "is_startpoint", deserialize_with = "flag")]
    pub is_start: bool,
    /// Pin is a timing endpoint.
    #[serde(rename = "is_endpoint", deserialize_with = "flag")]
    pub is_end: bool,
    /// Driver or sink.
    pub dir: PinDirection,
    /// Maximum capacitance constraint, `-1` when not extracted.
    #[serde(default = "unset")]
    pub maxcap: f64,
    /// Maximum transition constraint, `-1` when not extracted.
    #[serde(default = "unset")]
    pub maxtran: f64,
    /// Number of timing endpoints reachable from this pin.
    pub num_reachable_endpoint: i64,
    /// Owning cell instance name (the port name itself for ports).
    #[serde(rename = "cell_name")]
    pub cellname: String,
    /// Connected net name, absent for unconnected pins.
    #[serde(rename = "net_name", default)]
    pub netname: Option<String>,
    /// Transition time.
    #[serde(rename = "pin_tran", deserialize_with = "nullable_f64")]
    pub tran: f64,
    /// Worst slack; `null` in the table means unconstrained.
    #[serde(rename = "pin_slack", deserialize_with = "slack")]
    pub slack: f64,
    /// Rise arrival time.
    #[serde(rename = "pin_rise_arr", deserialize_with = "nullable_f64")]
    pub risearr: f64,
    /// Fall arrival time.
    #[serde(rename = "pin_fall_arr", deserialize_with = "nullable_f64")]
    pub fallarr: f64,
    /// Input pin capacitance.
    #[serde(rename = "input_pin_cap", deserialize_with = "nullable_f64")]
    pub cap: f64,
}

/// One row of `cell_properties`.
#[derive(Debug, Clone, Deserialize)]
pub struct CellRecord {
    /// Cell instance name.
    #[serde(rename = "cell_name")]
    pub name: String,
    /// Sequential cell (flip-flop, latch).
    #[serde(deserialize_with = "flag")]
    pub is_seq: bool,
    /// Macro block.
    #[serde(deserialize_with = "flag")]
    pub is_macro: bool,
    /// Cell is on a clock network.
    #[serde(deserialize_with = "flag")]
    pub is_in_clk: bool,
    /// Bounding box lower-left x.
    pub x0: f64,
    /// Bounding box lower-left y.
    pub y0: f64,
    /// Bounding box upper-right x.
    pub x1: f64,
    /// Bounding box upper-right y.
    pub y1: f64,
    /// Buffer cell.
    #[serde(deserialize_with = "flag")]
    pub is_buf: bool,
    /// Inverter cell.
    #[serde(deserialize_with = "flag")]
    pub is_inv: bool,
    /// Library cell (master) name.
    #[serde(rename = "libcell_name")]
    pub lib_ref: String,
    /// Static (leakage) power.
    #[serde(rename = "cell_static_power")]
    pub static_power: f64,
    /// Dynamic power.
    #[serde(rename = "cell_dynamic_power")]
    pub dynamic_power: f64,
}

/// One row of `net_properties`.
#[derive(Debug, Clone, Deserialize)]
pub struct NetRecord {
    /// Net name.
    #[serde(rename = "net_name")]
    pub name: String,
    /// Routed wire length.
    pub net_route_length: f64,
    /// Reserved steiner length, always `-1` from the extractor.
    #[serde(default = "unset")]
    pub net_steiner_length: f64,
    /// Number of sinks on the net.
    pub fanout: i64,
    /// Total capacitance (wire + pins).
    pub total_cap: f64,
    /// Wire capacitance.
    pub net_cap: f64,
    /// Coupling capacitance.
    pub net_coupling: f64,
    /// Wire resistance.
    pub net_res: f64,
}

/// One row of `libcell_properties`.
#[derive(Debug, Clone, Deserialize)]
pub struct LibCellRecord {
    /// Library cell name, matched against [`CellRecord::lib_ref`].
    #[serde(rename = "libcell_name")]
    pub name: String,
    /// Logical function identifier; cells sharing it are size variants.
    pub func_id: i64,
    /// Cell area.
    #[serde(rename = "libcell_area")]
    pub area: f64,
    /// Worst input pin capacitance.
    pub worst_input_cap: f64,
    /// Leakage power.
    #[serde(rename = "libcell_leakage")]
    pub leakage: f64,
    /// Fan-out-of-4 delay.
    pub fo4_delay: f64,
    /// Delay under a fixed output load, used for size ranking.
    #[serde(rename = "libcell_delay_fixed_load", alias = "fix_load_delay")]
    pub fix_load_delay: f64,
}

/// One row of `cell_pin_edge`, `net_pin_edge`, `cell_net_edge` or `cell_cell_edge`.
#[derive(Debug, Clone, Deserialize)]
pub struct EdgeRecord {
    /// Source entity name.
    pub src: String,
    /// Target entity name.
    pub tar: String,
    /// Source entity kind as written by the extractor (`pin`, `cell`, `net`).
    pub src_type: String,
    /// Target entity kind as written by the extractor.
    pub tar_type: String,
}

/// One row of `pin_pin_edge`: a timing arc between two pins.
#[derive(Debug, Clone, Deserialize)]
pub struct PinEdgeRecord {
    /// Source pin name.
    pub src: String,
    /// Target pin name.
    pub tar: String,
    /// Source entity kind (always `pin`).
    pub src_type: String,
    /// Target entity kind (always `pin`).
    pub tar_type: String,
    /// `true` for a net arc (driver to sink), `false` for a cell arc.
    #[serde(deserialize_with = "flag")]
    pub is_net: bool,
    /// Arc delay; `null` when timing was not annotated.
    pub arc_delay: Option<f64>,
}

fn unset() -> f64 {
    -1.0
}

/// Deserializes a boolean flag written either as `true`/`false` or as a number.
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    struct Flag;

    impl<'de> Visitor<'de> for Flag {
        type Value = bool;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a boolean or a 0/1 number")
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
            Ok(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(v != 0)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(v != 0)
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            Ok(v != 0.0)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            match v {
                "true" | "True" | "1" => Ok(true),
                "false" | "False" | "0" => Ok(false),
                other => Err(E::invalid_value(de::Unexpected::Str(other), &self)),
            }
        }
    }

    deserializer.deserialize_any(Flag)
}

/// Deserializes a number that may be written as `null` (missing), mapping
/// `null` to NaN.
fn nullable_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

/// Deserializes a slack value, mapping `null` to positive infinity.
fn slack<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pin_json() -> serde_json::Value {
        json!({
            "pin_name": "u1/A",
            "x": 1.5,
            "y": 2.0,
            "is_in_clk": 0,
            "is_port": false,
            "is_startpoint": 0,
            "is_endpoint": 1,
            "dir": 1,
            "num_reachable_endpoint": 3,
            "cell_name": "u1",
            "net_name": "n1",
            "pin_tran": 0.02,
            "pin_slack": 0.1,
            "pin_rise_arr": 0.3,
            "pin_fall_arr": 0.25,
            "input_pin_cap": 0.001
        })
    }

    #[test]
    fn pin_record_from_extractor_columns() {
        let pin: PinRecord = serde_json::from_value(pin_json()).unwrap();
        assert_eq!(pin.name, "u1/A");
        assert_eq!(pin.cellname, "u1");
        assert_eq!(pin.netname.as_deref(), Some("n1"));
        assert_eq!(pin.dir, PinDirection::Sink);
        assert!(pin.is_end);
        assert!(!pin.is_start);
        assert_eq!(pin.maxcap, -1.0);
        assert_eq!(pin.tran, 0.02);
    }

    #[test]
    fn null_slack_is_unconstrained() {
        let mut value = pin_json();
        value["pin_slack"] = serde_json::Value::Null;
        let pin: PinRecord = serde_json::from_value(value).unwrap();
        assert!(pin.slack.is_infinite());
    }

    #[test]
    fn missing_net_is_none() {
        let mut value = pin_json();
        value.as_object_mut().unwrap().remove("net_name");
        let pin: PinRecord = serde_json::from_value(value).unwrap();
        assert!(pin.netname.is_none());
    }

    #[test]
    fn missing_required_column_errors() {
        let mut value = pin_json();
        value.as_object_mut().unwrap().remove("pin_rise_arr");
        let err = serde_json::from_value::<PinRecord>(value).unwrap_err();
        assert!(err.to_string().contains("pin_rise_arr"));
    }

    #[test]
    fn invalid_direction_rejected() {
        let mut value = pin_json();
        value["dir"] = json!(2);
        assert!(serde_json::from_value::<PinRecord>(value).is_err());
    }

    #[test]
    fn direction_serializes_as_code() {
        assert_eq!(serde_json::to_string(&PinDirection::Driver).unwrap(), "0");
        assert_eq!(serde_json::to_string(&PinDirection::Sink).unwrap(), "1");
    }

    #[test]
    fn flags_accept_strings_and_numbers() {
        let cell: CellRecord = serde_json::from_value(json!({
            "cell_name": "u1",
            "is_seq": "False",
            "is_macro": 0.0,
            "is_in_clk": false,
            "x0": 0.0, "y0": 0.0, "x1": 2.0, "y1": 4.0,
            "is_buf": "1",
            "is_inv": 0,
            "libcell_name": "BUF_X1",
            "cell_static_power": 0.5,
            "cell_dynamic_power": 1.5
        }))
        .unwrap();
        assert!(cell.is_buf);
        assert!(!cell.is_seq);
        assert!(!cell.is_macro);
        assert_eq!(cell.lib_ref, "BUF_X1");
    }

    #[test]
    fn libcell_accepts_short_delay_column() {
        let lib: LibCellRecord = serde_json::from_value(json!({
            "libcell_name": "INV_X2",
            "func_id": 3,
            "libcell_area": 1.0,
            "worst_input_cap": 0.002,
            "libcell_leakage": 0.01,
            "fo4_delay": 12.0,
            "fix_load_delay": 8.5
        }))
        .unwrap();
        assert_eq!(lib.fix_load_delay, 8.5);
    }

    #[test]
    fn pin_edge_with_null_delay() {
        let edge: PinEdgeRecord = serde_json::from_value(json!({
            "src": "u1/Y", "tar": "u2/A",
            "src_type": "pin", "tar_type": "pin",
            "is_net": 1, "arc_delay": null
        }))
        .unwrap();
        assert!(edge.is_net);
        assert!(edge.arc_delay.is_none());
    }
}
