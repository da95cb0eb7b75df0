//! Run Builder: meter node + run configuration → `jpi:MeterRun` node.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::{self, ConfigProvider, keys};
use crate::model::{Node, NodeKind, Status, Timestamp};

use super::property::PropertyMapBuilder;
use super::status::derive_run_status;
use super::Built;

pub const DEFAULT_RUN_ID: &str = "SCADAPAK-474-RUN1";
pub const DEFAULT_RUN_NAME: &str = "Run 1 - Sales";
pub const DEFAULT_RUN_NUMBER: i64 = 1;
pub const DEFAULT_FLOW_DIRECTION: &str = "Forward";
pub const DEFAULT_PURPOSE: &str = "Sales";

// ============================================================================
// Meter variants
// ============================================================================

/// Flow technology of the meter on a run. Recorded as the run's `MeterType`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeterType {
    #[default]
    Orifice,
    Turbine,
    Coriolis,
    Ultrasonic,
}

impl MeterType {
    pub fn as_str(self) -> &'static str {
        match self {
            MeterType::Orifice => "Orifice",
            MeterType::Turbine => "Turbine",
            MeterType::Coriolis => "Coriolis",
            MeterType::Ultrasonic => "Ultrasonic",
        }
    }
}

impl fmt::Display for MeterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A built meter node tagged with its technology.
///
/// The only thing the Run Builder needs from any variant is a node that may
/// carry a `Status` property.
#[derive(Debug, Clone, PartialEq)]
pub enum MeterVariant {
    Orifice(Node),
    Turbine(Node),
    Coriolis(Node),
    Ultrasonic(Node),
}

impl MeterVariant {
    pub fn new(meter_type: MeterType, node: Node) -> Self {
        match meter_type {
            MeterType::Orifice => MeterVariant::Orifice(node),
            MeterType::Turbine => MeterVariant::Turbine(node),
            MeterType::Coriolis => MeterVariant::Coriolis(node),
            MeterType::Ultrasonic => MeterVariant::Ultrasonic(node),
        }
    }

    pub fn meter_type(&self) -> MeterType {
        match self {
            MeterVariant::Orifice(_) => MeterType::Orifice,
            MeterVariant::Turbine(_) => MeterType::Turbine,
            MeterVariant::Coriolis(_) => MeterType::Coriolis,
            MeterVariant::Ultrasonic(_) => MeterType::Ultrasonic,
        }
    }

    pub fn node(&self) -> &Node {
        match self {
            MeterVariant::Orifice(n)
            | MeterVariant::Turbine(n)
            | MeterVariant::Coriolis(n)
            | MeterVariant::Ultrasonic(n) => n,
        }
    }

    pub fn into_node(self) -> Node {
        match self {
            MeterVariant::Orifice(n)
            | MeterVariant::Turbine(n)
            | MeterVariant::Coriolis(n)
            | MeterVariant::Ultrasonic(n) => n,
        }
    }

    pub fn status(&self) -> Option<Status> {
        self.node().status()
    }
}

// ============================================================================
// Input
// ============================================================================

/// Run identification and configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RunInput {
    pub run_id: Option<String>,
    pub run_number: Option<i64>,
    pub run_name: Option<String>,
    pub owner: Option<String>,
    pub run_enabled: Option<bool>,
    pub flow_direction: Option<String>,
    pub purpose: Option<String>,
    #[serde(rename = "surfaceLSD")]
    pub surface_lsd: Option<String>,
    #[serde(rename = "downholeLSD")]
    pub downhole_lsd: Option<String>,
    /// Explicit status; wins over the meter-derived one.
    pub run_status: Option<Status>,
}

// ============================================================================
// Builder
// ============================================================================

/// Build the run node, embedding `meter` under `jpi:hasMeterConfiguration`
/// when one is supplied.
///
/// Reuses the upstream timestamp when `at` is given, otherwise captures once.
pub fn build_run(
    meter: Option<MeterVariant>,
    input: &RunInput,
    config: &dyn ConfigProvider,
    at: Option<Timestamp>,
) -> Built {
    let at = at.unwrap_or_else(Timestamp::now);
    let id = config::resolve_string(input.run_id.as_deref(), config, keys::RUN_ID, DEFAULT_RUN_ID);
    let name = config::resolve_string(input.run_name.as_deref(), config, keys::RUN_NAME, DEFAULT_RUN_NAME);
    let number = config::resolve_i64(input.run_number, config, keys::RUN_NUMBER, DEFAULT_RUN_NUMBER);
    let owner = config::resolve_string(input.owner.as_deref(), config, keys::OWNER, super::meter::DEFAULT_OWNER);

    let meter_type = meter.as_ref().map(MeterVariant::meter_type).unwrap_or_default();
    let meter_status = meter.as_ref().and_then(MeterVariant::status);
    let status = derive_run_status(input.run_status.as_ref(), meter_status.as_ref());

    let mut props = PropertyMapBuilder::new(at);
    props.required("RunNumber", number, None)
        .required("RunName", name.as_str(), None)
        .required("MeterType", meter_type.as_str(), None)
        .with_default("Enabled", input.run_enabled, true, None)
        .with_default("FlowDirection", input.flow_direction.as_deref(), DEFAULT_FLOW_DIRECTION, None)
        .required("Owner", owner.as_str(), None)
        .optional("SurfaceLSD", input.surface_lsd.as_deref(), None)
        .optional("DownholeLSD", input.downhole_lsd.as_deref(), None)
        .with_default("Purpose", input.purpose.as_deref(), DEFAULT_PURPOSE, None)
        .required_live("Status", status.clone(), None);

    let mut node = Node::new(NodeKind::MeterRun, &id, name).with_properties(props.build());
    if let Some(meter) = meter {
        node = node.with_meter_configuration(meter.into_node());
    }

    tracing::debug!(
        node = %node.id,
        %meter_type,
        meter_status = ?meter_status,
        %status,
        "built meter run"
    );
    Built { node, timestamp: at }
}
