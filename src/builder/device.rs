//! Device Builder: run node(s) + device configuration → `jpi:FlowComputer`.
//!
//! The finished node is the complete document root. Runs are embedded as a
//! sequence under `jpi:hasRun`; one run is populated today.

use serde::{Deserialize, Serialize};

use crate::config::{self, ConfigProvider, keys};
use crate::model::{unit, Node, NodeKind, Status, Timestamp};

use super::property::PropertyMapBuilder;
use super::status::{derive_active_alarm_count, derive_device_status};
use super::Built;

pub const DEFAULT_DEVICE_ID: &str = "SCADAPAK-474";
pub const DEFAULT_DEVICE_NAME: &str = "SCADAPack 474 Flow Computer";
pub const DEFAULT_MANUFACTURER: &str = "Schneider_Electric";
pub const DEFAULT_MODEL: &str = "SCADAPack 474";

/// Device identification, network/location configuration and health telemetry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeviceInput {
    // Identification
    pub device_id: Option<String>,
    pub device_name: Option<String>,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub firmware_version: Option<String>,
    pub hardware_revision: Option<String>,

    // Network
    pub ip_address: Option<String>,
    pub mac_address: Option<String>,
    pub subnet_mask: Option<String>,
    pub gateway: Option<String>,
    pub modbus_address: Option<i64>,

    // Location
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub elevation: Option<f64>,
    #[serde(rename = "surfaceLSD")]
    pub surface_lsd: Option<String>,
    #[serde(rename = "downholeLSD")]
    pub downhole_lsd: Option<String>,

    // Time and configuration
    pub time_zone: Option<String>,
    /// Seconds since boot.
    pub uptime: Option<i64>,
    pub contract_hour: Option<i64>,
    pub atmospheric_pressure: Option<f64>,

    // Health
    pub cpu_load: Option<f64>,
    pub memory_used: Option<f64>,
    pub battery_voltage: Option<f64>,
    pub power_supply_voltage: Option<f64>,
    pub ambient_temperature: Option<f64>,

    // Overrides
    pub device_status: Option<Status>,
    pub active_alarm_count: Option<i64>,
}

impl DeviceInput {
    /// The device's local id as resolved against `config`.
    pub fn resolved_id(&self, config: &dyn ConfigProvider) -> String {
        config::resolve_string(self.device_id.as_deref(), config, keys::DEVICE_ID, DEFAULT_DEVICE_ID)
    }
}

/// Build the device node from its runs.
///
/// Pass `Some(run)` for today's single-run devices; `None` builds a device
/// with no `jpi:hasRun` relationship and `NumberOfRuns = 0`.
pub fn build_device<I>(runs: I, input: &DeviceInput, config: &dyn ConfigProvider, at: Option<Timestamp>) -> Built
where
    I: IntoIterator<Item = Node>,
{
    let at = at.unwrap_or_else(Timestamp::now);
    let runs: Vec<Node> = runs.into_iter().collect();

    let id = input.resolved_id(config);
    let name = config::resolve_string(input.device_name.as_deref(), config, keys::DEVICE_NAME, DEFAULT_DEVICE_NAME);
    let manufacturer =
        config::resolve_string(input.manufacturer.as_deref(), config, keys::MANUFACTURER, DEFAULT_MANUFACTURER);
    let model = config::resolve_string(input.model.as_deref(), config, keys::MODEL, DEFAULT_MODEL);

    let run_statuses: Vec<Status> = runs.iter().filter_map(Node::status).collect();
    let status = derive_device_status(input.device_status.as_ref(), &run_statuses);
    let active_alarms = derive_active_alarm_count(input.active_alarm_count, &run_statuses);

    let text = |explicit: &Option<String>, key: &str| explicit.clone().or_else(|| config.lookup_string(key));
    let number = |explicit: Option<f64>, key: &str| explicit.or_else(|| config.lookup_f64(key));

    let mut props = PropertyMapBuilder::new(at);

    // Identification
    props.required("DeviceName", name.as_str(), None)
        .required("Manufacturer", manufacturer.as_str(), None)
        .required("Model", model.as_str(), None)
        .optional("SerialNumber", input.serial_number.as_deref(), None)
        .optional("FirmwareVersion", input.firmware_version.as_deref(), None)
        .optional("HardwareRevision", input.hardware_revision.as_deref(), None);

    // Network
    props.optional("IPAddress", text(&input.ip_address, keys::IP_ADDRESS), None)
        .optional("MACAddress", text(&input.mac_address, keys::MAC_ADDRESS), None)
        .optional("SubnetMask", text(&input.subnet_mask, keys::SUBNET_MASK), None)
        .optional("Gateway", text(&input.gateway, keys::GATEWAY), None)
        .optional(
            "ModbusAddress",
            input.modbus_address.or_else(|| config.lookup_i64(keys::MODBUS_ADDRESS)),
            None,
        );

    // Location
    props.optional("Location", text(&input.location, keys::LOCATION), None)
        .optional("Latitude", number(input.latitude, keys::LATITUDE), Some(unit::DEG))
        .optional("Longitude", number(input.longitude, keys::LONGITUDE), Some(unit::DEG))
        .optional("Elevation", number(input.elevation, keys::ELEVATION), Some(unit::M))
        .optional("SurfaceLSD", text(&input.surface_lsd, keys::SURFACE_LSD), None)
        .optional("DownholeLSD", text(&input.downhole_lsd, keys::DOWNHOLE_LSD), None);

    // Time
    props.optional("TimeZone", text(&input.time_zone, keys::TIME_ZONE), None)
        .required("CurrentDateTime", at.to_iso_string(), None)
        .optional("Uptime", input.uptime, Some(unit::SEC));

    // Configuration
    props.required("NumberOfRuns", runs.len() as i64, None)
        .optional("ContractHour", input.contract_hour, None)
        .optional("AtmosphericPressure", input.atmospheric_pressure, Some(unit::KILO_PA));

    // Health
    props.optional_live("CPULoad", input.cpu_load, Some(unit::PERCENT))
        .optional_live("MemoryUsed", input.memory_used, Some(unit::PERCENT))
        .optional_live("BatteryVoltage", input.battery_voltage, Some(unit::V))
        .optional_live("PowerSupplyVoltage", input.power_supply_voltage, Some(unit::V))
        .optional_live("AmbientTemperature", input.ambient_temperature, Some(unit::DEG_C));

    // Status
    props.required_live("Status", status.clone(), None)
        .required("ActiveAlarmCount", active_alarms, None);

    let mut node = Node::new(NodeKind::FlowComputer, &id, name).with_properties(props.build());
    let run_count = runs.len();
    if !runs.is_empty() {
        node = node.with_runs(runs);
    }

    tracing::debug!(
        node = %node.id,
        runs = run_count,
        %status,
        active_alarms,
        properties = node.properties.len(),
        "built flow computer"
    );
    Built { node, timestamp: at }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MemoryConfig, NoConfig};
    use crate::model::{PropertyValue, Relationship, Value};

    fn at() -> Timestamp {
        "2024-05-01T08:00:00Z".parse().unwrap()
    }

    fn run_with_status(status: &str) -> Node {
        Node::new(NodeKind::MeterRun, "R1", "Run 1").with_property("Status", PropertyValue::new(status))
    }

    fn device(run: Option<Node>, input: &DeviceInput) -> Node {
        build_device(run, input, &NoConfig, Some(at())).node
    }

    #[test]
    fn test_defaults_without_run() {
        let node = device(None, &DeviceInput::default());
        assert_eq!(node.id.as_str(), "jpi:FlowComputer/Instance/SCADAPAK-474");
        assert_eq!(node.label, DEFAULT_DEVICE_NAME);
        assert_eq!(node.value("Manufacturer"), Some(&Value::from("Schneider_Electric")));
        assert_eq!(node.value("NumberOfRuns"), Some(&Value::Int(0)));
        assert_eq!(node.value("CurrentDateTime"), Some(&Value::from("2024-05-01T08:00:00.000Z")));
        assert_eq!(node.value("Status"), Some(&Value::from("Normal")));
        assert_eq!(node.value("ActiveAlarmCount"), Some(&Value::Int(0)));
        assert!(node.runs.is_none());
        assert!(!node.properties.contains_key("IPAddress"));
        assert!(!node.properties.contains_key("CPULoad"));
    }

    #[test]
    fn test_status_and_alarm_from_run() {
        for (run, status, count) in [("Fault", "Fault", 1), ("Alarm", "Alarm", 1), ("Normal", "Normal", 0)] {
            let node = device(Some(run_with_status(run)), &DeviceInput::default());
            assert_eq!(node.value("Status"), Some(&Value::from(status)), "run status {run}");
            assert_eq!(node.value("ActiveAlarmCount"), Some(&Value::Int(count)), "run status {run}");
        }
    }

    #[test]
    fn test_overrides_are_independent() {
        let input = DeviceInput { device_status: Some(Status::Normal), ..Default::default() };
        let node = device(Some(run_with_status("Fault")), &input);
        assert_eq!(node.value("Status"), Some(&Value::from("Normal")));
        assert_eq!(node.value("ActiveAlarmCount"), Some(&Value::Int(1)));

        let input = DeviceInput { active_alarm_count: Some(5), ..Default::default() };
        let node = device(Some(run_with_status("Normal")), &input);
        assert_eq!(node.value("Status"), Some(&Value::from("Normal")));
        assert_eq!(node.value("ActiveAlarmCount"), Some(&Value::Int(5)));
    }

    #[test]
    fn test_run_embedded_as_sequence() {
        let node = device(Some(run_with_status("Normal")), &DeviceInput::default());
        assert_eq!(node.relationship(), Some(Relationship::HasRun));
        assert_eq!(node.runs().len(), 1);
        assert_eq!(node.value("NumberOfRuns"), Some(&Value::Int(1)));
    }

    #[test]
    fn test_zero_health_readings_are_emitted() {
        let input = DeviceInput {
            cpu_load: Some(0.0),
            latitude: Some(0.0),
            uptime: Some(0),
            contract_hour: Some(0),
            modbus_address: Some(0),
            ..Default::default()
        };
        let node = device(None, &input);
        assert_eq!(node.value("CPULoad"), Some(&Value::Float(0.0)));
        assert_eq!(node.get("CPULoad").unwrap().observed_at, Some(at()));
        assert_eq!(node.value("Latitude"), Some(&Value::Float(0.0)));
        assert_eq!(node.value("Uptime"), Some(&Value::Int(0)));
        assert_eq!(node.value("ContractHour"), Some(&Value::Int(0)));
        assert_eq!(node.value("ModbusAddress"), Some(&Value::Int(0)));
    }

    #[test]
    fn test_network_and_location_from_config() {
        let cfg = MemoryConfig::from_pairs([
            (keys::IP_ADDRESS, Value::from("192.168.1.100")),
            (keys::MODBUS_ADDRESS, Value::Int(1)),
            (keys::LOCATION, Value::from("Pad 7")),
        ]);
        let input = DeviceInput { location: Some("Pad 9".into()), ..Default::default() };
        let node = build_device(None, &input, &cfg, Some(at())).node;
        assert_eq!(node.value("IPAddress"), Some(&Value::from("192.168.1.100")));
        assert_eq!(node.value("ModbusAddress"), Some(&Value::Int(1)));
        assert_eq!(node.value("Location"), Some(&Value::from("Pad 9")));
    }

    #[test]
    fn test_two_runs_aggregate() {
        let built = build_device(
            [run_with_status("Alarm"), run_with_status("Fault")],
            &DeviceInput::default(),
            &NoConfig,
            Some(at()),
        );
        assert_eq!(built.node.value("NumberOfRuns"), Some(&Value::Int(2)));
        assert_eq!(built.node.value("Status"), Some(&Value::from("Fault")));
        assert_eq!(built.node.value("ActiveAlarmCount"), Some(&Value::Int(2)));
    }
}
