//! Inclusion-rule and idempotence tests over whole documents.
//!
//! An optional field appears iff its source was supplied; zero, `false` and
//! the empty string count as supplied. Identical inputs and timestamp give
//! byte-identical output.

use proptest::prelude::*;
use smprofile::builder::{GasComposition, SensorDescriptor};
use smprofile::{
    build_device, build_run, DeviceInput, NoConfig, Pipeline, PipelineInput, RunInput, Timestamp, Value,
};

fn at() -> Timestamp {
    "2024-05-01T08:00:00Z".parse().unwrap()
}

// ============================================================================
// 1. Falsy values are present values
// ============================================================================

#[test]
fn test_falsy_values_are_emitted() {
    let mut input = PipelineInput::default();
    input.meter.reading.latitude = Some(0.0);
    input.meter.reading.current_hour_volume = Some(0.0);
    input.run.run_enabled = Some(false);
    input.run.surface_lsd = Some(String::new());
    input.device.modbus_address = Some(0);
    input.device.cpu_load = Some(0.0);
    input.device.firmware_version = Some(String::new());

    let device = Pipeline::new().assemble_at(&input, at()).document.root;
    let run = &device.runs()[0];
    let meter = run.meter_configuration.as_ref().unwrap();

    assert_eq!(meter.value("Latitude"), Some(&Value::Float(0.0)));
    assert_eq!(meter.value("CurrentHourVolume"), Some(&Value::Float(0.0)));
    assert_eq!(run.value("Enabled"), Some(&Value::Bool(false)));
    assert_eq!(run.value("SurfaceLSD"), Some(&Value::from("")));
    assert_eq!(device.value("ModbusAddress"), Some(&Value::Int(0)));
    assert_eq!(device.value("CPULoad"), Some(&Value::Float(0.0)));
    assert_eq!(device.value("FirmwareVersion"), Some(&Value::from("")));
}

#[test]
fn test_unset_optionals_are_absent() {
    let device = Pipeline::new().assemble_at(&PipelineInput::default(), at()).document.root;
    let run = &device.runs()[0];
    let meter = run.meter_configuration.as_ref().unwrap();

    for key in ["SerialNumber", "IPAddress", "Latitude", "Uptime", "CPULoad", "TimeZone"] {
        assert!(device.get(key).is_none(), "device should omit {key}");
    }
    for key in ["SurfaceLSD", "DownholeLSD"] {
        assert!(run.get(key).is_none(), "run should omit {key}");
    }
    assert!(meter.properties.keys().all(|k| !k.starts_with("GasComp_")));
    assert!(meter.properties.keys().all(|k| !k.contains("Sensor_")));
}

// ============================================================================
// 2. Clusters come and go as a unit
// ============================================================================

#[test]
fn test_clusters_all_or_nothing() {
    let mut input = PipelineInput::default();
    input.meter.reading.gas_composition = Some(GasComposition::default());
    input.meter.reading.temp_sensor = Some(SensorDescriptor::default());

    let device = Pipeline::new().assemble_at(&input, at()).document.root;
    let meter = device.runs()[0].meter_configuration.clone().unwrap();

    let gas = meter.properties.keys().filter(|k| k.starts_with("GasComp_")).count();
    assert_eq!(gas, 21);
    assert!(meter.properties.keys().any(|k| k.starts_with("TempSensor_")));
    assert!(!meter.properties.keys().any(|k| k.starts_with("DPSensor_")));
    assert!(!meter.properties.keys().any(|k| k.starts_with("StaticPressureSensor_")));
}

// ============================================================================
// 3. A device without runs
// ============================================================================

#[test]
fn test_device_without_runs() {
    let device = build_device(None, &DeviceInput::default(), &NoConfig, Some(at())).node;
    assert!(device.runs.is_none());
    assert_eq!(device.value("NumberOfRuns"), Some(&Value::Int(0)));

    let json = serde_json::to_value(&device).unwrap();
    assert!(json.get("jpi:hasRun").is_none());
}

#[test]
fn test_run_without_meter() {
    let run = build_run(None, &RunInput::default(), &NoConfig, Some(at())).node;
    let json = serde_json::to_value(&run).unwrap();
    assert!(json.get("jpi:hasMeterConfiguration").is_none());
    assert_eq!(json["jpi:propertyValues"]["MeterType"]["value"], "Orifice");
}

// ============================================================================
// 4. Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_optional_present_iff_supplied(
        lat in proptest::option::of(-90.0f64..90.0),
        uptime in proptest::option::of(0i64..1_000_000),
        serial in proptest::option::of("[A-Z0-9]{0,8}"),
    ) {
        let input = DeviceInput {
            latitude: lat,
            uptime,
            serial_number: serial.clone(),
            ..Default::default()
        };
        let device = build_device(None, &input, &NoConfig, Some(at())).node;

        prop_assert_eq!(device.value("Latitude").cloned(), lat.map(Value::Float));
        prop_assert_eq!(device.value("Uptime").cloned(), uptime.map(Value::Int));
        prop_assert_eq!(device.value("SerialNumber").cloned(), serial.map(Value::String));
    }

    #[test]
    fn prop_identical_inputs_serialize_identically(
        flow in proptest::option::of(0.0f64..10_000.0),
        dp in proptest::option::of(0.0f64..500.0),
        status in prop_oneof![
            Just("Normal"), Just("Alarm"), Just("Fault"), Just("Offline"), Just("Maintenance")
        ],
        secs in 0i64..4_000_000_000,
    ) {
        let mut input = PipelineInput::default();
        input.meter.reading.flow_rate = flow;
        input.meter.reading.differential_pressure = dp;
        input.meter.reading.meter_status = Some(status.into());

        let ts: Timestamp = chrono::DateTime::from_timestamp(secs, 0).unwrap().into();
        let pipeline = Pipeline::new();
        let first = pipeline.assemble_at(&input, ts).document.to_json_string(false).unwrap();
        let second = pipeline.assemble_at(&input, ts).document.to_json_string(false).unwrap();
        prop_assert_eq!(first, second);
    }
}
