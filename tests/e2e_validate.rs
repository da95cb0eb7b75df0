//! Built documents pass structural validation; tampered ones don't.

use smprofile::builder::{GasComposition, SensorDescriptor};
use smprofile::{
    validate_document, Document, Error, MeterConfiguration, MeterVariant, Pipeline, PipelineInput, Status, Timestamp,
};

fn at() -> Timestamp {
    "2024-05-01T08:00:00Z".parse().unwrap()
}

fn full_input() -> PipelineInput {
    let mut input = PipelineInput::default();
    let r = &mut input.meter.reading;
    r.flow_rate = Some(118.2);
    r.differential_pressure = Some(12.4);
    r.static_pressure = Some(3450.0);
    r.temperature = Some(11.5);
    r.orifice_diameter = Some(50.8);
    r.pipe_inside_diameter = Some(102.26);
    r.gas_composition = Some(GasComposition { methane: Some(0.94), ethane: Some(0.03), ..Default::default() });
    r.dp_sensor = Some(SensorDescriptor { source: Some("AI-1".into()), ..Default::default() });
    r.meter_status = Some(Status::Alarm);
    input.device.ip_address = Some("192.168.1.50".into());
    input.device.uptime = Some(86_400);
    input
}

// ============================================================================
// 1. Builder output is valid
// ============================================================================

#[test]
fn test_built_document_is_valid() {
    for input in [PipelineInput::default(), full_input()] {
        let json = Pipeline::new().assemble_at(&input, at()).document.to_json_value().unwrap();
        let report = validate_document(&json);
        assert!(report.is_valid(), "errors: {:?}", report.errors);
        assert!(report.warnings.is_empty(), "warnings: {:?}", report.warnings);
    }
}

#[test]
fn test_valid_after_text_round_trip() {
    let text = Pipeline::new().assemble_at(&full_input(), at()).document.to_json_string(true).unwrap();
    let doc = Document::from_json_str(&text).unwrap();
    let report = validate_document(&doc.to_json_value().unwrap());
    assert!(report.into_result().is_ok());
}

#[test]
fn test_configured_meter_is_valid() {
    let raw = r#"{"configuration": {
        "name": "Well 001", "owner": "Acme",
        "AGA3": {"orificeDiameter": 50.8, "flowExtentsion": "Method_1"},
        "AGA8": {"components": [{"component": "C1", "value": 0.95}]},
        "sensors": {"flowingTemperature": {"source": "RTD-1"}}
    }}"#;
    let meter_input = MeterConfiguration::from_reader(raw.as_bytes()).unwrap().into_input(Some("WELL-001"));
    let meter = smprofile::build_meter(&meter_input, &smprofile::NoConfig, Some(at()));
    let input = PipelineInput::default();

    let assembly = Pipeline::new().assemble_with_meter_at(
        Some(MeterVariant::Orifice(meter.node)),
        &input.run,
        &input.device,
        None,
        at(),
    );
    let json = assembly.document.to_json_value().unwrap();
    assert_eq!(json["jpi:hasRun"][0]["jpi:hasMeterConfiguration"]["rdfs:label"], "Well 001");
    assert!(validate_document(&json).is_valid());
}

// ============================================================================
// 2. Tampered documents are rejected
// ============================================================================

#[test]
fn test_tampered_meter_is_reported_with_path() {
    let mut json = Pipeline::new().assemble_at(&full_input(), at()).document.to_json_value().unwrap();
    json["jpi:hasRun"][0]["jpi:hasMeterConfiguration"]["jpi:propertyValues"]["FlowRate"]["timestamp"] =
        serde_json::json!("not a time");

    let report = validate_document(&json);
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].starts_with("$.jpi:hasRun[0].jpi:hasMeterConfiguration.FlowRate"));

    let err = report.into_result().unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[test]
fn test_missing_context_is_an_error() {
    let mut json = Pipeline::new().assemble_at(&PipelineInput::default(), at()).document.to_json_value().unwrap();
    json.as_object_mut().unwrap().remove("@context");
    assert!(!validate_document(&json).is_valid());
}
